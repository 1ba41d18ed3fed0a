//! Index-key derivation from filter rules
//!
//! Index keys accelerate event-to-profile matching. Every key is a
//! colon-joined quadruple `tenant:type:path:value`, with the `~` marker
//! stripped from the path segment. The derivation here is shared verbatim by
//! the profile-side composer and the filter-side reverse resolver; any
//! divergence between the two would leave stale index entries behind.

use crate::filter::{Filter, FilterRule, META_EXISTS, META_NOTEXISTS, META_PREFIX, META_STRING, META_SUFFIX};

/// Separator for concatenated cache and index keys
pub const KEY_SEP: &str = ":";

/// Marker prefixing operands resolved from the request at match time
pub const DYNAMIC_PREFIX: char = '~';

/// Wildcard type segment for profiles that reference no filters
pub const MATCH_NONE: &str = "*none";

/// Wildcard path/value segment
pub const MATCH_ANY: &str = "*any";

/// Rule types eligible for index derivation
const INDEXABLE_RULE_TYPES: &[&str] = &[META_STRING, META_PREFIX, META_SUFFIX, META_EXISTS, META_NOTEXISTS];

/// Data-provider paths resolved entirely at runtime. Their content is not
/// known at mutation time, so they can never produce static index keys.
const RUNTIME_PATH_PREFIXES: &[&str] = &["~*accounts", "~*stats", "~*resources"];

/// Join key parts with the canonical separator.
pub fn concat_key(parts: &[&str]) -> String {
    parts.join(KEY_SEP)
}

/// The catch-all index entry matched by every event, tenant-qualified.
pub fn none_index_key(tenant: &str) -> String {
    concat_key(&[tenant, MATCH_NONE, MATCH_ANY, MATCH_ANY])
}

fn is_runtime_path(operand: &str) -> bool {
    RUNTIME_PATH_PREFIXES.iter().any(|p| operand.starts_with(p))
}

fn is_dynamic(operand: &str) -> bool {
    operand.starts_with(DYNAMIC_PREFIX)
}

/// Index-key fragments contributed by a single rule, without tenant
/// qualification. Fragment shape: `type:path:value`.
///
/// A fragment is emitted only when exactly one operand side references the
/// request: a `~`-path element paired with a literal value indexes the value
/// under that path, a literal element paired with a `~`-path value indexes
/// the element under the value's path (mirrored). Rules where both sides are
/// request-resolved produce nothing and remain un-indexed.
pub fn rule_fragments(rule: &FilterRule) -> Vec<String> {
    let mut fragments = Vec::new();
    if !INDEXABLE_RULE_TYPES.contains(&rule.rule_type.as_str()) || is_runtime_path(&rule.element) {
        return fragments;
    }
    let elem_is_path = is_dynamic(&rule.element);
    if rule.values.is_empty() {
        // presence checks carry no values; the key is type and path alone
        if elem_is_path {
            match rule.rule_type.as_str() {
                META_EXISTS => {
                    fragments.push(concat_key(&[&rule.rule_type, &rule.element[1..], MATCH_ANY]))
                }
                META_NOTEXISTS => {
                    fragments.push(concat_key(&[&rule.rule_type, &rule.element[1..], MATCH_NONE]))
                }
                _ => {}
            }
        }
        return fragments;
    }
    for value in &rule.values {
        if is_runtime_path(value) {
            continue;
        }
        if elem_is_path {
            if is_dynamic(value) {
                continue; // both sides resolved at match time
            }
            fragments.push(concat_key(&[&rule.rule_type, &rule.element[1..], value]));
        } else if is_dynamic(value) {
            fragments.push(concat_key(&[&rule.rule_type, &value[1..], &rule.element]));
        }
    }
    fragments
}

/// All index-key fragments contributed by a filter's rules, in rule order.
/// Duplicates are left to the set-valued accumulators downstream.
pub fn filter_fragments(filter: &Filter) -> Vec<String> {
    filter.rules.iter().flat_map(rule_fragments).collect()
}
