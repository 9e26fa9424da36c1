//! Which style rule receives a property

use serde::{Deserialize, Serialize};
use sheen_codec::EffectKind;

/// Rule picked when an element carries more than one.
///
/// In combo-class authoring the first rule is a shared base and later ones
/// are element-specific variants, so the default writes to the second.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TargetRulePolicy {
    #[default]
    PreferSecond,
    First,
    Last,
}

/// Index of the rule to write, or `None` for an element without rules.
pub fn select_target<S>(rules: &[S], policy: TargetRulePolicy) -> Option<usize> {
    match rules.len() {
        0 => None,
        1 => Some(0),
        len => Some(match policy {
            TargetRulePolicy::PreferSecond => 1,
            TargetRulePolicy::First => 0,
            TargetRulePolicy::Last => len - 1,
        }),
    }
}

/// `{prefix}-effect-{n}`
pub fn rule_name_candidate(kind: EffectKind, n: u32) -> String {
    format!("{}-effect-{}", kind.rule_prefix(), n)
}

/// Name used when probing finds no free candidate.
pub fn fallback_rule_name(kind: EffectKind, unix_millis: u128) -> String {
    format!("{}-effect-{}", kind.rule_prefix(), unix_millis)
}
