//! Last-applied bookkeeping

use sheen_codec::{canonical_for, EffectKind};

/// The canonical value last written for each effect kind.
///
/// A request whose canonical form matches the record is a no-op.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AppliedStyleState {
    values: [Option<String>; 3],
}

impl AppliedStyleState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `value` (canonicalized) as written for `kind`.
    pub fn record(&mut self, kind: EffectKind, value: &str) {
        self.values[kind.index()] = Some(canonical_for(kind, value));
    }

    /// Whether `value` is canonically equal to the recorded one.
    pub fn matches(&self, kind: EffectKind, value: &str) -> bool {
        self.get(kind)
            .is_some_and(|recorded| recorded == canonical_for(kind, value))
    }

    pub fn get(&self, kind: EffectKind) -> Option<&str> {
        self.values[kind.index()].as_deref()
    }

    pub fn clear(&mut self, kind: EffectKind) {
        self.values[kind.index()] = None;
    }

    pub fn clear_all(&mut self) {
        self.values = Default::default();
    }

    pub fn is_empty(&self) -> bool {
        self.values.iter().all(Option::is_none)
    }
}
