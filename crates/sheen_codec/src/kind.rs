//! The three effect kinds the editor works with

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A CSS effect the panel can edit and apply.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EffectKind {
    /// `box-shadow`
    BoxShadow,
    /// `text-shadow`
    TextShadow,
    /// Gradient form of `background-image`
    Gradient,
}

impl EffectKind {
    /// Every kind, in tab order.
    pub const ALL: [EffectKind; 3] = [
        EffectKind::BoxShadow,
        EffectKind::TextShadow,
        EffectKind::Gradient,
    ];

    /// CSS property this kind writes.
    pub fn property(self) -> &'static str {
        match self {
            Self::BoxShadow => "box-shadow",
            Self::TextShadow => "text-shadow",
            Self::Gradient => "background-image",
        }
    }

    /// Stable tab id.
    pub fn tab_id(self) -> &'static str {
        match self {
            Self::BoxShadow => "box",
            Self::TextShadow => "text",
            Self::Gradient => "background",
        }
    }

    /// Prefix for style rules synthesized to carry this kind.
    pub fn rule_prefix(self) -> &'static str {
        match self {
            Self::BoxShadow => "box",
            Self::TextShadow => "text",
            Self::Gradient => "gradient",
        }
    }

    /// User-facing display name.
    pub fn display_name(self) -> &'static str {
        match self {
            Self::BoxShadow => "Box Shadow",
            Self::TextShadow => "Text Shadow",
            Self::Gradient => "Gradient",
        }
    }

    /// Slot index for per-kind bookkeeping arrays.
    pub fn index(self) -> usize {
        match self {
            Self::BoxShadow => 0,
            Self::TextShadow => 1,
            Self::Gradient => 2,
        }
    }
}

impl Display for EffectKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Returned when a string names no effect kind.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown effect kind `{0}` (expected box, text or gradient)")]
pub struct UnknownEffectKind(pub String);

impl FromStr for EffectKind {
    type Err = UnknownEffectKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "box" | "box-shadow" => Ok(Self::BoxShadow),
            "text" | "text-shadow" => Ok(Self::TextShadow),
            "gradient" | "background" | "background-image" => Ok(Self::Gradient),
            _ => Err(UnknownEffectKind(s.to_string())),
        }
    }
}
