//! Control state for any effect kind

use serde::{Deserialize, Serialize};

use crate::gradient::GradientControls;
use crate::kind::EffectKind;
use crate::shadow::{BoxShadowControls, ShadowControls};

/// Controls of one effect kind.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum EffectControls {
    BoxShadow(BoxShadowControls),
    TextShadow(ShadowControls),
    Gradient(GradientControls),
}

impl EffectControls {
    /// Mount/reset defaults for a kind.
    pub fn defaults(kind: EffectKind) -> Self {
        match kind {
            EffectKind::BoxShadow => Self::BoxShadow(BoxShadowControls::default()),
            EffectKind::TextShadow => Self::TextShadow(ShadowControls::default()),
            EffectKind::Gradient => Self::Gradient(GradientControls::default()),
        }
    }

    /// Parse a CSS value of the given kind. Never fails.
    pub fn parse(kind: EffectKind, value: &str) -> Self {
        match kind {
            EffectKind::BoxShadow => Self::BoxShadow(BoxShadowControls::parse(value)),
            EffectKind::TextShadow => Self::TextShadow(ShadowControls::parse(value)),
            EffectKind::Gradient => Self::Gradient(GradientControls::parse(value)),
        }
    }

    pub fn kind(&self) -> EffectKind {
        match self {
            Self::BoxShadow(_) => EffectKind::BoxShadow,
            Self::TextShadow(_) => EffectKind::TextShadow,
            Self::Gradient(_) => EffectKind::Gradient,
        }
    }

    /// The CSS property value.
    pub fn to_css(&self) -> String {
        match self {
            Self::BoxShadow(controls) => controls.to_css(),
            Self::TextShadow(controls) => controls.to_css(),
            Self::Gradient(controls) => controls.to_css(),
        }
    }

    /// A full declaration, e.g. `box-shadow: 0px 4px 8px 0px rgba(0, 0, 0, 0.25);`
    pub fn css_declaration(&self) -> String {
        css_declaration(self.kind(), &self.to_css())
    }
}

/// `{property}: {value};` for a kind.
pub fn css_declaration(kind: EffectKind, value: &str) -> String {
    format!("{}: {};", kind.property(), value)
}

impl From<BoxShadowControls> for EffectControls {
    fn from(controls: BoxShadowControls) -> Self {
        Self::BoxShadow(controls)
    }
}

impl From<ShadowControls> for EffectControls {
    fn from(controls: ShadowControls) -> Self {
        Self::TextShadow(controls)
    }
}

impl From<GradientControls> for EffectControls {
    fn from(controls: GradientControls) -> Self {
        Self::Gradient(controls)
    }
}
