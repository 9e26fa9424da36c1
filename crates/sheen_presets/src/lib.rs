//! Built-in effect presets.
//!
//! Every preset carries two values: `value` is what gets written to the
//! element, `preview` is what the swatch renders. They differ only where the
//! written value has stops or layers that would render oddly at swatch size.

use std::fmt::{Display, Formatter};

use serde::Serialize;
use sheen_codec::{EffectControls, EffectKind};

/// A one-click effect value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct Preset {
    /// Stable id, unique within its kind
    pub id: &'static str,
    /// User-facing display name
    pub name: &'static str,
    pub kind: EffectKind,
    /// CSS value applied to the element
    pub value: &'static str,
    /// CSS value used for the swatch
    pub preview: &'static str,
}

impl Preset {
    const fn new(
        id: &'static str,
        name: &'static str,
        kind: EffectKind,
        value: &'static str,
        preview: &'static str,
    ) -> Self {
        Self {
            id,
            name,
            kind,
            value,
            preview,
        }
    }

    /// Controls populated from the preset value.
    pub fn controls(&self) -> EffectControls {
        EffectControls::parse(self.kind, self.value)
    }

    /// `{property}: {value};` for the preset value.
    pub fn css_declaration(&self) -> String {
        sheen_codec::css_declaration(self.kind, self.value)
    }
}

impl Display for Preset {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name)
    }
}

const BOX_PRESETS: [Preset; 8] = [
    Preset::new(
        "soft",
        "Soft Shadow",
        EffectKind::BoxShadow,
        "0 4px 8px rgba(0, 0, 0, 0.12)",
        "0 4px 8px rgba(0, 0, 0, 0.12)",
    ),
    Preset::new(
        "medium",
        "Medium Shadow",
        EffectKind::BoxShadow,
        "0 6px 12px rgba(0, 0, 0, 0.15)",
        "0 6px 12px rgba(0, 0, 0, 0.15)",
    ),
    Preset::new(
        "hard",
        "Hard Shadow",
        EffectKind::BoxShadow,
        "0 8px 16px rgba(0, 0, 0, 0.2)",
        "0 8px 16px rgba(0, 0, 0, 0.2)",
    ),
    Preset::new(
        "inner",
        "Inner Shadow",
        EffectKind::BoxShadow,
        "inset 0 2px 4px rgba(0, 0, 0, 0.1)",
        "inset 0 2px 4px rgba(0, 0, 0, 0.1)",
    ),
    Preset::new(
        "floating",
        "Floating",
        EffectKind::BoxShadow,
        "0 10px 25px rgba(0, 0, 0, 0.15)",
        "0 10px 25px rgba(0, 0, 0, 0.15)",
    ),
    Preset::new(
        "subtle",
        "Subtle",
        EffectKind::BoxShadow,
        "0 1px 3px rgba(0, 0, 0, 0.1)",
        "0 1px 3px rgba(0, 0, 0, 0.1)",
    ),
    Preset::new(
        "neon",
        "Neon Glow",
        EffectKind::BoxShadow,
        "0 0 10px rgba(0, 255, 255, 0.7)",
        "0 0 10px rgba(0, 255, 255, 0.7)",
    ),
    Preset::new(
        "elegant",
        "Elegant",
        EffectKind::BoxShadow,
        "0 15px 35px rgba(0, 0, 0, 0.1)",
        "0 15px 35px rgba(0, 0, 0, 0.1)",
    ),
];

const TEXT_PRESETS: [Preset; 6] = [
    Preset::new(
        "soft-text",
        "Soft Text",
        EffectKind::TextShadow,
        "0 1px 2px rgba(0, 0, 0, 0.2)",
        "0 1px 2px rgba(0, 0, 0, 0.2)",
    ),
    Preset::new(
        "bold-text",
        "Bold Text",
        EffectKind::TextShadow,
        "0 2px 4px rgba(0, 0, 0, 0.3)",
        "0 2px 4px rgba(0, 0, 0, 0.3)",
    ),
    Preset::new(
        "glow",
        "Glow Effect",
        EffectKind::TextShadow,
        "0 0 8px rgba(0, 150, 255, 0.7)",
        "0 0 8px rgba(0, 150, 255, 0.7)",
    ),
    Preset::new(
        "outline",
        "Text Outline",
        EffectKind::TextShadow,
        "1px 1px 0 rgba(0, 0, 0, 0.8), -1px -1px 0 rgba(0, 0, 0, 0.8), 1px -1px 0 rgba(0, 0, 0, 0.8), -1px 1px 0 rgba(0, 0, 0, 0.8)",
        "1px 1px 0 rgba(0, 0, 0, 0.8)",
    ),
    Preset::new(
        "elegant-text",
        "Elegant Text",
        EffectKind::TextShadow,
        "2px 2px 4px rgba(0, 0, 0, 0.2)",
        "2px 2px 4px rgba(0, 0, 0, 0.2)",
    ),
    Preset::new(
        "neon-text",
        "Neon Text",
        EffectKind::TextShadow,
        "0 0 5px #fff, 0 0 10px #fff, 0 0 15px #ff00ff, 0 0 20px #ff00ff",
        "0 0 5px rgba(255, 255, 255, 0.8), 0 0 10px rgba(255, 0, 255, 0.5)",
    ),
];

const GRADIENT_PRESETS: [Preset; 6] = [
    Preset::new(
        "sunset",
        "Sunset",
        EffectKind::Gradient,
        "linear-gradient(90deg, #ff9a9e 0%, #fad0c4 99%, #fad0c4 100%)",
        "linear-gradient(90deg, #ff9a9e 0%, #fad0c4 100%)",
    ),
    Preset::new(
        "ocean",
        "Ocean",
        EffectKind::Gradient,
        "linear-gradient(90deg, #4facfe 0%, #00f2fe 100%)",
        "linear-gradient(90deg, #4facfe 0%, #00f2fe 100%)",
    ),
    Preset::new(
        "forest",
        "Forest",
        EffectKind::Gradient,
        "linear-gradient(90deg, #5ee7df 0%, #b490ca 100%)",
        "linear-gradient(90deg, #5ee7df 0%, #b490ca 100%)",
    ),
    Preset::new(
        "cotton-candy",
        "Cotton Candy",
        EffectKind::Gradient,
        "linear-gradient(90deg, #ff9a9e 0%, #fecfef 99%, #fecfef 100%)",
        "linear-gradient(90deg, #ff9a9e 0%, #fecfef 100%)",
    ),
    Preset::new(
        "radial-sun",
        "Radial Sun",
        EffectKind::Gradient,
        "radial-gradient(circle, #f6d365 0%, #fda085 100%)",
        "radial-gradient(circle, #f6d365 0%, #fda085 100%)",
    ),
    Preset::new(
        "radial-moon",
        "Radial Moon",
        EffectKind::Gradient,
        "radial-gradient(circle, #a1c4fd 0%, #c2e9fb 100%)",
        "radial-gradient(circle, #a1c4fd 0%, #c2e9fb 100%)",
    ),
];

/// Presets offered on a kind's tab, in display order.
pub fn presets(kind: EffectKind) -> &'static [Preset] {
    match kind {
        EffectKind::BoxShadow => &BOX_PRESETS,
        EffectKind::TextShadow => &TEXT_PRESETS,
        EffectKind::Gradient => &GRADIENT_PRESETS,
    }
}

/// Look up a preset by id within a kind.
pub fn find_preset(kind: EffectKind, id: &str) -> Option<&'static Preset> {
    presets(kind).iter().find(|preset| preset.id == id)
}

/// Every preset, box first, then text, then gradient.
pub fn all_presets() -> impl Iterator<Item = &'static Preset> {
    EffectKind::ALL.into_iter().flat_map(presets)
}
