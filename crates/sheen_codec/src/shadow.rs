//! Box-shadow and text-shadow values
//!
//! Serialization always produces the full positional form:
//!
//! - box: `[inset ]<x>px <y>px <blur>px <spread>px rgba(r, g, b, a)`
//! - text: `<x>px <y>px <blur>px rgba(r, g, b, a)`
//!
//! Parsing accepts whatever a preset or the host hands back. Multi-layer
//! values are split on top-level commas and only the first layer feeds the
//! controls; later layers are left to the caller to apply verbatim.

use nom::{
    bytes::complete::tag_no_case,
    combinator::{all_consuming, opt},
    number::complete::float,
    sequence::pair,
    IResult,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::color::{find_color, format_number, resolve_rgb, ColorForm, ColorMatch};

/// Color a shadow control starts with and falls back to.
pub const DEFAULT_SHADOW_COLOR: &str = "#000000";

const BOX_LENGTHS: usize = 4;
const TEXT_LENGTHS: usize = 3;

/// Text shadow controls
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShadowControls {
    /// Horizontal offset in px
    pub x: f32,
    /// Vertical offset in px
    pub y: f32,
    /// Blur radius in px
    pub blur: f32,
    /// Color token (hex, `rgb()`/`rgba()`, or `currentColor`)
    pub color: String,
    /// Alpha written into the serialized `rgba()`, 0-1
    pub opacity: f32,
}

impl Default for ShadowControls {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 2.0,
            blur: 4.0,
            color: DEFAULT_SHADOW_COLOR.to_string(),
            opacity: 0.25,
        }
    }
}

impl ShadowControls {
    /// Controls for an unparseable value: zero offsets, opaque black.
    pub fn zeroed() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            blur: 0.0,
            color: DEFAULT_SHADOW_COLOR.to_string(),
            opacity: 1.0,
        }
    }

    /// Serialize to a `text-shadow` value.
    pub fn to_css(&self) -> String {
        format!(
            "{}px {}px {}px {}",
            format_number(self.x),
            format_number(self.y),
            format_number(self.blur),
            resolve_rgb(&self.color).to_rgba_css(self.opacity)
        )
    }

    /// Parse a `text-shadow` value. Never fails.
    pub fn parse(value: &str) -> Self {
        parse_text_shadow(value)
    }
}

/// Box shadow controls
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoxShadowControls {
    pub x: f32,
    pub y: f32,
    pub blur: f32,
    /// Spread radius in px
    pub spread: f32,
    pub color: String,
    pub opacity: f32,
    /// Prefixes the value with `inset `
    pub inset: bool,
}

impl Default for BoxShadowControls {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 4.0,
            blur: 8.0,
            spread: 0.0,
            color: DEFAULT_SHADOW_COLOR.to_string(),
            opacity: 0.25,
            inset: false,
        }
    }
}

impl BoxShadowControls {
    /// Controls for an unparseable value: zero offsets, opaque black.
    pub fn zeroed() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            blur: 0.0,
            spread: 0.0,
            color: DEFAULT_SHADOW_COLOR.to_string(),
            opacity: 1.0,
            inset: false,
        }
    }

    /// Serialize to a `box-shadow` value.
    pub fn to_css(&self) -> String {
        format!(
            "{}{}px {}px {}px {}px {}",
            if self.inset { "inset " } else { "" },
            format_number(self.x),
            format_number(self.y),
            format_number(self.blur),
            format_number(self.spread),
            resolve_rgb(&self.color).to_rgba_css(self.opacity)
        )
    }

    /// Parse a `box-shadow` value. Never fails.
    pub fn parse(value: &str) -> Self {
        parse_box_shadow(value)
    }
}

// ============================================================================
// Layers
// ============================================================================

/// Split a value on commas that are not nested inside parentheses.
///
/// `0 0 5px #fff, 0 0 10px rgba(255, 0, 255, 0.5)` yields two layers.
pub fn split_layers(value: &str) -> Vec<&str> {
    let mut layers = Vec::new();
    let mut depth: i32 = 0;
    let mut start = 0;

    for (i, c) in value.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth = (depth - 1).max(0),
            ',' if depth == 0 => {
                let layer = value[start..i].trim();
                if !layer.is_empty() {
                    layers.push(layer);
                }
                start = i + 1;
            }
            _ => {}
        }
    }

    let layer = value[start..].trim();
    if !layer.is_empty() {
        layers.push(layer);
    }

    layers
}

/// The pieces of one shadow layer.
#[derive(Clone, Debug, PartialEq)]
pub struct ShadowLayer<'a> {
    /// `inset` keyword seen (box shadows only)
    pub inset: bool,
    /// Length tokens in order of appearance
    pub lengths: Vec<f32>,
    pub color: Option<ColorMatch<'a>>,
    /// Count of tokens that were neither a length, the color, nor `inset`
    pub unknown: usize,
}

impl ShadowLayer<'_> {
    /// Length at `index`, or 0 when the layer has fewer.
    pub fn length(&self, index: usize) -> f32 {
        self.lengths.get(index).copied().unwrap_or(0.0)
    }

    /// The color control value and opacity this layer implies.
    pub fn color_control(&self) -> (String, f32) {
        match &self.color {
            Some(found) => (found.color.control_value(found.text), found.color.opacity()),
            None => (DEFAULT_SHADOW_COLOR.to_string(), 1.0),
        }
    }

    /// Full positional form with `max_lengths` px lengths and an `rgba()`
    /// color, if every token of the layer was understood.
    pub fn expanded(&self, max_lengths: usize) -> Option<String> {
        let color = self.color.as_ref()?;
        if self.unknown > 0 || self.lengths.len() < 2 || self.lengths.len() > max_lengths {
            return None;
        }

        let mut parts: Vec<String> = Vec::with_capacity(max_lengths + 2);
        if self.inset {
            parts.push("inset".to_string());
        }
        for index in 0..max_lengths {
            parts.push(format!("{}px", format_number(self.length(index))));
        }
        parts.push(match color.color.form {
            ColorForm::CurrentColor => "currentColor".to_string(),
            _ => color.color.rgb.to_rgba_css(color.color.opacity()),
        });

        Some(parts.join(" "))
    }
}

fn parse_length(token: &str) -> Option<f32> {
    let parsed: IResult<&str, (f32, Option<&str>)> =
        all_consuming(pair(float, opt(tag_no_case("px"))))(token);
    parsed
        .ok()
        .map(|(_, (number, _))| number)
        .filter(|number| number.is_finite())
}

/// Break one layer into its color, lengths and `inset` flag.
pub fn scan_layer(layer: &str, allow_inset: bool) -> ShadowLayer<'_> {
    let color = find_color(layer);
    let remainder = match &color {
        Some(found) => format!("{} {}", &layer[..found.range.start], &layer[found.range.end..]),
        None => layer.to_string(),
    };

    let mut inset = false;
    let mut lengths = Vec::new();
    let mut unknown = 0;

    for token in remainder.split_whitespace() {
        if allow_inset && token.eq_ignore_ascii_case("inset") {
            inset = true;
        } else if let Some(length) = parse_length(token) {
            lengths.push(length);
        } else {
            unknown += 1;
        }
    }

    ShadowLayer {
        inset,
        lengths,
        color,
        unknown,
    }
}

/// Parse a `box-shadow` value into controls.
///
/// Lengths are assigned positionally to (x, y, blur, spread); missing ones
/// are 0. Malformed input yields zeroed controls.
pub fn parse_box_shadow(value: &str) -> BoxShadowControls {
    let layers = split_layers(value);
    let Some(first) = layers.first() else {
        debug!(value = value, "Empty box-shadow value");
        return BoxShadowControls::zeroed();
    };

    let layer = scan_layer(first, true);
    if layer.unknown > 0 {
        debug!(layer = *first, unknown = layer.unknown, "Ignoring unrecognized box-shadow tokens");
    }
    let (color, opacity) = layer.color_control();

    BoxShadowControls {
        x: layer.length(0),
        y: layer.length(1),
        blur: layer.length(2),
        spread: layer.length(3),
        color,
        opacity,
        inset: layer.inset,
    }
}

/// Parse a `text-shadow` value into controls.
///
/// Lengths are assigned positionally to (x, y, blur). `inset` is not part
/// of the text-shadow grammar and is ignored.
pub fn parse_text_shadow(value: &str) -> ShadowControls {
    let layers = split_layers(value);
    let Some(first) = layers.first() else {
        debug!(value = value, "Empty text-shadow value");
        return ShadowControls::zeroed();
    };

    let layer = scan_layer(first, false);
    if layer.unknown > 0 {
        debug!(layer = *first, unknown = layer.unknown, "Ignoring unrecognized text-shadow tokens");
    }
    let (color, opacity) = layer.color_control();

    ShadowControls {
        x: layer.length(0),
        y: layer.length(1),
        blur: layer.length(2),
        color,
        opacity,
    }
}

/// Expand each understood layer of a shadow value to its full form.
pub(crate) fn expand_layers(value: &str, box_shadow: bool) -> String {
    let max_lengths = if box_shadow { BOX_LENGTHS } else { TEXT_LENGTHS };
    split_layers(value)
        .into_iter()
        .map(|layer| {
            scan_layer(layer, box_shadow)
                .expanded(max_lengths)
                .unwrap_or_else(|| layer.to_string())
        })
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialize_box_shadow() {
        let controls = BoxShadowControls {
            x: 10.0,
            y: -2.0,
            blur: 6.0,
            spread: 1.0,
            color: "#ff0000".to_string(),
            opacity: 0.5,
            inset: true,
        };
        assert_eq!(controls.to_css(), "inset 10px -2px 6px 1px rgba(255, 0, 0, 0.5)");
    }

    #[test]
    fn test_serialize_defaults() {
        assert_eq!(
            BoxShadowControls::default().to_css(),
            "0px 4px 8px 0px rgba(0, 0, 0, 0.25)"
        );
        assert_eq!(ShadowControls::default().to_css(), "0px 2px 4px rgba(0, 0, 0, 0.25)");
    }

    #[test]
    fn test_serialize_reuses_rgb_components() {
        let controls = ShadowControls {
            color: "rgb(10, 20, 30)".to_string(),
            opacity: 0.8,
            ..ShadowControls::default()
        };
        assert_eq!(controls.to_css(), "0px 2px 4px rgba(10, 20, 30, 0.8)");
    }

    #[test]
    fn test_serialize_malformed_color_is_black() {
        let controls = ShadowControls {
            color: "#zzzzzz".to_string(),
            opacity: 1.0,
            ..ShadowControls::default()
        };
        assert!(controls.to_css().ends_with("rgba(0, 0, 0, 1)"));
    }

    #[test]
    fn test_split_layers_respects_parentheses() {
        let layers = split_layers("0 0 5px #fff, 0 0 10px rgba(255, 0, 255, 0.5)");
        assert_eq!(layers, vec!["0 0 5px #fff", "0 0 10px rgba(255, 0, 255, 0.5)"]);
        assert!(split_layers("  ").is_empty());
    }

    #[test]
    fn test_parse_box_preset_with_unitless_zero() {
        let controls = parse_box_shadow("0 4px 8px rgba(0, 0, 0, 0.25)");
        assert_eq!(controls.x, 0.0);
        assert_eq!(controls.y, 4.0);
        assert_eq!(controls.blur, 8.0);
        assert_eq!(controls.spread, 0.0);
        assert_eq!(controls.opacity, 0.25);
        assert_eq!(controls.color, "#000000");
        assert!(!controls.inset);
    }

    #[test]
    fn test_parse_inset_anywhere() {
        let controls = parse_box_shadow("0 2px 4px rgba(0, 0, 0, 0.1) inset");
        assert!(controls.inset);
        assert_eq!(controls.y, 2.0);
        let controls = parse_box_shadow("inset 0 2px 4px rgba(0, 0, 0, 0.1)");
        assert!(controls.inset);
    }

    #[test]
    fn test_parse_first_layer_only() {
        let controls = parse_text_shadow(
            "1px 1px 0 rgba(0, 0, 0, 0.8), -1px -1px 0 rgba(0, 0, 0, 0.8)",
        );
        assert_eq!(controls.x, 1.0);
        assert_eq!(controls.y, 1.0);
        assert_eq!(controls.blur, 0.0);
        assert_eq!(controls.opacity, 0.8);
    }

    #[test]
    fn test_parse_hex_and_current_color() {
        let controls = parse_text_shadow("0 0 5px #FFF");
        assert_eq!(controls.color, "#fff");
        assert_eq!(controls.opacity, 1.0);

        let controls = parse_text_shadow("2px 2px currentColor");
        assert_eq!(controls.color, "currentColor");
        assert_eq!(controls.blur, 0.0);
    }

    #[test]
    fn test_parse_eight_digit_hex_opacity() {
        let controls = parse_box_shadow("1px 2px 3px 4px #33669980");
        assert_eq!(controls.color, "#336699");
        assert!((controls.opacity - 128.0 / 255.0).abs() < 1e-6);
        assert_eq!(controls.spread, 4.0);
    }

    #[test]
    fn test_parse_garbage() {
        let controls = parse_box_shadow("garbage-not-css");
        assert_eq!(controls, BoxShadowControls::zeroed());
        let controls = parse_text_shadow("");
        assert_eq!(controls, ShadowControls::zeroed());
    }

    #[test]
    fn test_text_shadow_ignores_inset_keyword() {
        let layer = scan_layer("inset 1px 1px red", false);
        assert!(!layer.inset);
        assert_eq!(layer.unknown, 2);
    }

    #[test]
    fn test_expand_layers() {
        assert_eq!(
            expand_layers("0 4px 8px rgba(0,0,0,0.25)", true),
            "0px 4px 8px 0px rgba(0, 0, 0, 0.25)"
        );
        assert_eq!(
            expand_layers("0 0 5px #fff, 2px 2px currentColor", false),
            "0px 0px 5px rgba(255, 255, 255, 1), 2px 2px 0px currentColor"
        );
        // Unrecognized layers pass through
        assert_eq!(expand_layers("none", true), "none");
    }
}
