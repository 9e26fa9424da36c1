//! Color tokens inside shadow and gradient values
//!
//! Recognizes the color grammar the effect editor round-trips:
//!
//! - `rgba(r, g, b, a)` and `rgb(r, g, b)` with 0-255 channels
//! - hex: `#rgb`, `#rrggbb`, `#rrggbbaa`
//! - the keyword `currentColor`
//!
//! Anything else resolves to black. Nothing here returns an error to the
//! caller; a token either matches or it doesn't.

use std::fmt;
use std::ops::Range;

use nom::{
    branch::alt,
    bytes::complete::{tag_no_case, take_while1},
    character::complete::{char, multispace0},
    combinator::{all_consuming, value},
    error::{make_error, ErrorKind},
    number::complete::float,
    IResult,
};
use serde::{Deserialize, Serialize};

type ParseResult<'a, O> = IResult<&'a str, O>;

/// 8-bit RGB triple
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Lowercase `#rrggbb` form, the representation color pickers use.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// `rgba(r, g, b, a)` with the alpha clamped to 0-1.
    pub fn to_rgba_css(self, alpha: f32) -> String {
        format!(
            "rgba({}, {}, {}, {})",
            self.r,
            self.g,
            self.b,
            format_number(clamp_unit(alpha))
        )
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Which grammar a color token was written in
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ColorForm {
    Rgba,
    Rgb,
    Hex3,
    Hex6,
    Hex8,
    CurrentColor,
}

impl ColorForm {
    /// Whether the token carries its own alpha channel.
    pub fn has_alpha(self) -> bool {
        matches!(self, ColorForm::Rgba | ColorForm::Hex8)
    }
}

/// A decoded color token.
///
/// `currentColor` has no channels of its own; its `rgb` is black so that
/// serializing it always yields a well-formed `rgba()`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParsedColor {
    pub form: ColorForm,
    pub rgb: Rgb,
    /// Alpha in 0-1, present only for `rgba()` and 8-digit hex.
    pub alpha: Option<f32>,
}

impl ParsedColor {
    /// Alpha channel, defaulting to fully opaque.
    pub fn opacity(&self) -> f32 {
        self.alpha.unwrap_or(1.0)
    }

    /// The string a color control should hold for this token.
    ///
    /// Functional and 8-digit hex colors collapse to `#rrggbb` (their alpha
    /// belongs in the opacity control). Short and 6-digit hex keep the
    /// author's spelling, lowercased.
    pub fn control_value(&self, text: &str) -> String {
        match self.form {
            ColorForm::Rgba | ColorForm::Rgb | ColorForm::Hex8 => self.rgb.to_hex(),
            ColorForm::Hex3 | ColorForm::Hex6 => text.trim().to_ascii_lowercase(),
            ColorForm::CurrentColor => "currentColor".to_string(),
        }
    }
}

/// A color token located inside a larger value string
#[derive(Clone, Debug, PartialEq)]
pub struct ColorMatch<'a> {
    /// The token exactly as written
    pub text: &'a str,
    /// Byte range of the token within the scanned string
    pub range: Range<usize>,
    pub color: ParsedColor,
}

// ============================================================================
// Token parsers
// ============================================================================

fn channel(value: f32) -> u8 {
    if !value.is_finite() {
        return 0;
    }
    value.round().clamp(0.0, 255.0) as u8
}

pub(crate) fn clamp_unit(value: f32) -> f32 {
    if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        1.0
    }
}

/// Format a number the way CSS authors write it: no trailing `.0`, no `-0`.
pub(crate) fn format_number(value: f32) -> String {
    if !value.is_finite() || value == 0.0 {
        return "0".to_string();
    }
    format!("{value}")
}

fn component(input: &str) -> ParseResult<'_, f32> {
    let (input, _) = multispace0(input)?;
    let (input, number) = float(input)?;
    let (input, _) = multispace0(input)?;
    Ok((input, number))
}

fn separator(input: &str) -> ParseResult<'_, char> {
    char(',')(input)
}

/// Parse rgba(r, g, b, a)
fn rgba_function(input: &str) -> ParseResult<'_, ParsedColor> {
    let (input, _) = tag_no_case("rgba")(input)?;
    let (input, _) = multispace0(input)?;
    let (input, _) = char('(')(input)?;
    let (input, r) = component(input)?;
    let (input, _) = separator(input)?;
    let (input, g) = component(input)?;
    let (input, _) = separator(input)?;
    let (input, b) = component(input)?;
    let (input, _) = separator(input)?;
    let (input, a) = component(input)?;
    let (input, _) = char(')')(input)?;

    Ok((
        input,
        ParsedColor {
            form: ColorForm::Rgba,
            rgb: Rgb::new(channel(r), channel(g), channel(b)),
            alpha: Some(clamp_unit(a)),
        },
    ))
}

/// Parse rgb(r, g, b)
fn rgb_function(input: &str) -> ParseResult<'_, ParsedColor> {
    let (input, _) = tag_no_case("rgb")(input)?;
    let (input, _) = multispace0(input)?;
    let (input, _) = char('(')(input)?;
    let (input, r) = component(input)?;
    let (input, _) = separator(input)?;
    let (input, g) = component(input)?;
    let (input, _) = separator(input)?;
    let (input, b) = component(input)?;
    let (input, _) = char(')')(input)?;

    Ok((
        input,
        ParsedColor {
            form: ColorForm::Rgb,
            rgb: Rgb::new(channel(r), channel(g), channel(b)),
            alpha: None,
        },
    ))
}

fn hex_pair(digits: &str) -> u8 {
    u8::from_str_radix(digits, 16).unwrap_or(0)
}

/// Parse hex color: #RGB, #RRGGBB, or #RRGGBBAA
fn hex_color(input: &str) -> ParseResult<'_, ParsedColor> {
    let (rest, _) = char('#')(input)?;
    let (rest, hex) = take_while1(|c: char| c.is_ascii_hexdigit())(rest)?;

    let color = match hex.len() {
        3 => {
            let expand = |i: usize| hex_pair(&hex[i..i + 1].repeat(2));
            ParsedColor {
                form: ColorForm::Hex3,
                rgb: Rgb::new(expand(0), expand(1), expand(2)),
                alpha: None,
            }
        }
        6 => ParsedColor {
            form: ColorForm::Hex6,
            rgb: Rgb::new(hex_pair(&hex[0..2]), hex_pair(&hex[2..4]), hex_pair(&hex[4..6])),
            alpha: None,
        },
        8 => ParsedColor {
            form: ColorForm::Hex8,
            rgb: Rgb::new(hex_pair(&hex[0..2]), hex_pair(&hex[2..4]), hex_pair(&hex[4..6])),
            alpha: Some(f32::from(hex_pair(&hex[6..8])) / 255.0),
        },
        _ => return Err(nom::Err::Error(make_error(input, ErrorKind::LengthValue))),
    };

    Ok((rest, color))
}

fn current_color(input: &str) -> ParseResult<'_, ParsedColor> {
    value(
        ParsedColor {
            form: ColorForm::CurrentColor,
            rgb: Rgb::BLACK,
            alpha: None,
        },
        tag_no_case("currentcolor"),
    )(input)
}

/// Any supported color token, in priority order.
pub(crate) fn any_color(input: &str) -> ParseResult<'_, ParsedColor> {
    alt((rgba_function, rgb_function, hex_color, current_color))(input)
}

// ============================================================================
// Scanning
// ============================================================================

/// Find the first position in `input` where `parser` matches.
pub(crate) fn scan_with<'a, F>(input: &'a str, from: usize, mut parser: F) -> Option<ColorMatch<'a>>
where
    F: FnMut(&'a str) -> ParseResult<'a, ParsedColor>,
{
    let tail = input.get(from..)?;
    for (offset, _) in tail.char_indices() {
        let start = from + offset;
        if let Ok((rest, color)) = parser(&input[start..]) {
            let end = input.len() - rest.len();
            return Some(ColorMatch {
                text: &input[start..end],
                range: start..end,
                color,
            });
        }
    }
    None
}

/// Find the color of a shadow layer.
///
/// Grammars are tried in priority order over the whole input: any `rgba()`
/// wins over an earlier `rgb()`, which wins over hex, which wins over
/// `currentColor`.
pub fn find_color(input: &str) -> Option<ColorMatch<'_>> {
    scan_with(input, 0, rgba_function)
        .or_else(|| scan_with(input, 0, rgb_function))
        .or_else(|| scan_with(input, 0, hex_color))
        .or_else(|| scan_with(input, 0, current_color))
}

/// Parse a string that is exactly one color token (surrounding whitespace allowed).
pub fn parse_color(input: &str) -> Option<ParsedColor> {
    all_consuming(any_color)(input.trim())
        .ok()
        .map(|(_, color)| color)
}

/// Resolve a color control value to the RGB triple used in `rgba()` output.
///
/// Malformed input and `currentColor` resolve to black.
pub fn resolve_rgb(color: &str) -> Rgb {
    match parse_color(color) {
        Some(parsed) => parsed.rgb,
        None => {
            tracing::debug!(color = color, "Unresolvable color, using black");
            Rgb::BLACK
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_six_digit_hex() {
        assert_eq!(resolve_rgb("#ff9a9e"), Rgb::new(255, 154, 158));
        assert_eq!(resolve_rgb("#FFFFFF"), Rgb::WHITE);
    }

    #[test]
    fn test_resolve_three_digit_hex_expands_digits() {
        assert_eq!(resolve_rgb("#f0a"), Rgb::new(0xff, 0x00, 0xaa));
    }

    #[test]
    fn test_resolve_eight_digit_hex_ignores_alpha() {
        assert_eq!(resolve_rgb("#10203080"), Rgb::new(0x10, 0x20, 0x30));
    }

    #[test]
    fn test_resolve_functional_colors() {
        assert_eq!(resolve_rgb("rgb(1, 2, 3)"), Rgb::new(1, 2, 3));
        assert_eq!(resolve_rgb("rgba(0,255,255,0.7)"), Rgb::new(0, 255, 255));
        assert_eq!(resolve_rgb("RGBA( 10 , 20 , 30 , 1 )"), Rgb::new(10, 20, 30));
    }

    #[test]
    fn test_resolve_malformed_is_black() {
        assert_eq!(resolve_rgb("#12"), Rgb::BLACK);
        assert_eq!(resolve_rgb("#gggggg"), Rgb::BLACK);
        assert_eq!(resolve_rgb("tomato"), Rgb::BLACK);
        assert_eq!(resolve_rgb(""), Rgb::BLACK);
        assert_eq!(resolve_rgb("currentColor"), Rgb::BLACK);
    }

    #[test]
    fn test_channels_are_clamped() {
        assert_eq!(resolve_rgb("rgb(300, -5, 127.6)"), Rgb::new(255, 0, 128));
    }

    #[test]
    fn test_find_color_priority() {
        // rgba wins even when a hex token appears first
        let found = find_color("#fff 0 0 2px rgba(1, 2, 3, 0.5)").unwrap();
        assert_eq!(found.color.form, ColorForm::Rgba);
        assert_eq!(found.text, "rgba(1, 2, 3, 0.5)");
        assert_eq!(found.color.alpha, Some(0.5));

        let found = find_color("0 0 5px #fff").unwrap();
        assert_eq!(found.color.form, ColorForm::Hex3);
        assert_eq!(found.range, 8..12);

        let found = find_color("1px 1px currentColor").unwrap();
        assert_eq!(found.color.form, ColorForm::CurrentColor);
    }

    #[test]
    fn test_find_color_none() {
        assert!(find_color("0 4px 8px").is_none());
        assert!(find_color("#abcd 1px").is_none());
    }

    #[test]
    fn test_hex8_alpha() {
        let color = parse_color("#00000080").unwrap();
        assert_eq!(color.form, ColorForm::Hex8);
        assert!((color.opacity() - 128.0 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn test_control_value() {
        let color = parse_color("rgba(0, 150, 255, 0.7)").unwrap();
        assert_eq!(color.control_value("rgba(0, 150, 255, 0.7)"), "#0096ff");
        let color = parse_color("#FFF").unwrap();
        assert_eq!(color.control_value("#FFF"), "#fff");
    }

    #[test]
    fn test_rgba_css_formatting() {
        assert_eq!(Rgb::new(0, 0, 0).to_rgba_css(0.25), "rgba(0, 0, 0, 0.25)");
        assert_eq!(Rgb::new(1, 2, 3).to_rgba_css(1.0), "rgba(1, 2, 3, 1)");
        assert_eq!(Rgb::new(1, 2, 3).to_rgba_css(4.0), "rgba(1, 2, 3, 1)");
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(10.0), "10");
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(-1.5), "-1.5");
        assert_eq!(format_number(f32::NAN), "0");
    }
}
