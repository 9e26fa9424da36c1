//! Gradient `background-image` values
//!
//! Syntax produced:
//! - `linear-gradient(<angle>deg, <color> <pos>%, ...)`
//! - `radial-gradient(circle, <color> <pos>%, ...)`
//!
//! Syntax accepted is looser: the type is found by substring, the angle by
//! the first `<number>deg` token, and stops by scanning for color tokens
//! each optionally followed by a percentage.

use std::fmt::{Display, Formatter};

use nom::{
    bytes::complete::tag_no_case,
    character::complete::{char, multispace0},
    number::complete::float,
    IResult,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::color::{any_color, scan_with};

/// Angle used when a value names none.
pub const DEFAULT_ANGLE: u16 = 90;

/// Fewest stops a gradient may have.
pub const MIN_STOPS: usize = 2;

/// Gradient shape
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GradientType {
    #[default]
    Linear,
    Radial,
}

impl GradientType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::Radial => "radial",
        }
    }
}

impl Display for GradientType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One color stop
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorStop {
    /// Color token exactly as it should be written
    pub color: String,
    /// Position in percent, 0-100
    pub position: u8,
}

impl ColorStop {
    pub fn new(color: impl Into<String>, position: u8) -> Self {
        Self {
            color: color.into(),
            position: position.min(100),
        }
    }
}

/// Errors from editing the stop list
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GradientEditError {
    /// Removing would leave fewer than two stops
    #[error("a gradient needs at least {MIN_STOPS} color stops (has {len})")]
    MinimumStops { len: usize },

    /// No stop at that index
    #[error("no color stop at index {index} (gradient has {len})")]
    IndexOutOfRange { index: usize, len: usize },
}

/// Gradient controls
///
/// The stop list always holds at least [`MIN_STOPS`] entries; every way of
/// building or editing one preserves that.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "GradientRepr")]
pub struct GradientControls {
    #[serde(rename = "type")]
    pub kind: GradientType,
    /// Degrees, 0-360; only written for linear gradients
    angle: u16,
    colors: Vec<ColorStop>,
}

#[derive(Deserialize)]
struct GradientRepr {
    #[serde(rename = "type", default)]
    kind: GradientType,
    #[serde(default = "default_angle")]
    angle: u16,
    colors: Vec<ColorStop>,
}

fn default_angle() -> u16 {
    DEFAULT_ANGLE
}

impl TryFrom<GradientRepr> for GradientControls {
    type Error = GradientEditError;

    fn try_from(repr: GradientRepr) -> Result<Self, Self::Error> {
        GradientControls::new(repr.kind, repr.angle, repr.colors)
    }
}

impl Default for GradientControls {
    fn default() -> Self {
        Self {
            kind: GradientType::Linear,
            angle: DEFAULT_ANGLE,
            colors: vec![ColorStop::new("#6e8efb", 0), ColorStop::new("#a777e3", 100)],
        }
    }
}

impl GradientControls {
    /// Build controls from parts, rejecting stop lists shorter than two.
    pub fn new(
        kind: GradientType,
        angle: u16,
        colors: Vec<ColorStop>,
    ) -> Result<Self, GradientEditError> {
        if colors.len() < MIN_STOPS {
            return Err(GradientEditError::MinimumStops { len: colors.len() });
        }
        let colors = colors
            .into_iter()
            .map(|stop| ColorStop::new(stop.color, stop.position))
            .collect();
        Ok(Self {
            kind,
            angle: normalize_angle(f32::from(angle)),
            colors,
        })
    }

    /// Black to white, used whenever a value yields fewer than two stops.
    pub fn fallback_stops() -> Vec<ColorStop> {
        vec![ColorStop::new("#000000", 0), ColorStop::new("#ffffff", 100)]
    }

    pub fn angle(&self) -> u16 {
        self.angle
    }

    pub fn colors(&self) -> &[ColorStop] {
        &self.colors
    }

    /// Serialize to a `background-image` value.
    pub fn to_css(&self) -> String {
        let head = match self.kind {
            GradientType::Linear => format!("{}deg", self.angle),
            GradientType::Radial => "circle".to_string(),
        };
        let stops = self
            .colors
            .iter()
            .map(|stop| format!("{} {}%", stop.color, stop.position))
            .collect::<Vec<_>>()
            .join(", ");
        format!("{}-gradient({}, {})", self.kind, head, stops)
    }

    /// Parse a gradient value. Never fails.
    pub fn parse(value: &str) -> Self {
        parse_gradient(value)
    }

    pub fn set_type(&mut self, kind: GradientType) {
        self.kind = kind;
    }

    /// Set the angle, wrapping into 0-360.
    pub fn set_angle(&mut self, degrees: i32) {
        self.angle = normalize_angle(degrees as f32);
    }

    /// Append a black stop at 100%.
    pub fn add_color(&mut self) {
        self.colors.push(ColorStop::new("#000000", 100));
    }

    /// Remove the stop at `index`. Leaves the list untouched on error.
    pub fn remove_color(&mut self, index: usize) -> Result<ColorStop, GradientEditError> {
        let len = self.colors.len();
        if len <= MIN_STOPS {
            return Err(GradientEditError::MinimumStops { len });
        }
        if index >= len {
            return Err(GradientEditError::IndexOutOfRange { index, len });
        }
        Ok(self.colors.remove(index))
    }

    pub fn set_color(
        &mut self,
        index: usize,
        color: impl Into<String>,
    ) -> Result<(), GradientEditError> {
        let len = self.colors.len();
        let stop = self
            .colors
            .get_mut(index)
            .ok_or(GradientEditError::IndexOutOfRange { index, len })?;
        stop.color = color.into();
        Ok(())
    }

    /// Move a stop; positions clamp to 0-100.
    pub fn set_position(&mut self, index: usize, position: i32) -> Result<(), GradientEditError> {
        let len = self.colors.len();
        let stop = self
            .colors
            .get_mut(index)
            .ok_or(GradientEditError::IndexOutOfRange { index, len })?;
        stop.position = position.clamp(0, 100) as u8;
        Ok(())
    }
}

// ============================================================================
// Parsing
// ============================================================================

fn normalize_angle(degrees: f32) -> u16 {
    if !degrees.is_finite() {
        return DEFAULT_ANGLE;
    }
    let rounded = degrees.round() as i32;
    if (0..=360).contains(&rounded) {
        rounded as u16
    } else {
        rounded.rem_euclid(360) as u16
    }
}

fn angle_token(input: &str) -> IResult<&str, f32> {
    let (input, degrees) = float(input)?;
    let (input, _) = tag_no_case("deg")(input)?;
    Ok((input, degrees))
}

/// First `<number>deg` token in the value.
fn find_angle(value: &str) -> Option<f32> {
    value.char_indices().find_map(|(i, _)| {
        let boundary = value[..i]
            .chars()
            .next_back()
            .map_or(true, |c| !(c.is_ascii_alphanumeric() || c == '.' || c == '#'));
        if !boundary {
            return None;
        }
        angle_token(&value[i..]).ok().map(|(_, degrees)| degrees)
    })
}

fn stop_position(input: &str) -> IResult<&str, f32> {
    let (input, _) = multispace0(input)?;
    let (input, position) = float(input)?;
    let (input, _) = char('%')(input)?;
    Ok((input, position))
}

/// Scan color stops in order of appearance.
fn find_stops(value: &str) -> Vec<(String, Option<f32>)> {
    let mut stops = Vec::new();
    let mut cursor = 0;

    while let Some(found) = scan_with(value, cursor, any_color) {
        let mut end = found.range.end;
        let position = match stop_position(&value[end..]) {
            Ok((rest, position)) => {
                end = value.len() - rest.len();
                Some(position)
            }
            Err(_) => None,
        };
        stops.push((found.text.to_string(), position));
        cursor = end;
    }

    stops
}

/// Evenly spaced position for a stop with no explicit percentage.
fn interpolated_position(index: usize, total: usize) -> u8 {
    if total <= 1 {
        return 0;
    }
    ((index as f32 * 100.0) / (total - 1) as f32).round() as u8
}

fn clamp_position(position: f32) -> u8 {
    if position.is_finite() {
        position.round().clamp(0.0, 100.0) as u8
    } else {
        0
    }
}

/// Parse a gradient value into controls.
///
/// `radial-gradient` anywhere selects radial, anything else is linear. The
/// angle defaults to 90. Fewer than two recognizable stops are replaced by
/// a black-to-white pair.
pub fn parse_gradient(value: &str) -> GradientControls {
    let kind = if value.to_ascii_lowercase().contains("radial-gradient") {
        GradientType::Radial
    } else {
        GradientType::Linear
    };
    let angle = find_angle(value).map_or(DEFAULT_ANGLE, normalize_angle);

    let found = find_stops(value);
    let colors = if found.len() < MIN_STOPS {
        debug!(value = value, stops = found.len(), "Gradient has too few stops, using fallback");
        GradientControls::fallback_stops()
    } else {
        let total = found.len();
        found
            .into_iter()
            .enumerate()
            .map(|(index, (color, position))| {
                let position = position.map_or_else(
                    || interpolated_position(index, total),
                    clamp_position,
                );
                ColorStop { color, position }
            })
            .collect()
    };

    GradientControls {
        kind,
        angle,
        colors,
    }
}
