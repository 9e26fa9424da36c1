//! Sheen Style Value Codec
//!
//! Bidirectional mapping between editor control state and the CSS values
//! the effect panel writes:
//!
//! - **`box-shadow`**: [`BoxShadowControls`]
//! - **`text-shadow`**: [`ShadowControls`]
//! - **`background-image`** (gradient form): [`GradientControls`]
//!
//! Serialization is exact; parsing is forgiving. No function here returns
//! an error for malformed CSS: a value that cannot be understood yields
//! zero offsets, black, or a black-to-white gradient, so whatever the host
//! or a preset hands back can always populate the controls.
//!
//! # Example
//!
//! ```rust
//! use sheen_codec::{canonical_for, BoxShadowControls, EffectKind};
//!
//! let controls = BoxShadowControls::parse("0 4px 8px rgba(0, 0, 0, 0.25)");
//! assert_eq!((controls.x, controls.y, controls.blur), (0.0, 4.0, 8.0));
//! assert_eq!(controls.opacity, 0.25);
//!
//! let css = controls.to_css();
//! assert_eq!(css, "0px 4px 8px 0px rgba(0, 0, 0, 0.25)");
//! assert_eq!(
//!     canonical_for(EffectKind::BoxShadow, &css),
//!     canonical_for(EffectKind::BoxShadow, "0 4px 8px rgba(0, 0, 0, 0.25)"),
//! );
//! ```

pub mod canonical;
pub mod color;
pub mod controls;
pub mod gradient;
pub mod kind;
pub mod shadow;

pub use canonical::{canonical_for, canonicalize};
pub use color::{find_color, parse_color, resolve_rgb, ColorForm, ColorMatch, ParsedColor, Rgb};
pub use controls::{css_declaration, EffectControls};
pub use gradient::{
    parse_gradient, ColorStop, GradientControls, GradientEditError, GradientType, DEFAULT_ANGLE,
    MIN_STOPS,
};
pub use kind::{EffectKind, UnknownEffectKind};
pub use shadow::{
    parse_box_shadow, parse_text_shadow, scan_layer, split_layers, BoxShadowControls,
    ShadowControls, ShadowLayer, DEFAULT_SHADOW_COLOR,
};
