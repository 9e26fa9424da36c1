//! Sheen Style Application Controller
//!
//! Pushes effect values onto the element selected in a visual design tool.
//! The tool itself is reached only through [`HostDesignApi`], which the
//! embedder implements and hands in; [`MemoryHost`] is an in-process
//! implementation for tests and simulation.
//!
//! # Layers
//!
//! - [`StyleController`]: one property write at a time, choosing which of
//!   the element's style rules receives it and skipping values that are
//!   already applied
//! - [`EffectPanel`]: a panel session with per-kind controls, debounced
//!   live applies and the mount-time selection poll
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use sheen_codec::EffectKind;
//! use sheen_controller::{ApplyOutcome, ControllerConfig, MemoryHost, StyleController};
//!
//! # tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap().block_on(async {
//! let host = Arc::new(MemoryHost::new());
//! host.add_selected_element(&["base", "variant"]);
//!
//! let controller = StyleController::new(Arc::clone(&host), ControllerConfig::default());
//! let outcome = controller
//!     .apply(EffectKind::BoxShadow, "0px 4px 8px 0px rgba(0, 0, 0, 0.25)")
//!     .await
//!     .unwrap();
//!
//! assert_eq!(outcome, ApplyOutcome::Applied { rule: "variant".into(), created: false });
//! # });
//! ```

pub mod applied;
pub mod clipboard;
pub mod config;
pub mod controller;
pub mod debounce;
pub mod error;
pub mod host;
pub mod memory;
pub mod panel;
pub mod selection;
pub mod target;

pub use applied::AppliedStyleState;
pub use clipboard::{Clipboard, ClipboardError, FallbackClipboard, MemoryClipboard};
pub use config::{ControllerConfig, PanelConfig, SelectionConfig, SheenConfig};
pub use controller::{ApplyOutcome, StyleController, RESET_VALUE};
pub use debounce::Debouncer;
pub use error::{ControllerError, HostError, Result};
pub use host::{
    normalize_styles, HostDesignApi, HostResult, HostStyles, Notification, NotificationKind,
    PropertyMap,
};
pub use memory::{ElementId, MemoryHost, StyleId};
pub use panel::{EffectPanel, PanelView};
pub use selection::{wait_for_selection, SelectionState};
pub use target::{fallback_rule_name, rule_name_candidate, select_target, TargetRulePolicy};
