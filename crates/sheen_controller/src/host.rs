//! Host design API boundary
//!
//! The editor that embeds the panel owns elements, style rules and toasts.
//! [`HostDesignApi`] is the capability the controller is handed; nothing in
//! this crate reaches for a global.

use async_trait::async_trait;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::HostError;

/// A style rule's properties in the order the host reports them.
pub type PropertyMap = IndexMap<String, String>;

/// Result of a host call
pub type HostResult<T> = std::result::Result<T, HostError>;

/// Toast severity
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Info,
    Error,
}

/// A toast shown by the host.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub message: String,
}

impl Notification {
    pub fn new(kind: NotificationKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(NotificationKind::Success, message)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(NotificationKind::Info, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NotificationKind::Error, message)
    }
}

/// An element's style list as the host hands it over.
///
/// Hosts disagree on the shape: some return an array, some an iterator that
/// may yield empty slots, some nothing at all.
pub enum HostStyles<S> {
    List(Vec<S>),
    Iter(Box<dyn Iterator<Item = Option<S>> + Send>),
    Missing,
}

impl<S> From<Vec<S>> for HostStyles<S> {
    fn from(styles: Vec<S>) -> Self {
        Self::List(styles)
    }
}

/// Flatten whatever the host returned into an ordered list of rules.
pub fn normalize_styles<S>(styles: HostStyles<S>) -> Vec<S> {
    match styles {
        HostStyles::List(styles) => styles,
        HostStyles::Iter(iter) => iter.flatten().collect(),
        HostStyles::Missing => Vec::new(),
    }
}

/// Operations the controller needs from the design tool.
///
/// Handles are opaque to the controller and only ever passed back to the
/// host. Implementations must be shareable across tasks: debounced applies
/// and the selection poll run on spawned tokio tasks.
#[async_trait]
pub trait HostDesignApi: Send + Sync {
    /// Handle to a design element
    type Element: Clone + Send + Sync + 'static;
    /// Handle to a style rule
    type Style: Clone + Send + Sync + 'static;

    /// The element currently selected in the designer.
    async fn selected_element(&self) -> HostResult<Option<Self::Element>>;

    /// Style rules attached to an element, base rule first.
    async fn element_styles(&self, element: &Self::Element) -> HostResult<HostStyles<Self::Style>>;

    /// Replace the element's attached rules.
    async fn set_element_styles(
        &self,
        element: &Self::Element,
        styles: Vec<Self::Style>,
    ) -> HostResult<()>;

    async fn style_properties(&self, style: &Self::Style) -> HostResult<PropertyMap>;

    /// Replace a rule's whole property map.
    async fn set_style_properties(
        &self,
        style: &Self::Style,
        properties: PropertyMap,
    ) -> HostResult<()>;

    async fn style_name(&self, style: &Self::Style) -> HostResult<String>;

    /// Create a new, unattached style rule.
    async fn create_style(&self, name: &str) -> HostResult<Self::Style>;

    /// Look a rule up by name. Absence is `Ok(None)` or a 404 error,
    /// depending on the host.
    async fn style_by_name(&self, name: &str) -> HostResult<Option<Self::Style>>;

    /// Show a toast.
    async fn notify(&self, notification: Notification) -> HostResult<()>;
}
