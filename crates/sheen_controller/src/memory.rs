//! In-process host
//!
//! A [`HostDesignApi`] backed by plain maps. Used by the CLI's `simulate`
//! command and by tests; it also lets a test inject failures, latency and
//! the different shapes real hosts return.

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use indexmap::IndexMap;

use crate::error::HostError;
use crate::host::{HostDesignApi, HostResult, HostStyles, Notification, PropertyMap};

/// Element handle
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub u64);

/// Style rule handle
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StyleId(pub u64);

#[derive(Debug)]
struct MemoryStyle {
    name: String,
    properties: PropertyMap,
}

#[derive(Debug, Default)]
struct MemoryState {
    next_id: u64,
    styles: IndexMap<StyleId, MemoryStyle>,
    elements: IndexMap<ElementId, Vec<StyleId>>,
    selected: Option<ElementId>,
    notifications: Vec<Notification>,
    property_writes: usize,
    name_lookups: usize,
    fail_next: Option<HostError>,
    unavailable: bool,
    latency: Duration,
    styles_as_iter: bool,
    missing_style_404: bool,
}

impl MemoryState {
    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    fn style(&self, id: StyleId) -> HostResult<&MemoryStyle> {
        self.styles
            .get(&id)
            .ok_or_else(|| HostError::with_code(404, format!("Style {} not found", id.0)))
    }

    fn style_id(&self, name: &str) -> Option<StyleId> {
        self.styles
            .iter()
            .find(|(_, style)| style.name == name)
            .map(|(id, _)| *id)
    }
}

/// In-memory design document with one selection.
#[derive(Debug, Default)]
pub struct MemoryHost {
    state: Mutex<MemoryState>,
}

impl MemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Add a detached style rule.
    pub fn add_style(&self, name: &str, properties: &[(&str, &str)]) -> StyleId {
        let mut state = self.state();
        let id = StyleId(state.next_id());
        let properties = properties
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        state.styles.insert(
            id,
            MemoryStyle {
                name: name.to_string(),
                properties,
            },
        );
        id
    }

    /// Add an element carrying `styles` in order.
    pub fn add_element(&self, styles: &[StyleId]) -> ElementId {
        let mut state = self.state();
        let id = ElementId(state.next_id());
        state.elements.insert(id, styles.to_vec());
        id
    }

    /// Add an element with fresh, empty rules named `names`, and select it.
    pub fn add_selected_element(&self, names: &[&str]) -> ElementId {
        let styles: Vec<StyleId> = names.iter().map(|name| self.add_style(name, &[])).collect();
        let element = self.add_element(&styles);
        self.select(Some(element));
        element
    }

    pub fn select(&self, element: Option<ElementId>) {
        self.state().selected = element;
    }

    /// Properties of the rule called `name`.
    pub fn properties_of(&self, name: &str) -> Option<PropertyMap> {
        let state = self.state();
        let id = state.style_id(name)?;
        state.styles.get(&id).map(|style| style.properties.clone())
    }

    /// Names of the rules attached to `element`, in order.
    pub fn rule_names(&self, element: ElementId) -> Vec<String> {
        let state = self.state();
        state
            .elements
            .get(&element)
            .map(|styles| {
                styles
                    .iter()
                    .filter_map(|id| state.styles.get(id).map(|style| style.name.clone()))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.state().notifications.clone()
    }

    /// Number of `set_style_properties` calls that succeeded.
    pub fn property_writes(&self) -> usize {
        self.state().property_writes
    }

    /// Number of `style_by_name` calls, failed ones included.
    pub fn name_lookups(&self) -> usize {
        self.state().name_lookups
    }

    /// Make the next host call (other than `notify`) fail with `err`.
    pub fn fail_next(&self, err: HostError) {
        self.state().fail_next = Some(err);
    }

    /// Make every call fail as if the API object were missing.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.state().unavailable = unavailable;
    }

    /// Delay every call by `latency`.
    pub fn set_latency(&self, latency: Duration) {
        self.state().latency = latency;
    }

    /// Return element styles as an iterator with a hole in it.
    pub fn set_styles_as_iter(&self, enabled: bool) {
        self.state().styles_as_iter = enabled;
    }

    /// Report a missing rule from `style_by_name` as a 404 error.
    pub fn set_missing_style_404(&self, enabled: bool) {
        self.state().missing_style_404 = enabled;
    }

    /// Latency, availability and injected failure shared by every call.
    async fn enter(&self) -> HostResult<()> {
        let latency = self.state().latency;
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }

        let mut state = self.state();
        if state.unavailable {
            return Err(HostError::Unavailable("design API not loaded".to_string()));
        }
        match state.fail_next.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl HostDesignApi for MemoryHost {
    type Element = ElementId;
    type Style = StyleId;

    async fn selected_element(&self) -> HostResult<Option<ElementId>> {
        self.enter().await?;
        Ok(self.state().selected)
    }

    async fn element_styles(&self, element: &ElementId) -> HostResult<HostStyles<StyleId>> {
        self.enter().await?;
        let state = self.state();
        let Some(styles) = state.elements.get(element) else {
            return Ok(HostStyles::Missing);
        };
        if state.styles_as_iter {
            let mut slots: Vec<Option<StyleId>> = styles.iter().copied().map(Some).collect();
            slots.insert(0, None);
            Ok(HostStyles::Iter(Box::new(slots.into_iter())))
        } else {
            Ok(HostStyles::List(styles.clone()))
        }
    }

    async fn set_element_styles(&self, element: &ElementId, styles: Vec<StyleId>) -> HostResult<()> {
        self.enter().await?;
        let mut state = self.state();
        match state.elements.get_mut(element) {
            Some(attached) => {
                *attached = styles;
                Ok(())
            }
            None => Err(HostError::with_code(404, format!("Element {} not found", element.0))),
        }
    }

    async fn style_properties(&self, style: &StyleId) -> HostResult<PropertyMap> {
        self.enter().await?;
        let state = self.state();
        Ok(state.style(*style)?.properties.clone())
    }

    async fn set_style_properties(&self, style: &StyleId, properties: PropertyMap) -> HostResult<()> {
        self.enter().await?;
        let mut state = self.state();
        let target = state
            .styles
            .get_mut(style)
            .ok_or_else(|| HostError::with_code(404, format!("Style {} not found", style.0)))?;
        target.properties = properties;
        state.property_writes += 1;
        Ok(())
    }

    async fn style_name(&self, style: &StyleId) -> HostResult<String> {
        self.enter().await?;
        let state = self.state();
        Ok(state.style(*style)?.name.clone())
    }

    async fn create_style(&self, name: &str) -> HostResult<StyleId> {
        self.enter().await?;
        if self.state().style_id(name).is_some() {
            return Err(HostError::with_code(409, format!("Style {name} already exists")));
        }
        Ok(self.add_style(name, &[]))
    }

    async fn style_by_name(&self, name: &str) -> HostResult<Option<StyleId>> {
        self.state().name_lookups += 1;
        self.enter().await?;
        let state = self.state();
        match state.style_id(name) {
            Some(id) => Ok(Some(id)),
            None if state.missing_style_404 => {
                Err(HostError::with_code(404, format!("Style {name} not found")))
            }
            None => Ok(None),
        }
    }

    async fn notify(&self, notification: Notification) -> HostResult<()> {
        let mut state = self.state();
        if state.unavailable {
            return Err(HostError::Unavailable("design API not loaded".to_string()));
        }
        state.notifications.push(notification);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::normalize_styles;

    #[tokio::test]
    async fn test_styles_shapes() {
        let host = MemoryHost::new();
        let element = host.add_selected_element(&["base", "variant"]);

        let listed = normalize_styles(host.element_styles(&element).await.unwrap());
        host.set_styles_as_iter(true);
        let iterated = normalize_styles(host.element_styles(&element).await.unwrap());
        assert_eq!(listed, iterated);
        assert_eq!(listed.len(), 2);

        let missing = host.element_styles(&ElementId(999)).await.unwrap();
        assert!(normalize_styles(missing).is_empty());
    }

    #[tokio::test]
    async fn test_fail_next_is_consumed() {
        let host = MemoryHost::new();
        host.fail_next(HostError::call("boom"));
        assert!(host.selected_element().await.is_err());
        assert_eq!(host.selected_element().await, Ok(None));
    }

    #[tokio::test]
    async fn test_create_duplicate_style() {
        let host = MemoryHost::new();
        host.create_style("box-effect-1").await.unwrap();
        let err = host.create_style("box-effect-1").await.unwrap_err();
        assert!(matches!(err, HostError::Call { code: Some(409), .. }));
    }
}
