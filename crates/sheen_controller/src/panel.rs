//! Effect panel session
//!
//! Holds everything one open panel owns: the active tab and sub-view, the
//! control state of all three kinds, a debouncer per kind for live applies,
//! and the mount-time selection poll. Dropping the panel tears it down; no
//! timer fires afterwards.

use std::sync::Arc;

use sheen_codec::{
    css_declaration, BoxShadowControls, EffectControls, EffectKind, GradientControls,
    ShadowControls,
};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::clipboard::{Clipboard, ClipboardError};
use crate::config::{PanelConfig, SelectionConfig, SheenConfig};
use crate::controller::{ApplyOutcome, StyleController};
use crate::debounce::Debouncer;
use crate::error::{ControllerError, Result};
use crate::host::{HostDesignApi, Notification};
use crate::selection::{wait_for_selection, SelectionState};

/// Sub-view of a tab
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum PanelView {
    #[default]
    Presets,
    /// Sliders and pickers; edits are applied live after a settle delay
    Custom,
}

pub struct EffectPanel<H: HostDesignApi + 'static> {
    controller: Arc<StyleController<H>>,
    config: PanelConfig,
    selection_config: SelectionConfig,
    tab: EffectKind,
    view: PanelView,
    box_shadow: BoxShadowControls,
    text_shadow: ShadowControls,
    gradient: GradientControls,
    debouncers: [Debouncer; 3],
    selection: Arc<watch::Sender<SelectionState<H::Element>>>,
    selection_task: Option<JoinHandle<()>>,
}

impl<H: HostDesignApi + 'static> EffectPanel<H> {
    /// A panel with default controls on the box-shadow tab.
    pub fn new(host: Arc<H>, config: SheenConfig) -> Self {
        let SheenConfig {
            controller,
            panel,
            selection,
        } = config;
        Self::with_controller(Arc::new(StyleController::new(host, controller)), panel, selection)
    }

    pub fn with_controller(
        controller: Arc<StyleController<H>>,
        config: PanelConfig,
        selection_config: SelectionConfig,
    ) -> Self {
        let (selection, _) = watch::channel(SelectionState::Pending);
        Self {
            controller,
            config,
            selection_config,
            tab: EffectKind::BoxShadow,
            view: PanelView::Presets,
            box_shadow: BoxShadowControls::default(),
            text_shadow: ShadowControls::default(),
            gradient: GradientControls::default(),
            debouncers: Default::default(),
            selection: Arc::new(selection),
            selection_task: None,
        }
    }

    pub fn controller(&self) -> &Arc<StyleController<H>> {
        &self.controller
    }

    pub fn tab(&self) -> EffectKind {
        self.tab
    }

    pub fn view(&self) -> PanelView {
        self.view
    }

    pub fn box_shadow(&self) -> &BoxShadowControls {
        &self.box_shadow
    }

    pub fn text_shadow(&self) -> &ShadowControls {
        &self.text_shadow
    }

    pub fn gradient(&self) -> &GradientControls {
        &self.gradient
    }

    /// Current controls of `kind`.
    pub fn controls(&self, kind: EffectKind) -> EffectControls {
        match kind {
            EffectKind::BoxShadow => self.box_shadow.clone().into(),
            EffectKind::TextShadow => self.text_shadow.clone().into(),
            EffectKind::Gradient => self.gradient.clone().into(),
        }
    }

    /// Replace a kind's controls without scheduling a live apply.
    pub fn set_controls(&mut self, controls: EffectControls) {
        match controls {
            EffectControls::BoxShadow(controls) => self.box_shadow = controls,
            EffectControls::TextShadow(controls) => self.text_shadow = controls,
            EffectControls::Gradient(controls) => self.gradient = controls,
        }
    }

    // ========================================================================
    // Selection
    // ========================================================================

    /// Start (or restart) polling the host for a selected element.
    pub fn start_selection_poll(&mut self) {
        if let Some(task) = self.selection_task.take() {
            task.abort();
        }
        self.selection.send_replace(SelectionState::Pending);

        let host = Arc::clone(self.controller.host());
        let selection = Arc::clone(&self.selection);
        let config = self.selection_config.clone();
        self.selection_task = Some(tokio::spawn(async move {
            let state = match wait_for_selection(host.as_ref(), &config).await {
                Some(element) => SelectionState::Selected(element),
                None => SelectionState::Empty,
            };
            selection.send_replace(state);
        }));
    }

    pub fn selection(&self) -> SelectionState<H::Element> {
        self.selection.borrow().clone()
    }

    /// Watch the selection poll's result.
    pub fn subscribe_selection(&self) -> watch::Receiver<SelectionState<H::Element>> {
        self.selection.subscribe()
    }

    // ========================================================================
    // Tabs and controls
    // ========================================================================

    /// Switch tabs. Forgets every last-applied value, so the next apply on
    /// any tab writes again.
    pub fn select_tab(&mut self, kind: EffectKind) {
        if self.tab != kind {
            self.tab = kind;
            self.controller.clear_all_applied();
            debug!(tab = kind.tab_id(), "Switched tab");
        }
    }

    pub fn set_view(&mut self, view: PanelView) {
        self.view = view;
    }

    pub fn edit_box<R>(&mut self, edit: impl FnOnce(&mut BoxShadowControls) -> R) -> R {
        let result = edit(&mut self.box_shadow);
        self.schedule_live_apply(EffectKind::BoxShadow);
        result
    }

    pub fn edit_text<R>(&mut self, edit: impl FnOnce(&mut ShadowControls) -> R) -> R {
        let result = edit(&mut self.text_shadow);
        self.schedule_live_apply(EffectKind::TextShadow);
        result
    }

    /// Edit the gradient, e.g. `panel.edit_gradient(|g| g.remove_color(1))`.
    pub fn edit_gradient<R>(&mut self, edit: impl FnOnce(&mut GradientControls) -> R) -> R {
        let result = edit(&mut self.gradient);
        self.schedule_live_apply(EffectKind::Gradient);
        result
    }

    /// Whether a live apply for `kind` is waiting out its delay.
    pub fn is_live_apply_pending(&self, kind: EffectKind) -> bool {
        self.debouncers[kind.index()].is_pending()
    }

    fn schedule_live_apply(&mut self, kind: EffectKind) {
        if self.view != PanelView::Custom {
            return;
        }

        let value = self.preview(kind);
        let debouncer = &mut self.debouncers[kind.index()];
        if !self.controller.would_change(kind, &value) {
            debouncer.cancel();
            return;
        }

        let controller = Arc::clone(&self.controller);
        debouncer.schedule(self.config.debounce(), move || async move {
            match controller.apply(kind, &value).await {
                Ok(outcome) => debug!(property = kind.property(), ?outcome, "Live apply finished"),
                Err(err) => debug!(property = kind.property(), error = %err, "Live apply failed"),
            }
        });
    }

    // ========================================================================
    // Output
    // ========================================================================

    /// CSS value for `kind`'s current controls.
    pub fn preview(&self, kind: EffectKind) -> String {
        match kind {
            EffectKind::BoxShadow => self.box_shadow.to_css(),
            EffectKind::TextShadow => self.text_shadow.to_css(),
            EffectKind::Gradient => self.gradient.to_css(),
        }
    }

    /// `{property}: {value};` for `kind`'s current controls.
    pub fn css_code(&self, kind: EffectKind) -> String {
        css_declaration(kind, &self.preview(kind))
    }

    /// Whether Apply on the active tab would do anything.
    pub fn is_apply_enabled(&self) -> bool {
        !self.controller.is_applying()
            && self.controller.would_change(self.tab, &self.preview(self.tab))
    }

    /// Copy the active tab's CSS declaration and toast the result.
    pub async fn copy_css_code<C: Clipboard>(
        &self,
        clipboard: &C,
    ) -> std::result::Result<String, ClipboardError> {
        let code = self.css_code(self.tab);
        match clipboard.write_text(&code) {
            Ok(()) => {
                self.controller
                    .notify(Notification::success("CSS copied to clipboard"))
                    .await;
                Ok(code)
            }
            Err(err) => {
                self.controller
                    .notify(Notification::error(format!("Failed to copy CSS: {err}")))
                    .await;
                Err(err)
            }
        }
    }

    // ========================================================================
    // Apply
    // ========================================================================

    /// Load a preset into its kind's controls and apply the preset value.
    pub async fn apply_preset(&mut self, kind: EffectKind, id: &str) -> Result<ApplyOutcome> {
        let preset = sheen_presets::find_preset(kind, id).ok_or_else(|| {
            ControllerError::UnknownPreset {
                kind,
                id: id.to_string(),
            }
        })?;

        self.debouncers[kind.index()].cancel();
        self.set_controls(preset.controls());
        self.controller.apply(kind, preset.value).await
    }

    /// Apply the active tab's current controls now.
    pub async fn apply_custom(&mut self) -> Result<ApplyOutcome> {
        let kind = self.tab;
        self.debouncers[kind.index()].cancel();
        let value = self.preview(kind);
        self.controller.apply(kind, &value).await
    }

    /// Restore the active tab's defaults and write `none`.
    pub async fn reset(&mut self) -> Result<ApplyOutcome> {
        let kind = self.tab;
        self.debouncers[kind.index()].cancel();
        self.set_controls(EffectControls::defaults(kind));
        self.controller.reset(kind).await
    }

    /// Stop the selection poll and every pending live apply.
    pub fn teardown(&mut self) {
        if let Some(task) = self.selection_task.take() {
            task.abort();
        }
        for debouncer in &mut self.debouncers {
            debouncer.cancel();
        }
    }
}

impl<H: HostDesignApi + 'static> Drop for EffectPanel<H> {
    fn drop(&mut self) {
        self.teardown();
    }
}
