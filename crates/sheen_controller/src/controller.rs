//! Style application controller
//!
//! Writes one CSS property onto the selected element:
//!
//! 1. read the element's rules (creating a uniquely named one if it has none)
//! 2. strip the property from every rule that defines it
//! 3. pick the target rule per [`TargetRulePolicy`](crate::TargetRulePolicy)
//! 4. merge-write the property into the target
//! 5. record the canonical value so an identical request becomes a no-op
//!
//! Host calls are awaited one after another; later steps read state the
//! earlier ones wrote.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{SystemTime, UNIX_EPOCH};

use sheen_codec::EffectKind;
use tracing::{debug, info, warn};

use crate::applied::AppliedStyleState;
use crate::config::ControllerConfig;
use crate::error::{ControllerError, Result};
use crate::host::{normalize_styles, HostDesignApi, Notification};
use crate::target::{fallback_rule_name, rule_name_candidate, select_target};

/// Value written by a reset.
pub const RESET_VALUE: &str = "none";

/// What an apply did
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// The property was written to `rule`; `created` when the rule was
    /// synthesized for this apply
    Applied { rule: String, created: bool },
    /// The value matched the last applied one; nothing was written
    Unchanged,
}

/// Clears the applying flag however the apply ends.
struct ApplyingGuard<'a>(&'a AtomicBool);

impl Drop for ApplyingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Applies effect values through a host.
pub struct StyleController<H: HostDesignApi> {
    host: Arc<H>,
    config: ControllerConfig,
    applied: Mutex<AppliedStyleState>,
    /// Names of rules this controller has written to or created
    seen_rules: Mutex<Vec<String>>,
    applying: AtomicBool,
}

impl<H: HostDesignApi> StyleController<H> {
    pub fn new(host: Arc<H>, config: ControllerConfig) -> Self {
        Self {
            host,
            config,
            applied: Mutex::new(AppliedStyleState::new()),
            seen_rules: Mutex::new(Vec::new()),
            applying: AtomicBool::new(false),
        }
    }

    pub fn host(&self) -> &Arc<H> {
        &self.host
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// Whether an apply or reset is in flight.
    pub fn is_applying(&self) -> bool {
        self.applying.load(Ordering::SeqCst)
    }

    /// Canonical value last written for `kind`.
    pub fn last_applied(&self, kind: EffectKind) -> Option<String> {
        self.applied().get(kind).map(str::to_string)
    }

    /// Whether applying `value` would write anything.
    pub fn would_change(&self, kind: EffectKind, value: &str) -> bool {
        !self.applied().matches(kind, value)
    }

    pub fn clear_applied(&self, kind: EffectKind) {
        self.applied().clear(kind);
    }

    pub fn clear_all_applied(&self) {
        self.applied().clear_all();
    }

    /// Write `value` as `kind`'s property on the selected element.
    ///
    /// Failures are reported to the user through the host before being
    /// returned, except 404s from the host, which are expected and only
    /// logged.
    pub async fn apply(&self, kind: EffectKind, value: &str) -> Result<ApplyOutcome> {
        if !self.would_change(kind, value) {
            debug!(property = kind.property(), "Value already applied, skipping");
            self.notify(Notification::info(format!(
                "{} is already applied",
                kind.display_name()
            )))
            .await;
            return Ok(ApplyOutcome::Unchanged);
        }

        let _guard = self.begin()?;
        match self.write_property(kind, value).await {
            Ok((rule, created)) => {
                self.applied().record(kind, value);
                info!(property = kind.property(), rule = %rule, created, "Applied effect");
                self.notify(Notification::success(format!("{} applied", kind.display_name())))
                    .await;
                Ok(ApplyOutcome::Applied { rule, created })
            }
            Err(err) => {
                self.report(&err).await;
                Err(err)
            }
        }
    }

    /// Write `none` for `kind`'s property and forget its last applied value.
    pub async fn reset(&self, kind: EffectKind) -> Result<ApplyOutcome> {
        let _guard = self.begin()?;
        match self.write_property(kind, RESET_VALUE).await {
            Ok((rule, created)) => {
                self.applied().clear(kind);
                info!(property = kind.property(), rule = %rule, "Reset effect");
                self.notify(Notification::success(format!("{} reset", kind.display_name())))
                    .await;
                Ok(ApplyOutcome::Applied { rule, created })
            }
            Err(err) => {
                self.report(&err).await;
                Err(err)
            }
        }
    }

    /// Show a toast. Failures to notify are logged and dropped.
    pub async fn notify(&self, notification: Notification) {
        if let Err(err) = self.host.notify(notification).await {
            warn!(error = %err, "Failed to show notification");
        }
    }

    fn applied(&self) -> MutexGuard<'_, AppliedStyleState> {
        self.applied.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn begin(&self) -> Result<ApplyingGuard<'_>> {
        if self
            .applying
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            debug!("Apply already in progress");
            return Err(ControllerError::Busy);
        }
        Ok(ApplyingGuard(&self.applying))
    }

    async fn report(&self, err: &ControllerError) {
        if err.is_reportable() {
            warn!(error = %err, "Apply failed");
            self.notify(Notification::error(err.to_string())).await;
        } else {
            debug!(error = %err, "Apply failed quietly");
        }
    }

    async fn write_property(&self, kind: EffectKind, value: &str) -> Result<(String, bool)> {
        let property = kind.property();
        let element = self
            .host
            .selected_element()
            .await?
            .ok_or(ControllerError::NoSelection)?;

        let mut styles = normalize_styles(self.host.element_styles(&element).await?);
        let mut created = false;

        if styles.is_empty() {
            let seen = self.seen_rules().clone();
            let name = self.unique_rule_name(kind, &seen).await;
            let style = self.host.create_style(&name).await?;
            self.host
                .set_element_styles(&element, vec![style.clone()])
                .await?;
            info!(rule = %name, "Created style rule for element");
            styles.push(style);
            created = true;
        }

        for style in &styles {
            let mut properties = self.host.style_properties(style).await?;
            if properties.shift_remove(property).is_some() {
                self.host.set_style_properties(style, properties).await?;
                debug!(property, "Stripped property from rule");
            }
        }

        let index = select_target(&styles, self.config.target_policy)
            .ok_or(ControllerError::NoTargetRule { property })?;
        let target = &styles[index];

        let mut properties = self.host.style_properties(target).await?;
        properties.insert(property.to_string(), value.to_string());
        self.host.set_style_properties(target, properties).await?;

        let rule = self.host.style_name(target).await?;
        self.remember_rule(&rule);
        Ok((rule, created))
    }

    fn seen_rules(&self) -> MutexGuard<'_, Vec<String>> {
        self.seen_rules.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn remember_rule(&self, name: &str) {
        let mut seen = self.seen_rules();
        if !seen.iter().any(|rule| rule == name) {
            seen.push(name.to_string());
        }
    }

    /// Lowest free `{prefix}-effect-{n}`, probing the host for each
    /// candidate not already in `seen`.
    async fn unique_rule_name(&self, kind: EffectKind, seen: &[String]) -> String {
        for n in 1..=self.config.name_probe_limit {
            let candidate = rule_name_candidate(kind, n);
            if seen.contains(&candidate) {
                continue;
            }
            match self.host.style_by_name(&candidate).await {
                Ok(None) => return candidate,
                Ok(Some(_)) => {}
                Err(err) if err.is_not_found() => return candidate,
                Err(err) => {
                    debug!(candidate = %candidate, error = %err, "Rule name probe failed");
                    break;
                }
            }
        }

        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_millis())
            .unwrap_or_default();
        let name = fallback_rule_name(kind, millis);
        debug!(rule = %name, "Using timestamp rule name");
        name
    }
}
