//! Controller, panel and selection-poll settings

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::target::TargetRulePolicy;

/// Top-level configuration (sheen.toml)
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct SheenConfig {
    #[serde(default)]
    pub controller: ControllerConfig,
    #[serde(default)]
    pub panel: PanelConfig,
    #[serde(default)]
    pub selection: SelectionConfig,
}

/// Style application settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ControllerConfig {
    /// Rule that receives the property when an element has several
    #[serde(default)]
    pub target_policy: TargetRulePolicy,
    /// Candidate names probed before falling back to a timestamp name
    #[serde(default = "default_name_probe_limit")]
    pub name_probe_limit: u32,
}

fn default_name_probe_limit() -> u32 {
    20
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            target_policy: TargetRulePolicy::default(),
            name_probe_limit: default_name_probe_limit(),
        }
    }
}

/// Panel session settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PanelConfig {
    /// Settle delay before a custom-control change is written
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

fn default_debounce_ms() -> u64 {
    400
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
        }
    }
}

impl PanelConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

/// Bounded poll for a selected element at panel mount
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SelectionConfig {
    #[serde(default = "default_attempts")]
    pub attempts: u32,
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,
}

fn default_attempts() -> u32 {
    10
}

fn default_delay_ms() -> u64 {
    300
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            attempts: default_attempts(),
            delay_ms: default_delay_ms(),
        }
    }
}

impl SelectionConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}
