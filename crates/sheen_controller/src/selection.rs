//! Waiting for the designer to have a selected element

use tracing::{debug, warn};

use crate::config::SelectionConfig;
use crate::error::HostError;
use crate::host::HostDesignApi;

/// Outcome of the mount-time selection poll
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum SelectionState<E> {
    /// Still polling
    #[default]
    Pending,
    Selected(E),
    /// Gave up: nothing selected or the host never became ready
    Empty,
}

impl<E> SelectionState<E> {
    pub fn element(&self) -> Option<&E> {
        match self {
            Self::Selected(element) => Some(element),
            _ => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }
}

/// Poll for a selected element, at most `config.attempts` times.
///
/// An unavailable host and an empty selection are retried after
/// `config.delay()`. Any other host error ends the poll.
pub async fn wait_for_selection<H>(host: &H, config: &SelectionConfig) -> Option<H::Element>
where
    H: HostDesignApi + ?Sized,
{
    for attempt in 1..=config.attempts {
        match host.selected_element().await {
            Ok(Some(element)) => {
                debug!(attempt, "Element selected");
                return Some(element);
            }
            Ok(None) => debug!(attempt, "No element selected yet"),
            Err(HostError::Unavailable(reason)) => {
                debug!(attempt, reason = %reason, "Design API not ready")
            }
            Err(err) => {
                warn!(attempt, error = %err, "Selection poll failed");
                return None;
            }
        }

        if attempt < config.attempts {
            tokio::time::sleep(config.delay()).await;
        }
    }

    debug!(attempts = config.attempts, "Selection poll exhausted");
    None
}
