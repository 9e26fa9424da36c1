//! Copying CSS to the clipboard

use std::sync::{Mutex, PoisonError};

use thiserror::Error;
use tracing::debug;

/// Clipboard errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClipboardError {
    /// No clipboard API in this context
    #[error("Clipboard not available: {0}")]
    Unavailable(String),

    /// The write was refused or failed
    #[error("Clipboard write failed: {0}")]
    Write(String),
}

/// Something text can be copied to.
pub trait Clipboard {
    fn write_text(&self, text: &str) -> Result<(), ClipboardError>;
}

impl<C: Clipboard + ?Sized> Clipboard for &C {
    fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        (**self).write_text(text)
    }
}

/// Tries `primary`, then `fallback` if it fails.
///
/// Mirrors the secure-context clipboard API with a manual-selection copy
/// behind it.
#[derive(Debug, Clone)]
pub struct FallbackClipboard<P, F> {
    primary: P,
    fallback: F,
}

impl<P: Clipboard, F: Clipboard> FallbackClipboard<P, F> {
    pub fn new(primary: P, fallback: F) -> Self {
        Self { primary, fallback }
    }
}

impl<P: Clipboard, F: Clipboard> Clipboard for FallbackClipboard<P, F> {
    fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        match self.primary.write_text(text) {
            Ok(()) => Ok(()),
            Err(err) => {
                debug!(error = %err, "Primary clipboard failed, using fallback");
                self.fallback.write_text(text)
            }
        }
    }
}

/// Clipboard held in memory.
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    contents: Mutex<Option<String>>,
    failure: Option<ClipboardError>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// A clipboard whose every write fails with `err`.
    pub fn failing(err: ClipboardError) -> Self {
        Self {
            contents: Mutex::new(None),
            failure: Some(err),
        }
    }

    pub fn contents(&self) -> Option<String> {
        self.contents
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Clipboard for MemoryClipboard {
    fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        if let Some(err) = &self.failure {
            return Err(err.clone());
        }
        *self.contents.lock().unwrap_or_else(PoisonError::into_inner) = Some(text.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primary_wins() {
        let primary = MemoryClipboard::new();
        let fallback = MemoryClipboard::new();
        FallbackClipboard::new(&primary, &fallback)
            .write_text("box-shadow: none;")
            .unwrap();
        assert_eq!(primary.contents().as_deref(), Some("box-shadow: none;"));
        assert_eq!(fallback.contents(), None);
    }

    #[test]
    fn test_fallback_used_on_failure() {
        let primary = MemoryClipboard::failing(ClipboardError::Unavailable("insecure context".into()));
        let fallback = MemoryClipboard::new();
        FallbackClipboard::new(&primary, &fallback)
            .write_text("text-shadow: none;")
            .unwrap();
        assert_eq!(fallback.contents().as_deref(), Some("text-shadow: none;"));
    }

    #[test]
    fn test_both_fail() {
        let clipboard = FallbackClipboard::new(
            MemoryClipboard::failing(ClipboardError::Unavailable("insecure context".into())),
            MemoryClipboard::failing(ClipboardError::Write("denied".into())),
        );
        assert_eq!(
            clipboard.write_text("x"),
            Err(ClipboardError::Write("denied".into()))
        );
    }
}
