//! Controller error types

use sheen_codec::EffectKind;
use thiserror::Error;

/// Errors reported by the host design API
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HostError {
    /// The API object, or a method on it, is missing
    #[error("Design API not available: {0}")]
    Unavailable(String),

    /// A host call was rejected
    #[error("Host call failed: {message}")]
    Call {
        /// Status code attached by the host, if any
        code: Option<u16>,
        message: String,
    },
}

impl HostError {
    pub fn call(message: impl Into<String>) -> Self {
        Self::Call {
            code: None,
            message: message.into(),
        }
    }

    pub fn with_code(code: u16, message: impl Into<String>) -> Self {
        Self::Call {
            code: Some(code),
            message: message.into(),
        }
    }

    /// The host signals "no such thing" with a 404 code. Expected during
    /// name probing and lookups, so never surfaced to the user.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Call { code: Some(404), .. })
    }
}

/// Errors from applying or resetting an effect
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ControllerError {
    /// The host API is missing or not ready
    #[error("Design API not available: {0}")]
    HostUnavailable(String),

    /// No element is selected in the designer
    #[error("Please select an element first")]
    NoSelection,

    /// Another apply is still in flight
    #[error("An apply is already in progress")]
    Busy,

    /// The element ended up with no style rule to write to
    #[error("No style rule available to write {property}")]
    NoTargetRule { property: &'static str },

    /// No preset with that id exists for the kind
    #[error("Unknown {kind} preset: {id}")]
    UnknownPreset { kind: EffectKind, id: String },

    /// A host call failed
    #[error(transparent)]
    Host(HostError),
}

impl ControllerError {
    /// Whether the error should reach the user as a toast.
    pub fn is_reportable(&self) -> bool {
        match self {
            Self::Busy => false,
            Self::Host(err) => !err.is_not_found(),
            _ => true,
        }
    }
}

impl From<HostError> for ControllerError {
    fn from(err: HostError) -> Self {
        match err {
            HostError::Unavailable(reason) => Self::HostUnavailable(reason),
            other => Self::Host(other),
        }
    }
}

/// Result type for controller operations
pub type Result<T> = std::result::Result<T, ControllerError>;
