//! Error types for the netask system.
//!
//! Every terminal failure of a [`NetworkTask`](crate::task::NetworkTask) is normalized into
//! one [`NetworkError`] that is delivered exactly once through the completion observers.
//! The error is `Clone` because the same result fans out to every registered observer.

use crate::pipeline::recovery::RecoveryOption;
use http::StatusCode;
use std::time::Duration;
use thiserror::Error;

/// Transport-level failures reported by the fetch collaborator
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("Not connected to the network: {0}")]
    NotConnected(String),
    #[error("Request timed out after {0:?}")]
    TimedOut(Duration),
    #[error("TLS failure: {0}")]
    Tls(String),
    #[error("Synchronous wait gave up after {waited:?}")]
    SynchronousTimeout { waited: Duration },
    #[error("Transport failure: {0}")]
    Other(String),
}

impl TransportError {
    /// Whether a retry of the same request has a reasonable chance to succeed
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::NotConnected(_) | Self::TimedOut(_))
    }
}

/// Failures of the HTTP exchange itself (as opposed to the transport)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    #[error("Response is not an HTTP response")]
    NonHttpResponse,
    #[error("Redirect to {location} is not allowed")]
    DisallowedRedirect { location: String },
    #[error("Response validation failed in {validator}: {reason}")]
    ValidationFailed { validator: String, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CacheError {
    #[error("No cached data for {key}")]
    NoCachedData { key: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Decoding {target} failed: {reason}")]
pub struct DecodeError {
    pub target: String,
    pub reason: String,
}

impl DecodeError {
    pub fn new(target: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            reason: reason.into(),
        }
    }
}

/// Top-level error delivered to completion observers
#[derive(Debug, Clone, Error)]
pub enum NetworkError {
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("HTTP status {status}")]
    Status { status: StatusCode },

    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),

    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    #[error("Request modifier {modifier} failed: {reason}")]
    Modifier { modifier: String, reason: String },

    #[error("Recoverable failure ({} options): {original}", options.len())]
    Recoverable {
        original: Box<NetworkError>,
        options: Vec<RecoveryOption>,
    },

    #[error("Server reported: {message} ({cause})")]
    ErrorBody {
        message: String,
        cause: Box<NetworkError>,
    },

    #[error("Task was cancelled")]
    Cancelled,

    #[error("Internal fault: {0}")]
    Internal(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl NetworkError {
    pub fn modifier(modifier: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Modifier {
            modifier: modifier.into(),
            reason: reason.into(),
        }
    }

    pub fn validation(validator: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Protocol(ProtocolError::ValidationFailed {
            validator: validator.into(),
            reason: reason.into(),
        })
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    pub fn is_status(&self) -> bool {
        matches!(self, Self::Status { .. })
    }

    /// The HTTP status carried by this error, looking through wrapping variants
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status } => Some(*status),
            Self::ErrorBody { cause, .. } => cause.status(),
            Self::Recoverable { original, .. } => original.status(),
            _ => None,
        }
    }

    /// The innermost error, skipping recovery and error-body wrappers
    pub fn root(&self) -> &NetworkError {
        match self {
            Self::ErrorBody { cause, .. } => cause.root(),
            Self::Recoverable { original, .. } => original.root(),
            other => other,
        }
    }
}

impl From<crate::state_machine::StateMachineError> for NetworkError {
    fn from(err: crate::state_machine::StateMachineError) -> Self {
        NetworkError::Internal(err.to_string())
    }
}

impl From<crate::config::ConfigurationError> for NetworkError {
    fn from(err: crate::config::ConfigurationError) -> Self {
        NetworkError::Configuration(err.to_string())
    }
}

pub type NetworkResult<T> = anyhow::Result<T, NetworkError>;
