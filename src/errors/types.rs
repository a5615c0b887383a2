//! Error type definitions for the listings proxy
//!
//! This module defines all error types used throughout the application,
//! providing a hierarchical error system. Source errors carry the name of the
//! adapter that raised them and classify into a [`FailureKind`] so callers can
//! branch on the kind of failure rather than on message text.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Top-level application error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Source handling errors
    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    /// Resolver contract violations
    #[error("Resolver error: {0}")]
    Resolver(#[from] ResolverError),

    /// Web layer errors
    #[error("Web error: {0}")]
    Web(#[from] WebError),

    /// Validation errors
    #[error("Validation error: {message}")]
    Validation { message: String },

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// HTTP client construction errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Filesystem errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failure classification used by the resolver for diagnostics
///
/// Serialized with the exact variant names so JSON consumers see
/// `"ConfigurationError"`, `"TransportError"` and so on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailureKind {
    /// Credential absent or rejected; needs operator action
    ConfigurationError,
    /// Network error, timeout or non-2xx response
    TransportError,
    /// Provider reached but had no usable data for the query
    EmptyResultError,
    /// Provider payload did not match the expected shape
    ParseError,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::ConfigurationError => "ConfigurationError",
            FailureKind::TransportError => "TransportError",
            FailureKind::EmptyResultError => "EmptyResultError",
            FailureKind::ParseError => "ParseError",
        }
    }
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Source adapter errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SourceError {
    /// A required credential is not configured
    #[error("{source_name}: missing credential {credential}")]
    MissingCredential {
        source_name: String,
        credential: String,
    },

    /// The provider rejected the configured credential
    #[error("{source_name}: credential rejected (HTTP {status})")]
    Unauthorized { source_name: String, status: u16 },

    /// Connection-level failures
    #[error("{source_name}: request failed - {message}")]
    Transport {
        source_name: String,
        message: String,
    },

    /// The request exceeded its time budget
    #[error("{source_name}: timed out after {}", format_elapsed(.after))]
    Timeout { source_name: String, after: Duration },

    /// Non-2xx responses
    #[error("{source_name}: HTTP {status} - {message}")]
    Http {
        source_name: String,
        status: u16,
        message: String,
    },

    /// The provider answered but had nothing usable
    #[error("{source_name}: no usable items")]
    EmptyResult { source_name: String },

    /// The adapter has no mapping for the requested entity
    #[error("{source_name}: entity '{entity}' is not supported")]
    UnsupportedEntity { source_name: String, entity: String },

    /// Payload did not match the expected shape
    #[error("{source_name}: parse error - {message}")]
    Parse {
        source_name: String,
        message: String,
    },
}

impl SourceError {
    /// Classify this error for fallback and diagnostics
    pub fn kind(&self) -> FailureKind {
        match self {
            SourceError::MissingCredential { .. } | SourceError::Unauthorized { .. } => {
                FailureKind::ConfigurationError
            }
            SourceError::Transport { .. }
            | SourceError::Timeout { .. }
            | SourceError::Http { .. } => FailureKind::TransportError,
            SourceError::EmptyResult { .. } | SourceError::UnsupportedEntity { .. } => {
                FailureKind::EmptyResultError
            }
            SourceError::Parse { .. } => FailureKind::ParseError,
        }
    }

    pub fn missing_credential<S: Into<String>, C: Into<String>>(source_name: S, credential: C) -> Self {
        Self::MissingCredential {
            source_name: source_name.into(),
            credential: credential.into(),
        }
    }

    pub fn transport<S: Into<String>, M: Into<String>>(source_name: S, message: M) -> Self {
        Self::Transport {
            source_name: source_name.into(),
            message: message.into(),
        }
    }

    pub fn timeout<S: Into<String>>(source_name: S, after: Duration) -> Self {
        Self::Timeout {
            source_name: source_name.into(),
            after,
        }
    }

    pub fn empty<S: Into<String>>(source_name: S) -> Self {
        Self::EmptyResult {
            source_name: source_name.into(),
        }
    }

    pub fn unsupported_entity<S: Into<String>, E: Into<String>>(source_name: S, entity: E) -> Self {
        Self::UnsupportedEntity {
            source_name: source_name.into(),
            entity: entity.into(),
        }
    }

    pub fn parse<S: Into<String>, M: Into<String>>(source_name: S, message: M) -> Self {
        Self::Parse {
            source_name: source_name.into(),
            message: message.into(),
        }
    }
}

fn format_elapsed(after: &Duration) -> String {
    humantime::format_duration(*after).to_string()
}

/// Caller contract violations when invoking the resolver
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ResolverError {
    /// Two adapters in one chain share a name, making attempts ambiguous
    #[error("Adapter '{0}' appears more than once in the chain")]
    DuplicateAdapter(String),
}

/// Web layer specific errors
#[derive(Error, Debug)]
pub enum WebError {
    /// Date path segment is not YYYY-MM-DD
    #[error("Invalid date '{value}'. Use YYYY-MM-DD")]
    InvalidDate { value: String },

    /// Invalid request format
    #[error("Invalid request: {field} - {message}")]
    InvalidRequest { field: String, message: String },
}

impl AppError {
    /// Create a validation error with a custom message
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }
}

impl WebError {
    pub fn invalid_date<V: Into<String>>(value: V) -> Self {
        Self::InvalidDate {
            value: value.into(),
        }
    }

    pub fn invalid_request<F: Into<String>, M: Into<String>>(field: F, message: M) -> Self {
        Self::InvalidRequest {
            field: field.into(),
            message: message.into(),
        }
    }
}
