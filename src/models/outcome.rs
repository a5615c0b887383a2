//! Resolution outcomes

use serde::{Deserialize, Serialize};

use crate::errors::{FailureKind, SourceError};
use crate::models::ProviderResult;

/// Why one adapter did not satisfy a query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttemptFailure {
    pub source: String,
    pub reason: FailureKind,
    pub message: String,
}

impl AttemptFailure {
    pub fn new<S: Into<String>, M: Into<String>>(source: S, reason: FailureKind, message: M) -> Self {
        Self {
            source: source.into(),
            reason,
            message: message.into(),
        }
    }

    /// Record an adapter error under the adapter's chain name
    pub fn from_error(adapter_name: &str, error: &SourceError) -> Self {
        Self::new(adapter_name, error.kind(), error.to_string())
    }
}

/// Result of one resolution
///
/// Either the first adapter that produced items, or every attempt in the
/// order it was made.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolutionOutcome {
    Resolved {
        result: ProviderResult,
        /// Failures of the adapters tried before the winning one
        failed_before: Vec<AttemptFailure>,
    },
    Exhausted {
        attempts: Vec<AttemptFailure>,
    },
}

impl ResolutionOutcome {
    pub fn is_resolved(&self) -> bool {
        matches!(self, ResolutionOutcome::Resolved { .. })
    }

    /// Every failed attempt, whichever way the resolution ended
    pub fn failures(&self) -> &[AttemptFailure] {
        match self {
            ResolutionOutcome::Resolved { failed_before, .. } => failed_before,
            ResolutionOutcome::Exhausted { attempts } => attempts,
        }
    }

    pub fn result(&self) -> Option<&ProviderResult> {
        match self {
            ResolutionOutcome::Resolved { result, .. } => Some(result),
            ResolutionOutcome::Exhausted { .. } => None,
        }
    }
}
