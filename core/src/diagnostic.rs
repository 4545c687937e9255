//! Non-fatal findings raised while reconstructing season state.
//!
//! RULE: A single bad or missing record never aborts a computation.
//! It is rejected or replaced by its fallback, and a Diagnostic is
//! attached to the output so consumers can see what was assumed.

use crate::{error::SeasonError, types::Event};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// A required record or catalogue entry was absent; a fallback was used.
    MissingData,
    /// Reconstructed and upstream-reported values disagree; upstream won.
    AmbiguousState,
    /// A record was malformed and skipped.
    InvalidInput,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Diagnostic {
    pub kind:    DiagnosticKind,
    pub event:   Option<Event>,
    pub message: String,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, event: Option<Event>, message: impl Into<String>) -> Self {
        Self { kind, event, message: message.into() }
    }

    pub fn missing(event: Option<Event>, message: impl Into<String>) -> Self {
        Self::new(DiagnosticKind::MissingData, event, message)
    }

    pub fn ambiguous(event: Option<Event>, message: impl Into<String>) -> Self {
        Self::new(DiagnosticKind::AmbiguousState, event, message)
    }

    pub fn invalid(event: Option<Event>, message: impl Into<String>) -> Self {
        Self::new(DiagnosticKind::InvalidInput, event, message)
    }

    /// Downgrade a recoverable error into a diagnostic.
    /// I/O and serialization failures from a fetch count as missing data.
    pub fn from_error(event: Option<Event>, err: &SeasonError) -> Self {
        let kind = match err {
            SeasonError::AmbiguousState { .. } => DiagnosticKind::AmbiguousState,
            SeasonError::InvalidInput { .. } => DiagnosticKind::InvalidInput,
            _ => DiagnosticKind::MissingData,
        };
        Self::new(kind, event, err.to_string())
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.kind {
            DiagnosticKind::MissingData => "missing_data",
            DiagnosticKind::AmbiguousState => "ambiguous_state",
            DiagnosticKind::InvalidInput => "invalid_input",
        };
        match self.event {
            Some(event) => write!(f, "[{kind}] gw={event} {}", self.message),
            None => write!(f, "[{kind}] {}", self.message),
        }
    }
}

/// Count diagnostics of one kind. Used by tests and the runner summary.
pub fn count_kind(diagnostics: &[Diagnostic], kind: DiagnosticKind) -> usize {
    diagnostics.iter().filter(|d| d.kind == kind).count()
}
