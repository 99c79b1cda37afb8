//! In-memory session state
//!
//! A [`Session`] holds the last generated artifact and the last validation
//! result. It is owned by a single writer; overlapping generation requests are
//! ordered with monotonic [`RequestTicket`]s so that an older response can never
//! overwrite the state produced by a newer one.

use serde::Serialize;

use crate::api::{GeneratedArtifact, ValidationResult};

/// Coarse lifecycle of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Phase {
    /// No successful generation yet
    Empty,
    /// Artifact present, validation permitted
    Generated,
    /// Artifact and validation results present
    Validated,
}

/// Sequence number attached to a generation request
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RequestTicket(u64);

#[derive(Debug, Default)]
pub struct Session {
    generated_code: String,
    current_filename: String,
    validation: Option<ValidationResult>,
    issued: u64,
    applied: u64,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve the next ticket for an outgoing generation request
    pub fn issue_ticket(&mut self) -> RequestTicket {
        self.issued += 1;
        RequestTicket(self.issued)
    }

    /// Store a successful generation response
    ///
    /// Returns `false` and leaves the session untouched when a response to a
    /// newer request has already been applied. Applying a generation drops any
    /// previous validation result, since it scored different code.
    pub fn apply_generation(&mut self, ticket: RequestTicket, artifact: GeneratedArtifact) -> bool {
        if ticket.0 <= self.applied {
            return false;
        }

        self.applied = ticket.0;
        self.generated_code = artifact.code;
        self.current_filename = artifact.filename.unwrap_or_default();
        self.validation = None;
        true
    }

    /// Record the result of a successful validation
    pub fn record_validation(&mut self, result: ValidationResult) {
        self.validation = Some(result);
    }

    pub fn generated_code(&self) -> &str {
        &self.generated_code
    }

    /// Server-provided filename, `None` when it was absent or empty
    pub fn current_filename(&self) -> Option<&str> {
        Some(self.current_filename.as_str()).filter(|name| !name.is_empty())
    }

    pub fn validation(&self) -> Option<&ValidationResult> {
        self.validation.as_ref()
    }

    pub fn has_artifact(&self) -> bool {
        !self.generated_code.is_empty()
    }

    pub fn can_validate(&self) -> bool {
        self.has_artifact()
    }

    pub fn can_download(&self) -> bool {
        self.has_artifact()
    }

    pub fn phase(&self) -> Phase {
        match (self.has_artifact(), self.validation.is_some()) {
            (false, _) => Phase::Empty,
            (true, false) => Phase::Generated,
            (true, true) => Phase::Validated,
        }
    }
}
