use serde::Serialize;
use std::time::Duration;

use crate::error::{InputError, ServiceError};

/// How long a notice stays visible
pub const NOTICE_LIFETIME: Duration = Duration::from_secs(5);

/// Default instructions shown when the service cannot be reached
pub const DEFAULT_START_HINT: &str = "python backend/app.py";

/// User-triggered operations that talk to the service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Generate,
    Validate,
}

impl Action {
    fn verb(self) -> &'static str {
        match self {
            Action::Generate => "generate",
            Action::Validate => "validate",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeKind {
    Success,
    Info,
    Warning,
    Error,
}

/// Transient, non-blocking status message
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn new(kind: NoticeKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(NoticeKind::Success, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NoticeKind::Error, message)
    }

    /// Whether a notice issued `elapsed` ago is still on screen
    pub fn is_visible_after(&self, elapsed: Duration) -> bool {
        elapsed < NOTICE_LIFETIME
    }

    pub fn from_input(error: &InputError) -> Self {
        Self::error(error.to_string())
    }

    /// Notice for a failed service call
    ///
    /// Application errors carry the service's message verbatim; connectivity
    /// failures get a generic wording so the two are distinguishable.
    pub fn from_service(action: Action, error: &ServiceError) -> Self {
        match error {
            ServiceError::Application(message) => Self::error(format!("Error: {message}")),
            ServiceError::Connectivity(_) => Self::error(format!(
                "Failed to {} code. Make sure the service is running.",
                action.verb()
            )),
        }
    }

    pub fn generated() -> Self {
        Self::success("Code generated successfully!")
    }

    pub fn validated() -> Self {
        Self::success("Validation complete!")
    }

    pub fn downloaded() -> Self {
        Self::success("Code downloaded successfully!")
    }

    pub fn connected(model: Option<&str>) -> Self {
        match model {
            Some(model) => Self::success(format!("Connected to service (model: {model})")),
            None => Self::success("Connected to service"),
        }
    }

    pub fn disconnected(start_hint: &str) -> Self {
        Self::new(
            NoticeKind::Warning,
            format!("Service not connected. Run: {start_hint}"),
        )
    }
}
