/// Client-side precondition violations.
///
/// These are detected before any request is sent.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    #[error("Please enter a code request")]
    EmptyQuery,

    #[error("Please provide reference code for validation")]
    MissingReference,

    #[error("Please generate code first")]
    NothingToValidate,

    #[error("No code to download")]
    NothingToDownload,
}

/// Failures reported by, or while reaching, the remote service
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// The service answered but flagged `success: false`
    #[error("Error: {0}")]
    Application(String),

    /// Network failure, non-2xx status or a body of the wrong shape
    #[error("Service unreachable: {0}")]
    Connectivity(String),
}

impl ServiceError {
    pub fn is_connectivity(&self) -> bool {
        matches!(self, ServiceError::Connectivity(_))
    }
}
