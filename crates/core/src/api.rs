//! Wire types for the generation/validation service and pure classification
//! of its responses.
//!
//! The shell performs the HTTP exchange and hands the raw status code and body
//! to the `classify_*` functions, which decide between a usable payload, an
//! application-level rejection and a connectivity failure.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{InputError, ServiceError};
use crate::language::Language;

/// Value the health endpoint reports when the service is ready
pub const HEALTHY_STATUS: &str = "healthy";

const UNKNOWN_ERROR: &str = "Unknown error";

/// Body of `POST /generate`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub query: String,
    pub language: Language,
}

impl GenerationRequest {
    /// Build a request from raw user input, rejecting blank queries
    pub fn new(query: &str, language: Language) -> Result<Self, InputError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(InputError::EmptyQuery);
        }

        Ok(Self {
            query: query.to_string(),
            language,
        })
    }
}

/// Body of `POST /validate`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationRequest {
    pub generated: String,
    pub reference: String,
    pub language: Language,
}

impl ValidationRequest {
    /// Build a request from the displayed code and the user's reference code
    ///
    /// The reference is checked first, then the generated text. `generated` is
    /// sent exactly as given.
    pub fn new(generated: String, reference: &str, language: Language) -> Result<Self, InputError> {
        let reference = reference.trim();
        if reference.is_empty() {
            return Err(InputError::MissingReference);
        }
        if generated.is_empty() {
            return Err(InputError::NothingToValidate);
        }

        Ok(Self {
            generated,
            reference: reference.to_string(),
            language,
        })
    }
}

/// Successful generation payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedArtifact {
    pub code: String,
    /// Server-side filename, `None` when the service did not provide one
    pub filename: Option<String>,
}

/// CodeBLEU-style scores returned by the validation service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub codebleu: f64,
    pub ngram_match: f64,
    pub weighted_ngram_match: f64,
    pub syntax_match: f64,
    pub dataflow_match: f64,
    #[serde(default)]
    pub quality: String,
    #[serde(default)]
    pub recommendations: Vec<String>,
}

/// Body of `GET /health`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub backend: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GenerationEnvelope {
    #[serde(default)]
    success: bool,
    code: Option<String>,
    filename: Option<String>,
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ValidationEnvelope {
    #[serde(default)]
    success: bool,
    results: Option<ValidationResult>,
    error: Option<String>,
}

/// Decode a JSON body, treating non-2xx statuses and malformed bodies as
/// connectivity failures
fn decode<T: DeserializeOwned>(status: u16, body: &str) -> Result<T, ServiceError> {
    if !(200..300).contains(&status) {
        return Err(ServiceError::Connectivity(format!("HTTP {status}")));
    }

    serde_json::from_str(body)
        .map_err(|e| ServiceError::Connectivity(format!("Malformed response: {e}")))
}

fn application_error(error: Option<String>) -> ServiceError {
    ServiceError::Application(error.unwrap_or_else(|| UNKNOWN_ERROR.to_string()))
}

/// Classify the response of `POST /generate`
pub fn classify_generation(status: u16, body: &str) -> Result<GeneratedArtifact, ServiceError> {
    let envelope: GenerationEnvelope = decode(status, body)?;

    if !envelope.success {
        return Err(application_error(envelope.error));
    }

    let code = envelope
        .code
        .ok_or_else(|| ServiceError::Connectivity("Response is missing `code`".to_string()))?;

    Ok(GeneratedArtifact {
        code,
        filename: envelope.filename.filter(|name| !name.is_empty()),
    })
}

/// Classify the response of `POST /validate`
pub fn classify_validation(status: u16, body: &str) -> Result<ValidationResult, ServiceError> {
    let envelope: ValidationEnvelope = decode(status, body)?;

    if !envelope.success {
        return Err(application_error(envelope.error));
    }

    envelope
        .results
        .ok_or_else(|| ServiceError::Connectivity("Response is missing `results`".to_string()))
}

/// Classify the response of `GET /health`
///
/// Any status other than `"healthy"` counts as the service being unreachable.
pub fn classify_health(status: u16, body: &str) -> Result<HealthStatus, ServiceError> {
    let health: HealthStatus = decode(status, body)?;

    if health.status != HEALTHY_STATUS {
        return Err(ServiceError::Connectivity(format!(
            "Service reported status `{}`",
            health.status
        )));
    }

    Ok(health)
}
