use crate::prelude::*;
use codegen_core::api::{
    classify_generation, classify_health, classify_validation, GeneratedArtifact,
    GenerationRequest, HealthStatus, ValidationRequest, ValidationResult,
};
use codegen_core::error::ServiceError;
use std::time::Duration;

/// Remote generation and validation service
#[allow(async_fn_in_trait)]
pub trait CodeService {
    async fn health(&self) -> Result<HealthStatus, ServiceError>;

    async fn generate(&self, request: &GenerationRequest) -> Result<GeneratedArtifact, ServiceError>;

    async fn validate(&self, request: &ValidationRequest) -> Result<ValidationResult, ServiceError>;
}

/// [`CodeService`] over JSON/HTTP
#[derive(Debug, Clone)]
pub struct HttpService {
    client: reqwest::Client,
    base_url: String,
}

impl HttpService {
    /// Create a client for the API rooted at `base_url`
    ///
    /// Without a timeout the transport's defaults apply.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder
            .build()
            .map_err(|e| eyre!("Failed to build HTTP client: {}", e))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_global(global: &crate::Global) -> Result<Self> {
        Self::new(&global.api_url, global.timeout.map(Duration::from_secs))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// Send a request and return its status code and body text
    async fn exchange(&self, request: reqwest::RequestBuilder) -> Result<(u16, String), ServiceError> {
        let response = request
            .send()
            .await
            .map_err(|e| ServiceError::Connectivity(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| ServiceError::Connectivity(e.to_string()))?;

        log::debug!("Service responded with HTTP {status} ({} bytes)", body.len());

        Ok((status, body))
    }
}

impl CodeService for HttpService {
    async fn health(&self) -> Result<HealthStatus, ServiceError> {
        let url = self.url("health");
        log::debug!("GET {url}");

        let (status, body) = self.exchange(self.client.get(&url)).await?;
        classify_health(status, &body)
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<GeneratedArtifact, ServiceError> {
        let url = self.url("generate");
        log::debug!("POST {url} (language: {})", request.language);

        let (status, body) = self.exchange(self.client.post(&url).json(request)).await?;
        classify_generation(status, &body)
    }

    async fn validate(&self, request: &ValidationRequest) -> Result<ValidationResult, ServiceError> {
        let url = self.url("validate");
        log::debug!("POST {url} (language: {})", request.language);

        let (status, body) = self.exchange(self.client.post(&url).json(request)).await?;
        classify_validation(status, &body)
    }
}
