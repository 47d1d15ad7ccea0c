use log::error;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use async_trait::async_trait;

use crate::errors::ProviderError;
use crate::providers::GenerationClient;
use crate::translation::profiles::GenerationProfile;

/// Ollama client for interacting with the Ollama API
#[derive(Debug)]
pub struct OllamaClient {
    /// Base URL of the Ollama API
    base_url: String,
    /// Model used for generation requests
    model: String,
    /// HTTP client for making requests
    client: Client,
}

/// Generate request for the Ollama API
#[derive(Debug, Serialize)]
struct GenerationRequest<'a> {
    /// Model name to use for generation
    model: &'a str,
    /// Prompt to generate from
    prompt: &'a str,
    /// Additional model parameters
    options: GenerationOptions,
    /// Whether to stream the response
    stream: bool,
}

/// Generation options for the Ollama API
#[derive(Debug, Serialize)]
struct GenerationOptions {
    temperature: f32,
    top_p: f32,
    top_k: u32,
    repeat_penalty: f32,
    seed: u64,
}

impl From<&GenerationProfile> for GenerationOptions {
    fn from(profile: &GenerationProfile) -> Self {
        Self {
            temperature: profile.temperature,
            top_p: profile.top_p,
            top_k: profile.top_k,
            repeat_penalty: profile.repeat_penalty,
            seed: profile.seed,
        }
    }
}

/// Generation response from the Ollama API
#[derive(Debug, Deserialize)]
struct GenerationResponse {
    /// Generated text
    response: String,
}

impl OllamaClient {
    /// Create a new Ollama client for an endpoint and model
    pub fn new(endpoint: impl Into<String>, model: impl Into<String>, timeout_secs: u64) -> Self {
        Self {
            base_url: normalize_base_url(endpoint.into()),
            model: model.into(),
            client: Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                // Ollama serves HTTP/1.1; keep connections alive for
                // sequential chunk requests.
                .http1_only()
                .pool_idle_timeout(Duration::from_secs(90))
                .tcp_keepalive(Duration::from_secs(60))
                .build()
                .unwrap_or_default(),
        }
    }

    /// Model this client was configured with
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Get the Ollama API version
    pub async fn version(&self) -> Result<String, ProviderError> {
        let url = format!("{}/api/version", self.base_url);
        let response: serde_json::Value = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(map_transport_error)?
            .json()
            .await
            .map_err(|e| ProviderError::ParseError(format!("version response: {}", e)))?;

        response["version"]
            .as_str()
            .map(|v| v.to_string())
            .ok_or_else(|| {
                ProviderError::ParseError("Invalid version format in response".to_string())
            })
    }

    /// List model names known to the service.
    ///
    /// The tags endpoint has shipped both `name` and `model` fields across
    /// Ollama versions; the adapter accepts either and fails fast when an
    /// entry matches neither shape.
    pub async fn list_models(&self) -> Result<Vec<String>, ProviderError> {
        let url = format!("{}/api/tags", self.base_url);
        let response: serde_json::Value = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(map_transport_error)?
            .json()
            .await
            .map_err(|e| ProviderError::ParseError(format!("tags response: {}", e)))?;

        let entries = response["models"].as_array().ok_or_else(|| {
            ProviderError::ParseError("tags response has no `models` array".to_string())
        })?;

        let mut names = Vec::with_capacity(entries.len());
        for entry in entries {
            let name = entry
                .get("model")
                .and_then(|v| v.as_str())
                .or_else(|| entry.get("name").and_then(|v| v.as_str()))
                .ok_or_else(|| {
                    ProviderError::ParseError(
                        "model entry has neither `model` nor `name` field".to_string(),
                    )
                })?;
            names.push(name.to_string());
        }

        Ok(names)
    }
}

#[async_trait]
impl GenerationClient for OllamaClient {
    async fn generate(
        &self,
        prompt: &str,
        profile: &GenerationProfile,
    ) -> Result<String, ProviderError> {
        let url = format!("{}/api/generate", self.base_url);
        let request = GenerationRequest {
            model: &self.model,
            prompt,
            options: GenerationOptions::from(profile),
            stream: false,
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to get error response text".to_string());
            error!("Ollama API error ({}): {}", status, message);

            // Ollama reports a missing model as a 404 with the model name
            // in the body.
            if status.as_u16() == 404 && message.contains("model") {
                return Err(ProviderError::ModelNotFound(self.model.clone()));
            }
            return Err(ProviderError::ApiError {
                status_code: status.as_u16(),
                message,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::RequestFailed(format!("reading response body: {}", e)))?;

        parse_generation_body(&body)
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        self.version().await.map(|_| ())
    }

    async fn model_available(&self, model: &str) -> Result<bool, ProviderError> {
        let models = self.list_models().await?;
        Ok(models.iter().any(|m| m == model))
    }
}

/// Accept either a single JSON object or a JSONL stream body.
///
/// Non-streaming requests normally return one object, but some proxies
/// still deliver line-delimited fragments; in that case the `response`
/// pieces are concatenated in order.
fn parse_generation_body(body: &str) -> Result<String, ProviderError> {
    if let Ok(parsed) = serde_json::from_str::<GenerationResponse>(body) {
        return Ok(parsed.response);
    }

    let mut combined = String::new();
    let mut any_parsed = false;
    for line in body.lines().filter(|l| !l.trim().is_empty()) {
        match serde_json::from_str::<serde_json::Value>(line) {
            Ok(value) => {
                any_parsed = true;
                if let Some(piece) = value.get("response").and_then(|v| v.as_str()) {
                    combined.push_str(piece);
                }
            }
            Err(e) => {
                error!(
                    "Failed to parse Ollama response line: {}. First 200 chars: {}",
                    e,
                    line.chars().take(200).collect::<String>()
                );
                return Err(ProviderError::ParseError(format!(
                    "response contains invalid JSON: {}",
                    e
                )));
            }
        }
    }

    if any_parsed {
        Ok(combined)
    } else {
        Err(ProviderError::ParseError(
            "empty response body from generation endpoint".to_string(),
        ))
    }
}

/// Map reqwest transport failures onto the provider error taxonomy
fn map_transport_error(e: reqwest::Error) -> ProviderError {
    if e.is_timeout() {
        ProviderError::Timeout(e.to_string())
    } else if e.is_connect() {
        ProviderError::ConnectionError(e.to_string())
    } else {
        ProviderError::RequestFailed(e.to_string())
    }
}

/// Normalize an endpoint into a scheme-qualified base URL without a
/// trailing slash
fn normalize_base_url(endpoint: String) -> String {
    let with_scheme = if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
        endpoint
    } else {
        format!("http://{}", endpoint)
    };
    with_scheme.trim_end_matches('/').to_string()
}
