//! The LM transport seam: a small trait the worker depends on, satisfied
//! by a `reqwest`-backed production client and, in tests, a
//! deterministic in-memory double.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Transport-level failure calling the LM service. Never surfaced past
/// the prediction worker; only counted by the circuit breaker.
#[derive(Debug, Clone, Error)]
pub enum LmError {
	#[error("request timed out")]
	Timeout,
	#[error("http status {0}")]
	Status(u16),
	#[error("transport error: {0}")]
	Transport(String),
	#[error("response parse error: {0}")]
	Parse(String),
}

/// One round trip to the language model: a prompt in, a completion out.
#[async_trait::async_trait]
pub trait LmClient: Send + Sync {
	async fn complete(&self, prompt: &str, timeout: Duration) -> Result<String, LmError>;
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
	model: &'a str,
	prompt: &'a str,
	stream: bool,
	options: GenerateOptions,
}

#[derive(Serialize)]
struct GenerateOptions {
	num_predict: u32,
	temperature: f32,
	top_p: f32,
}

#[derive(Deserialize)]
struct GenerateResponse {
	response: String,
}

/// Production client: JSON-over-HTTP-POST against an Ollama-compatible
/// `/api/generate` endpoint.
pub struct ReqwestLmClient {
	http: reqwest::Client,
	endpoint: String,
	model: String,
}

impl ReqwestLmClient {
	pub fn new(endpoint: impl Into<String>, model: impl Into<String>) -> Self {
		Self { http: reqwest::Client::new(), endpoint: endpoint.into(), model: model.into() }
	}
}

#[async_trait::async_trait]
impl LmClient for ReqwestLmClient {
	async fn complete(&self, prompt: &str, timeout: Duration) -> Result<String, LmError> {
		let request = GenerateRequest {
			model: &self.model,
			prompt,
			stream: false,
			options: GenerateOptions { num_predict: 80, temperature: 0.2, top_p: 0.9 },
		};

		let response = tokio::time::timeout(timeout, self.http.post(&self.endpoint).json(&request).send())
			.await
			.map_err(|_| LmError::Timeout)?
			.map_err(|e| LmError::Transport(e.to_string()))?;

		if !response.status().is_success() {
			return Err(LmError::Status(response.status().as_u16()));
		}

		let parsed: GenerateResponse = response.json().await.map_err(|e| LmError::Parse(e.to_string()))?;
		Ok(parsed.response.trim().to_string())
	}
}
