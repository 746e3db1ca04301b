//! Production implementation of `TextGenerator` backed by reqwest.

use crate::error::GeneratorError;
use crate::generator::{ChatMessage, TextGenerator};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

const WORKERS_AI_MODEL: &str = "@cf/meta/llama-3.1-8b-instruct";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Where generation requests are sent, and how they are authenticated.
///
/// Two schemes are supported: a third-party inference API keyed by account
/// id + bearer token, and a caller-operated proxy that hides the credentials
/// behind a single HTTPS URL.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum Endpoint {
    /// Cloudflare Workers AI, keyed by account id and API token.
    WorkersAi {
        /// Account identifier, part of the request URL
        account_id: String,
        /// Bearer token
        api_token: String,
    },
    /// Caller-operated proxy. Must be an `https://` URL.
    Proxy {
        /// Full endpoint URL
        url: String,
    },
}

impl Endpoint {
    /// Returns the URL generation requests are POSTed to.
    pub fn url(&self) -> String {
        match self {
            Endpoint::WorkersAi { account_id, .. } => format!(
                "https://api.cloudflare.com/client/v4/accounts/{}/ai/run/{}",
                account_id, WORKERS_AI_MODEL
            ),
            Endpoint::Proxy { url } => url.clone(),
        }
    }
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    messages: &'a [ChatMessage],
}

// Workers AI wraps the text as {"result": {"response": ...}}; the proxy
// returns {"response": ...} directly.
#[derive(Deserialize)]
struct WorkersAiResponse {
    result: WorkersAiResult,
}

#[derive(Deserialize)]
struct WorkersAiResult {
    response: String,
}

#[derive(Deserialize)]
struct ProxyResponse {
    response: String,
}

/// Production text generator POSTing chat prompts to a configured endpoint.
///
/// Single attempt, fail-fast: a non-2xx status, a network failure or a body
/// without text at the expected field path is a hard failure for that call.
pub struct HttpTextGenerator {
    endpoint: Endpoint,
    client: reqwest::Client,
}

impl HttpTextGenerator {
    /// Creates a generator for the given endpoint.
    pub fn new(endpoint: Endpoint) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self { endpoint, client }
    }

    /// Returns the configured endpoint.
    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }
}

#[async_trait]
impl TextGenerator for HttpTextGenerator {
    async fn generate(&self, messages: &[ChatMessage]) -> Result<String, GeneratorError> {
        let url = self.endpoint.url();
        debug!(url = %url, turns = messages.len(), "generation request");

        let mut request = self
            .client
            .post(&url)
            .json(&GenerateRequest { messages });
        if let Endpoint::WorkersAi { api_token, .. } = &self.endpoint {
            request = request.header("Authorization", format!("Bearer {}", api_token));
        }

        let response = request
            .send()
            .await
            .map_err(|e| GeneratorError::transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GeneratorError::Status {
                code: status.as_u16(),
                body,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| GeneratorError::transport(e.to_string()))?;

        let text = match &self.endpoint {
            Endpoint::WorkersAi { .. } => serde_json::from_str::<WorkersAiResponse>(&body)
                .map(|r| r.result.response),
            Endpoint::Proxy { .. } => {
                serde_json::from_str::<ProxyResponse>(&body).map(|r| r.response)
            }
        }
        .map_err(|e| GeneratorError::MalformedResponse(e.to_string()))?;

        Ok(text)
    }
}
