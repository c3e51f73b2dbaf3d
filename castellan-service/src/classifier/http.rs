//! HTTP client for the managed content safety service.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::config::ClassifierConfig;
use crate::error::{ClassifierError, SafetyError, SafetyResult};

use super::{
    AnalyzeTextRequest, AnalyzeTextResponse, ClassifierClient, ShieldAnalysis, ShieldRequest,
    ShieldResponse,
};

/// Content safety REST API client
pub struct ShieldClient {
    client: Client,
    config: ClassifierConfig,
}

impl ShieldClient {
    /// Create a new classifier client
    pub fn new(config: ClassifierConfig) -> SafetyResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| {
                SafetyError::Classifier(ClassifierError::Connection {
                    url: config.endpoint.clone(),
                    source: e,
                })
            })?;

        Ok(Self { client, config })
    }

    fn request_url(&self, operation: &str) -> String {
        format!(
            "{}/contentsafety/{}?api-version={}",
            self.config.endpoint.trim_end_matches('/'),
            operation,
            self.config.api_version
        )
    }

    async fn post<B, R>(&self, operation: &str, body: &B) -> Result<R, ClassifierError>
    where
        B: Serialize + Sync,
        R: DeserializeOwned,
    {
        let url = self.request_url(operation);
        debug!(url = %url, "Sending content safety request");

        let mut request = self.client.post(&url).json(body);
        if !self.config.api_key.is_empty() {
            request = request.header(
                self.config.api_key_header.as_str(),
                self.config.api_key.as_str(),
            );
        }

        let response = request
            .send()
            .await
            .map_err(|e| ClassifierError::Connection {
                url: url.clone(),
                source: e,
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ClassifierError::Status {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json()
            .await
            .map_err(|source| ClassifierError::InvalidResponse { source })
    }
}

#[async_trait]
impl ClassifierClient for ShieldClient {
    async fn shield_documents(
        &self,
        contents: &[String],
        cancel_token: &CancellationToken,
    ) -> Result<Vec<ShieldAnalysis>, ClassifierError> {
        let request = ShieldRequest {
            user_prompt: None,
            documents: contents.to_vec(),
        };

        // Dropping the request future aborts the in-flight HTTP call.
        let response: ShieldResponse = tokio::select! {
            _ = cancel_token.cancelled() => return Err(ClassifierError::Canceled),
            result = self.post("text:shieldPrompt", &request) => result?,
        };

        Ok(response.documents_analysis)
    }

    async fn shield_prompt(&self, prompt: &str) -> Result<ShieldAnalysis, ClassifierError> {
        let request = ShieldRequest {
            user_prompt: Some(prompt.to_string()),
            documents: Vec::new(),
        };

        let response: ShieldResponse = self.post("text:shieldPrompt", &request).await?;

        response
            .user_prompt_analysis
            .ok_or_else(|| ClassifierError::Malformed {
                message: "shield response is missing the user prompt analysis".to_string(),
            })
    }

    async fn analyze_text(&self, text: &str) -> Result<AnalyzeTextResponse, ClassifierError> {
        let request = AnalyzeTextRequest {
            text: text.to_string(),
        };
        self.post("text:analyze", &request).await
    }
}
