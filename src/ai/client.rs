use async_trait::async_trait;
use reqwest::Client;

use super::{
    inference::{build_request, parse_response},
    ClassificationError, Classifier,
};
use crate::{config::GeminiConfig, domain::ClassificationResult};

#[derive(Clone)]
pub struct GeminiClient {
    http: Client,
    config: GeminiConfig,
}

impl GeminiClient {
    pub fn new(http: Client, config: GeminiConfig) -> Self {
        Self { http, config }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.api_base, self.config.model
        )
    }
}

#[async_trait]
impl Classifier for GeminiClient {
    async fn classify(
        &self,
        content: &str,
        subject: &str,
    ) -> Result<ClassificationResult, ClassificationError> {
        if content.trim().is_empty() {
            return Err(ClassificationError::EmptyContent);
        }
        let api_key = self
            .config
            .api_key
            .as_ref()
            .ok_or(ClassificationError::MissingCredential)?;

        let request = build_request(content, subject);
        tracing::debug!(
            target: "classifier",
            model = %self.config.model,
            content_len = content.len(),
            "sending classification request"
        );
        let response = self
            .http
            .post(self.endpoint())
            .header("x-goog-api-key", api_key)
            .json(&request)
            .send()
            .await?
            .error_for_status()?;

        let verdict = parse_response(response).await?;
        let result =
            ClassificationResult::from_verdict(verdict, subject.to_string(), content.to_string());
        tracing::info!(
            target: "classifier",
            id = %result.id,
            kind = %result.kind,
            confidence = result.confidence,
            "classification received"
        );
        Ok(result)
    }
}
