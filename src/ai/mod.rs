mod client;
mod inference;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::ClassificationResult;

pub use client::GeminiClient;

#[derive(Debug, Error)]
pub enum ClassificationError {
    #[error("GEMINI_API_KEY must be configured for email classification")]
    MissingCredential,
    #[error("email content is empty")]
    EmptyContent,
    #[error("classification request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("model response did not contain any text")]
    EmptyResponse,
    #[error("model response did not match the classification schema: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Anything that can turn an email into a classification.
///
/// One call is one attempt: implementations do not retry.
#[async_trait]
pub trait Classifier: Send + Sync {
    async fn classify(
        &self,
        content: &str,
        subject: &str,
    ) -> Result<ClassificationResult, ClassificationError>;
}
