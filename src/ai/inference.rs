use reqwest::Response;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::ClassificationError;
use crate::domain::ModelVerdict;

const INSTRUCTION: &str =
    "Analyze the following email for spam, phishing, or legitimate characteristics.";

pub fn build_prompt(content: &str, subject: &str) -> String {
    format!("{INSTRUCTION}\n    Subject: {subject}\n    Content: {content}")
}

/// Structured output schema handed to the model alongside the prompt.
pub fn response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "type": {
                "type": "STRING",
                "description": "Classification of the email: SPAM, HAM, PHISHING, or UNSURE"
            },
            "confidence": {
                "type": "NUMBER",
                "description": "Confidence score from 0 to 100"
            },
            "explanation": {
                "type": "STRING",
                "description": "Brief summary of why this classification was chosen"
            },
            "features": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "name": {
                            "type": "STRING",
                            "description": "Feature name like 'Sense of Urgency', 'Suspicious Links', etc."
                        },
                        "score": {
                            "type": "NUMBER",
                            "description": "Intensity of this feature from 0 to 100"
                        },
                        "description": {
                            "type": "STRING",
                            "description": "Detailed observation of this feature"
                        }
                    },
                    "required": ["name", "score", "description"]
                }
            },
            "recommendation": {
                "type": "STRING",
                "description": "Advice for the user (e.g., 'Delete immediately', 'Safe to open')"
            }
        },
        "required": ["type", "confidence", "explanation", "features", "recommendation"]
    })
}

pub fn build_request(content: &str, subject: &str) -> GenerateContentRequest {
    GenerateContentRequest {
        contents: vec![RequestContent {
            role: "user".into(),
            parts: vec![Part {
                text: build_prompt(content, subject),
            }],
        }],
        generation_config: GenerationConfig {
            response_mime_type: "application/json".into(),
            response_schema: response_schema(),
        },
    }
}

pub async fn parse_response(response: Response) -> Result<ModelVerdict, ClassificationError> {
    let completion: GenerateContentResponse = response.json().await?;
    extract_verdict(completion)
}

pub fn extract_verdict(
    completion: GenerateContentResponse,
) -> Result<ModelVerdict, ClassificationError> {
    let text = completion
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|part| part.text)
                .collect::<String>()
        })
        .filter(|text| !text.trim().is_empty())
        .ok_or(ClassificationError::EmptyResponse)?;

    let verdict: ModelVerdict = serde_json::from_str(&text)?;
    Ok(verdict)
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<RequestContent>,
    pub generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
pub struct RequestContent {
    pub role: String,
    pub parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
pub struct Part {
    pub text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub response_mime_type: String,
    pub response_schema: Value,
}

#[derive(Debug, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
pub struct Candidate {
    pub content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
pub struct CandidatePart {
    pub text: Option<String>,
}
