use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Verdict label reported by the model.
///
/// Labels outside the four known ones are kept verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ClassificationType {
    Spam,
    Ham,
    Phishing,
    Unsure,
    Other(String),
}

impl ClassificationType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Spam => "SPAM",
            Self::Ham => "HAM",
            Self::Phishing => "PHISHING",
            Self::Unsure => "UNSURE",
            Self::Other(raw) => raw,
        }
    }

    /// Spam and phishing get the warning treatment in the UI.
    pub fn is_danger(&self) -> bool {
        matches!(self, Self::Spam | Self::Phishing)
    }
}

impl From<String> for ClassificationType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "SPAM" => Self::Spam,
            "HAM" => Self::Ham,
            "PHISHING" => Self::Phishing,
            "UNSURE" => Self::Unsure,
            _ => Self::Other(value),
        }
    }
}

impl From<ClassificationType> for String {
    fn from(value: ClassificationType) -> Self {
        match value {
            ClassificationType::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for ClassificationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpamFeature {
    pub name: String,
    pub score: f64,
    pub description: String,
}

/// The part of a classification produced by the model itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelVerdict {
    #[serde(rename = "type")]
    pub kind: ClassificationType,
    pub confidence: f64,
    pub explanation: String,
    pub features: Vec<SpamFeature>,
    pub recommendation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub subject: String,
    pub content: String,
    #[serde(rename = "type")]
    pub kind: ClassificationType,
    pub confidence: f64,
    pub explanation: String,
    pub features: Vec<SpamFeature>,
    pub recommendation: String,
}

impl ClassificationResult {
    /// Stamps a model verdict with a fresh id and the current time.
    pub fn from_verdict(verdict: ModelVerdict, subject: String, content: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            subject,
            content,
            kind: verdict.kind,
            confidence: verdict.confidence,
            explanation: verdict.explanation,
            features: verdict.features,
            recommendation: verdict.recommendation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_labels_map_to_variants() {
        let kind: ClassificationType = serde_json::from_str("\"PHISHING\"").unwrap();
        assert_eq!(kind, ClassificationType::Phishing);
        assert!(kind.is_danger());
    }

    #[test]
    fn unknown_label_passes_through() {
        let kind: ClassificationType = serde_json::from_str("\"MARKETING\"").unwrap();
        assert_eq!(kind, ClassificationType::Other("MARKETING".into()));
        assert_eq!(serde_json::to_string(&kind).unwrap(), "\"MARKETING\"");
        assert!(!kind.is_danger());
    }

    #[test]
    fn out_of_range_scores_are_kept() {
        let verdict: ModelVerdict = serde_json::from_str(
            r#"{"type":"SPAM","confidence":140,"explanation":"e",
                "features":[{"name":"Links","score":-5,"description":"d"}],
                "recommendation":"r"}"#,
        )
        .unwrap();
        assert_eq!(verdict.confidence, 140.0);
        assert_eq!(verdict.features[0].score, -5.0);
    }

    #[test]
    fn from_verdict_keeps_inputs_and_assigns_fresh_ids() {
        let verdict = ModelVerdict {
            kind: ClassificationType::Ham,
            confidence: 12.0,
            explanation: "newsletter".into(),
            features: vec![],
            recommendation: "Safe to open".into(),
        };
        let a = ClassificationResult::from_verdict(verdict.clone(), "Hi".into(), "Body".into());
        let b = ClassificationResult::from_verdict(verdict, "Hi".into(), "Body".into());
        assert_eq!(a.subject, "Hi");
        assert_eq!(a.content, "Body");
        assert_eq!(a.kind, ClassificationType::Ham);
        assert_ne!(a.id, b.id);
    }
}
