use crate::{
    ai::{ClassificationError, Classifier},
    domain::ClassificationResult,
};

pub const FAILURE_MESSAGE: &str =
    "Failed to analyze email. Please check your network or API configuration.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Submitting,
    Succeeded,
    Failed,
}

/// Inputs captured when a submission is admitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingClassification {
    pub subject: String,
    pub content: String,
}

/// Everything the user can see, for the lifetime of one run.
///
/// History is newest first and never trimmed.
#[derive(Debug, Clone, Default)]
pub struct Session {
    subject: String,
    content: String,
    busy: bool,
    current_result: Option<ClassificationResult>,
    history: Vec<ClassificationResult>,
    error: Option<String>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn current_result(&self) -> Option<&ClassificationResult> {
        self.current_result.as_ref()
    }

    pub fn history(&self) -> &[ClassificationResult] {
        &self.history
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn set_subject(&mut self, subject: impl Into<String>) {
        self.subject = subject.into();
    }

    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
    }

    pub fn subject_mut(&mut self) -> &mut String {
        &mut self.subject
    }

    pub fn content_mut(&mut self) -> &mut String {
        &mut self.content
    }

    pub fn phase(&self) -> Phase {
        if self.busy {
            Phase::Submitting
        } else if self.error.is_some() {
            Phase::Failed
        } else if self.current_result.is_some() {
            Phase::Succeeded
        } else {
            Phase::Idle
        }
    }

    pub fn can_submit(&self) -> bool {
        !self.busy && !self.content.trim().is_empty()
    }

    /// Admits a submission, or returns `None` and leaves the state alone.
    pub fn begin_submit(&mut self) -> Option<PendingClassification> {
        if !self.can_submit() {
            return None;
        }
        self.error = None;
        self.busy = true;
        tracing::debug!(target: "session", "submission admitted");
        Some(PendingClassification {
            subject: self.subject.clone(),
            content: self.content.clone(),
        })
    }

    /// Applies the outcome of the call started by `begin_submit`.
    pub fn complete(&mut self, outcome: Result<ClassificationResult, ClassificationError>) {
        match outcome {
            Ok(result) => {
                tracing::info!(
                    target: "session",
                    id = %result.id,
                    kind = %result.kind,
                    history = self.history.len() + 1,
                    "classification stored"
                );
                self.history.insert(0, result.clone());
                self.current_result = Some(result);
            }
            Err(err) => {
                tracing::warn!(target: "session", error = %err, "classification failed");
                self.error = Some(FAILURE_MESSAGE.to_string());
            }
        }
        self.busy = false;
    }

    /// Runs a whole submission inline. Returns `false` when the guard rejected it.
    pub async fn submit(&mut self, classifier: &dyn Classifier) -> bool {
        let Some(pending) = self.begin_submit() else {
            return false;
        };
        let outcome = classifier
            .classify(&pending.content, &pending.subject)
            .await;
        self.complete(outcome);
        true
    }

    pub fn select_from_history(&mut self, item: &ClassificationResult) {
        self.subject = item.subject.clone();
        self.content = item.content.clone();
        self.current_result = Some(item.clone());
    }

    pub fn select_history_at(&mut self, index: usize) -> bool {
        match self.history.get(index).cloned() {
            Some(item) => {
                self.select_from_history(&item);
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self) {
        self.subject.clear();
        self.content.clear();
        self.current_result = None;
        self.error = None;
    }
}
