use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of a record within the process. Positions shift on delete, ids never do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub u64);

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "q{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuestionKind {
    #[serde(rename = "open-ended")]
    OpenEnded,
    #[serde(rename = "mcq")]
    MultipleChoice,
}

impl QuestionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionKind::OpenEnded => "open-ended",
            QuestionKind::MultipleChoice => "mcq",
        }
    }
}

/// Question as returned by the model, before sanitization.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedQuestion {
    #[serde(rename = "type")]
    pub kind: String,
    pub question: String,
    #[serde(default)]
    pub options: Option<Vec<String>>,
    #[serde(default)]
    pub correct_answer: Option<String>,
}

/// Validated question content: kind-specific data lives with its kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuestionBody {
    OpenEnded,
    MultipleChoice {
        options: Vec<String>,
        correct_answer: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionRecord {
    pub id: RecordId,
    #[serde(rename = "type")]
    pub kind: QuestionKind,
    pub prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correct_answer: Option<String>,
    pub user_answer: String,
    pub feedback: String,
    pub score: Option<u8>,
    pub model_answer: String,
    pub review_pending: bool,
    pub model_answer_pending: bool,
    pub model_answer_visible: bool,
    pub feedback_expanded: bool,
    pub revision: u64,
    pub reviewed_at: Option<DateTime<Utc>>,
}

impl QuestionRecord {
    pub fn new(id: RecordId, prompt: String, body: QuestionBody) -> Self {
        let (kind, options, correct_answer) = match body {
            QuestionBody::OpenEnded => (QuestionKind::OpenEnded, None, None),
            QuestionBody::MultipleChoice {
                options,
                correct_answer,
            } => (
                QuestionKind::MultipleChoice,
                Some(options),
                Some(correct_answer),
            ),
        };
        Self {
            id,
            kind,
            prompt,
            options,
            correct_answer,
            user_answer: String::new(),
            feedback: String::new(),
            score: None,
            model_answer: String::new(),
            review_pending: false,
            model_answer_pending: false,
            model_answer_visible: false,
            feedback_expanded: false,
            revision: 0,
            reviewed_at: None,
        }
    }

    pub fn is_answered(&self) -> bool {
        !self.user_answer.trim().is_empty()
    }

    pub fn is_reviewed(&self) -> bool {
        !self.feedback.trim().is_empty()
    }

    pub fn has_model_answer(&self) -> bool {
        !self.model_answer.is_empty()
    }

    /// Replaces the answer and drops everything computed from the previous one.
    pub fn set_answer(&mut self, answer: String) {
        self.user_answer = answer;
        self.feedback.clear();
        self.score = None;
        self.model_answer.clear();
        self.model_answer_visible = false;
        self.feedback_expanded = false;
        self.reviewed_at = None;
        self.revision += 1;
    }
}

/// Normalizes a model-provided score into 1..=10.
pub fn normalize_score(raw: f64) -> Option<u8> {
    if !raw.is_finite() {
        return None;
    }
    Some(raw.round().clamp(1.0, 10.0) as u8)
}
