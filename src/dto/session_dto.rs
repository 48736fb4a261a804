use crate::models::explainer::CodeLanguage;
use crate::models::session::SessionState;
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct GenerateQuestionsRequest {
    #[validate(length(max = 200, message = "Job category is too long."))]
    pub job_category: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateAnswerRequest {
    #[validate(length(max = 20000, message = "Answer is too long."))]
    pub answer: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ExplainCodeRequest {
    #[validate(length(max = 100000, message = "Code is too long to explain in one request."))]
    pub code: String,
    #[serde(default)]
    pub language: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressView {
    pub total: usize,
    pub answered: usize,
    pub reviewed: usize,
    pub all_reviewed: bool,
    pub average_score: Option<f64>,
}

/// Session snapshot plus the counters the front-end renders next to it.
#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    #[serde(flatten)]
    pub session: SessionState,
    pub progress: ProgressView,
}

impl From<SessionState> for SessionView {
    fn from(session: SessionState) -> Self {
        let progress = ProgressView {
            total: session.len(),
            answered: session.answered_count(),
            reviewed: session.reviewed_count(),
            all_reviewed: session.all_reviewed(),
            average_score: session.average_score(),
        };
        Self { session, progress }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LanguageOption {
    pub value: CodeLanguage,
    pub label: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::question::QuestionBody;
    use serde_json::json;

    #[test]
    fn view_flattens_session_and_adds_progress() {
        let session = SessionState::new().with_questions("Web Developer", vec![
            ("Q1".to_string(), QuestionBody::OpenEnded),
            ("Q2".to_string(), QuestionBody::OpenEnded),
        ]);
        let session = session.with_answer(0, "answer".into()).unwrap();

        let value = serde_json::to_value(SessionView::from(session)).unwrap();
        assert_eq!(value["questions"].as_array().map(|q| q.len()), Some(2));
        assert_eq!(
            value["progress"],
            json!({
                "total": 2,
                "answered": 1,
                "reviewed": 0,
                "all_reviewed": false,
                "average_score": null
            })
        );
    }

    #[test]
    fn overlong_category_is_invalid() {
        let req = GenerateQuestionsRequest {
            job_category: "x".repeat(201),
        };
        assert!(req.validate().is_err());
        let req = GenerateQuestionsRequest {
            job_category: String::new(),
        };
        assert!(req.validate().is_ok());
    }
}
