use crate::error::{GatewayError, Result};
use crate::models::question::{normalize_score, QuestionKind, QuestionRecord};
use crate::services::gateway::{AiGateway, OutputMode};
use serde::Deserialize;
use serde_json::Value as JsonValue;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq)]
pub struct ReviewVerdict {
    pub feedback: String,
    pub score: Option<u8>,
}

#[derive(Deserialize)]
struct RawVerdict {
    feedback: String,
    score: f64,
}

/// Grades answers and fetches model answers, one record per call.
#[derive(Clone)]
pub struct ReviewService {
    gateway: Arc<dyn AiGateway>,
}

impl ReviewService {
    pub fn new(gateway: Arc<dyn AiGateway>) -> Self {
        Self { gateway }
    }

    pub async fn review(&self, record: &QuestionRecord) -> Result<ReviewVerdict> {
        let prompt = review_prompt(record);
        let mode = OutputMode::StructuredJson {
            schema: review_schema(),
        };
        let raw = self.gateway.invoke(&prompt, &mode).await?.into_json()?;
        Ok(parse_verdict(raw)?)
    }

    pub async fn model_answer(&self, question: &str) -> Result<String> {
        let prompt = model_answer_prompt(question);
        let text = self
            .gateway
            .invoke(&prompt, &OutputMode::PlainText)
            .await?
            .into_text();
        if text.trim().is_empty() {
            return Err(GatewayError::MalformedResponse.into());
        }
        Ok(text)
    }
}

pub fn review_prompt(record: &QuestionRecord) -> String {
    const SCORING: &str = "Then, give a score from 1 to 10 for the possibility of getting selected based on this answer \
(1 being very low, 10 being excellent). \
Provide the output as a JSON object with \"feedback\" (string) and \"score\" (number) properties.";

    match record.kind {
        QuestionKind::OpenEnded => format!(
            "Given the interview question: \"{}\" and the user's answer: \"{}\". \
Evaluate the user's answer. Provide concise feedback on its accuracy, completeness, and clarity. {}",
            record.prompt, record.user_answer, SCORING
        ),
        QuestionKind::MultipleChoice => format!(
            "Given the multiple-choice question: \"{}\", the correct answer is \"{}\", and the user selected: \"{}\". \
Evaluate if the user's selection is correct. Provide concise feedback on their choice. {}",
            record.prompt,
            record.correct_answer.as_deref().unwrap_or_default(),
            record.user_answer,
            SCORING
        ),
    }
}

pub fn review_schema() -> JsonValue {
    serde_json::json!({
        "type": "OBJECT",
        "properties": {
            "feedback": { "type": "STRING" },
            "score": { "type": "NUMBER" }
        },
        "propertyOrdering": ["feedback", "score"]
    })
}

pub fn model_answer_prompt(question: &str) -> String {
    format!(
        "Provide a concise and comprehensive model answer for the front-end interview question: \"{}\".",
        question
    )
}

pub fn parse_verdict(raw: JsonValue) -> std::result::Result<ReviewVerdict, GatewayError> {
    let verdict: RawVerdict =
        serde_json::from_value(raw).map_err(|e| GatewayError::InvalidJson(e.to_string()))?;
    let feedback = verdict.feedback.trim().to_string();
    if feedback.is_empty() {
        return Err(GatewayError::InvalidJson("feedback is empty".to_string()));
    }
    Ok(ReviewVerdict {
        feedback,
        score: normalize_score(verdict.score),
    })
}
