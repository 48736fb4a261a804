use crate::error::{GatewayError, Result};
use crate::models::question::QuestionRecord;
use crate::services::gateway::{AiGateway, OutputMode};
use serde::Serialize;
use std::sync::Arc;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SessionDetail<'a> {
    question: &'a str,
    user_answer: &'a str,
    feedback: &'a str,
    score: Option<u8>,
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Clone)]
pub struct SummaryService {
    gateway: Arc<dyn AiGateway>,
}

impl SummaryService {
    pub fn new(gateway: Arc<dyn AiGateway>) -> Self {
        Self { gateway }
    }

    pub async fn summarize(
        &self,
        records: &[QuestionRecord],
        average_score: Option<f64>,
    ) -> Result<String> {
        let prompt = summary_prompt(records, average_score)?;
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

/// "7.5/10", or "N/A" when nothing was scored.
pub fn format_average(average_score: Option<f64>) -> String {
    match average_score {
        Some(avg) if avg.is_finite() => format!("{:.1}/10", avg),
        _ => "N/A".to_string(),
    }
}

pub fn summary_prompt(records: &[QuestionRecord], average_score: Option<f64>) -> Result<String> {
    let details: Vec<SessionDetail<'_>> = records
        .iter()
        .map(|q| SessionDetail {
            question: &q.prompt,
            user_answer: &q.user_answer,
            feedback: &q.feedback,
            score: q.score,
            kind: q.kind.as_str(),
        })
        .collect();

    Ok(format!(
        "Based on the following front-end interview session details (questions, user answers, and individual AI feedback/scores), \
provide an overall summary of the candidate's performance. \
Highlight strengths, areas for improvement, and give a final overall impression. \
The average score for the session was {}.\n\nSession Details:\n{}\n",
        format_average(average_score),
        serde_json::to_string_pretty(&details)?
    ))
}
