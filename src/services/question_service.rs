use crate::error::{GatewayError, Result};
use crate::models::question::{GeneratedQuestion, QuestionBody};
use crate::services::gateway::{AiGateway, OutputMode};
use rand::seq::SliceRandom;
use serde_json::Value as JsonValue;
use std::sync::Arc;

pub const OPEN_ENDED_PER_SET: usize = 5;
pub const MULTIPLE_CHOICE_PER_SET: usize = 5;

/// Quick-select roles offered next to the free-text category input.
pub const COMMON_JOB_CATEGORIES: &[&str] = &[
    "Web Developer",
    "Front-End Developer",
    "React Developer",
    "Angular Developer",
    "Vue.js Developer",
    "Full-Stack Developer (Front-End Focus)",
    "UI/UX Developer",
    "JavaScript Developer",
    "Senior Front-End Engineer",
    "Associate Front-End Developer",
    "Front-End Architect",
    "Mobile Front-End Developer",
    "E-commerce Front-End Developer",
    "WordPress Front-End Developer",
    "Shopify Front-End Developer",
    "Svelte Developer",
    "Next.js Developer",
    "TypeScript Front-End Developer",
];

#[derive(Clone)]
pub struct QuestionService {
    gateway: Arc<dyn AiGateway>,
    max_questions: usize,
    shuffle_options: bool,
}

impl QuestionService {
    pub fn new(gateway: Arc<dyn AiGateway>, max_questions: usize, shuffle_options: bool) -> Self {
        Self {
            gateway,
            max_questions,
            shuffle_options,
        }
    }

    /// Requests one question set for `job_category`. The category must already be validated.
    pub async fn generate(&self, job_category: &str) -> Result<Vec<(String, QuestionBody)>> {
        let prompt = generation_prompt(job_category);
        let mode = OutputMode::StructuredJson {
            schema: generation_schema(),
        };

        let raw = self.gateway.invoke(&prompt, &mode).await?.into_json()?;
        let mut rng = rand::thread_rng();
        let questions = sanitize_questions(&raw, self.max_questions, self.shuffle_options, &mut rng);
        tracing::info!(
            job_category,
            received = raw.as_array().map(|a| a.len()).unwrap_or(0),
            kept = questions.len(),
            "Question set sanitized"
        );

        if questions.is_empty() {
            return Err(GatewayError::InvalidJson(
                "response contained no usable questions".to_string(),
            )
            .into());
        }
        Ok(questions)
    }
}

pub fn generation_prompt(job_category: &str) -> String {
    format!(
        "Generate {open} common front-end interview questions for a \"{role}\" role (open-ended type), \
and {mcq} multiple-choice questions (MCQs) for the same role. \
For MCQs, provide 4 distinct options and indicate the correct answer. \
Provide the output as a JSON array where each object has a 'type' property ('open-ended' or 'mcq'). \
If 'open-ended', include a 'question' property. \
If 'mcq', include 'question', 'options' (array of strings), and 'correctAnswer' (string, one of the options).",
        open = OPEN_ENDED_PER_SET,
        mcq = MULTIPLE_CHOICE_PER_SET,
        role = job_category.trim(),
    )
}

pub fn generation_schema() -> JsonValue {
    serde_json::json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "type": { "type": "STRING", "enum": ["open-ended", "mcq"] },
                "question": { "type": "STRING" },
                "options": { "type": "ARRAY", "items": { "type": "STRING" } },
                "correctAnswer": { "type": "STRING" }
            },
            "required": ["type", "question"]
        }
    })
}

/// Keeps the structurally valid items of a generated batch, in order.
pub fn sanitize_questions(
    raw: &JsonValue,
    max_questions: usize,
    shuffle_options: bool,
    rng: &mut impl rand::Rng,
) -> Vec<(String, QuestionBody)> {
    let items = if let Some(arr) = raw.as_array() {
        arr.as_slice()
    } else if let Some(arr) = raw.get("questions").and_then(|a| a.as_array()) {
        arr.as_slice()
    } else {
        &[]
    };

    items
        .iter()
        .filter_map(|val| serde_json::from_value::<GeneratedQuestion>(val.clone()).ok())
        .filter_map(|q| coerce_question(q, shuffle_options, &mut *rng))
        .take(max_questions)
        .collect()
}

fn coerce_question(
    q: GeneratedQuestion,
    shuffle_options: bool,
    rng: &mut impl rand::Rng,
) -> Option<(String, QuestionBody)> {
    let text = q.question.trim().to_string();
    if text.is_empty() {
        return None;
    }

    let body = match q.kind.trim() {
        "open-ended" => QuestionBody::OpenEnded,
        "mcq" => {
            let mut options: Vec<String> = q
                .options
                .unwrap_or_default()
                .into_iter()
                .map(|o| o.trim().to_string())
                .filter(|o| !o.is_empty())
                .collect();
            let correct_answer = q.correct_answer?.trim().to_string();
            if !options.contains(&correct_answer) {
                tracing::warn!(question = %text, "Dropping MCQ whose correct answer is not an option");
                return None;
            }
            if shuffle_options {
                options.shuffle(rng);
            }
            QuestionBody::MultipleChoice {
                options,
                correct_answer,
            }
        }
        other => {
            tracing::warn!(kind = other, "Dropping question of unknown type");
            return None;
        }
    };
    Some((text, body))
}
