use crate::error::{Error, Result};
use crate::models::question::RecordId;
use crate::models::session::{MergeOutcome, SessionState};
use crate::services::gateway::AiGateway;
use crate::services::question_service::QuestionService;
use crate::services::review_service::ReviewService;
use crate::services::summary_service::SummaryService;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Owns the single mutable [`SessionState`] slot. Operations that call the model
/// validate and mark the request pending under the lock, await the gateway with
/// the lock released, then merge the response by record identity.
pub struct SessionController {
    state: Mutex<SessionState>,
    questions: QuestionService,
    reviews: ReviewService,
    summaries: SummaryService,
}

impl SessionController {
    pub fn new(gateway: Arc<dyn AiGateway>, max_questions: usize, shuffle_options: bool) -> Self {
        Self {
            state: Mutex::new(SessionState::new()),
            questions: QuestionService::new(gateway.clone(), max_questions, shuffle_options),
            reviews: ReviewService::new(gateway.clone()),
            summaries: SummaryService::new(gateway),
        }
    }

    pub async fn snapshot(&self) -> SessionState {
        self.state.lock().await.clone()
    }

    pub async fn generate_questions(&self, job_category: &str) -> Result<SessionState> {
        let job_category = job_category.trim();
        {
            let mut state = self.state.lock().await;
            if job_category.is_empty() {
                return Err(reject(
                    &mut state,
                    Error::BadRequest(
                        "Please enter a job category or select from the quick options.".to_string(),
                    ),
                ));
            }
            if state.generating {
                return Err(reject(
                    &mut state,
                    Error::BadRequest("Questions are already being generated.".to_string()),
                ));
            }
            *state = state.with_generating(job_category);
        }
        tracing::info!(job_category, "Generating question set");

        let result = self.questions.generate(job_category).await;

        let mut state = self.state.lock().await;
        match result {
            Ok(batch) => {
                *state = state.with_questions(job_category, batch);
                tracing::info!(
                    session_id = ?state.session_id,
                    questions = state.len(),
                    "Question set installed"
                );
                Ok(state.clone())
            }
            Err(e) => {
                tracing::error!(job_category, error = %e, "Question generation failed");
                *state = state.with_generation_failed(e.user_message());
                Err(e)
            }
        }
    }

    pub async fn review_answer(&self, index: usize) -> Result<SessionState> {
        let (ticket, record) = {
            let mut state = self.state.lock().await;
            let record = match state.record_at(index) {
                Ok(record) => record.clone(),
                Err(e) => return Err(reject(&mut state, e)),
            };
            if !record.is_answered() {
                return Err(reject(
                    &mut state,
                    Error::BadRequest("Please provide an answer before reviewing.".to_string()),
                ));
            }
            if record.review_pending {
                return Err(reject(
                    &mut state,
                    Error::BadRequest("This answer is already being reviewed.".to_string()),
                ));
            }
            let ticket = state.ticket_at(index)?;
            let mut next = state.with_review_pending(ticket.id, true);
            next.error = None;
            *state = next;
            (ticket, record)
        };
        tracing::info!(index, record_id = %ticket.id, kind = record.kind.as_str(), "Reviewing answer");

        let result = self.reviews.review(&record).await;

        let mut state = self.state.lock().await;
        let cleared = state.with_review_pending(ticket.id, false);
        match result {
            Ok(verdict) => {
                let (next, outcome) = cleared.with_review(ticket, verdict.feedback, verdict.score);
                log_merge("review", ticket.id, outcome);
                *state = next;
                Ok(state.clone())
            }
            Err(e) => {
                tracing::error!(record_id = %ticket.id, error = %e, "Answer review failed");
                *state = cleared.with_error(e.user_message());
                Err(e)
            }
        }
    }

    /// Toggles a cached model answer, or fetches it on first use.
    pub async fn toggle_or_fetch_model_answer(&self, index: usize) -> Result<SessionState> {
        let (ticket, question) = {
            let mut state = self.state.lock().await;
            let record = match state.record_at(index) {
                Ok(record) => record.clone(),
                Err(e) => return Err(reject(&mut state, e)),
            };
            if record.has_model_answer() {
                *state = state.with_model_answer_toggled(record.id);
                return Ok(state.clone());
            }
            if record.model_answer_pending {
                return Err(reject(
                    &mut state,
                    Error::BadRequest("The model answer is already being generated.".to_string()),
                ));
            }
            let ticket = state.ticket_at(index)?;
            let mut next = state.with_model_answer_pending(ticket.id, true);
            next.error = None;
            *state = next;
            (ticket, record.prompt)
        };
        tracing::info!(index, record_id = %ticket.id, "Fetching model answer");

        let result = self.reviews.model_answer(&question).await;

        let mut state = self.state.lock().await;
        let cleared = state.with_model_answer_pending(ticket.id, false);
        match result {
            Ok(text) => {
                let (next, outcome) = cleared.with_model_answer(ticket, text);
                log_merge("model answer", ticket.id, outcome);
                *state = next;
                Ok(state.clone())
            }
            Err(e) => {
                tracing::error!(record_id = %ticket.id, error = %e, "Model answer request failed");
                *state = cleared.with_error(e.user_message());
                Err(e)
            }
        }
    }

    pub async fn update_user_answer(&self, index: usize, answer: String) -> Result<SessionState> {
        let mut state = self.state.lock().await;
        match state.with_answer(index, answer) {
            Ok(next) => {
                *state = next;
                Ok(state.clone())
            }
            Err(e) => Err(reject(&mut state, e)),
        }
    }

    pub async fn toggle_feedback(&self, index: usize) -> Result<SessionState> {
        let mut state = self.state.lock().await;
        match state.with_feedback_toggled(index) {
            Ok(next) => {
                *state = next;
                Ok(state.clone())
            }
            Err(e) => Err(reject(&mut state, e)),
        }
    }

    pub async fn delete_question(&self, index: usize) -> Result<SessionState> {
        let mut state = self.state.lock().await;
        match state.without_question(index) {
            Ok(next) => {
                tracing::info!(index, remaining = next.len(), "Question deleted");
                *state = next;
                Ok(state.clone())
            }
            Err(e) => Err(reject(&mut state, e)),
        }
    }

    pub async fn clear_session(&self) -> SessionState {
        let mut state = self.state.lock().await;
        *state = state.cleared();
        tracing::info!("Session cleared");
        state.clone()
    }

    pub async fn generate_overall_summary(&self) -> Result<SessionState> {
        let (covered, records, average) = {
            let mut state = self.state.lock().await;
            if state.summarizing {
                return Err(reject(
                    &mut state,
                    Error::BadRequest("The summary is already being generated.".to_string()),
                ));
            }
            let snapshot = (state.record_ids(), state.questions.clone(), state.average_score());
            *state = state.with_summarizing(true);
            snapshot
        };
        tracing::info!(questions = records.len(), average = ?average, "Generating overall summary");

        let result = self.summaries.summarize(&records, average).await;

        let mut state = self.state.lock().await;
        let cleared = state.with_summarizing(false);
        match result {
            Ok(text) => {
                let (next, outcome) = cleared.with_summary(&covered, text);
                if outcome != MergeOutcome::Applied {
                    tracing::warn!("Discarding summary computed over a different question set");
                }
                *state = next;
                Ok(state.clone())
            }
            Err(e) => {
                tracing::error!(error = %e, "Overall summary failed");
                *state = cleared.with_error(e.user_message());
                Err(e)
            }
        }
    }
}

/// Records a locally detected failure as the session error.
fn reject(state: &mut SessionState, e: Error) -> Error {
    *state = state.with_error(e.user_message());
    e
}

fn log_merge(what: &str, id: RecordId, outcome: MergeOutcome) {
    match outcome {
        MergeOutcome::Applied => tracing::info!(record_id = %id, "Merged {}", what),
        MergeOutcome::Stale => {
            tracing::warn!(record_id = %id, "Discarding {} for an edited answer", what)
        }
        MergeOutcome::Missing => {
            tracing::warn!(record_id = %id, "Discarding {} for a removed question", what)
        }
    }
}
