use crate::error::{Error, Result};
use crate::models::question::{QuestionBody, QuestionRecord, RecordId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identity of a record at the moment a request for it was issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordTicket {
    pub id: RecordId,
    pub revision: u64,
}

/// What happened to a response when it was merged back into the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    Applied,
    /// The answer was edited after the request went out.
    Stale,
    /// The record was deleted or the session replaced.
    Missing,
}

/// Interview session snapshot. Every transition borrows the current value and
/// returns the next one; the session controller owns the only mutable slot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    pub session_id: Option<Uuid>,
    pub job_category: String,
    pub questions: Vec<QuestionRecord>,
    pub overall_summary: String,
    pub generating: bool,
    pub summarizing: bool,
    pub error: Option<String>,
    pub generated_at: Option<DateTime<Utc>>,
    #[serde(skip)]
    next_id: u64,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn record_at(&self, index: usize) -> Result<&QuestionRecord> {
        self.questions.get(index).ok_or_else(|| {
            Error::NotFound(format!(
                "No question at index {} (session has {} questions)",
                index,
                self.questions.len()
            ))
        })
    }

    pub fn position_of(&self, id: RecordId) -> Option<usize> {
        self.questions.iter().position(|q| q.id == id)
    }

    pub fn find(&self, id: RecordId) -> Option<&QuestionRecord> {
        self.questions.iter().find(|q| q.id == id)
    }

    pub fn ticket_at(&self, index: usize) -> Result<RecordTicket> {
        let record = self.record_at(index)?;
        Ok(RecordTicket {
            id: record.id,
            revision: record.revision,
        })
    }

    pub fn record_ids(&self) -> Vec<RecordId> {
        self.questions.iter().map(|q| q.id).collect()
    }

    pub fn answered_count(&self) -> usize {
        self.questions.iter().filter(|q| q.is_answered()).count()
    }

    pub fn reviewed_count(&self) -> usize {
        self.questions.iter().filter(|q| q.is_reviewed()).count()
    }

    /// Gate for offering the overall summary.
    pub fn all_reviewed(&self) -> bool {
        !self.questions.is_empty() && self.reviewed_count() == self.questions.len()
    }

    /// Mean of the scores present; `None` when nothing has been scored yet.
    pub fn average_score(&self) -> Option<f64> {
        let scores: Vec<f64> = self
            .questions
            .iter()
            .filter_map(|q| q.score.map(f64::from))
            .collect();
        if scores.is_empty() {
            return None;
        }
        Some(scores.iter().sum::<f64>() / scores.len() as f64)
    }

    pub fn with_error(&self, message: impl Into<String>) -> Self {
        let mut next = self.clone();
        next.error = Some(message.into());
        next
    }

    pub fn with_generating(&self, job_category: &str) -> Self {
        let mut next = self.clone();
        next.job_category = job_category.to_string();
        next.generating = true;
        next.error = None;
        next
    }

    pub fn with_generation_failed(&self, message: impl Into<String>) -> Self {
        let mut next = self.with_error(message);
        next.generating = false;
        next
    }

    /// Installs a freshly generated batch, replacing every prior record.
    pub fn with_questions(&self, job_category: &str, batch: Vec<(String, QuestionBody)>) -> Self {
        let mut next = self.clone();
        next.job_category = job_category.to_string();
        let mut next_id = self.next_id;
        next.questions = batch
            .into_iter()
            .map(|(prompt, body)| {
                next_id += 1;
                QuestionRecord::new(RecordId(next_id), prompt, body)
            })
            .collect();
        next.next_id = next_id;
        next.overall_summary.clear();
        next.generating = false;
        next.error = None;
        next.session_id = Some(Uuid::new_v4());
        next.generated_at = Some(Utc::now());
        next
    }

    /// Empties the session. Ids keep counting so late responses never match a new record.
    /// A generation or summary still in flight stays marked as such.
    pub fn cleared(&self) -> Self {
        Self {
            next_id: self.next_id,
            generating: self.generating,
            summarizing: self.summarizing,
            ..Self::default()
        }
    }

    pub fn with_answer(&self, index: usize, answer: String) -> Result<Self> {
        self.record_at(index)?;
        let mut next = self.clone();
        next.questions[index].set_answer(answer);
        Ok(next)
    }

    pub fn with_feedback_toggled(&self, index: usize) -> Result<Self> {
        self.record_at(index)?;
        let mut next = self.clone();
        let record = &mut next.questions[index];
        record.feedback_expanded = !record.feedback_expanded;
        Ok(next)
    }

    pub fn without_question(&self, index: usize) -> Result<Self> {
        self.record_at(index)?;
        let mut next = self.clone();
        next.questions.remove(index);
        next.overall_summary.clear();
        Ok(next)
    }

    pub fn with_review_pending(&self, id: RecordId, pending: bool) -> Self {
        self.update_record(id, |q| q.review_pending = pending)
    }

    pub fn with_model_answer_pending(&self, id: RecordId, pending: bool) -> Self {
        self.update_record(id, |q| q.model_answer_pending = pending)
    }

    pub fn with_model_answer_toggled(&self, id: RecordId) -> Self {
        self.update_record(id, |q| q.model_answer_visible = !q.model_answer_visible)
    }

    /// Merges a review into the record the request was issued for.
    pub fn with_review(
        &self,
        ticket: RecordTicket,
        feedback: String,
        score: Option<u8>,
    ) -> (Self, MergeOutcome) {
        let outcome = self.check_ticket(ticket);
        if outcome != MergeOutcome::Applied {
            return (self.clone(), outcome);
        }
        let next = self.update_record(ticket.id, |q| {
            q.feedback = feedback;
            q.score = score;
            q.feedback_expanded = true;
            q.reviewed_at = Some(Utc::now());
        });
        (next, outcome)
    }

    pub fn with_model_answer(&self, ticket: RecordTicket, text: String) -> (Self, MergeOutcome) {
        let outcome = self.check_ticket(ticket);
        if outcome != MergeOutcome::Applied {
            return (self.clone(), outcome);
        }
        let next = self.update_record(ticket.id, |q| {
            q.model_answer = text;
            q.model_answer_visible = true;
        });
        (next, outcome)
    }

    pub fn with_summarizing(&self, summarizing: bool) -> Self {
        let mut next = self.clone();
        next.summarizing = summarizing;
        if summarizing {
            next.error = None;
        }
        next
    }

    /// Stores a summary only if it was computed over the records still present.
    pub fn with_summary(&self, covered: &[RecordId], summary: String) -> (Self, MergeOutcome) {
        if self.record_ids() != covered {
            return (self.clone(), MergeOutcome::Missing);
        }
        let mut next = self.clone();
        next.overall_summary = summary;
        (next, MergeOutcome::Applied)
    }

    fn check_ticket(&self, ticket: RecordTicket) -> MergeOutcome {
        match self.find(ticket.id) {
            None => MergeOutcome::Missing,
            Some(q) if q.revision != ticket.revision => MergeOutcome::Stale,
            Some(_) => MergeOutcome::Applied,
        }
    }

    fn update_record(&self, id: RecordId, f: impl FnOnce(&mut QuestionRecord)) -> Self {
        let mut next = self.clone();
        if let Some(record) = next.questions.iter_mut().find(|q| q.id == id) {
            f(record);
        }
        next
    }
}
