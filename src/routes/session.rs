use axum::{
    extract::{Path, State},
    response::Json,
};
use validator::Validate;

use crate::dto::session_dto::{GenerateQuestionsRequest, SessionView, UpdateAnswerRequest};
use crate::error::Result;
use crate::AppState;

#[axum::debug_handler]
pub async fn get_session(State(state): State<AppState>) -> Json<SessionView> {
    Json(state.session.snapshot().await.into())
}

#[axum::debug_handler]
pub async fn clear_session(State(state): State<AppState>) -> Json<SessionView> {
    Json(state.session.clear_session().await.into())
}

#[axum::debug_handler]
pub async fn generate_questions(
    State(state): State<AppState>,
    Json(payload): Json<GenerateQuestionsRequest>,
) -> Result<Json<SessionView>> {
    payload.validate()?;
    let session = state.session.generate_questions(&payload.job_category).await?;
    Ok(Json(session.into()))
}

#[axum::debug_handler]
pub async fn delete_question(
    State(state): State<AppState>,
    Path(index): Path<usize>,
) -> Result<Json<SessionView>> {
    let session = state.session.delete_question(index).await?;
    Ok(Json(session.into()))
}

#[axum::debug_handler]
pub async fn update_answer(
    State(state): State<AppState>,
    Path(index): Path<usize>,
    Json(payload): Json<UpdateAnswerRequest>,
) -> Result<Json<SessionView>> {
    payload.validate()?;
    let session = state.session.update_user_answer(index, payload.answer).await?;
    Ok(Json(session.into()))
}

#[axum::debug_handler]
pub async fn review_answer(
    State(state): State<AppState>,
    Path(index): Path<usize>,
) -> Result<Json<SessionView>> {
    let session = state.session.review_answer(index).await?;
    Ok(Json(session.into()))
}

#[axum::debug_handler]
pub async fn model_answer(
    State(state): State<AppState>,
    Path(index): Path<usize>,
) -> Result<Json<SessionView>> {
    let session = state.session.toggle_or_fetch_model_answer(index).await?;
    Ok(Json(session.into()))
}

#[axum::debug_handler]
pub async fn toggle_feedback(
    State(state): State<AppState>,
    Path(index): Path<usize>,
) -> Result<Json<SessionView>> {
    let session = state.session.toggle_feedback(index).await?;
    Ok(Json(session.into()))
}

#[axum::debug_handler]
pub async fn overall_summary(State(state): State<AppState>) -> Result<Json<SessionView>> {
    let session = state.session.generate_overall_summary().await?;
    Ok(Json(session.into()))
}
