pub mod config;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::services::{
    explainer_service::CodeExplainer, gateway::AiGateway, gateway::GeminiGateway,
    session_service::SessionController,
};
use axum::{
    routing::{delete, get, patch, post},
    Router,
};
use reqwest::Client;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub session: Arc<SessionController>,
    pub explainer: Arc<CodeExplainer>,
}

impl AppState {
    pub fn new(config: &Config) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.http_timeout_secs))
            .build()
            .map_err(|e| Error::Internal(format!("Failed to build HTTP client: {}", e)))?;
        let gateway = GeminiGateway::from_config(config, http_client)?;
        tracing::info!(endpoint = %gateway.endpoint(), "Gemini gateway configured");

        Ok(Self::with_gateway(
            Arc::new(gateway),
            config.max_generated_questions,
            config.shuffle_options,
        ))
    }

    pub fn with_gateway(
        gateway: Arc<dyn AiGateway>,
        max_generated_questions: usize,
        shuffle_options: bool,
    ) -> Self {
        Self {
            session: Arc::new(SessionController::new(
                gateway.clone(),
                max_generated_questions,
                shuffle_options,
            )),
            explainer: Arc::new(CodeExplainer::new(gateway)),
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    let session_api = Router::new()
        .route(
            "/api/session",
            get(routes::session::get_session).delete(routes::session::clear_session),
        )
        .route(
            "/api/session/questions",
            post(routes::session::generate_questions),
        )
        .route(
            "/api/session/questions/:index",
            delete(routes::session::delete_question),
        )
        .route(
            "/api/session/questions/:index/answer",
            patch(routes::session::update_answer),
        )
        .route(
            "/api/session/questions/:index/review",
            post(routes::session::review_answer),
        )
        .route(
            "/api/session/questions/:index/model-answer",
            post(routes::session::model_answer),
        )
        .route(
            "/api/session/questions/:index/feedback/toggle",
            post(routes::session::toggle_feedback),
        )
        .route(
            "/api/session/summary",
            post(routes::session::overall_summary),
        )
        .route(
            "/api/job-categories",
            get(routes::catalog::list_job_categories),
        );

    let explainer_api = Router::new()
        .route(
            "/api/explainer",
            get(routes::explainer::get_explainer).post(routes::explainer::explain_code),
        )
        .route(
            "/api/explainer/languages",
            get(routes::explainer::list_languages),
        );

    Router::new()
        .route("/health", get(routes::health::health))
        .merge(session_api)
        .merge(explainer_api)
        .with_state(state)
}
