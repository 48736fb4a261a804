use axum::{extract::State, response::Json};
use validator::Validate;

use crate::dto::session_dto::{ExplainCodeRequest, LanguageOption};
use crate::error::Result;
use crate::models::explainer::{CodeExplainerState, CodeLanguage};
use crate::AppState;

#[axum::debug_handler]
pub async fn get_explainer(State(state): State<AppState>) -> Json<CodeExplainerState> {
    Json(state.explainer.snapshot().await)
}

#[axum::debug_handler]
pub async fn explain_code(
    State(state): State<AppState>,
    Json(payload): Json<ExplainCodeRequest>,
) -> Result<Json<CodeExplainerState>> {
    payload.validate()?;
    let language = payload
        .language
        .unwrap_or_else(|| CodeLanguage::default().tag().to_string());
    let explained = state.explainer.explain_code(&payload.code, &language).await?;
    Ok(Json(explained))
}

pub async fn list_languages() -> Json<Vec<LanguageOption>> {
    Json(
        CodeLanguage::ALL
            .iter()
            .map(|lang| LanguageOption {
                value: *lang,
                label: lang.label(),
            })
            .collect(),
    )
}
