use axum::{
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde_json::json;

pub type Result<T> = std::result::Result<T, Error>;

/// Failures of a single call to the generative-language endpoint.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GatewayError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error: {0}")]
    Remote(String),

    #[error("Unexpected API response structure")]
    MalformedResponse,

    #[error("Invalid JSON in model output: {0}")]
    InvalidJson(String),
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Message shown to the user next to the action that failed.
    pub fn user_message(&self) -> String {
        match self {
            Error::BadRequest(msg) | Error::NotFound(msg) => msg.clone(),
            Error::Validation(err) => validation_message(err),
            Error::Gateway(GatewayError::Network(_)) => {
                "Could not reach the AI service. Please check your network connection and try again."
                    .to_string()
            }
            Error::Gateway(GatewayError::Remote(msg)) => format!("API Error: {}", msg),
            Error::Gateway(GatewayError::MalformedResponse) => {
                "Unexpected API response structure. Please try again.".to_string()
            }
            Error::Gateway(GatewayError::InvalidJson(_)) => {
                "The AI returned data in an unexpected format. Please try again.".to_string()
            }
            other => other.to_string(),
        }
    }
}

fn validation_message(errors: &validator::ValidationErrors) -> String {
    errors
        .field_errors()
        .values()
        .flat_map(|errs| errs.iter())
        .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
        .unwrap_or_else(|| errors.to_string())
}

impl IntoResponse for Error {
    fn into_response(self) -> axum::response::Response {
        let status = match &self {
            Error::BadRequest(_) | Error::Validation(_) | Error::Json(_) => StatusCode::BAD_REQUEST,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::Gateway(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let error_message = match &self {
            Error::Config(_) | Error::Internal(_) | Error::Io(_) | Error::Anyhow(_) => {
                tracing::error!(error = %self, "request failed");
                "An unexpected error occurred".to_string()
            }
            _ => self.user_message(),
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
