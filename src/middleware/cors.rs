use crate::error::{Error, Result};
use axum::http::HeaderValue;
use tower_http::cors::{Any, CorsLayer};

/// CORS for the browser front-end. Any origin unless one is pinned.
pub fn cors_layer(allowed_origin: Option<&str>) -> Result<CorsLayer> {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    match allowed_origin {
        None => Ok(layer.allow_origin(Any)),
        Some(origin) => {
            let origin = HeaderValue::from_str(origin.trim()).map_err(|e| {
                Error::Config(format!("Invalid value for CORS_ALLOWED_ORIGIN: {}", e))
            })?;
            Ok(layer.allow_origin(origin))
        }
    }
}
