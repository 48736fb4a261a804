use axum::response::Json;

use crate::services::question_service::COMMON_JOB_CATEGORIES;

pub async fn list_job_categories() -> Json<&'static [&'static str]> {
    Json(COMMON_JOB_CATEGORIES)
}
