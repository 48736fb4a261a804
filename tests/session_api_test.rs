mod common;

use axum::{http::StatusCode, Router};
use common::{send, ScriptedGateway};
use interview_coach::error::GatewayError;
use interview_coach::{build_router, AppState};
use serde_json::json;
use std::sync::Arc;

fn app_with(gateway: Arc<ScriptedGateway>) -> Router {
    build_router(AppState::with_gateway(gateway, 10, false))
}

async fn generated_app() -> (Router, Arc<ScriptedGateway>) {
    let gateway = Arc::new(ScriptedGateway::new());
    let app = app_with(gateway.clone());
    let (status, body) = send(
        &app,
        "POST",
        "/api/session/questions",
        Some(json!({ "job_category": "React Developer" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    (app, gateway)
}

#[tokio::test]
async fn health_and_catalogs() {
    let app = app_with(Arc::new(ScriptedGateway::new()));

    let (status, body) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let (_, categories) = send(&app, "GET", "/api/job-categories", None).await;
    let categories = categories.as_array().unwrap();
    assert_eq!(categories.len(), 18);
    assert!(categories.contains(&json!("React Developer")));

    let (_, languages) = send(&app, "GET", "/api/explainer/languages", None).await;
    assert_eq!(languages[0], json!({ "value": "javascript", "label": "JavaScript" }));
    assert!(languages
        .as_array()
        .unwrap()
        .contains(&json!({ "value": "c++", "label": "C++" })));
}

#[tokio::test]
async fn interview_flow_end_to_end() {
    let (app, gateway) = generated_app().await;

    let (_, session) = send(&app, "GET", "/api/session", None).await;
    assert_eq!(session["job_category"], "React Developer");
    assert_eq!(session["questions"].as_array().unwrap().len(), 10);
    assert_eq!(session["progress"]["total"], 10);
    assert_eq!(session["progress"]["average_score"], json!(null));
    assert_eq!(session["questions"][5]["type"], "mcq");
    assert_eq!(session["questions"][5]["correct_answer"], "gamma");

    let (status, session) = send(
        &app,
        "PATCH",
        "/api/session/questions/0/answer",
        Some(json!({ "answer": "useState returns a state pair" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(session["progress"]["answered"], 1);

    let (status, session) = send(&app, "POST", "/api/session/questions/0/review", None).await;
    assert_eq!(status, StatusCode::OK, "{}", session);
    assert_eq!(session["questions"][0]["feedback"], "Clear and accurate.");
    assert_eq!(session["questions"][0]["score"], 8);
    assert_eq!(session["questions"][0]["feedback_expanded"], true);
    assert_eq!(session["questions"][1]["feedback"], "");
    assert_eq!(session["progress"]["reviewed"], 1);
    assert_eq!(session["progress"]["average_score"], 8.0);

    let (_, session) = send(&app, "POST", "/api/session/questions/0/feedback/toggle", None).await;
    assert_eq!(session["questions"][0]["feedback_expanded"], false);

    let before = gateway.calls();
    let (_, session) = send(&app, "POST", "/api/session/questions/0/model-answer", None).await;
    assert_eq!(session["questions"][0]["model_answer"], "A concise model answer.");
    assert_eq!(session["questions"][0]["model_answer_visible"], true);
    let (_, session) = send(&app, "POST", "/api/session/questions/0/model-answer", None).await;
    assert_eq!(session["questions"][0]["model_answer_visible"], false);
    assert_eq!(gateway.calls(), before + 1);

    let (status, session) = send(&app, "POST", "/api/session/summary", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(session["overall_summary"], "Overall a strong session.");

    let (status, session) = send(&app, "DELETE", "/api/session/questions/9", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(session["questions"].as_array().unwrap().len(), 9);
    assert_eq!(session["overall_summary"], "");

    let (_, session) = send(&app, "DELETE", "/api/session", None).await;
    assert!(session["questions"].as_array().unwrap().is_empty());
    assert_eq!(session["job_category"], "");
    assert_eq!(session["progress"]["all_reviewed"], false);
}

#[tokio::test]
async fn blank_inputs_are_rejected_without_calls() {
    let (app, gateway) = generated_app().await;
    let calls = gateway.calls();

    let (status, body) = send(
        &app,
        "POST",
        "/api/session/questions",
        Some(json!({ "job_category": "   " })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("job category"));

    let (status, body) = send(&app, "POST", "/api/session/questions/2/review", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Please provide an answer before reviewing.");

    let (status, _) = send(
        &app,
        "POST",
        "/api/explainer",
        Some(json!({ "code": "", "language": "python" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, session) = send(&app, "GET", "/api/session", None).await;
    assert_eq!(session["questions"].as_array().unwrap().len(), 10);
    assert_eq!(session["error"], "Please provide an answer before reviewing.");
    assert_eq!(gateway.calls(), calls);
}

#[tokio::test]
async fn out_of_range_index_is_not_found() {
    let (app, _) = generated_app().await;

    for (method, uri) in [
        ("POST", "/api/session/questions/10/review"),
        ("POST", "/api/session/questions/10/model-answer"),
        ("POST", "/api/session/questions/10/feedback/toggle"),
        ("DELETE", "/api/session/questions/10"),
    ] {
        let (status, _) = send(&app, method, uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{} {}", method, uri);
    }
    let (status, _) = send(
        &app,
        "PATCH",
        "/api/session/questions/42/answer",
        Some(json!({ "answer": "x" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn gateway_failures_surface_as_bad_gateway() {
    let gateway = Arc::new(ScriptedGateway::failing(GatewayError::Remote(
        "API key not valid".into(),
    )));
    let app = app_with(gateway);

    let (status, body) = send(
        &app,
        "POST",
        "/api/session/questions",
        Some(json!({ "job_category": "Web Developer" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"], "API Error: API key not valid");

    let (_, session) = send(&app, "GET", "/api/session", None).await;
    assert_eq!(session["generating"], false);
    assert_eq!(session["error"], "API Error: API key not valid");
    assert!(session["questions"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn explainer_round_trip() {
    let app = app_with(Arc::new(ScriptedGateway::new()));

    let (status, state) = send(
        &app,
        "POST",
        "/api/explainer",
        Some(json!({ "code": "const x = 1;" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{}", state);
    assert_eq!(state["language"], "javascript");
    assert_eq!(state["explanation"], "Explanation of const x = 1;");
    assert_eq!(state["pending"], false);

    let (status, _) = send(
        &app,
        "POST",
        "/api/explainer",
        Some(json!({ "code": "x", "language": "cobol" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, state) = send(&app, "GET", "/api/explainer", None).await;
    assert_eq!(state["explanation"], "Explanation of const x = 1;");
    assert_eq!(state["error"], "Unsupported language: cobol");
}
