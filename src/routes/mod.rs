//! Router assembly: HTTP endpoints, WebSocket upgrade, static files, CORS, and HTTP tracing.

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::state::AppState;

pub mod http;
pub mod ws;

/// Build the application router with:
/// - WebSocket at `/ws`
/// - JSON API under `/api/v1/...`
/// - Static SPA from `./static` with index fallback
/// - permissive CORS
/// - HTTP trace layer (per-request spans w/ method, path, status, latency)
pub fn build_router(state: Arc<AppState>) -> Router {
    let static_service = ServeDir::new("./static")
        .append_index_html_on_directories(true)
        .not_found_service(ServeFile::new("./static/index.html"));

    Router::new()
        .route("/ws", get(ws::ws_upgrade))
        .route("/api/v1/health", get(http::http_health))
        .route("/api/v1/lessons", get(http::http_list_lessons))
        .route("/api/v1/lessons/:id", get(http::http_get_lesson))
        .route("/api/v1/exercises/:id", get(http::http_get_exercise))
        .route("/api/v1/exercises/:id/hint", get(http::http_get_hint))
        .route("/api/v1/exercises/:id/solution", get(http::http_get_solution))
        .route("/api/v1/exercises/:id/submit", post(http::http_post_submit))
        .route("/api/v1/exercises/:id/progress", get(http::http_get_exercise_progress))
        .route("/api/v1/run", post(http::http_post_run))
        .route("/api/v1/progress", get(http::http_get_progress))
        .route("/api/v1/progress/reset", post(http::http_post_progress_reset))
        .with_state(state)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .fallback_service(static_service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::config::TrainerConfig;

    fn app() -> Router {
        build_router(Arc::new(AppState::with_config(TrainerConfig::default())))
    }

    async fn send(app: Router, req: Request<Body>) -> (StatusCode, Value) {
        let res = app.oneshot(req).await.unwrap();
        let status = res.status();
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    fn get_req(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn health_is_ok() {
        let (status, body) = send(app(), get_req("/api/v1/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "ok": true }));
    }

    #[tokio::test]
    async fn lessons_are_listed_in_order() {
        let (status, body) = send(app(), get_req("/api/v1/lessons")).await;
        assert_eq!(status, StatusCode::OK);
        let lessons = body.as_array().unwrap();
        assert_eq!(lessons.len(), 10);
        assert_eq!(lessons[0]["id"], "01-lean-basics");
        assert_eq!(lessons[0]["exerciseCount"], 5);
    }

    #[tokio::test]
    async fn unknown_ids_are_404_with_error_body() {
        let (status, body) = send(app(), get_req("/api/v1/lessons/nope")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Unknown lessonId: nope");
        let (status, _) = send(app(), get_req("/api/v1/exercises/ex-nope/hint")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn hint_query_index_is_clamped() {
        let (status, body) = send(app(), get_req("/api/v1/exercises/ex-01-basic-values/hint?index=50")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["index"], 2);
        assert_eq!(body["total"], 3);
    }

    #[tokio::test]
    async fn submit_then_read_progress() {
        let app = app();
        let (status, body) = send(
            app.clone(),
            post_json(
                "/api/v1/exercises/ex-01-basic-values/submit",
                json!({ "learnerId": "amy", "code": "def myNumber : Nat := 42\ndef myName : String := \"Amy\"" }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["report"]["success"], true);
        assert_eq!(body["totalPoints"], 25);
        assert_eq!(body["lessonCompleted"], false);

        let (_, progress) = send(app.clone(), get_req("/api/v1/progress?learnerId=amy")).await;
        assert_eq!(progress["totalPoints"], 25);
        assert_eq!(progress["exercises"]["ex-01-basic-values"]["completed"], true);

        let (_, ex) =
            send(app.clone(), get_req("/api/v1/exercises/ex-01-basic-values/progress?learnerId=amy")).await;
        assert_eq!(ex["attempts"], 1);
        assert_eq!(ex["lessonId"], "01-lean-basics");

        let (_, local) = send(app.clone(), get_req("/api/v1/progress")).await;
        assert_eq!(local["learnerId"], "local");
        assert_eq!(local["totalPoints"], 0);

        let (_, reset) = send(app, post_json("/api/v1/progress/reset", json!({ "learnerId": "amy" }))).await;
        assert_eq!(reset["totalPoints"], 0);
    }

    #[tokio::test]
    async fn run_reports_syntax_errors() {
        let (status, body) = send(app(), post_json("/api/v1/run", json!({ "code": "def f (x : Nat := x" }))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], false);
        assert!(!body["errors"].as_array().unwrap().is_empty());
    }
}
