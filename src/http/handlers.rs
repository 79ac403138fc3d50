use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::environment::{self, render_html};
use crate::health::NetCheckResponse;
use crate::http::server::AppState;

const PROMETHEUS_CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

pub async fn index(State(state): State<AppState>) -> Response {
    match environment::snapshot(state.environment.clone()).await {
        Ok(snapshot) => Html(render_html(&snapshot)).into_response(),
        Err(e) => snapshot_failed(e),
    }
}

pub async fn env_json(State(state): State<AppState>) -> Response {
    match environment::snapshot(state.environment.clone()).await {
        Ok(snapshot) => Json(snapshot).into_response(),
        Err(e) => snapshot_failed(e),
    }
}

pub async fn ping() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub async fn net_check(State(state): State<AppState>) -> Json<NetCheckResponse> {
    let report = state.prober.probe_all().await;
    Json(NetCheckResponse::from(&report))
}

pub async fn metrics(State(state): State<AppState>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, PROMETHEUS_CONTENT_TYPE)],
        state.metrics.render(),
    )
}

fn snapshot_failed(error: tokio::task::JoinError) -> Response {
    tracing::error!(error = %error, "Environment snapshot task failed");
    (StatusCode::INTERNAL_SERVER_ERROR, "Failed to collect environment").into_response()
}
