use axum::{
    extract::State,
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};

use crate::languages;
use crate::state::AppState;

pub fn create_routes() -> Router<AppState> {
    Router::new()
        // WebSocket
        .route("/client-ws", get(crate::websocket::websocket_handler))
        // Health check
        .route("/api/health", get(health_check))
        // REST API routes
        .route("/api/languages", get(get_languages))
        .route("/api/app-info", get(app_info))
}

async fn health_check(State(state): State<AppState>) -> Json<Value> {
    let speech_healthy = state.speech_service.health_check().await.unwrap_or(false);
    Json(json!({
        "status": "ok",
        "speech_service": speech_healthy,
        "active_sessions": state.sessions.len(),
    }))
}

async fn get_languages() -> Json<Value> {
    Json(languages::languages_payload())
}

/// Static payload behind the landing view; it has no state of its own.
async fn app_info() -> Json<Value> {
    Json(json!({
        "name": "Verbo",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
