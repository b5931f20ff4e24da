// src/handlers/status.rs
use crate::AppState;
use axum::{extract::Extension, response::Json, routing::get, Router};
use serde_json::{json, Value};
use std::sync::Arc;

pub fn status_routes() -> Router {
    Router::new()
        .route("/", get(home))
        .route("/api/status", get(api_status))
}

async fn home() -> Json<Value> {
    Json(json!({"mensaje": "Servidor de NutriApp corriendo correctamente."}))
}

async fn api_status(Extension(state): Extension<Arc<AppState>>) -> Json<Value> {
    let db_status = match state.store.ping().await {
        Ok(_) => "healthy",
        Err(e) => {
            tracing::warn!("store health check failed: {}", e);
            "unhealthy"
        }
    };

    let (assistant_status, model, active_sessions) = match state.assistant.as_ref() {
        Some(assistant) => (
            "configured",
            Some(assistant.model_name().to_string()),
            assistant.sessions().active_sessions().await,
        ),
        None => ("not_configured", None, 0),
    };

    let regression_status = if state.regression.snapshot().await.is_some() {
        "trained"
    } else {
        "untrained"
    };

    Json(json!({
        "status": "operational",
        "version": env!("CARGO_PKG_VERSION"),
        "services": {
            "store": {
                "backend": state.store.backend_name(),
                "status": db_status
            },
            "assistant": {
                "status": assistant_status,
                "model": model,
                "active_sessions": active_sessions
            },
            "calorie_model": regression_status
        }
    }))
}
