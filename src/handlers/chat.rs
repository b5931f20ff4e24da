// src/handlers/chat.rs
use crate::error::AppError;
use crate::models::auth::MessageResponse;
use crate::models::chat::*;
use crate::AppState;
use axum::{
    extract::{Extension, Query},
    response::Json,
    routing::{get, post},
    Router,
};
use std::sync::Arc;

const MAX_HISTORY_LIMIT: i64 = 200;

pub fn chat_routes() -> Router {
    Router::new()
        .route("/preguntar", post(ask))
        .route("/resetear_sesion", post(reset_session))
        .route("/reset", post(reset_session))
        .route("/historial", get(get_chat_history))
}

async fn ask(
    Extension(state): Extension<Arc<AppState>>,
    Json(payload): Json<QuestionRequest>,
) -> Result<Json<AnswerResponse>, AppError> {
    let email = payload.usuario_email.trim();
    if email.is_empty() || payload.texto.trim().is_empty() {
        return Err(AppError::InvalidInput(
            "usuario_email y texto son obligatorios".to_string(),
        ));
    }

    let assistant = state
        .assistant
        .as_ref()
        .ok_or(AppError::AssistantUnavailable)?;

    tracing::info!(user = %email, chars = payload.texto.len(), "💬 question received");
    let respuesta = assistant
        .ask(state.store.as_ref(), email, &payload.texto)
        .await?;

    Ok(Json(AnswerResponse { respuesta }))
}

async fn reset_session(
    Extension(state): Extension<Arc<AppState>>,
    Query(query): Query<ResetQuery>,
    body: Option<Json<ResetRequest>>,
) -> Result<Json<MessageResponse>, AppError> {
    let email = body
        .map(|Json(request)| request.usuario_email)
        .or(query.usuario_email)
        .map(|email| email.trim().to_string())
        .filter(|email| !email.is_empty())
        .ok_or_else(|| AppError::InvalidInput("usuario_email es obligatorio".to_string()))?;

    let existed = match state.assistant.as_ref() {
        Some(assistant) => assistant.reset(&email).await,
        None => false,
    };

    let mensaje = if existed {
        "Memoria reiniciada"
    } else {
        "No hay memoria activa"
    };
    Ok(Json(MessageResponse {
        mensaje: mensaje.to_string(),
    }))
}

async fn get_chat_history(
    Extension(state): Extension<Arc<AppState>>,
    Query(params): Query<HistoryQuery>,
) -> Result<Json<HistoryResponse>, AppError> {
    let email = params.usuario_email.trim();
    if email.is_empty() {
        return Err(AppError::InvalidInput("usuario_email es obligatorio".to_string()));
    }

    let limit = params
        .limite
        .unwrap_or(state.config.chat_history_limit)
        .clamp(1, MAX_HISTORY_LIMIT);

    let historial = state.store.chat_history(email, limit).await?;

    Ok(Json(HistoryResponse {
        usuario_email: email.to_string(),
        total: historial.len(),
        historial,
    }))
}
