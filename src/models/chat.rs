// src/models/chat.rs
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One persisted question/answer exchange.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ChatRecord {
    pub id: i32,
    pub user_email: String,
    pub user_message: String,
    pub model_response: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Deserialize)]
pub struct QuestionRequest {
    pub usuario_email: String,
    pub texto: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AnswerResponse {
    pub respuesta: String,
}

#[derive(Debug, Deserialize)]
pub struct ResetRequest {
    pub usuario_email: String,
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub usuario_email: String,
    pub limite: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HistoryResponse {
    pub usuario_email: String,
    pub total: usize,
    pub historial: Vec<ChatRecord>,
}

/// `/resetear_sesion` also accepts the email as a query parameter.
#[derive(Debug, Deserialize)]
pub struct ResetQuery {
    pub usuario_email: Option<String>,
}
