// src/error.rs
use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use thiserror::Error;

use crate::assistant::{AssistantError, ModelError};
use crate::models::auth::ErrorResponse;
use crate::regression::RegressionError;
use crate::store::StoreError;

const UPSTREAM_MESSAGE: &str = "Error IA: el asistente no pudo responder, inténtalo de nuevo";

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    InvalidInput(String),
    #[error("El usuario ya existe")]
    UserExists,
    #[error("Usuario no registrado")]
    UserNotFound,
    #[error("Contraseña incorrecta")]
    IncorrectPassword,
    #[error("El modelo no ha sido entrenado")]
    ModelNotTrained,
    #[error("{0}")]
    Unauthorized(String),
    #[error("El asistente no está configurado")]
    AssistantUnavailable,
    #[error("Error IA: {0}")]
    Upstream(#[from] ModelError),
    #[error("Database error: {0}")]
    Database(StoreError),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidInput(_)
            | AppError::UserExists
            | AppError::IncorrectPassword
            | AppError::ModelNotTrained => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::UserNotFound => StatusCode::NOT_FOUND,
            AppError::Upstream(_) => StatusCode::BAD_GATEWAY,
            AppError::AssistantUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Duplicate(_) => AppError::UserExists,
            other => AppError::Database(other),
        }
    }
}

impl From<AssistantError> for AppError {
    fn from(err: AssistantError) -> Self {
        match err {
            AssistantError::Model(e) => AppError::Upstream(e),
            AssistantError::Store(e) => AppError::from(e),
        }
    }
}

impl From<RegressionError> for AppError {
    fn from(err: RegressionError) -> Self {
        match err {
            RegressionError::NotTrained => AppError::ModelNotTrained,
            other => AppError::InvalidInput(other.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Don't expose internal details to clients
        let message = match &self {
            AppError::Database(_) | AppError::Internal(_) => {
                tracing::error!(error = %self, "internal error");
                "Internal server error".to_string()
            }
            AppError::Upstream(_) => {
                tracing::error!(error = %self, "language model call failed");
                UPSTREAM_MESSAGE.to_string()
            }
            _ => self.to_string(),
        };

        (
            status,
            Json(ErrorResponse {
                success: false,
                message,
            }),
        )
            .into_response()
    }
}
