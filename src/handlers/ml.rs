// src/handlers/ml.rs
use crate::error::AppError;
use crate::models::ml::*;
use crate::regression::samples_from_columns;
use crate::AppState;
use axum::{
    extract::Extension,
    response::Json,
    routing::{get, post},
    Router,
};
use std::sync::Arc;

pub fn ml_routes() -> Router {
    Router::new()
        .route("/ml/train", post(train))
        .route("/ml/metrics", get(metrics))
        .route("/ml/predict", post(predict))
}

async fn train(
    Extension(state): Extension<Arc<AppState>>,
    Json(payload): Json<TrainRequest>,
) -> Result<Json<TrainResponse>, AppError> {
    let samples = samples_from_columns(&payload.peso, &payload.altura, &payload.calorias_reales)?;
    let config = payload.config.unwrap_or_default();

    let trained = state.regression.train(&samples, config).await?;

    Ok(Json(TrainResponse {
        mensaje: "Modelo entrenado correctamente".to_string(),
        metricas: trained.metrics.clone(),
        entrenado_en: trained.trained_at,
    }))
}

async fn metrics(Extension(state): Extension<Arc<AppState>>) -> Json<MetricsResponse> {
    let response = match state.regression.snapshot().await {
        Some(trained) => MetricsResponse::Trained {
            metricas: trained.metrics.clone(),
            entrenado_en: trained.trained_at,
        },
        None => MetricsResponse::Untrained {
            mensaje: "El modelo aún no ha sido entrenado".to_string(),
        },
    };
    Json(response)
}

async fn predict(
    Extension(state): Extension<Arc<AppState>>,
    Json(payload): Json<PredictRequest>,
) -> Result<Json<PredictResponse>, AppError> {
    let calorias_estimadas = state
        .regression
        .predict(payload.peso, payload.altura)
        .await?;

    Ok(Json(PredictResponse {
        peso: payload.peso,
        altura: payload.altura,
        calorias_estimadas,
    }))
}
