// src/models/ml.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::regression::{TrainingConfig, TrainingMetrics};

#[derive(Debug, Deserialize)]
pub struct TrainRequest {
    pub peso: Vec<f64>,
    pub altura: Vec<f64>,
    pub calorias_reales: Vec<f64>,
    #[serde(default)]
    pub config: Option<TrainingConfig>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TrainResponse {
    pub mensaje: String,
    pub metricas: TrainingMetrics,
    pub entrenado_en: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "estado")]
pub enum MetricsResponse {
    #[serde(rename = "sin_entrenar")]
    Untrained { mensaje: String },
    #[serde(rename = "entrenado")]
    Trained {
        metricas: TrainingMetrics,
        entrenado_en: DateTime<Utc>,
    },
}

#[derive(Debug, Deserialize)]
pub struct PredictRequest {
    pub peso: f64,
    pub altura: f64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PredictResponse {
    pub peso: f64,
    pub altura: f64,
    pub calorias_estimadas: f64,
}
