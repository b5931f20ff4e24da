// src/regression/registry.rs
use std::sync::Arc;
use tokio::sync::RwLock;

use super::{round2, train, RegressionError, Sample, TrainedModel, TrainingConfig};

/// Holds the single most recently trained model. Training builds the new
/// model outside the lock and swaps it in whole.
#[derive(Default)]
pub struct ModelRegistry {
    current: RwLock<Option<Arc<TrainedModel>>>,
}

impl ModelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn train(
        &self,
        samples: &[Sample],
        config: TrainingConfig,
    ) -> Result<Arc<TrainedModel>, RegressionError> {
        let trained = Arc::new(train(samples, config)?);

        let mut current = self.current.write().await;
        *current = Some(trained.clone());

        tracing::info!(
            samples = samples.len(),
            mse = trained.metrics.mse,
            r2 = trained.metrics.r2,
            degenerate_split = trained.metrics.degenerate_split,
            "📈 calorie model trained"
        );
        Ok(trained)
    }

    /// Predicted calories, rounded to two decimals.
    pub async fn predict(&self, weight: f64, height: f64) -> Result<f64, RegressionError> {
        let current = self.current.read().await;
        let trained = current.as_ref().ok_or(RegressionError::NotTrained)?;
        let prediction = round2(trained.model.predict([weight, height]));
        if !prediction.is_finite() {
            return Err(RegressionError::NonFinitePrediction { weight, height });
        }
        Ok(prediction)
    }

    pub async fn snapshot(&self) -> Option<Arc<TrainedModel>> {
        self.current.read().await.clone()
    }
}
