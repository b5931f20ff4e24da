// src/regression/mod.rs
//! Calorie regression: a two-feature (weight, height) linear model trained on
//! submitted samples and evaluated on a seeded held-out split.

pub mod linear;
pub mod registry;

use chrono::{DateTime, Utc};
use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use linear::LinearModel;
pub use registry::ModelRegistry;

pub const MIN_SAMPLES: usize = 2;

/// Held-out rows below this count are too few to evaluate on.
pub const MIN_TEST_SAMPLES: usize = 2;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RegressionError {
    #[error("At least {required} samples are required to train, got {got}")]
    InsufficientSamples { required: usize, got: usize },
    #[error("Sample arrays differ in length (peso: {weights}, altura: {heights}, calorias_reales: {calories})")]
    LengthMismatch {
        weights: usize,
        heights: usize,
        calories: usize,
    },
    #[error("Non-finite value in {field} at position {index}")]
    NonFiniteValue { field: &'static str, index: usize },
    #[error("test_size must be between 0 and 1 (exclusive), got {0}")]
    InvalidTestSize(f64),
    #[error("Split of {samples} samples with {test_samples} held out leaves no training data")]
    EmptyTrainingSet { samples: usize, test_samples: usize },
    #[error("The model has not been trained yet")]
    NotTrained,
    #[error("Prediction for peso {weight} and altura {height} is not a finite number")]
    NonFinitePrediction { weight: f64, height: f64 },
}

/// How the samples are split before fitting.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    pub test_size: f64,
    pub random_state: u64,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            test_size: 0.2,
            random_state: 42,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub weight: f64,
    pub height: f64,
    pub calories: f64,
}

impl Sample {
    pub fn features(&self) -> [f64; 2] {
        [self.weight, self.height]
    }
}

/// Zip the three submitted columns into samples, rejecting ragged or
/// non-finite input.
pub fn samples_from_columns(
    weights: &[f64],
    heights: &[f64],
    calories: &[f64],
) -> Result<Vec<Sample>, RegressionError> {
    if weights.len() != heights.len() || weights.len() != calories.len() {
        return Err(RegressionError::LengthMismatch {
            weights: weights.len(),
            heights: heights.len(),
            calories: calories.len(),
        });
    }

    for (field, column) in [("peso", weights), ("altura", heights), ("calorias_reales", calories)] {
        if let Some(index) = column.iter().position(|v| !v.is_finite()) {
            return Err(RegressionError::NonFiniteValue { field, index });
        }
    }

    Ok(weights
        .iter()
        .zip(heights)
        .zip(calories)
        .map(|((&weight, &height), &calories)| Sample {
            weight,
            height,
            calories,
        })
        .collect())
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coefficients {
    pub peso: f64,
    pub altura: f64,
}

/// Outcome of one training run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingMetrics {
    pub mse: f64,
    pub r2: f64,
    pub train_samples: usize,
    pub test_samples: usize,
    /// Set when the held-out set was too small and the metrics were zeroed.
    pub degenerate_split: bool,
    pub intercept: f64,
    pub coefficients: Coefficients,
    pub config: TrainingConfig,
}

#[derive(Debug, Clone)]
pub struct TrainedModel {
    pub model: LinearModel,
    pub metrics: TrainingMetrics,
    pub trained_at: DateTime<Utc>,
}

/// Shuffle `0..n` with a seeded generator and cut off the held-out part.
/// Returns `(train, test)` index lists.
pub fn train_test_split(
    n: usize,
    config: &TrainingConfig,
) -> Result<(Vec<usize>, Vec<usize>), RegressionError> {
    if !(config.test_size > 0.0 && config.test_size < 1.0) {
        return Err(RegressionError::InvalidTestSize(config.test_size));
    }

    let test_count = ((n as f64) * config.test_size).ceil() as usize;
    if test_count >= n {
        return Err(RegressionError::EmptyTrainingSet {
            samples: n,
            test_samples: test_count,
        });
    }

    let mut indices: Vec<usize> = (0..n).collect();
    let mut rng = StdRng::seed_from_u64(config.random_state);
    indices.shuffle(&mut rng);

    let train = indices.split_off(test_count);
    Ok((train, indices))
}

pub fn mean_squared_error(actual: &[f64], predicted: &[f64]) -> f64 {
    if actual.is_empty() {
        return 0.0;
    }
    let sse: f64 = actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| (a - p) * (a - p))
        .sum();
    sse / actual.len() as f64
}

/// Coefficient of determination. A constant target scores 1.0 when matched
/// exactly and 0.0 otherwise.
pub fn r2_score(actual: &[f64], predicted: &[f64]) -> f64 {
    if actual.is_empty() {
        return 0.0;
    }
    let mean = actual.iter().sum::<f64>() / actual.len() as f64;
    let ss_res: f64 = actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| (a - p) * (a - p))
        .sum();
    let ss_tot: f64 = actual.iter().map(|a| (a - mean) * (a - mean)).sum();

    if ss_tot == 0.0 {
        if ss_res == 0.0 {
            1.0
        } else {
            0.0
        }
    } else {
        1.0 - ss_res / ss_tot
    }
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// Split, fit and evaluate. Nothing is stored; see [`ModelRegistry::train`].
pub fn train(samples: &[Sample], config: TrainingConfig) -> Result<TrainedModel, RegressionError> {
    if samples.len() < MIN_SAMPLES {
        return Err(RegressionError::InsufficientSamples {
            required: MIN_SAMPLES,
            got: samples.len(),
        });
    }

    let (train_idx, test_idx) = train_test_split(samples.len(), &config)?;

    let train_x: Vec<[f64; 2]> = train_idx.iter().map(|&i| samples[i].features()).collect();
    let train_y: Vec<f64> = train_idx.iter().map(|&i| samples[i].calories).collect();
    let model = LinearModel::fit(&train_x, &train_y)?;

    let degenerate_split = test_idx.len() < MIN_TEST_SAMPLES;
    let (mse, r2) = if degenerate_split {
        tracing::warn!(
            test_samples = test_idx.len(),
            "held-out set too small to evaluate, reporting zero metrics"
        );
        (0.0, 0.0)
    } else {
        let actual: Vec<f64> = test_idx.iter().map(|&i| samples[i].calories).collect();
        let predicted: Vec<f64> = test_idx
            .iter()
            .map(|&i| model.predict(samples[i].features()))
            .collect();
        (
            mean_squared_error(&actual, &predicted),
            r2_score(&actual, &predicted),
        )
    };

    let metrics = TrainingMetrics {
        mse: finite_or_zero(mse),
        r2: finite_or_zero(r2),
        train_samples: train_idx.len(),
        test_samples: test_idx.len(),
        degenerate_split,
        intercept: finite_or_zero(model.intercept),
        coefficients: Coefficients {
            peso: finite_or_zero(model.coefficients[0]),
            altura: finite_or_zero(model.coefficients[1]),
        },
        config,
    };

    Ok(TrainedModel {
        model,
        metrics,
        trained_at: Utc::now(),
    })
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
