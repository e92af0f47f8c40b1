use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::model::{ClassLabel, ClassifierModel};

/// Position of the approved class in a `[rejected, approved]` distribution.
pub const APPROVED_CLASS_INDEX: usize = 1;

/// Inference failures. None of these fall back to another layout.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScoringError {
    #[error("feature vector has {found} values but the model expects {expected}")]
    DimensionMismatch { expected: usize, found: usize },
    #[error("model returned an unusable class distribution: {0}")]
    InvalidDistribution(String),
}

/// Model estimate for a single application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub label: ClassLabel,
    /// Probability of the approved class, always within `[0, 1]`.
    pub probability: f64,
}

/// Applies a loaded model to prepared feature vectors.
pub struct Scorer<M: ?Sized> {
    model: Arc<M>,
}

impl<M> Scorer<M>
where
    M: ClassifierModel + ?Sized,
{
    pub fn new(model: Arc<M>) -> Self {
        Self { model }
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn score(&self, features: &[f64]) -> Result<PredictionResult, ScoringError> {
        let expected = self.model.input_width();
        if features.len() != expected {
            return Err(ScoringError::DimensionMismatch {
                expected,
                found: features.len(),
            });
        }

        let label = self.model.predict(features)?;
        let distribution = self.model.predict_proba(features)?;
        let probability = approved_probability(&distribution)?;

        Ok(PredictionResult { label, probability })
    }
}

fn approved_probability(distribution: &[f64]) -> Result<f64, ScoringError> {
    if distribution.len() != 2 {
        return Err(ScoringError::InvalidDistribution(format!(
            "expected 2 class probabilities, got {}",
            distribution.len()
        )));
    }

    let probability = distribution[APPROVED_CLASS_INDEX];
    if !(0.0..=1.0).contains(&probability) {
        return Err(ScoringError::InvalidDistribution(format!(
            "approved-class probability {probability} is outside [0, 1]"
        )));
    }

    Ok(probability)
}
