use std::io::Read;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::{ClassLabel, ClassifierModel, ModelLoadError};
use crate::assessment::reconcile::ExpectedColumns;
use crate::assessment::scoring::ScoringError;

/// Per-feature standardization applied before the linear step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

impl StandardScaler {
    fn transform(&self, features: &[f64]) -> Vec<f64> {
        features
            .iter()
            .zip(self.mean.iter().zip(&self.scale))
            .map(|(value, (mean, scale))| (value - mean) / scale)
            .collect()
    }
}

/// Serialized logistic-regression pipeline: optional scaler followed by a linear classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticPipeline {
    #[serde(default)]
    pub feature_names_in: Option<ExpectedColumns>,
    #[serde(default)]
    pub scaler: Option<StandardScaler>,
    pub coefficients: Vec<f64>,
    pub intercept: f64,
    /// Ordered `[rejected, approved]`.
    pub classes: [ClassLabel; 2],
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trained_at: Option<DateTime<Utc>>,
}

impl LogisticPipeline {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ModelLoadError> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|source| ModelLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let pipeline = Self::from_reader(file)?;

        info!(
            path = %path.display(),
            width = pipeline.input_width(),
            has_schema = pipeline.feature_names_in.is_some(),
            "loaded model artifact"
        );

        Ok(pipeline)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, ModelLoadError> {
        let pipeline: Self = serde_json::from_reader(reader)?;
        pipeline.validate()?;
        Ok(pipeline)
    }

    pub fn validate(&self) -> Result<(), ModelLoadError> {
        let width = self.coefficients.len();
        if width == 0 {
            return Err(ModelLoadError::Inconsistent(
                "coefficient vector is empty".to_string(),
            ));
        }
        if self.coefficients.iter().any(|value| !value.is_finite()) || !self.intercept.is_finite()
        {
            return Err(ModelLoadError::Inconsistent(
                "coefficients must be finite".to_string(),
            ));
        }

        if let Some(columns) = &self.feature_names_in {
            if columns.len() != width {
                return Err(ModelLoadError::Inconsistent(format!(
                    "{} feature names for {} coefficients",
                    columns.len(),
                    width
                )));
            }
        }

        if let Some(scaler) = &self.scaler {
            if scaler.mean.len() != width || scaler.scale.len() != width {
                return Err(ModelLoadError::Inconsistent(format!(
                    "scaler covers {}/{} features, model has {}",
                    scaler.mean.len(),
                    scaler.scale.len(),
                    width
                )));
            }
            if scaler
                .scale
                .iter()
                .any(|scale| *scale == 0.0 || !scale.is_finite())
            {
                return Err(ModelLoadError::Inconsistent(
                    "scaler contains a zero or non-finite scale".to_string(),
                ));
            }
        }

        if self.classes[0] == self.classes[1] {
            return Err(ModelLoadError::Inconsistent(format!(
                "both classes are labelled {}",
                self.classes[0]
            )));
        }

        Ok(())
    }

    fn decision_function(&self, features: &[f64]) -> Result<f64, ScoringError> {
        let expected = self.input_width();
        if features.len() != expected {
            return Err(ScoringError::DimensionMismatch {
                expected,
                found: features.len(),
            });
        }

        let scaled;
        let inputs = match &self.scaler {
            Some(scaler) => {
                scaled = scaler.transform(features);
                scaled.as_slice()
            }
            None => features,
        };

        let dot: f64 = inputs
            .iter()
            .zip(&self.coefficients)
            .map(|(value, weight)| value * weight)
            .sum();
        Ok(dot + self.intercept)
    }
}

fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

impl ClassifierModel for LogisticPipeline {
    fn expected_feature_names(&self) -> Option<&ExpectedColumns> {
        self.feature_names_in.as_ref()
    }

    fn input_width(&self) -> usize {
        self.coefficients.len()
    }

    fn classes(&self) -> &[ClassLabel] {
        &self.classes
    }

    fn predict(&self, features: &[f64]) -> Result<ClassLabel, ScoringError> {
        let z = self.decision_function(features)?;
        let index = usize::from(z > 0.0);
        Ok(self.classes[index].clone())
    }

    fn predict_proba(&self, features: &[f64]) -> Result<Vec<f64>, ScoringError> {
        let z = self.decision_function(features)?;
        if z.is_nan() {
            return Err(ScoringError::InvalidDistribution(
                "decision function is not a number".to_string(),
            ));
        }
        let approved = sigmoid(z);
        Ok(vec![1.0 - approved, approved])
    }
}
