//! Inference contract for pre-trained classifiers plus the bundled artifact format.

mod artifact;

pub use artifact::{LogisticPipeline, StandardScaler};

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::reconcile::ExpectedColumns;
use super::scoring::ScoringError;

/// Class label as declared by the trained model.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ClassLabel {
    Integer(i64),
    Text(String),
}

impl fmt::Display for ClassLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClassLabel::Integer(value) => write!(f, "{value}"),
            ClassLabel::Text(value) => f.write_str(value),
        }
    }
}

/// Capabilities the scorer needs from a trained binary classifier.
///
/// Implementations are loaded once and then shared read-only between requests.
pub trait ClassifierModel: Send + Sync {
    /// Ordered feature names the model was fitted on, when the artifact records them.
    fn expected_feature_names(&self) -> Option<&ExpectedColumns>;

    /// Width of the input vector the model accepts.
    fn input_width(&self) -> usize;

    /// Class labels ordered the same way as `predict_proba` output.
    fn classes(&self) -> &[ClassLabel];

    fn predict(&self, features: &[f64]) -> Result<ClassLabel, ScoringError>;

    fn predict_proba(&self, features: &[f64]) -> Result<Vec<f64>, ScoringError>;
}

/// Fatal problems encountered while loading a model artifact at startup.
#[derive(Debug, thiserror::Error)]
pub enum ModelLoadError {
    #[error("model artifact {} could not be read: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("model artifact is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("model artifact is inconsistent: {0}")]
    Inconsistent(String),
}
