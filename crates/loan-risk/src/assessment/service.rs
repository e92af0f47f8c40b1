use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use super::intake::{IntakeError, IntakeGuard};
use super::model::{ClassLabel, ClassifierModel};
use super::policy::{format_pct, probability_pct, ApprovalDecision, RiskTier};
use super::reconcile::{AlignedVector, FeatureLayout, LayoutKind};
use super::record::{FieldError, RawRecord};
use super::scoring::{PredictionResult, Scorer, ScoringError};

/// Error raised by the loan evaluator. Every variant aborts the evaluation.
#[derive(Debug, thiserror::Error)]
pub enum EvaluationError {
    #[error(transparent)]
    Intake(#[from] IntakeError),
    #[error(transparent)]
    Field(#[from] FieldError),
    #[error(transparent)]
    Scoring(#[from] ScoringError),
}

/// Full evaluation result returned to callers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Assessment {
    pub applicant_id: u64,
    pub label: ClassLabel,
    pub probability: f64,
    pub probability_pct: f64,
    pub probability_display: String,
    pub decision: ApprovalDecision,
    pub risk: RiskTier,
    pub layout: LayoutKind,
    pub evaluated_at: DateTime<Utc>,
}

impl Assessment {
    fn from_prediction(
        applicant_id: u64,
        prediction: PredictionResult,
        layout: LayoutKind,
    ) -> Self {
        let PredictionResult { label, probability } = prediction;
        Self {
            applicant_id,
            label,
            probability,
            probability_pct: probability_pct(probability),
            probability_display: format_pct(probability),
            decision: ApprovalDecision::from_probability(probability),
            risk: RiskTier::from_probability(probability),
            layout,
            evaluated_at: Utc::now(),
        }
    }
}

/// Read-only summary of the loaded model for diagnostics endpoints.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelSummary {
    pub input_width: usize,
    pub layout: LayoutKind,
    pub feature_names: Option<Vec<String>>,
    pub classes: Vec<ClassLabel>,
}

/// Evaluator composing intake validation, schema reconciliation, and scoring.
///
/// The feature layout is captured once from the model at construction; the evaluator is
/// immutable afterwards and safe to share across request handlers.
pub struct LoanEvaluator<M: ?Sized> {
    guard: IntakeGuard,
    layout: FeatureLayout,
    scorer: Scorer<M>,
}

impl<M> LoanEvaluator<M>
where
    M: ClassifierModel + ?Sized,
{
    pub fn new(model: Arc<M>) -> Self {
        let layout = FeatureLayout::from_schema(model.expected_feature_names().cloned());
        match &layout {
            FeatureLayout::Aligned(columns) => {
                info!(columns = columns.len(), "model exposes its feature schema")
            }
            FeatureLayout::Raw => warn!(
                width = model.input_width(),
                "model exposes no feature schema; records will be scored in raw layout"
            ),
        }

        Self {
            guard: IntakeGuard::new(),
            layout,
            scorer: Scorer::new(model),
        }
    }

    pub fn layout(&self) -> &FeatureLayout {
        &self.layout
    }

    pub fn model(&self) -> &M {
        self.scorer.model()
    }

    /// Builds the vector the model will see for `record`.
    pub fn prepare(&self, record: &RawRecord) -> Result<AlignedVector, FieldError> {
        if self.layout.kind() == LayoutKind::Raw {
            warn!("scoring record without a model schema; accuracy may be degraded");
        }
        self.layout.vectorize(record)
    }

    /// Reconciles and scores a record without applying intake constraints.
    pub fn predict(&self, record: &RawRecord) -> Result<PredictionResult, EvaluationError> {
        let vector = self.prepare(record)?;
        let prediction = self.scorer.score(vector.values())?;
        Ok(prediction)
    }

    /// Validates, scores, and applies the approval policy to a single record.
    pub fn evaluate(&self, record: &RawRecord) -> Result<Assessment, EvaluationError> {
        let application = self.guard.check(record)?;
        let prediction = self.predict(record)?;
        let assessment =
            Assessment::from_prediction(application.applicant_id, prediction, self.layout.kind());

        info!(
            applicant_id = assessment.applicant_id,
            probability = assessment.probability,
            decision = assessment.decision.label(),
            risk = assessment.risk.label(),
            "loan application evaluated"
        );

        Ok(assessment)
    }

    pub fn summary(&self) -> ModelSummary {
        let model = self.model();
        ModelSummary {
            input_width: model.input_width(),
            layout: self.layout.kind(),
            feature_names: model
                .expected_feature_names()
                .map(|columns| columns.names().to_vec()),
            classes: model.classes().to_vec(),
        }
    }
}
