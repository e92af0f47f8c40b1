//! Loan application assessment: intake, feature alignment, scoring, and approval policy.
//!
//! A request flows raw record → [`IntakeGuard`] → [`FeatureLayout`] (schema reconciliation or
//! the raw fallback) → [`Scorer`] → [`ApprovalDecision`] / [`RiskTier`]. The model is loaded
//! once at startup and shared read-only through [`LoanEvaluator`].

pub mod intake;
pub mod model;
pub mod policy;
pub mod reconcile;
pub mod record;
pub mod router;
pub mod scoring;
pub mod service;
pub mod source;

#[cfg(test)]
mod tests;

pub use intake::{IntakeError, IntakeGuard};
pub use model::{ClassLabel, ClassifierModel, LogisticPipeline, ModelLoadError, StandardScaler};
pub use policy::{ApprovalDecision, RiskTier};
pub use reconcile::{
    reconcile, AlignedVector, ExpectedColumns, FeatureLayout, LayoutKind, SchemaError,
};
pub use record::{FieldError, FieldValue, LoanApplication, RawRecord};
pub use router::assessment_router;
pub use scoring::{PredictionResult, Scorer, ScoringError};
pub use service::{Assessment, EvaluationError, LoanEvaluator, ModelSummary};
pub use source::{RecordImportError, RecordImporter};
