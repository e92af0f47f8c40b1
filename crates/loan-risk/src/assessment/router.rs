use std::sync::Arc;

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};

use super::model::ClassifierModel;
use super::record::RawRecord;
use super::service::{Assessment, LoanEvaluator, ModelSummary};
use crate::error::AppError;

/// Router builder exposing HTTP endpoints for single-record assessment.
pub fn assessment_router<M>(evaluator: Arc<LoanEvaluator<M>>) -> Router
where
    M: ClassifierModel + ?Sized + 'static,
{
    Router::new()
        .route("/api/v1/loan/assessments", post(assess_handler::<M>))
        .route("/api/v1/loan/model", get(model_handler::<M>))
        .with_state(evaluator)
}

pub(crate) async fn assess_handler<M>(
    State(evaluator): State<Arc<LoanEvaluator<M>>>,
    Json(record): Json<RawRecord>,
) -> Result<Json<Assessment>, AppError>
where
    M: ClassifierModel + ?Sized + 'static,
{
    let assessment = evaluator.evaluate(&record)?;
    Ok(Json(assessment))
}

pub(crate) async fn model_handler<M>(
    State(evaluator): State<Arc<LoanEvaluator<M>>>,
) -> Json<ModelSummary>
where
    M: ClassifierModel + ?Sized + 'static,
{
    Json(evaluator.summary())
}
