//! End-to-end scenarios driving the public evaluator and router against the bundled
//! artifact fixtures, from model load through the approval policy.

use std::path::PathBuf;
use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use loan_risk::assessment::{
    assessment_router, ApprovalDecision, ClassLabel, ClassifierModel, EvaluationError,
    LayoutKind, LoanApplication, LoanEvaluator, LogisticPipeline, ModelLoadError,
    RecordImporter, RiskTier, ScoringError,
};
use serde_json::Value;
use tower::ServiceExt;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn aligned_evaluator() -> LoanEvaluator<LogisticPipeline> {
    let model = LogisticPipeline::load(fixture("loan_pipeline.json")).expect("fixture loads");
    LoanEvaluator::new(Arc::new(model))
}

#[test]
fn fixture_artifact_exposes_one_hot_schema() {
    let model = LogisticPipeline::load(fixture("loan_pipeline.json")).expect("fixture loads");

    let schema = model.expected_feature_names().expect("schema recorded");
    assert_eq!(schema.len(), 33);
    assert!(schema.contains("Employment_Status_Self-employed"));
    assert!(schema.contains("Education_Level_Not Graduate"));
    assert_eq!(
        model.classes(),
        &[
            ClassLabel::Text("No".to_string()),
            ClassLabel::Text("Yes".to_string())
        ]
    );
}

#[test]
fn strong_applicant_from_json_is_approved_with_low_risk() {
    let evaluator = aligned_evaluator();
    let record = RecordImporter::from_path(fixture("applicant.json")).expect("record reads");

    let assessment = evaluator.evaluate(&record).expect("evaluation succeeds");

    assert_eq!(assessment.decision, ApprovalDecision::Approved);
    assert_eq!(assessment.risk, RiskTier::Low);
    assert_eq!(assessment.label, ClassLabel::Text("Yes".to_string()));
    assert_eq!(assessment.layout, LayoutKind::Aligned);
    assert_eq!(assessment.applicant_id, 42);
}

#[test]
fn weak_applicant_from_csv_is_declined_with_high_risk() {
    let evaluator = aligned_evaluator();
    let record = RecordImporter::from_path(fixture("applicant.csv")).expect("record reads");

    let assessment = evaluator.evaluate(&record).expect("evaluation succeeds");

    assert_eq!(assessment.decision, ApprovalDecision::NotApproved);
    assert_eq!(assessment.risk, RiskTier::High);
    assert!(assessment.probability < 0.01);
}

#[test]
fn form_defaults_land_in_medium_risk() {
    let evaluator = aligned_evaluator();
    let record = LoanApplication::form_defaults().to_raw_record();

    let assessment = evaluator.evaluate(&record).expect("evaluation succeeds");

    assert_eq!(assessment.decision, ApprovalDecision::NotApproved);
    assert_eq!(assessment.risk, RiskTier::Medium);
    assert_eq!(assessment.probability_display, "61.9%");
}

#[test]
fn raw_layout_artifact_scores_without_schema() {
    let model =
        LogisticPipeline::load(fixture("raw_layout_pipeline.json")).expect("fixture loads");
    assert!(model.expected_feature_names().is_none());
    let evaluator = LoanEvaluator::new(Arc::new(model));

    let record = LoanApplication::form_defaults().to_raw_record();
    let assessment = evaluator.evaluate(&record).expect("raw layout scores");

    assert_eq!(assessment.layout, LayoutKind::Raw);
    assert_eq!(assessment.label, ClassLabel::Integer(1));
    assert_eq!(assessment.probability_display, "61.9%");
}

#[test]
fn schemaless_artifact_with_one_hot_width_fails_loudly() {
    let mut model = LogisticPipeline::load(fixture("loan_pipeline.json")).expect("fixture loads");
    model.feature_names_in = None;
    let evaluator = LoanEvaluator::new(Arc::new(model));

    let record = LoanApplication::form_defaults().to_raw_record();
    match evaluator.evaluate(&record) {
        Err(EvaluationError::Scoring(ScoringError::DimensionMismatch { expected, found })) => {
            assert_eq!((expected, found), (33, 12));
        }
        other => panic!("expected dimension mismatch, got {other:?}"),
    }
}

#[test]
fn corrupt_artifact_is_a_load_error() {
    let err = LogisticPipeline::from_reader("{\"coefficients\": [".as_bytes())
        .expect_err("truncated json fails");
    assert!(matches!(err, ModelLoadError::Parse(_)));
}

#[tokio::test]
async fn router_scores_posted_record() {
    let router = assessment_router(Arc::new(aligned_evaluator()));
    let body = std::fs::read(fixture("applicant.json")).expect("fixture readable");

    let response = router
        .oneshot(
            Request::post("/api/v1/loan/assessments")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("body readable");
    let payload: Value = serde_json::from_slice(&bytes).expect("json payload");
    assert_eq!(payload["decision"], "Approved");
    assert_eq!(payload["risk"], "Low");
    assert_eq!(payload["applicant_id"], 42);
    assert!(payload["evaluated_at"].is_string());
}
