use std::sync::Arc;

use axum::body::to_bytes;
use axum::response::Response;
use serde_json::Value;

use crate::assessment::model::{ClassLabel, ClassifierModel, LogisticPipeline};
use crate::assessment::reconcile::ExpectedColumns;
use crate::assessment::record::{
    EducationLevel, EmployerCategory, EmploymentStatus, Gender, LoanApplication, LoanPurpose,
    MaritalStatus, PropertyArea, RawRecord, CATEGORICAL_FIELDS, NUMERIC_FIELDS,
};
use crate::assessment::scoring::ScoringError;
use crate::assessment::service::LoanEvaluator;

/// Column list produced by one-hot encoding the full training vocabulary.
pub(super) fn training_columns() -> ExpectedColumns {
    let mut names: Vec<String> = NUMERIC_FIELDS.iter().map(|field| field.to_string()).collect();
    let vocabularies: [(&str, Vec<&str>); 7] = [
        ("Employment_Status", EmploymentStatus::labels()),
        ("Marital_Status", MaritalStatus::labels()),
        ("Loan_Purpose", LoanPurpose::labels()),
        ("Property_Area", PropertyArea::labels()),
        ("Education_Level", EducationLevel::labels()),
        ("Gender", Gender::labels()),
        ("Employer_Category", EmployerCategory::labels()),
    ];
    for (field, labels) in vocabularies {
        for label in labels {
            names.push(format!("{field}_{label}"));
        }
    }
    ExpectedColumns::new(names).expect("training columns are unique")
}

pub(super) fn applicant() -> LoanApplication {
    LoanApplication {
        applicant_id: 42,
        applicant_income: 7200.0,
        coapplicant_income: 1800.0,
        age: 38,
        dependents: 2,
        credit_score: 742,
        existing_loans: 1,
        dti_ratio: 0.24,
        savings: 21000.0,
        collateral_value: 55000.0,
        loan_amount: 18000.0,
        loan_term: 48,
        employment_status: EmploymentStatus::Salaried,
        marital_status: MaritalStatus::Married,
        loan_purpose: LoanPurpose::Home,
        property_area: PropertyArea::Semiurban,
        education_level: EducationLevel::Graduate,
        gender: Gender::Male,
        employer_category: EmployerCategory::Government,
    }
}

pub(super) fn applicant_record() -> RawRecord {
    applicant().to_raw_record()
}

pub(super) fn logit(probability: f64) -> f64 {
    (probability / (1.0 - probability)).ln()
}

/// Pipeline whose output ignores the features: it always predicts `probability`.
pub(super) fn constant_pipeline(
    columns: Option<ExpectedColumns>,
    width: usize,
    probability: f64,
) -> LogisticPipeline {
    LogisticPipeline {
        feature_names_in: columns,
        scaler: None,
        coefficients: vec![0.0; width],
        intercept: logit(probability),
        classes: [
            ClassLabel::Text("No".to_string()),
            ClassLabel::Text("Yes".to_string()),
        ],
        trained_at: None,
    }
}

pub(super) fn aligned_evaluator(probability: f64) -> LoanEvaluator<LogisticPipeline> {
    let columns = training_columns();
    let width = columns.len();
    LoanEvaluator::new(Arc::new(constant_pipeline(
        Some(columns),
        width,
        probability,
    )))
}

pub(super) fn schemaless_evaluator(
    width: usize,
    probability: f64,
) -> LoanEvaluator<LogisticPipeline> {
    LoanEvaluator::new(Arc::new(constant_pipeline(None, width, probability)))
}

/// Model double returning a fixed distribution, used to exercise scorer guard rails.
pub(super) struct FixedDistributionModel {
    pub(super) width: usize,
    pub(super) distribution: Vec<f64>,
    pub(super) classes: Vec<ClassLabel>,
}

impl FixedDistributionModel {
    pub(super) fn new(width: usize, distribution: Vec<f64>) -> Self {
        Self {
            width,
            distribution,
            classes: vec![ClassLabel::Integer(0), ClassLabel::Integer(1)],
        }
    }
}

impl ClassifierModel for FixedDistributionModel {
    fn expected_feature_names(&self) -> Option<&ExpectedColumns> {
        None
    }

    fn input_width(&self) -> usize {
        self.width
    }

    fn classes(&self) -> &[ClassLabel] {
        &self.classes
    }

    fn predict(&self, _features: &[f64]) -> Result<ClassLabel, ScoringError> {
        Ok(self.classes[self.classes.len() - 1].clone())
    }

    fn predict_proba(&self, _features: &[f64]) -> Result<Vec<f64>, ScoringError> {
        Ok(self.distribution.clone())
    }
}

pub(super) fn categorical_field_count() -> usize {
    CATEGORICAL_FIELDS.len()
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body readable");
    serde_json::from_slice(&bytes).expect("body is json")
}
