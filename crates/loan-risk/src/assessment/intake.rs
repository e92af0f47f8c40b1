use super::record::{
    allowed_categories, EducationLevel, EmployerCategory, EmploymentStatus, FieldError, Gender,
    LoanApplication, LoanPurpose, MaritalStatus, PropertyArea, RawRecord,
};

/// Validation errors raised when a record violates the caller-boundary constraints.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum IntakeError {
    #[error(transparent)]
    Field(#[from] FieldError),
    #[error("field `{field}` must be a finite number")]
    NonFinite { field: &'static str },
    #[error("field `{field}` must be a whole number, found {value}")]
    NotWholeNumber { field: &'static str, value: f64 },
    #[error("field `{field}` value {value} is outside {}", describe_range(.min, .max))]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: Option<f64>,
        max: Option<f64>,
    },
    #[error("field `{field}` has unknown value `{value}` (expected one of: {})", .allowed.join(", "))]
    UnknownCategory {
        field: &'static str,
        value: String,
        allowed: Vec<&'static str>,
    },
}

fn describe_range(min: &Option<f64>, max: &Option<f64>) -> String {
    match (*min, *max) {
        (Some(min), Some(max)) => format!("[{min}, {max}]"),
        (Some(min), None) => format!("[{min}, ∞)"),
        (None, Some(max)) => format!("(-∞, {max}]"),
        (None, None) => "(-∞, ∞)".to_string(),
    }
}

struct NumericRule {
    field: &'static str,
    min: Option<f64>,
    max: Option<f64>,
    whole: bool,
}

const fn rule(
    field: &'static str,
    min: Option<f64>,
    max: Option<f64>,
    whole: bool,
) -> NumericRule {
    NumericRule {
        field,
        min,
        max,
        whole,
    }
}

const NUMERIC_RULES: [NumericRule; 12] = [
    rule("Applicant_ID", Some(1.0), None, true),
    rule("Applicant_Income", None, None, false),
    rule("Coapplicant_Income", None, None, false),
    rule("Age", Some(18.0), Some(100.0), true),
    rule("Dependents", Some(0.0), Some(10.0), true),
    rule("Credit_Score", Some(300.0), Some(850.0), true),
    rule("Existing_Loans", Some(0.0), Some(20.0), true),
    rule("DTI_Ratio", Some(0.0), Some(1.0), false),
    rule("Savings", None, None, false),
    rule("Collateral_Value", None, None, false),
    rule("Loan_Amount", None, None, false),
    rule("Loan_Term", None, None, true),
];

/// Guard turning an untyped record into a [`LoanApplication`] that satisfies the form
/// constraints (value ranges and enumerated category sets).
#[derive(Debug, Clone, Default)]
pub struct IntakeGuard;

impl IntakeGuard {
    pub fn new() -> Self {
        Self
    }

    pub fn check(&self, record: &RawRecord) -> Result<LoanApplication, IntakeError> {
        record.ensure_complete()?;

        let mut numbers = [0.0_f64; 12];
        for (slot, rule) in numbers.iter_mut().zip(NUMERIC_RULES.iter()) {
            *slot = check_number(record, rule)?;
        }

        let [
            applicant_id,
            applicant_income,
            coapplicant_income,
            age,
            dependents,
            credit_score,
            existing_loans,
            dti_ratio,
            savings,
            collateral_value,
            loan_amount,
            loan_term,
        ] = numbers;

        Ok(LoanApplication {
            applicant_id: applicant_id as u64,
            applicant_income,
            coapplicant_income,
            age: age as u8,
            dependents: dependents as u8,
            credit_score: credit_score as u16,
            existing_loans: existing_loans as u8,
            dti_ratio,
            savings,
            collateral_value,
            loan_amount,
            loan_term: loan_term as i32,
            employment_status: parse_category(
                record,
                "Employment_Status",
                EmploymentStatus::from_label,
            )?,
            marital_status: parse_category(record, "Marital_Status", MaritalStatus::from_label)?,
            loan_purpose: parse_category(record, "Loan_Purpose", LoanPurpose::from_label)?,
            property_area: parse_category(record, "Property_Area", PropertyArea::from_label)?,
            education_level: parse_category(
                record,
                "Education_Level",
                EducationLevel::from_label,
            )?,
            gender: parse_category(record, "Gender", Gender::from_label)?,
            employer_category: parse_category(
                record,
                "Employer_Category",
                EmployerCategory::from_label,
            )?,
        })
    }
}

fn check_number(record: &RawRecord, rule: &NumericRule) -> Result<f64, IntakeError> {
    let value = record.number(rule.field)?;
    if !value.is_finite() {
        return Err(IntakeError::NonFinite { field: rule.field });
    }
    if rule.whole && value.fract() != 0.0 {
        return Err(IntakeError::NotWholeNumber {
            field: rule.field,
            value,
        });
    }

    let below = rule.min.is_some_and(|min| value < min);
    let above = rule.max.is_some_and(|max| value > max);
    if below || above {
        return Err(IntakeError::OutOfRange {
            field: rule.field,
            value,
            min: rule.min,
            max: rule.max,
        });
    }

    Ok(value)
}

fn parse_category<T>(
    record: &RawRecord,
    field: &'static str,
    parse: fn(&str) -> Option<T>,
) -> Result<T, IntakeError> {
    let value = record.category(field)?;
    parse(value).ok_or_else(|| IntakeError::UnknownCategory {
        field,
        value: value.to_string(),
        allowed: allowed_categories(field).unwrap_or_default(),
    })
}
