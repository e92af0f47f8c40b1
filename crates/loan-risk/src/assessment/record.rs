use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Numeric applicant fields, in the order the raw record declares them.
pub const NUMERIC_FIELDS: [&str; 12] = [
    "Applicant_ID",
    "Applicant_Income",
    "Coapplicant_Income",
    "Age",
    "Dependents",
    "Credit_Score",
    "Existing_Loans",
    "DTI_Ratio",
    "Savings",
    "Collateral_Value",
    "Loan_Amount",
    "Loan_Term",
];

/// Categorical applicant fields expanded into one-hot indicators.
pub const CATEGORICAL_FIELDS: [&str; 7] = [
    "Employment_Status",
    "Marital_Status",
    "Loan_Purpose",
    "Property_Area",
    "Education_Level",
    "Gender",
    "Employer_Category",
];

/// Every field a record must carry before it can be scored.
pub fn required_fields() -> impl Iterator<Item = &'static str> {
    NUMERIC_FIELDS.into_iter().chain(CATEGORICAL_FIELDS)
}

/// Single field value as supplied by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(f64),
    Category(String),
}

impl FieldValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(value) => Some(*value),
            FieldValue::Category(_) => None,
        }
    }

    pub fn as_category(&self) -> Option<&str> {
        match self {
            FieldValue::Number(_) => None,
            FieldValue::Category(value) => Some(value),
        }
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Category(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Category(value)
    }
}

/// Field lookup failures shared by intake and reconciliation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FieldError {
    #[error("missing required field `{0}`")]
    Missing(String),
    #[error("field `{field}` must be a {expected}")]
    InvalidType {
        field: String,
        expected: &'static str,
    },
}

/// One applicant's input fields before feature engineering.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawRecord {
    fields: BTreeMap<String, FieldValue>,
}

impl RawRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<FieldValue>) {
        self.fields.insert(field.into(), value.into());
    }

    pub fn with(mut self, field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.insert(field, value);
        self
    }

    pub fn remove(&mut self, field: &str) -> Option<FieldValue> {
        self.fields.remove(field)
    }

    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.fields.get(field)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// First required field absent from the record, in declaration order.
    pub fn first_missing(&self) -> Option<&'static str> {
        required_fields().find(|field| !self.fields.contains_key(*field))
    }

    pub fn ensure_complete(&self) -> Result<(), FieldError> {
        match self.first_missing() {
            Some(field) => Err(FieldError::Missing(field.to_string())),
            None => Ok(()),
        }
    }

    pub fn number(&self, field: &str) -> Result<f64, FieldError> {
        let value = self
            .fields
            .get(field)
            .ok_or_else(|| FieldError::Missing(field.to_string()))?;
        value.as_number().ok_or_else(|| FieldError::InvalidType {
            field: field.to_string(),
            expected: "number",
        })
    }

    pub fn category(&self, field: &str) -> Result<&str, FieldError> {
        let value = self
            .fields
            .get(field)
            .ok_or_else(|| FieldError::Missing(field.to_string()))?;
        value.as_category().ok_or_else(|| FieldError::InvalidType {
            field: field.to_string(),
            expected: "category label",
        })
    }
}

impl<K, V> FromIterator<(K, V)> for RawRecord
where
    K: Into<String>,
    V: Into<FieldValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let fields = iter
            .into_iter()
            .map(|(field, value)| (field.into(), value.into()))
            .collect();
        Self { fields }
    }
}

macro_rules! categorical_enum {
    (
        $(#[$meta:meta])*
        $name:ident { $($variant:ident => $label:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $label)]
                $variant,
            )+
        }

        impl $name {
            pub const fn ordered() -> &'static [Self] {
                &[$(Self::$variant),+]
            }

            pub const fn label(self) -> &'static str {
                match self {
                    $(Self::$variant => $label),+
                }
            }

            pub fn from_label(value: &str) -> Option<Self> {
                match value {
                    $($label => Some(Self::$variant),)+
                    _ => None,
                }
            }

            pub fn labels() -> Vec<&'static str> {
                Self::ordered().iter().map(|value| value.label()).collect()
            }
        }
    };
}

categorical_enum! {
    /// Applicant's current employment arrangement.
    EmploymentStatus {
        Salaried => "Salaried",
        SelfEmployed => "Self-employed",
        Unemployed => "Unemployed",
    }
}

categorical_enum! {
    MaritalStatus {
        Single => "Single",
        Married => "Married",
    }
}

categorical_enum! {
    LoanPurpose {
        Personal => "Personal",
        Business => "Business",
        Car => "Car",
        Home => "Home",
        Education => "Education",
    }
}

categorical_enum! {
    PropertyArea {
        Urban => "Urban",
        Semiurban => "Semiurban",
        Rural => "Rural",
    }
}

categorical_enum! {
    EducationLevel {
        Graduate => "Graduate",
        NotGraduate => "Not Graduate",
    }
}

categorical_enum! {
    Gender {
        Male => "Male",
        Female => "Female",
    }
}

categorical_enum! {
    /// Sector of the applicant's employer; `Unemployed` when there is none.
    EmployerCategory {
        Private => "Private",
        Government => "Government",
        Mnc => "MNC",
        Unemployed => "Unemployed",
    }
}

/// Allowed labels for a categorical field, `None` for unknown field names.
pub fn allowed_categories(field: &str) -> Option<Vec<&'static str>> {
    let labels = match field {
        "Employment_Status" => EmploymentStatus::labels(),
        "Marital_Status" => MaritalStatus::labels(),
        "Loan_Purpose" => LoanPurpose::labels(),
        "Property_Area" => PropertyArea::labels(),
        "Education_Level" => EducationLevel::labels(),
        "Gender" => Gender::labels(),
        "Employer_Category" => EmployerCategory::labels(),
        _ => return None,
    };
    Some(labels)
}

/// Strongly typed applicant profile accepted at the caller boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanApplication {
    #[serde(rename = "Applicant_ID")]
    pub applicant_id: u64,
    #[serde(rename = "Applicant_Income")]
    pub applicant_income: f64,
    #[serde(rename = "Coapplicant_Income")]
    pub coapplicant_income: f64,
    #[serde(rename = "Age")]
    pub age: u8,
    #[serde(rename = "Dependents")]
    pub dependents: u8,
    #[serde(rename = "Credit_Score")]
    pub credit_score: u16,
    #[serde(rename = "Existing_Loans")]
    pub existing_loans: u8,
    #[serde(rename = "DTI_Ratio")]
    pub dti_ratio: f64,
    #[serde(rename = "Savings")]
    pub savings: f64,
    #[serde(rename = "Collateral_Value")]
    pub collateral_value: f64,
    #[serde(rename = "Loan_Amount")]
    pub loan_amount: f64,
    #[serde(rename = "Loan_Term")]
    pub loan_term: i32,
    #[serde(rename = "Employment_Status")]
    pub employment_status: EmploymentStatus,
    #[serde(rename = "Marital_Status")]
    pub marital_status: MaritalStatus,
    #[serde(rename = "Loan_Purpose")]
    pub loan_purpose: LoanPurpose,
    #[serde(rename = "Property_Area")]
    pub property_area: PropertyArea,
    #[serde(rename = "Education_Level")]
    pub education_level: EducationLevel,
    #[serde(rename = "Gender")]
    pub gender: Gender,
    #[serde(rename = "Employer_Category")]
    pub employer_category: EmployerCategory,
}

impl LoanApplication {
    /// Values the intake form starts from before an applicant edits anything.
    pub fn form_defaults() -> Self {
        Self {
            applicant_id: 1,
            applicant_income: 5000.0,
            coapplicant_income: 0.0,
            age: 30,
            dependents: 0,
            credit_score: 650,
            existing_loans: 0,
            dti_ratio: 0.3,
            savings: 10000.0,
            collateral_value: 20000.0,
            loan_amount: 10000.0,
            loan_term: 36,
            employment_status: EmploymentStatus::Salaried,
            marital_status: MaritalStatus::Single,
            loan_purpose: LoanPurpose::Personal,
            property_area: PropertyArea::Urban,
            education_level: EducationLevel::Graduate,
            gender: Gender::Male,
            employer_category: EmployerCategory::Private,
        }
    }

    pub fn to_raw_record(&self) -> RawRecord {
        RawRecord::new()
            .with("Applicant_ID", self.applicant_id as f64)
            .with("Applicant_Income", self.applicant_income)
            .with("Coapplicant_Income", self.coapplicant_income)
            .with("Age", f64::from(self.age))
            .with("Dependents", f64::from(self.dependents))
            .with("Credit_Score", f64::from(self.credit_score))
            .with("Existing_Loans", f64::from(self.existing_loans))
            .with("DTI_Ratio", self.dti_ratio)
            .with("Savings", self.savings)
            .with("Collateral_Value", self.collateral_value)
            .with("Loan_Amount", self.loan_amount)
            .with("Loan_Term", f64::from(self.loan_term))
            .with("Employment_Status", self.employment_status.label())
            .with("Marital_Status", self.marital_status.label())
            .with("Loan_Purpose", self.loan_purpose.label())
            .with("Property_Area", self.property_area.label())
            .with("Education_Level", self.education_level.label())
            .with("Gender", self.gender.label())
            .with("Employer_Category", self.employer_category.label())
    }
}

impl From<&LoanApplication> for RawRecord {
    fn from(application: &LoanApplication) -> Self {
        application.to_raw_record()
    }
}
