//! Aligns a raw applicant record with the feature list a trained model declares.
//!
//! Categorical fields are one-hot expanded from the single record being scored, so only the
//! indicator for the record's own value can ever be produced. The model's expected columns
//! are therefore the only vocabulary: every expected indicator the record does not produce is
//! zero-filled, and anything the model does not know about is dropped.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::record::{FieldError, RawRecord, CATEGORICAL_FIELDS, NUMERIC_FIELDS};

/// Problems with a declared feature list.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    #[error("expected feature list is empty")]
    Empty,
    #[error("expected feature list repeats column `{0}`")]
    Duplicate(String),
}

/// Ordered feature names a trained model requires at inference time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct ExpectedColumns(Vec<String>);

impl ExpectedColumns {
    pub fn new<I, S>(names: I) -> Result<Self, SchemaError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        if names.is_empty() {
            return Err(SchemaError::Empty);
        }

        let mut seen = HashSet::with_capacity(names.len());
        for name in &names {
            if !seen.insert(name.as_str()) {
                return Err(SchemaError::Duplicate(name.clone()));
            }
        }

        Ok(Self(names))
    }

    pub fn names(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|column| column == name)
    }
}

impl TryFrom<Vec<String>> for ExpectedColumns {
    type Error = SchemaError;

    fn try_from(value: Vec<String>) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ExpectedColumns> for Vec<String> {
    fn from(value: ExpectedColumns) -> Self {
        value.0
    }
}

/// Numeric vector paired with the column names it was built for.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlignedVector {
    columns: Vec<String>,
    values: Vec<f64>,
}

impl AlignedVector {
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, column: &str) -> Option<f64> {
        self.columns
            .iter()
            .position(|name| name == column)
            .map(|index| self.values[index])
    }
}

/// Which layout produced the vector handed to the scorer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutKind {
    /// Reconciled against the model's declared feature list.
    Aligned,
    /// Degraded path for models that expose no feature list.
    Raw,
}

/// Feature layout decided once, when the model is loaded.
#[derive(Debug, Clone, PartialEq)]
pub enum FeatureLayout {
    Aligned(ExpectedColumns),
    Raw,
}

impl FeatureLayout {
    pub fn from_schema(schema: Option<ExpectedColumns>) -> Self {
        match schema {
            Some(columns) => Self::Aligned(columns),
            None => Self::Raw,
        }
    }

    pub fn kind(&self) -> LayoutKind {
        match self {
            Self::Aligned(_) => LayoutKind::Aligned,
            Self::Raw => LayoutKind::Raw,
        }
    }

    pub fn vectorize(&self, record: &RawRecord) -> Result<AlignedVector, FieldError> {
        match self {
            Self::Aligned(columns) => reconcile(record, columns),
            Self::Raw => raw_layout(record),
        }
    }
}

/// Column name for the indicator of `field == value`.
pub fn indicator_name(field: &str, value: &str) -> String {
    format!("{field}_{value}")
}

/// Numeric pass-through plus one active indicator per categorical field.
pub fn expand_record(record: &RawRecord) -> Result<BTreeMap<String, f64>, FieldError> {
    record.ensure_complete()?;

    let mut expanded = BTreeMap::new();
    for field in NUMERIC_FIELDS {
        expanded.insert(field.to_string(), record.number(field)?);
    }
    for field in CATEGORICAL_FIELDS {
        let value = record.category(field)?;
        expanded.insert(indicator_name(field, value), 1.0);
    }

    Ok(expanded)
}

/// Builds the vector in `columns` order, zero-filling anything the record does not produce.
pub fn reconcile(
    record: &RawRecord,
    columns: &ExpectedColumns,
) -> Result<AlignedVector, FieldError> {
    let expanded = expand_record(record)?;

    let values: Vec<f64> = columns
        .names()
        .iter()
        .map(|name| expanded.get(name).copied().unwrap_or(0.0))
        .collect();

    let dropped = expanded
        .keys()
        .filter(|name| !columns.contains(name))
        .count();
    debug!(
        expected = columns.len(),
        dropped, "reconciled applicant record against model schema"
    );

    Ok(AlignedVector {
        columns: columns.names().to_vec(),
        values,
    })
}

/// Natural record layout: the numeric fields in declaration order.
///
/// Category labels carry no numeric meaning without a vocabulary, so they are left out.
pub fn raw_layout(record: &RawRecord) -> Result<AlignedVector, FieldError> {
    record.ensure_complete()?;

    let mut columns = Vec::with_capacity(NUMERIC_FIELDS.len());
    let mut values = Vec::with_capacity(NUMERIC_FIELDS.len());
    for field in NUMERIC_FIELDS {
        values.push(record.number(field)?);
        columns.push(field.to_string());
    }
    for field in CATEGORICAL_FIELDS {
        record.category(field)?;
    }

    Ok(AlignedVector { columns, values })
}
