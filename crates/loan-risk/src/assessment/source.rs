use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

use super::record::{FieldValue, RawRecord, NUMERIC_FIELDS};

/// Errors raised while reading a single applicant record from a file.
#[derive(Debug)]
pub enum RecordImportError {
    Io(std::io::Error),
    Json(serde_json::Error),
    Csv(csv::Error),
    UnsupportedFormat(String),
    NoRows,
    MultipleRows(usize),
    InvalidNumber { field: String, value: String },
}

impl std::fmt::Display for RecordImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordImportError::Io(err) => write!(f, "failed to read applicant record: {}", err),
            RecordImportError::Json(err) => write!(f, "invalid applicant JSON: {}", err),
            RecordImportError::Csv(err) => write!(f, "invalid applicant CSV: {}", err),
            RecordImportError::UnsupportedFormat(extension) => write!(
                f,
                "unsupported record format '{}': expected .json or .csv",
                extension
            ),
            RecordImportError::NoRows => write!(f, "applicant CSV contains no data row"),
            RecordImportError::MultipleRows(count) => write!(
                f,
                "applicant CSV contains {} data rows; exactly one record is scored per request",
                count
            ),
            RecordImportError::InvalidNumber { field, value } => {
                write!(f, "column '{}' is not numeric: '{}'", field, value)
            }
        }
    }
}

impl std::error::Error for RecordImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RecordImportError::Io(err) => Some(err),
            RecordImportError::Json(err) => Some(err),
            RecordImportError::Csv(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for RecordImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for RecordImportError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}

impl From<csv::Error> for RecordImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

pub struct RecordImporter;

impl RecordImporter {
    /// Reads a record from a `.json` object or a `.csv` file with one data row.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<RawRecord, RecordImportError> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();

        let file = std::fs::File::open(path)?;
        match extension.as_str() {
            "json" => Self::from_json_reader(file),
            "csv" => Self::from_csv_reader(file),
            _ => Err(RecordImportError::UnsupportedFormat(extension)),
        }
    }

    pub fn from_json_reader<R: Read>(reader: R) -> Result<RawRecord, RecordImportError> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Numeric columns are parsed as numbers; every other column is kept as a label.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<RawRecord, RecordImportError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let headers = csv_reader.headers()?.clone();
        let numeric: HashSet<&str> = NUMERIC_FIELDS.into_iter().collect();

        let rows = csv_reader
            .records()
            .collect::<Result<Vec<csv::StringRecord>, csv::Error>>()?;
        let row = match rows.as_slice() {
            [] => return Err(RecordImportError::NoRows),
            [row] => row,
            many => return Err(RecordImportError::MultipleRows(many.len())),
        };

        let mut record = RawRecord::new();
        for (field, cell) in headers.iter().zip(row.iter()) {
            if cell.is_empty() {
                continue;
            }
            let value = if numeric.contains(field) {
                let number = cell
                    .parse::<f64>()
                    .map_err(|_| RecordImportError::InvalidNumber {
                        field: field.to_string(),
                        value: cell.to_string(),
                    })?;
                FieldValue::Number(number)
            } else {
                FieldValue::Category(cell.to_string())
            };
            record.insert(field, value);
        }

        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "Applicant_ID,Applicant_Income,Coapplicant_Income,Age,Dependents,\
Credit_Score,Existing_Loans,DTI_Ratio,Savings,Collateral_Value,Loan_Amount,Loan_Term,\
Employment_Status,Marital_Status,Loan_Purpose,Property_Area,Education_Level,Gender,\
Employer_Category";

    const ROW: &str = "7,6200,1500,42,2,715,1,0.22,18000,45000,25000,60,\
Self-employed,Married,Home,Semiurban,Graduate,Female,MNC";

    #[test]
    fn csv_row_becomes_typed_record() {
        let data = format!("{HEADER}\n{ROW}\n");
        let record = RecordImporter::from_csv_reader(data.as_bytes()).expect("csv parses");

        assert_eq!(record.len(), 19);
        assert_eq!(record.first_missing(), None);
        assert_eq!(record.number("Credit_Score"), Ok(715.0));
        assert_eq!(record.category("Employment_Status"), Ok("Self-employed"));
    }

    #[test]
    fn blank_cells_are_treated_as_missing() {
        let row = ROW.replacen("715", "", 1);
        let data = format!("{HEADER}\n{row}\n");
        let record = RecordImporter::from_csv_reader(data.as_bytes()).expect("csv parses");

        assert_eq!(record.first_missing(), Some("Credit_Score"));
    }

    #[test]
    fn multiple_rows_are_rejected() {
        let data = format!("{HEADER}\n{ROW}\n{ROW}\n");
        match RecordImporter::from_csv_reader(data.as_bytes()) {
            Err(RecordImportError::MultipleRows(2)) => {}
            other => panic!("expected multiple-row rejection, got {other:?}"),
        }
    }

    #[test]
    fn header_only_csv_has_no_rows() {
        let data = format!("{HEADER}\n");
        assert!(matches!(
            RecordImporter::from_csv_reader(data.as_bytes()),
            Err(RecordImportError::NoRows)
        ));
    }

    #[test]
    fn non_numeric_cell_in_numeric_column_is_rejected() {
        let row = ROW.replacen("42", "forty-two", 1);
        let data = format!("{HEADER}\n{row}\n");
        match RecordImporter::from_csv_reader(data.as_bytes()) {
            Err(RecordImportError::InvalidNumber { field, value }) => {
                assert_eq!(field, "Age");
                assert_eq!(value, "forty-two");
            }
            other => panic!("expected invalid number, got {other:?}"),
        }
    }

    #[test]
    fn json_object_becomes_record() {
        let json = r#"{"Age": 30, "Gender": "Male"}"#;
        let record = RecordImporter::from_json_reader(json.as_bytes()).expect("json parses");
        assert_eq!(record.number("Age"), Ok(30.0));
        assert_eq!(record.category("Gender"), Ok("Male"));
    }
}
