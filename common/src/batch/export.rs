//! Flattens evaluation results into a CSV table: one row per solution, one
//! `1`/`0` column per criterion and a final overall column.

use thiserror::Error;

use crate::model::evaluation::{EvaluationResponse, CRITERIA};

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("csv write error: {0}")]
    Csv(#[from] csv::Error),
    #[error("csv buffer error: {0}")]
    Buffer(#[from] csv::IntoInnerError<csv::Writer<Vec<u8>>>),
    #[error("csv output is not utf-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// A flattened result row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportRow {
    pub solution_id: String,
    /// Pass flags for criteria 1..=5; a criterion missing from the response counts as failed.
    pub passed: [bool; 5],
    pub overall: bool,
}

impl ExportRow {
    pub fn from_response(solution_id: &str, response: &EvaluationResponse) -> Self {
        let mut passed = [false; 5];
        for (slot, criterion) in passed.iter_mut().zip(CRITERIA.iter()) {
            *slot = response
                .criterion(criterion.id)
                .is_some_and(|c| c.result.is_pass());
        }
        Self {
            solution_id: solution_id.to_string(),
            passed,
            overall: response.overall_verdict.is_pass(),
        }
    }
}

pub fn header() -> Vec<String> {
    let mut header = vec!["Solution ID".to_string()];
    header.extend(CRITERIA.iter().map(|c| c.name.to_string()));
    header.push("Overall".to_string());
    header
}

/// Writes `rows` (in the given order) as CSV text including the header row.
pub fn to_csv<'a, I>(rows: I) -> Result<String, ExportError>
where
    I: IntoIterator<Item = (&'a str, &'a EvaluationResponse)>,
{
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(header())?;

    for (solution_id, response) in rows {
        let row = ExportRow::from_response(solution_id, response);
        let mut record = vec![row.solution_id];
        record.extend(row.passed.iter().map(|p| flag(*p).to_string()));
        record.push(flag(row.overall).to_string());
        writer.write_record(&record)?;
    }

    let bytes = writer.into_inner()?;
    Ok(String::from_utf8(bytes)?)
}

fn flag(passed: bool) -> &'static str {
    if passed {
        "1"
    } else {
        "0"
    }
}
