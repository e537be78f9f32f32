//! CSV ingestion of solution records.
//!
//! Parsing is lenient by construction:
//! - the first row holds the headers, every cell is trimmed;
//! - rows may have more or fewer cells than the header (`flexible`);
//! - stray quotes are recovered by the csv reader instead of failing the file;
//! - a row that still cannot be decoded is logged and skipped.
//!
//! Within one run only the first row of each "Solution ID" is kept; later rows
//! with the same key are dropped so a single file cannot flip-flop a record.
//! Only stream-level problems (file unreadable, header unreadable, no key
//! column) surface as [`IngestError`].

mod columns;

use std::collections::HashSet;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use common::model::solution::{SolutionField, SolutionFields, SolutionInput};
use csv::{ReaderBuilder, Trim};
use log::{debug, info, warn};
use thiserror::Error;

use crate::store::RecordStore;

pub use columns::SOLUTION_ID_HEADER;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("cannot open data file: {0}")]
    Io(#[from] std::io::Error),
    #[error("cannot read CSV header row: {0}")]
    Header(csv::Error),
    #[error("CSV has no 'Solution ID' column")]
    MissingKeyColumn,
    #[error("CSV stream failed: {0}")]
    Read(csv::Error),
}

/// Counters of one ingestion run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestSummary {
    /// Unique records upserted.
    pub loaded: usize,
    /// Rows dropped because their key already appeared earlier in the file.
    pub duplicates: usize,
    /// Rows that could not be decoded or had no key.
    pub skipped: usize,
}

/// Parsed but not yet stored rows.
#[derive(Debug, Default)]
pub struct ParsedSolutions {
    pub records: Vec<SolutionInput>,
    pub duplicates: usize,
    pub skipped: usize,
}

impl ParsedSolutions {
    /// Upserts every record into `store`.
    pub fn apply(self, store: &mut RecordStore) -> IngestSummary {
        let summary = IngestSummary {
            loaded: self.records.len(),
            duplicates: self.duplicates,
            skipped: self.skipped,
        };
        for record in self.records {
            store.upsert_solution(record);
        }
        summary
    }
}

pub fn parse_solutions<R: Read>(reader: R) -> Result<ParsedSolutions, IngestError> {
    let mut csv_reader = ReaderBuilder::new()
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let headers = csv_reader.headers().map_err(IngestError::Header)?.clone();
    let key_index = headers
        .iter()
        .position(columns::is_solution_id)
        .ok_or(IngestError::MissingKeyColumn)?;
    let mapped: Vec<(usize, SolutionField)> = headers
        .iter()
        .enumerate()
        .filter_map(|(idx, header)| columns::field_for_header(header).map(|f| (idx, f)))
        .collect();
    debug!(
        "CSV header has {} columns, {} mapped",
        headers.len(),
        mapped.len()
    );

    let mut parsed = ParsedSolutions::default();
    let mut seen = HashSet::new();

    for (row, result) in csv_reader.records().enumerate() {
        // +2: header row and 1-based numbering
        let line = row + 2;
        let record = match result {
            Ok(record) => record,
            Err(err) if err.is_io_error() => return Err(IngestError::Read(err)),
            Err(err) => {
                warn!("Skipping unparsable CSV row {}: {}", line, err);
                parsed.skipped += 1;
                continue;
            }
        };

        let key = record.get(key_index).unwrap_or_default().trim();
        if key.is_empty() {
            debug!("Skipping CSV row {} without a solution id", line);
            parsed.skipped += 1;
            continue;
        }
        if !seen.insert(key.to_string()) {
            debug!("Dropping duplicate solution id '{}' at row {}", key, line);
            parsed.duplicates += 1;
            continue;
        }

        let mut fields = SolutionFields::default();
        for (idx, field) in &mapped {
            if fields.get(*field).is_none() {
                let value = record.get(*idx).unwrap_or_default().to_string();
                fields.set(*field, Some(value));
            }
        }

        parsed.records.push(SolutionInput {
            solution_id: key.to_string(),
            fields,
        });
    }

    Ok(parsed)
}

/// Parses `reader` and upserts the result into `store`.
pub fn ingest<R: Read>(reader: R, store: &mut RecordStore) -> Result<IngestSummary, IngestError> {
    let summary = parse_solutions(reader)?.apply(store);
    info!(
        "Loaded {} unique solutions ({} duplicate rows dropped, {} rows skipped)",
        summary.loaded, summary.duplicates, summary.skipped
    );
    Ok(summary)
}

/// Startup load: replaces all solutions with the content of `path`.
///
/// A missing file is not an error and leaves the store untouched. The file is
/// parsed completely before the store is cleared, so an unreadable file never
/// wipes existing records.
pub fn load_file(
    path: &Path,
    store: &mut RecordStore,
) -> Result<Option<IngestSummary>, IngestError> {
    if !path.exists() {
        info!("No data file at {}, starting empty", path.display());
        return Ok(None);
    }

    let parsed = parse_solutions(BufReader::new(File::open(path)?))?;
    store.clear_solutions();
    let summary = parsed.apply(store);
    info!(
        "Loaded {} unique solutions from {} ({} duplicate rows dropped, {} rows skipped)",
        summary.loaded,
        path.display(),
        summary.duplicates,
        summary.skipped
    );
    Ok(Some(summary))
}
