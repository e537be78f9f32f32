use std::io::{BufReader, Write};

use actix_multipart::{Multipart, MultipartError};
use actix_web::{web, HttpResponse, Responder};
use common::responses::{ErrorBody, UploadSummary};
use futures_util::StreamExt;
use log::{info, warn};
use tempfile::NamedTempFile;
use thiserror::Error;

use crate::ingest::{self, IngestError, IngestSummary};
use crate::state::AppState;

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("upload stream failed: {0}")]
    Multipart(#[from] MultipartError),
    #[error("cannot spool upload: {0}")]
    Io(#[from] std::io::Error),
    #[error("missing 'file' field")]
    MissingFile,
    #[error(transparent)]
    Ingest(#[from] IngestError),
}

/// HTTP wrapper: `200 OK` with import counters, `400 Bad Request` otherwise.
pub async fn process(state: web::Data<AppState>, payload: Multipart) -> impl Responder {
    match upload_solutions(&state, payload).await {
        Ok(summary) => HttpResponse::Ok().json(UploadSummary {
            message: format!("Imported {} solutions", summary.loaded),
            imported: summary.loaded,
            duplicates: summary.duplicates,
            skipped: summary.skipped,
        }),
        Err(e) => {
            warn!("Solution upload rejected: {}", e);
            HttpResponse::BadRequest().json(ErrorBody::new(format!("Could not import CSV: {}", e)))
        }
    }
}

/// Streams the `file` field to a temp file, parses it and upserts the rows.
///
/// The temp file is a `NamedTempFile`, so it is removed when this function
/// returns, on success and on every error path.
pub async fn upload_solutions(
    state: &AppState,
    mut payload: Multipart,
) -> Result<IngestSummary, UploadError> {
    let mut spooled: Option<NamedTempFile> = None;

    while let Some(item) = payload.next().await {
        let mut field = item?;
        let name = field
            .content_disposition()
            .and_then(|cd| cd.get_name().map(|n| n.to_string()));
        if name.as_deref() != Some("file") {
            continue;
        }

        let mut file = NamedTempFile::new()?;
        while let Some(chunk) = field.next().await {
            file.write_all(&chunk?)?;
        }
        file.flush()?;
        spooled = Some(file);
    }

    let spooled = spooled.ok_or(UploadError::MissingFile)?;
    let parsed = ingest::parse_solutions(BufReader::new(spooled.reopen()?))?;
    let summary = parsed.apply(&mut *state.store.write().await);
    info!(
        "Upload imported {} solutions ({} duplicate rows dropped, {} rows skipped)",
        summary.loaded, summary.duplicates, summary.skipped
    );
    Ok(summary)
}
