//! PDF upload handlers.
//!
//! Both endpoints read the multipart field named `file`. A request without
//! that field, or without a multipart body at all, is a `MissingInput`.

use axum::{
    Json,
    body::Bytes,
    extract::{Multipart, State, multipart::{MultipartError, MultipartRejection}},
};
use serde::Serialize;
use tracing::instrument;

use crate::ingest::{self, IngestError, IngestOutcome};
use crate::state::AppState;

/// Multipart field carrying the document.
pub const FILE_FIELD: &str = "file";

/// Response body for `POST /upload-pdf`.
#[derive(Debug, Serialize)]
pub struct PageTextResponse {
    pub status: &'static str,
    pub parsed_data: Vec<String>,
}

/// Ingest a PDF into student, staff and employee records.
///
/// POST /api/upload-pdf
#[instrument(skip_all)]
pub async fn upload_pdf(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<IngestOutcome>, IngestError> {
    let upload = read_file_field(multipart).await?;
    tracing::info!(bytes = upload.len(), "PDF received");

    let outcome = ingest::ingest(
        state.store(),
        state.extractor(),
        upload,
        state.config().pdf_timeout,
    )
    .await?;

    Ok(Json(outcome))
}

/// Return the text of every page without storing anything.
///
/// POST /upload-pdf
#[instrument(skip_all)]
pub async fn page_text(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<PageTextResponse>, IngestError> {
    let upload = read_file_field(multipart).await?;
    let pages = ingest::page_texts(state.extractor(), upload, state.config().pdf_timeout).await?;

    Ok(Json(PageTextResponse {
        status: "success",
        parsed_data: pages,
    }))
}

async fn read_file_field(
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Bytes, IngestError> {
    let Ok(mut multipart) = multipart else {
        return Err(IngestError::MissingInput);
    };

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(unreadable)?
    {
        if field.name() == Some(FILE_FIELD) {
            return field
                .bytes()
                .await
                .map_err(unreadable);
        }
    }

    Err(IngestError::MissingInput)
}

/// Keeps the upstream status so an oversized body stays a 413.
fn unreadable(error: MultipartError) -> IngestError {
    IngestError::Multipart {
        status: error.status(),
        message: error.body_text(),
    }
}
