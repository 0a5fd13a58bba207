//! Offline PDF ingestion preview.
//!
//! Runs the same extraction and classification as `POST /api/upload-pdf`
//! against a local file and prints the result instead of storing it.
//!
//! ```bash
//! roster-cli ingest staff-list.pdf
//! ```

use std::path::PathBuf;

use serde_json::{Value, json};

use roster_server::ingest::classify::{ClassifiedRow, Kind};
use roster_server::ingest::extract::{ExtractionError, LopdfExtractor};
use roster_server::ingest::{CreatedCounts, ParsedDocument, parse_document, preview};

/// Errors from the ingest preview.
#[derive(Debug, thiserror::Error)]
pub enum IngestPreviewError {
    #[error("Extraction failed: {0}")]
    Extraction(#[from] ExtractionError),

    #[error("Extraction task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("Failed to encode output: {0}")]
    Json(#[from] serde_json::Error),
}

/// Parse `path` and print what an upload would produce.
///
/// # Errors
///
/// Returns an error if the PDF cannot be read.
pub async fn run(path: PathBuf) -> Result<(), IngestPreviewError> {
    tracing::info!(path = %path.display(), "Parsing PDF");
    let parsed =
        tokio::task::spawn_blocking(move || parse_document(&LopdfExtractor, &path)).await??;

    let report = render(&parsed);

    #[allow(clippy::print_stdout)]
    {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }
    Ok(())
}

fn render(parsed: &ParsedDocument) -> Value {
    match parsed {
        ParsedDocument::Rows(rows) => json!({
            "would_create": tally(rows),
            "rows": rows,
        }),
        ParsedDocument::Text(text) => json!({ "text_preview": preview(text) }),
    }
}

fn tally(rows: &[ClassifiedRow]) -> CreatedCounts {
    rows.iter().fold(CreatedCounts::default(), |mut counts, row| {
        match row.kind {
            Kind::Student => counts.students += 1,
            Kind::Staff => counts.staff += 1,
            Kind::Employee => counts.employees += 1,
        }
        counts
    })
}
