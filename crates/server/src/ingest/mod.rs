//! PDF ingestion: turn an uploaded document into records or a text preview.
//!
//! The pipeline has three stages, each with its own error type:
//!
//! 1. **Extraction** (blocking pool): save the upload to a scoped temp file,
//!    pull tables out page by page and classify every row. When no row is
//!    found, pull the page text instead. Fails with [`ExtractionError`].
//! 2. **Storage**: insert the classified rows one at a time, in document
//!    order. Fails with [`RepositoryError`]. Earlier inserts are kept.
//! 3. **Response**: counts per record type, or a 400-character preview.
//!
//! Both failures surface to the caller as [`IngestError`].

pub mod classify;
pub mod extract;
pub mod table;

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use axum::Json;
use axum::body::Bytes;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

use crate::db::{RepositoryError, Store};
use classify::{ClassifiedRow, Kind};
use extract::{DocumentExtractor, ExtractionError, with_scoped_upload};
use table::Table;

/// Longest text preview returned when a document has no tables.
pub const PREVIEW_CHARS: usize = 400;

/// Errors from the ingestion endpoints.
#[derive(Debug, Error)]
pub enum IngestError {
    /// The request had no `file` field.
    #[error("file required")]
    MissingInput,

    /// The multipart body could not be read.
    #[error("invalid upload: {message}")]
    Multipart { status: StatusCode, message: String },

    /// The document could not be processed.
    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    /// An insert failed part-way through the rows.
    #[error(transparent)]
    Storage(#[from] RepositoryError),
}

impl IntoResponse for IngestError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::MissingInput => StatusCode::BAD_REQUEST,
            Self::Multipart { status, .. } => *status,
            Self::Extraction(_) | Self::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "PDF ingestion failed"
            );
        }

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

/// Records created per type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CreatedCounts {
    pub students: u64,
    pub staff: u64,
    pub employees: u64,
}

/// What an upload produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum IngestOutcome {
    /// Rows were found and inserted.
    Created { ok: bool, created: CreatedCounts },
    /// No tables were found; nothing was inserted.
    TextPreview { ok: bool, text_preview: String },
}

impl IngestOutcome {
    fn created(created: CreatedCounts) -> Self {
        Self::Created { ok: true, created }
    }

    fn preview(text: &str) -> Self {
        Self::TextPreview {
            ok: true,
            text_preview: preview(text),
        }
    }
}

/// A document after extraction, before anything is stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ParsedDocument {
    /// Classified rows in page, table, row order.
    Rows(Vec<ClassifiedRow>),
    /// Page text joined with newlines (no table rows anywhere).
    Text(String),
}

/// Extract and classify a document on disk.
///
/// Blocking. Falls back to page text when no table has a data row.
/// A `roll` column in any table classifies every row as a student.
///
/// # Errors
///
/// Returns an error if the extractor cannot read the document.
pub fn parse_document(
    extractor: &dyn DocumentExtractor,
    path: &Path,
) -> Result<ParsedDocument, ExtractionError> {
    let tables: Vec<Table> = extractor
        .extract_tables(path)?
        .into_iter()
        .flatten()
        .filter_map(Table::from_raw)
        .collect();

    // Headers are pooled across the document, so one `roll` column anywhere
    // marks every row as a student.
    let roll_in_document = tables.iter().any(|table| table.has_column("roll"));
    let rows: Vec<ClassifiedRow> = tables
        .iter()
        .flat_map(|table| table.rows())
        .map(|row| ClassifiedRow::from_row(&row, roll_in_document))
        .collect();

    if !rows.is_empty() {
        return Ok(ParsedDocument::Rows(rows));
    }

    let pages = extractor.extract_text(path)?;
    Ok(ParsedDocument::Text(pages.join("\n")))
}

/// The first [`PREVIEW_CHARS`] characters of `text`.
#[must_use]
pub fn preview(text: &str) -> String {
    text.chars().take(PREVIEW_CHARS).collect()
}

/// Ingest an uploaded document into `store`.
///
/// # Errors
///
/// Returns [`IngestError::Extraction`] if the document cannot be processed
/// and [`IngestError::Storage`] if an insert fails. Rows inserted before a
/// failing insert are not rolled back.
pub async fn ingest(
    store: &dyn Store,
    extractor: Arc<dyn DocumentExtractor>,
    upload: Bytes,
    timeout: Duration,
) -> Result<IngestOutcome, IngestError> {
    let parsed = with_scoped_upload(upload, timeout, move |path| {
        parse_document(extractor.as_ref(), path)
    })
    .await?;

    match parsed {
        ParsedDocument::Rows(rows) => {
            tracing::info!(rows = rows.len(), "Inserting rows from PDF");
            let created = insert_rows(store, rows).await?;
            tracing::info!(
                students = created.students,
                staff = created.staff,
                employees = created.employees,
                "PDF ingestion complete"
            );
            Ok(IngestOutcome::created(created))
        }
        ParsedDocument::Text(text) => {
            tracing::info!(chars = text.chars().count(), "No tables found, returning text preview");
            Ok(IngestOutcome::preview(&text))
        }
    }
}

async fn insert_rows(
    store: &dyn Store,
    rows: Vec<ClassifiedRow>,
) -> Result<CreatedCounts, RepositoryError> {
    let mut created = CreatedCounts::default();

    for row in rows {
        let result = match row.kind {
            Kind::Student => store
                .students()
                .create(&row.into_student())
                .await
                .map(|_| created.students += 1),
            Kind::Staff => store
                .staff()
                .create(&row.into_staff())
                .await
                .map(|_| created.staff += 1),
            Kind::Employee => store
                .employees()
                .create(&row.into_employee())
                .await
                .map(|_| created.employees += 1),
        };

        if let Err(error) = result {
            tracing::warn!(
                students = created.students,
                staff = created.staff,
                employees = created.employees,
                "Insert failed mid-upload; earlier rows are kept"
            );
            return Err(error);
        }
    }

    Ok(created)
}

/// Plain text of every page, in page order. Stores nothing.
///
/// # Errors
///
/// Returns an error if the document cannot be processed.
pub async fn page_texts(
    extractor: Arc<dyn DocumentExtractor>,
    upload: Bytes,
    timeout: Duration,
) -> Result<Vec<String>, IngestError> {
    let pages = with_scoped_upload(upload, timeout, move |path| extractor.extract_text(path)).await?;
    Ok(pages)
}


#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use roster_core::Age;

    use super::testing::FakeExtractor;
    use super::*;
    use crate::db::memory::MemoryStore;

    const TIMEOUT: Duration = Duration::from_secs(5);

    async fn run(store: &MemoryStore, extractor: FakeExtractor) -> Result<IngestOutcome, IngestError> {
        ingest(store, Arc::new(extractor), Bytes::from_static(b"%PDF"), TIMEOUT).await
    }

    #[tokio::test]
    async fn test_student_row_is_created() {
        let store = MemoryStore::new();
        let extractor = FakeExtractor::with_table(&[
            &["name", "age", "department", "role"],
            &["Ann", "20", "CS", "student"],
        ]);

        let outcome = run(&store, extractor).await.unwrap();
        assert_eq!(
            outcome,
            IngestOutcome::created(CreatedCounts {
                students: 1,
                staff: 0,
                employees: 0
            })
        );

        let students = store.students().list().await.unwrap();
        assert_eq!(students.len(), 1);
        assert_eq!(students[0].name, "Ann");
        assert_eq!(students[0].age, Some(Age::new(20).unwrap()));
        assert_eq!(students[0].department, "CS");
    }

    #[tokio::test]
    async fn test_rows_from_every_page_and_table_in_order() {
        let store = MemoryStore::new();
        let grid = |rows: &[&[&str]]| -> table::RawTable {
            rows.iter()
                .map(|row| row.iter().map(|cell| Some((*cell).to_owned())).collect())
                .collect()
        };
        let extractor = FakeExtractor {
            tables: vec![
                vec![
                    grid(&[&["name", "role"], &["A1", "staff"]]),
                    grid(&[&["name"], &["A2"]]),
                ],
                vec![],
                vec![grid(&[&["Name", "Role"], &["B1", "Student"], &["B2", "student"]])],
            ],
            ..FakeExtractor::default()
        };

        let outcome = run(&store, extractor).await.unwrap();
        assert_eq!(
            outcome,
            IngestOutcome::created(CreatedCounts {
                students: 2,
                staff: 1,
                employees: 1
            })
        );
        let names: Vec<String> = store
            .students()
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(names, vec!["B1", "B2"]);
    }

    #[tokio::test]
    async fn test_roll_column_in_one_table_makes_every_row_a_student() {
        let store = MemoryStore::new();
        let grid = |rows: &[&[&str]]| -> table::RawTable {
            rows.iter()
                .map(|row| row.iter().map(|cell| Some((*cell).to_owned())).collect())
                .collect()
        };
        let extractor = FakeExtractor {
            tables: vec![
                vec![grid(&[&["name", "roll"], &["A", "1"]])],
                vec![grid(&[&["name", "role"], &["B", "staff"]])],
            ],
            ..FakeExtractor::default()
        };

        let outcome = run(&store, extractor).await.unwrap();
        assert_eq!(
            outcome,
            IngestOutcome::created(CreatedCounts {
                students: 2,
                staff: 0,
                employees: 0
            })
        );
    }

    #[tokio::test]
    async fn test_bad_age_does_not_abort_later_rows() {
        let store = MemoryStore::new();
        let extractor =
            FakeExtractor::with_table(&[&["name", "age"], &["Ann", "N/A"], &["Bo", "40"]]);

        run(&store, extractor).await.unwrap();
        let employees = store.employees().list().await.unwrap();
        assert_eq!(employees.len(), 2);
        assert_eq!(employees[0].age, None);
        assert_eq!(employees[1].age, Some(Age::new(40).unwrap()));
    }

    #[tokio::test]
    async fn test_no_tables_returns_text_preview() {
        let store = MemoryStore::new();
        let long_page = "x".repeat(390);
        let extractor = FakeExtractor::with_text(&[&long_page, "second page"]);

        let outcome = run(&store, extractor).await.unwrap();
        let expected: String = format!("{long_page}\nsecond page").chars().take(400).collect();
        assert_eq!(outcome, IngestOutcome::preview(&expected));
        if let IngestOutcome::TextPreview { text_preview, .. } = outcome {
            assert_eq!(text_preview.chars().count(), 400);
        }
        assert_eq!(store.employees().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_header_only_tables_fall_back_to_text() {
        let store = MemoryStore::new();
        let mut extractor = FakeExtractor::with_table(&[&["name", "age"]]);
        extractor.pages = vec!["just a header".to_owned()];

        let outcome = run(&store, extractor).await.unwrap();
        assert_eq!(outcome, IngestOutcome::preview("just a header"));
    }

    #[tokio::test]
    async fn test_extraction_failure_is_server_error() {
        let store = MemoryStore::new();
        let error = run(&store, FakeExtractor::failing()).await.unwrap_err();
        assert!(matches!(error, IngestError::Extraction(ExtractionError::Pdf(_))));
        assert_eq!(
            error.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn test_failed_insert_keeps_earlier_rows() {
        let store = MemoryStore::failing_after(2);
        let extractor = FakeExtractor::with_table(&[
            &["name", "role"],
            &["Ann", "student"],
            &["Bo", "staff"],
            &["Cy", "staff"],
            &["Di", "student"],
        ]);

        let error = run(&store, extractor).await.unwrap_err();
        assert!(matches!(error, IngestError::Storage(_)));
        assert_eq!(store.students().count().await.unwrap(), 1);
        assert_eq!(store.staff().count().await.unwrap(), 1);
    }

    #[test]
    fn test_outcome_json_shapes() {
        let created = serde_json::to_value(IngestOutcome::created(CreatedCounts {
            students: 1,
            staff: 2,
            employees: 3,
        }))
        .unwrap();
        assert_eq!(
            created,
            json!({"ok": true, "created": {"students": 1, "staff": 2, "employees": 3}})
        );

        let preview = serde_json::to_value(IngestOutcome::preview("hello")).unwrap();
        assert_eq!(preview, json!({"ok": true, "text_preview": "hello"}));
    }

    #[test]
    fn test_preview_counts_characters_not_bytes() {
        let text = "é".repeat(500);
        assert_eq!(preview(&text).chars().count(), PREVIEW_CHARS);
        assert_eq!(preview("short"), "short");
    }

    #[test]
    fn test_missing_input_message() {
        let response = IngestError::MissingInput.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(IngestError::MissingInput.to_string(), "file required");
    }
}
