//! Document extraction back-ends and the scoped upload runner.
//!
//! Extraction is blocking work. [`with_scoped_upload`] writes the upload to
//! a temporary `.pdf` file on the blocking pool, runs the extractor against
//! it, and drops the file when the closure returns or unwinds.

use std::io::Write;
use std::path::Path;
use std::time::Duration;

use axum::body::Bytes;
use lopdf::Document;
use thiserror::Error;

use super::table::{RawTable, detect_tables};

/// Errors raised while reading a document.
#[derive(Debug, Error)]
pub enum ExtractionError {
    /// The PDF library could not process the file.
    #[error("{0}")]
    Pdf(#[from] lopdf::Error),

    /// Temporary file I/O failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Extraction did not finish within the configured limit.
    #[error("PDF processing timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    /// The blocking task panicked or was cancelled.
    #[error("PDF processing failed: {0}")]
    Worker(String),
}

/// Pulls tables and text out of a document on disk.
///
/// Implementations are synchronous; callers run them on the blocking pool.
pub trait DocumentExtractor: Send + Sync {
    /// Tables per page, in page order.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be read.
    fn extract_tables(&self, path: &Path) -> Result<Vec<Vec<RawTable>>, ExtractionError>;

    /// Plain text per page, in page order.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be read.
    fn extract_text(&self, path: &Path) -> Result<Vec<String>, ExtractionError>;
}

/// [`DocumentExtractor`] backed by `lopdf`.
///
/// Tables come from [`detect_tables`] run over each page's text, so only
/// layouts whose rows survive text extraction as single lines are found.
#[derive(Debug, Clone, Copy, Default)]
pub struct LopdfExtractor;

impl LopdfExtractor {
    fn page_texts(path: &Path) -> Result<Vec<String>, ExtractionError> {
        let document = Document::load(path)?;
        document
            .get_pages()
            .into_keys()
            .map(|page| document.extract_text(&[page]).map_err(ExtractionError::from))
            .collect()
    }
}

impl DocumentExtractor for LopdfExtractor {
    fn extract_tables(&self, path: &Path) -> Result<Vec<Vec<RawTable>>, ExtractionError> {
        let pages = Self::page_texts(path)?;
        Ok(pages.iter().map(|text| detect_tables(text)).collect())
    }

    fn extract_text(&self, path: &Path) -> Result<Vec<String>, ExtractionError> {
        Self::page_texts(path)
    }
}

/// Run `work` against the upload saved as a temporary file.
///
/// The file lives for exactly the duration of `work`, on the blocking pool.
/// If `timeout` elapses first the caller gets [`ExtractionError::Timeout`]
/// while the task finishes in the background and then removes the file.
///
/// # Errors
///
/// Returns the closure's error, an I/O error writing the file, a timeout,
/// or a worker failure if the task panicked.
pub async fn with_scoped_upload<T, F>(
    bytes: Bytes,
    timeout: Duration,
    work: F,
) -> Result<T, ExtractionError>
where
    T: Send + 'static,
    F: FnOnce(&Path) -> Result<T, ExtractionError> + Send + 'static,
{
    let task = tokio::task::spawn_blocking(move || {
        let mut file = tempfile::Builder::new()
            .prefix("roster-upload-")
            .suffix(".pdf")
            .tempfile()?;
        file.write_all(&bytes)?;
        file.flush()?;
        work(file.path())
    });

    match tokio::time::timeout(timeout, task).await {
        Ok(Ok(result)) => result,
        Ok(Err(join_error)) => Err(ExtractionError::Worker(join_error.to_string())),
        Err(_) => Err(ExtractionError::Timeout(timeout)),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::path::PathBuf;
    use std::sync::mpsc;

    use super::*;

    async fn wait_until_removed(path: &Path) -> bool {
        for _ in 0..100 {
            if !path.exists() {
                return true;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        false
    }

    #[tokio::test]
    async fn test_upload_visible_during_work_and_removed_after() {
        let (tx, rx) = mpsc::channel::<PathBuf>();
        let contents = with_scoped_upload(
            Bytes::from_static(b"%PDF-1.4 test"),
            Duration::from_secs(5),
            move |path| {
                tx.send(path.to_path_buf()).unwrap();
                assert_eq!(path.extension().unwrap(), "pdf");
                Ok(std::fs::read(path)?)
            },
        )
        .await
        .unwrap();

        assert_eq!(contents, b"%PDF-1.4 test");
        assert!(!rx.recv().unwrap().exists());
    }

    #[tokio::test]
    async fn test_upload_removed_after_failure() {
        let (tx, rx) = mpsc::channel::<PathBuf>();
        let result: Result<(), _> =
            with_scoped_upload(Bytes::from_static(b"junk"), Duration::from_secs(5), move |path| {
                tx.send(path.to_path_buf()).unwrap();
                Err(ExtractionError::Worker("bad page".to_owned()))
            })
            .await;

        assert!(matches!(result, Err(ExtractionError::Worker(_))));
        assert!(!rx.recv().unwrap().exists());
    }

    #[tokio::test]
    async fn test_upload_removed_after_panic() {
        let (tx, rx) = mpsc::channel::<PathBuf>();
        let result: Result<(), _> =
            with_scoped_upload(Bytes::from_static(b"junk"), Duration::from_secs(5), move |path| {
                tx.send(path.to_path_buf()).unwrap();
                panic!("extractor bug");
            })
            .await;

        assert!(matches!(result, Err(ExtractionError::Worker(_))));
        assert!(!rx.recv().unwrap().exists());
    }

    #[tokio::test]
    async fn test_timeout_reported_and_upload_removed_later() {
        let (tx, rx) = mpsc::channel::<PathBuf>();
        let result: Result<(), _> = with_scoped_upload(
            Bytes::from_static(b"slow"),
            Duration::from_millis(20),
            move |path| {
                tx.send(path.to_path_buf()).unwrap();
                std::thread::sleep(Duration::from_millis(200));
                Ok(())
            },
        )
        .await;

        assert!(matches!(result, Err(ExtractionError::Timeout(_))));
        let path = rx.recv().unwrap();
        assert!(wait_until_removed(&path).await);
    }

    fn pdf_with_lines(lines: &[&str]) -> Vec<u8> {
        use lopdf::content::{Content, Operation};
        use lopdf::{Object, Stream, dictionary};

        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });

        let mut operations = Vec::new();
        let mut y: i64 = 800;
        for line in lines {
            operations.push(Operation::new("BT", vec![]));
            operations.push(Operation::new("Tf", vec!["F1".into(), 10.into()]));
            operations.push(Operation::new("Td", vec![40.into(), y.into()]));
            operations.push(Operation::new("Tj", vec![Object::string_literal(*line)]));
            operations.push(Operation::new("ET", vec![]));
            y -= 14;
        }
        let content = Content { operations }.encode().unwrap();
        let content_id = doc.add_object(Stream::new(dictionary! {}, content));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![page_id.into()],
                "Count" => 1,
                "Resources" => resources_id,
                "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).unwrap();
        bytes
    }

    #[test]
    fn test_lopdf_table_rows_are_classified() {
        use crate::ingest::classify::{ClassifiedRow, Kind};
        use crate::ingest::{ParsedDocument, parse_document};
        use roster_core::Age;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&pdf_with_lines(&[
            "name | age | department | role",
            "Ann | 20 | CS | student",
            "Bo | 41 | Physics | staff",
        ]))
        .unwrap();

        let parsed = parse_document(&LopdfExtractor, file.path()).unwrap();
        assert_eq!(
            parsed,
            ParsedDocument::Rows(vec![
                ClassifiedRow {
                    kind: Kind::Student,
                    name: "Ann".to_owned(),
                    age: Some(Age::new(20).unwrap()),
                    department: "CS".to_owned(),
                },
                ClassifiedRow {
                    kind: Kind::Staff,
                    name: "Bo".to_owned(),
                    age: Some(Age::new(41).unwrap()),
                    department: "Physics".to_owned(),
                },
            ])
        );
    }

    #[test]
    fn test_lopdf_prose_falls_back_to_text() {
        use crate::ingest::{ParsedDocument, parse_document};

        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&pdf_with_lines(&["Quarterly report", "Nothing tabular here"]))
            .unwrap();

        let ParsedDocument::Text(text) = parse_document(&LopdfExtractor, file.path()).unwrap()
        else {
            panic!("expected a text fallback");
        };
        assert!(text.contains("Quarterly report"));
        assert!(text.contains("Nothing tabular here"));
    }

    #[test]
    fn test_lopdf_rejects_non_pdf() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"this is not a pdf").unwrap();
        let error = LopdfExtractor.extract_text(file.path()).unwrap_err();
        assert!(matches!(error, ExtractionError::Pdf(_)));
    }

    #[test]
    fn test_timeout_message() {
        let error = ExtractionError::Timeout(Duration::from_secs(30));
        assert_eq!(error.to_string(), "PDF processing timed out after 30s");
    }
}
