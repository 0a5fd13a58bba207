//! Integration tests for Roster.
//!
//! # Running Tests
//!
//! ```bash
//! # Apply migrations and start the server
//! cargo run -p roster-cli -- migrate
//! cargo run -p roster-server
//!
//! # Run integration tests
//! cargo test -p roster-integration-tests -- --ignored
//! ```
//!
//! The server URL defaults to `http://localhost:8000` and can be changed
//! with `ROSTER_BASE_URL`.

use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, Stream, dictionary};
use reqwest::Client;

/// Base URL for the roster API (configurable via environment).
#[must_use]
pub fn base_url() -> String {
    std::env::var("ROSTER_BASE_URL").unwrap_or_else(|_| "http://localhost:8000".to_string())
}

/// A plain HTTP client.
///
/// # Panics
///
/// Panics if the client cannot be built.
#[must_use]
pub fn client() -> Client {
    Client::builder()
        .build()
        .expect("Failed to create HTTP client")
}

/// A department name no other test run will share.
#[must_use]
pub fn unique_department(prefix: &str) -> String {
    format!("{prefix}-{}", uuid::Uuid::new_v4().simple())
}

/// Build a one-page PDF with each entry of `lines` on its own text line.
///
/// # Panics
///
/// Panics if the document cannot be encoded.
#[must_use]
pub fn pdf_with_lines(lines: &[&str]) -> Vec<u8> {
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
    let content = Content { operations };
    let content_id = doc.add_object(Stream::new(
        dictionary! {},
        content.encode().expect("Failed to encode page content"),
    ));

    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
    });
    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => vec![page_id.into()],
        "Count" => 1,
        "Resources" => resources_id,
        "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).expect("Failed to write PDF");
    bytes
}
