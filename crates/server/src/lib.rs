//! Roster server library.
//!
//! JSON API over student, staff and employee records, PDF ingestion into
//! those records, and dashboard statistics. Exposed as a library so the
//! router can be driven in tests and the ingestion pipeline reused by the
//! CLI.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod ingest;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod state;
pub mod stats;
