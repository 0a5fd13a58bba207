//! Roster Core - Shared types library.
//!
//! This crate provides common types used across all Roster components:
//! - `server` - JSON API for students, staff and employees
//! - `cli` - Command-line tools for migrations and offline PDF previews
//!
//! # Architecture
//!
//! The core crate contains only types and validation - no I/O, no database
//! access, no HTTP. The optional `postgres` feature adds `sqlx` encoding.
//!
//! # Modules
//!
//! - [`types`] - Typed record IDs, ages, salaries and bounded text fields

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
