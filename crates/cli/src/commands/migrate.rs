//! Database migration command.
//!
//! # Usage
//!
//! ```bash
//! roster-cli migrate
//! ```
//!
//! # Environment Variables
//!
//! - `ROSTER_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//!
//! # Migration Files
//!
//! Migrations live in `crates/server/migrations/` and are embedded at
//! compile time:
//! ```text
//! migrations/
//! └── 20261016000001_create_roster_tables.sql
//! ```

use roster_server::config::{ConfigError, ServerConfig};
use roster_server::db;

/// Errors from running migrations.
#[derive(Debug, thiserror::Error)]
pub enum MigrationError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Run the roster schema migrations.
///
/// # Errors
///
/// Returns an error if the database URL is missing, the database is
/// unreachable, or a migration fails.
pub async fn run() -> Result<(), MigrationError> {
    let config = ServerConfig::from_env()?;

    tracing::info!("Connecting to roster database...");
    let pool = db::create_pool(&config.database_url).await?;

    tracing::info!("Running roster migrations...");
    sqlx::migrate!("../server/migrations").run(&pool).await?;

    tracing::info!("Roster migrations complete!");
    Ok(())
}
