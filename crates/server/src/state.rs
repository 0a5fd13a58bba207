//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::ServerConfig;
use crate::db::Store;
use crate::ingest::extract::DocumentExtractor;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`. Handlers reach the database only through
/// [`AppState::store`].
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ServerConfig,
    store: Arc<dyn Store>,
    extractor: Arc<dyn DocumentExtractor>,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(
        config: ServerConfig,
        store: Arc<dyn Store>,
        extractor: Arc<dyn DocumentExtractor>,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                store,
                extractor,
            }),
        }
    }

    /// Get a reference to the server configuration.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.inner.config
    }

    /// Get the record store.
    #[must_use]
    pub fn store(&self) -> &dyn Store {
        self.inner.store.as_ref()
    }

    /// Get a handle to the document extractor.
    ///
    /// Returned owned so it can move onto the blocking pool.
    #[must_use]
    pub fn extractor(&self) -> Arc<dyn DocumentExtractor> {
        Arc::clone(&self.inner.extractor)
    }
}
