use std::sync::Arc;

use crate::services::reel::ReelSettings;
use crate::store::{InMemoryStore, MovieStore};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn MovieStore>,
    pub reel: ReelSettings,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    /// Creates state backed by an empty in-memory store
    pub fn new() -> Self {
        Self::with_store(Arc::new(InMemoryStore::new()), ReelSettings::default())
    }

    pub fn with_store(store: Arc<dyn MovieStore>, reel: ReelSettings) -> Self {
        Self { store, reel }
    }
}
