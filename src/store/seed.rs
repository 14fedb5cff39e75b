use serde::Deserialize;
use std::path::Path;

use crate::models::{Group, StoredMovie};

/// Exported groups and movie documents used to pre-load a store
#[derive(Debug, Deserialize)]
pub struct SeedDocument {
    pub groups: Vec<SeedGroup>,
}

#[derive(Debug, Deserialize)]
pub struct SeedGroup {
    #[serde(flatten)]
    pub group: Group,
    #[serde(default)]
    pub movies: Vec<StoredMovie>,
}

impl SeedDocument {
    /// Reads a JSON export from disk
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read seed file {}: {}", path.display(), e))?;
        serde_json::from_str(&raw)
            .map_err(|e| anyhow::anyhow!("Failed to parse seed file {}: {}", path.display(), e))
    }
}
