//! Manuscript persistence
//!
//! The store keeps one JSON file. Loading never fails: a missing or corrupt
//! file yields the default manuscript. Saving reports success as a flag and
//! logs failures instead of returning them.

use crate::manuscript::Manuscript;
use crate::types::*;
use std::path::{Path, PathBuf};

/// File name used when exporting a manuscript for download
pub const EXPORT_FILE_NAME: &str = "book-chapters.json";

pub fn to_json(manuscript: &Manuscript) -> Result<String> {
    Ok(serde_json::to_string_pretty(manuscript)?)
}

/// Parse manuscript JSON, rejecting anything that does not parse
pub fn from_json(text: &str) -> Result<Manuscript> {
    serde_json::from_str(text).map_err(|e| {
        log::error!("Error parsing chapters: {}", e);
        LayoutError::InvalidFormat
    })
}

/// Write a manuscript verbatim (ids included) to `path`
pub async fn export_json(manuscript: &Manuscript, path: impl AsRef<Path>) -> Result<()> {
    let json = to_json(manuscript)?;
    tokio::fs::write(path, json).await?;
    Ok(())
}

#[derive(Debug, Clone)]
pub struct ManuscriptStore {
    path: PathBuf,
}

impl ManuscriptStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the stored manuscript, or the default one
    pub async fn load(&self) -> Manuscript {
        let text = match tokio::fs::read_to_string(&self.path).await {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("No manuscript at {}, using default", self.path.display());
                return Manuscript::default();
            }
            Err(e) => {
                log::error!("Error loading chapters: {}", e);
                return Manuscript::default();
            }
        };

        match serde_json::from_str(&text) {
            Ok(manuscript) => manuscript,
            Err(e) => {
                log::error!("Error loading chapters: {}", e);
                Manuscript::default()
            }
        }
    }

    /// Persist a manuscript; `false` means the write failed (already logged)
    pub async fn save(&self, manuscript: &Manuscript) -> bool {
        match export_json(manuscript, &self.path).await {
            Ok(()) => true,
            Err(e) => {
                log::error!("Error saving chapters: {}", e);
                false
            }
        }
    }

    /// Replace the stored manuscript with the contents of a JSON file
    pub async fn import_json(&self, path: impl AsRef<Path>) -> Result<Manuscript> {
        let text = tokio::fs::read_to_string(path.as_ref()).await.map_err(|e| {
            log::error!("Error importing chapters: {}", e);
            LayoutError::InvalidFormat
        })?;
        let manuscript = from_json(&text)?;
        self.save(&manuscript).await;
        Ok(manuscript)
    }
}
