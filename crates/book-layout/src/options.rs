use crate::constants::{DEFAULT_PAGE_CAPACITY, DEFAULT_RUNNING_HEADER};
use crate::types::*;
use serde::{Deserialize, Serialize};

/// Pagination configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaginationOptions {
    /// Content units per page
    pub page_capacity: usize,
    /// Header shown on even-numbered pages of each chapter
    pub running_header: String,
}

impl Default for PaginationOptions {
    fn default() -> Self {
        Self {
            page_capacity: DEFAULT_PAGE_CAPACITY,
            running_header: DEFAULT_RUNNING_HEADER.to_string(),
        }
    }
}

impl PaginationOptions {
    /// Load options from JSON file
    pub async fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let options: Self = serde_json::from_slice(&bytes)
            .map_err(|e| LayoutError::Config(format!("Failed to parse config: {}", e)))?;
        options.validate()?;
        Ok(options)
    }

    /// Save options to JSON file
    pub async fn save(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| LayoutError::Config(format!("Failed to serialize config: {}", e)))?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.page_capacity == 0 {
            return Err(LayoutError::Config(
                "Page capacity must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
