use crate::constants::{
    DEFAULT_EVEN_HEADER, DEFAULT_ODD_HEADER, DEFAULT_OUTPUT_FILE_NAME, DEFAULT_SUPERSAMPLE_SCALE,
};
use crate::types::*;
use serde::{Deserialize, Serialize};

/// Export configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportOptions {
    /// Running header on even absolute pages
    pub even_header: String,
    /// Running header on odd absolute pages (except page 1)
    pub odd_header: String,
    /// Supersampling factor for math rasterization
    pub supersample_scale: f32,
    pub output_file_name: String,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            even_header: DEFAULT_EVEN_HEADER.to_string(),
            odd_header: DEFAULT_ODD_HEADER.to_string(),
            supersample_scale: DEFAULT_SUPERSAMPLE_SCALE,
            output_file_name: DEFAULT_OUTPUT_FILE_NAME.to_string(),
        }
    }
}

impl ExportOptions {
    /// Load options from JSON file
    pub async fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let options: Self = serde_json::from_slice(&bytes)
            .map_err(|e| ExportError::Config(format!("Failed to parse config: {}", e)))?;
        options.validate()?;
        Ok(options)
    }

    /// Save options to JSON file
    pub async fn save(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| ExportError::Config(format!("Failed to serialize config: {}", e)))?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.supersample_scale.is_nan() || self.supersample_scale <= 0.0 {
            return Err(ExportError::Config(
                "Supersample scale must be positive".to_string(),
            ));
        }
        if self.output_file_name.trim().is_empty() {
            return Err(ExportError::Config(
                "Output file name must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
