use thiserror::Error;

#[derive(Error, Debug)]
pub enum LayoutError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("Invalid chapter file format")]
    InvalidFormat,
    #[error("Chapter {0} not found")]
    ChapterNotFound(u32),
    #[error("Chapter {chapter} has no entry at index {index}")]
    UnitOutOfRange { chapter: u32, index: usize },
}

pub type Result<T> = std::result::Result<T, LayoutError>;
