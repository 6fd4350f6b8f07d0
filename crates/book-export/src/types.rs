use thiserror::Error;

/// Failure reported by a typesetting engine
#[derive(Error, Debug, Clone, PartialEq)]
#[error("Typesetting failed: {0}")]
pub struct TypesetError(pub String);

/// Failure reported by a rasterizer
#[derive(Error, Debug, Clone, PartialEq)]
#[error("Rasterization failed: {0}")]
pub struct RasterError(pub String);

/// Failure reported by a source lexer
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LexError {
    #[error("Failed to parse line: {0}")]
    Parse(String),
    #[error("Unbalanced scope stack: {0}")]
    Scope(String),
    #[error("{0}")]
    Other(String),
}

#[derive(Error, Debug)]
pub enum ExportError {
    #[error(transparent)]
    Typeset(#[from] TypesetError),
    #[error(transparent)]
    Raster(#[from] RasterError),
    #[error("Rendered math has no SVG element")]
    MissingVector,
    #[error("Invalid math dimension: {0:?}")]
    InvalidDimension(String),
    #[error("Backend error: {0}")]
    Backend(String),
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("Failed to generate PDF")]
    GeneratePdf(#[source] Box<ExportError>),
}

impl ExportError {
    /// Wrap a fatal pipeline failure in the single user-facing export error
    pub fn generate_pdf(cause: ExportError) -> Self {
        match cause {
            ExportError::GeneratePdf(_) => cause,
            other => ExportError::GeneratePdf(Box::new(other)),
        }
    }
}

pub type Result<T> = std::result::Result<T, ExportError>;

/// 24-bit RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    /// Build from a `0xRRGGBB` literal
    pub const fn from_hex(rgb: u32) -> Self {
        Self {
            r: ((rgb >> 16) & 0xff) as u8,
            g: ((rgb >> 8) & 0xff) as u8,
            b: (rgb & 0xff) as u8,
        }
    }

    /// Components scaled to `0.0..=1.0`
    pub fn to_unit_rgb(self) -> (f32, f32, f32) {
        (
            f32::from(self.r) / 255.0,
            f32::from(self.g) / 255.0,
            f32::from(self.b) / 255.0,
        )
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}
