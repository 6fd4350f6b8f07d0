mod fonts;
mod pdf;

pub use fonts::{
    BUNDLED_MONO, FaceKey, FontSet, FontSource, FontTable, MONO_FILE, SERIF_BOLD_FILE,
    SERIF_ITALIC_FILE, SERIF_REGULAR_FILE,
};
pub use pdf::{PdfBackend, decode_data_url};

use crate::document::Document;
use crate::types::Result;

/// Turns a document description into file bytes
pub trait RenderBackend {
    fn render(&self, document: &Document) -> Result<Vec<u8>>;
}
