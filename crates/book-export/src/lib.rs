pub mod backend;
pub mod constants;
pub mod document;
mod assemble;
mod export;
mod options;
pub mod transform;
mod types;

pub use assemble::{assemble, default_styles};
pub use backend::{FontSet, FontSource, FontTable, PdfBackend, RenderBackend};
pub use document::*;
pub use export::Exporter;
pub use options::*;
pub use transform::{
    CodeBlock, CodeLine, Lexer, MathImage, MathRenderer, Rasterizer, ResvgRasterizer,
    ScratchHost, SymbolCache, SyntectLexer, Token, TokenRun, TransformedChapter, TransformedUnit,
    Typesetter, UnavailableRasterizer, UnavailableTypesetter, transform_chapters,
};
pub use types::*;
