//! End-to-end export: manuscript in, `book.pdf` out
//!
//! Numbering, transformation, assembly and rendering run in that order.
//! Every fatal failure along the way surfaces as
//! [`ExportError::GeneratePdf`]; the manuscript is only ever read.

use crate::assemble::assemble;
use crate::backend::{PdfBackend, RenderBackend};
use crate::document::Document;
use crate::options::ExportOptions;
use crate::transform::*;
use crate::types::*;
use book_layout::{Manuscript, number_chapters};
use std::path::{Path, PathBuf};

/// Export pipeline with its collaborators
pub struct Exporter<T, R, L, B> {
    typesetter: T,
    rasterizer: R,
    lexer: L,
    backend: B,
    scratch: ScratchHost,
    symbol_cache: Option<SymbolCache>,
    options: ExportOptions,
}

impl Exporter<UnavailableTypesetter, UnavailableRasterizer, SyntectLexer, PdfBackend> {
    /// Pipeline without a math engine; equations render as their markup
    pub fn without_math(options: ExportOptions) -> Self {
        Self::new(
            UnavailableTypesetter,
            UnavailableRasterizer,
            SyntectLexer::csharp(),
            PdfBackend::default(),
            options,
        )
    }
}

impl<T, R, L, B> Exporter<T, R, L, B>
where
    T: Typesetter,
    R: Rasterizer,
    L: Lexer,
    B: RenderBackend + Clone + Send + 'static,
{
    pub fn new(typesetter: T, rasterizer: R, lexer: L, backend: B, options: ExportOptions) -> Self {
        Self {
            typesetter,
            rasterizer,
            lexer,
            backend,
            scratch: ScratchHost::new(),
            symbol_cache: None,
            options,
        }
    }

    /// Shared symbol definitions merged into every math SVG before rasterizing
    pub fn with_symbol_cache(mut self, cache: SymbolCache) -> Self {
        self.symbol_cache = Some(cache);
        self
    }

    pub fn options(&self) -> &ExportOptions {
        &self.options
    }

    pub fn scratch(&self) -> &ScratchHost {
        &self.scratch
    }

    /// Number, transform and assemble without rendering
    pub async fn build_document(&self, manuscript: &Manuscript) -> Result<Document> {
        self.options.validate()?;

        let numbered = number_chapters(&manuscript.chapters);
        let math = MathRenderer::new(&self.typesetter, &self.rasterizer, &self.scratch)
            .with_symbol_cache(self.symbol_cache.as_ref())
            .with_scale(self.options.supersample_scale);
        let chapters = transform_chapters(&numbered, &math, &self.lexer).await?;

        Ok(assemble(&chapters, &self.options))
    }

    /// Produce the document bytes
    pub async fn render(&self, manuscript: &Manuscript) -> Result<Vec<u8>> {
        self.render_inner(manuscript)
            .await
            .map_err(ExportError::generate_pdf)
    }

    async fn render_inner(&self, manuscript: &Manuscript) -> Result<Vec<u8>> {
        let document = self.build_document(manuscript).await?;
        let backend = self.backend.clone();
        let bytes = tokio::task::spawn_blocking(move || backend.render(&document)).await??;
        Ok(bytes)
    }

    /// Render and write `<output_dir>/<output_file_name>`
    pub async fn generate_pdf(
        &self,
        manuscript: &Manuscript,
        output_dir: impl AsRef<Path>,
    ) -> Result<PathBuf> {
        let bytes = self.render(manuscript).await?;
        let path = output_dir.as_ref().join(&self.options.output_file_name);
        tokio::fs::write(&path, &bytes)
            .await
            .map_err(|e| ExportError::generate_pdf(e.into()))?;

        log::info!("Wrote {} ({} bytes)", path.display(), bytes.len());
        Ok(path)
    }
}
