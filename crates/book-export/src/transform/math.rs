//! Math markup to rasterized image
//!
//! 1. Attach a scratch container holding the markup
//! 2. Let the typesetting engine render into it
//! 3. Merge the shared symbol definitions into the rendered SVG
//! 4. Rasterize at the supersampling scale
//! 5. Report the bitmap with the SVG's original size in ex
//!
//! The scratch container is detached on every exit path.

use super::scratch::{ScratchContainer, ScratchHost, SvgElement, SymbolCache};
use crate::constants::{DEFAULT_SUPERSAMPLE_SCALE, EX_TO_PT};
use crate::types::*;
use std::future::Future;

/// Typesetting engine collaborator
///
/// Reads `container.markup` and appends rendered nodes to
/// `container.rendered`. Leaving `rendered` empty means the markup could not
/// be typeset.
pub trait Typesetter {
    fn typeset(
        &self,
        container: &mut ScratchContainer,
    ) -> impl Future<Output = std::result::Result<(), TypesetError>>;
}

/// Rasterizer collaborator, returns the bitmap as a data URL
pub trait Rasterizer {
    fn rasterize(
        &self,
        svg: &SvgElement,
        options: &RasterOptions,
    ) -> impl Future<Output = std::result::Result<String, RasterError>>;
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RasterOptions {
    pub scale: f32,
    pub background: Color,
}

impl Default for RasterOptions {
    fn default() -> Self {
        Self {
            scale: DEFAULT_SUPERSAMPLE_SCALE,
            background: Color::from_hex(0xffffff),
        }
    }
}

/// Unit of the typesetting engine's logical dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthUnit {
    Ex,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MathDimensions {
    pub width: f32,
    pub height: f32,
    pub unit: LengthUnit,
}

impl MathDimensions {
    pub fn width_pt(&self) -> f32 {
        match self.unit {
            LengthUnit::Ex => self.width * EX_TO_PT,
        }
    }

    pub fn height_pt(&self) -> f32 {
        match self.unit {
            LengthUnit::Ex => self.height * EX_TO_PT,
        }
    }
}

/// Rasterized math ready for the document
#[derive(Debug, Clone, PartialEq)]
pub struct MathImage {
    pub data_url: String,
    /// Size before rasterization, in the engine's unit
    pub dimensions: MathDimensions,
}

/// Parse a length attribute the way the engine writes it (`"3.25ex"`)
pub fn parse_ex_length(value: &str) -> Result<f32> {
    let trimmed = value.trim_start();
    let end = trimmed
        .char_indices()
        .find(|&(i, c)| !(c.is_ascii_digit() || c == '.' || (i == 0 && (c == '-' || c == '+'))))
        .map(|(i, _)| i)
        .unwrap_or(trimmed.len());
    trimmed[..end]
        .parse::<f32>()
        .map_err(|_| ExportError::InvalidDimension(value.to_string()))
}

/// Renders math units through the typesetting and rasterizing collaborators
pub struct MathRenderer<'a, T, R> {
    typesetter: &'a T,
    rasterizer: &'a R,
    scratch: &'a ScratchHost,
    symbol_cache: Option<&'a SymbolCache>,
    options: RasterOptions,
}

impl<'a, T: Typesetter, R: Rasterizer> MathRenderer<'a, T, R> {
    pub fn new(typesetter: &'a T, rasterizer: &'a R, scratch: &'a ScratchHost) -> Self {
        Self {
            typesetter,
            rasterizer,
            scratch,
            symbol_cache: None,
            options: RasterOptions::default(),
        }
    }

    pub fn with_symbol_cache(mut self, cache: Option<&'a SymbolCache>) -> Self {
        self.symbol_cache = cache;
        self
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.options.scale = scale;
        self
    }

    /// Render one math unit.
    ///
    /// `Ok(None)` means the engine produced nothing renderable and the caller
    /// should fall back to the raw markup. Rasterizer failures are returned.
    pub async fn render(&self, markup: &str) -> Result<Option<MathImage>> {
        let mut container = self.scratch.attach(markup);

        if let Err(e) = self.typesetter.typeset(&mut container).await {
            log::warn!("Error in SVG conversion: {}", e);
            return Ok(None);
        }

        let Some(rendered) = container.rendered.first_mut() else {
            log::debug!("Typesetting produced no output for {:?}", markup);
            return Ok(None);
        };
        let svg = rendered.svg.as_mut().ok_or(ExportError::MissingVector)?;

        let dimensions = MathDimensions {
            width: parse_ex_length(&svg.width)?,
            height: parse_ex_length(&svg.height)?,
            unit: LengthUnit::Ex,
        };

        let data_url = self.rasterize_with_symbols(svg).await?;

        Ok(Some(MathImage {
            data_url,
            dimensions,
        }))
    }

    async fn rasterize_with_symbols(&self, svg: &mut SvgElement) -> Result<String> {
        let defs = match self.symbol_cache {
            None => {
                log::warn!("Symbol cache not found, rasterizing without shared definitions");
                None
            }
            Some(cache) => {
                if cache.defs().is_none() {
                    log::warn!("Symbol cache has no definitions, rasterizing without them");
                }
                cache.defs()
            }
        };

        let Some(defs) = defs else {
            return Ok(self.rasterizer.rasterize(svg, &self.options).await?);
        };

        svg.prepend_defs(defs.clone());
        let result = self.rasterizer.rasterize(svg, &self.options).await;
        svg.remove_prepended_defs();
        Ok(result?)
    }
}

/// Typesetter used when no engine is available: renders nothing, so every
/// math unit falls back to its markup text
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableTypesetter;

impl Typesetter for UnavailableTypesetter {
    async fn typeset(
        &self,
        _container: &mut ScratchContainer,
    ) -> std::result::Result<(), TypesetError> {
        Ok(())
    }
}

/// Rasterizer used when no engine is available
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableRasterizer;

impl Rasterizer for UnavailableRasterizer {
    async fn rasterize(
        &self,
        _svg: &SvgElement,
        _options: &RasterOptions,
    ) -> std::result::Result<String, RasterError> {
        Err(RasterError("no rasterizer configured".to_string()))
    }
}
