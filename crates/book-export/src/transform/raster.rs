//! SVG rasterization with resvg

use super::math::{RasterOptions, Rasterizer};
use super::scratch::SvgElement;
use crate::types::RasterError;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use resvg::{tiny_skia, usvg};
use std::io::Cursor;

/// Renders math SVG to a PNG data URL on the blocking pool
#[derive(Debug, Clone, Copy, Default)]
pub struct ResvgRasterizer;

impl Rasterizer for ResvgRasterizer {
    async fn rasterize(
        &self,
        svg: &SvgElement,
        options: &RasterOptions,
    ) -> Result<String, RasterError> {
        let markup = svg.to_markup();
        let options = *options;
        tokio::task::spawn_blocking(move || rasterize_svg(&markup, &options))
            .await
            .map_err(|e| RasterError(format!("Rasterizer task failed: {}", e)))?
    }
}

/// Rasterize SVG markup at `options.scale` over the background color
pub fn rasterize_svg(markup: &str, options: &RasterOptions) -> Result<String, RasterError> {
    let tree = usvg::Tree::from_str(markup, &usvg::Options::default())
        .map_err(|e| RasterError(format!("Invalid SVG: {}", e)))?;

    let size = tree.size();
    let width = (size.width() * options.scale).ceil().max(1.0) as u32;
    let height = (size.height() * options.scale).ceil().max(1.0) as u32;
    let mut pixmap = tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| RasterError(format!("Cannot allocate a {}x{} canvas", width, height)))?;

    let background = options.background;
    pixmap.fill(tiny_skia::Color::from_rgba8(
        background.r,
        background.g,
        background.b,
        255,
    ));
    resvg::render(
        &tree,
        tiny_skia::Transform::from_scale(options.scale, options.scale),
        &mut pixmap.as_mut(),
    );

    let pixels = pixmap
        .pixels()
        .iter()
        .flat_map(|pixel| {
            let color = pixel.demultiply();
            [color.red(), color.green(), color.blue(), color.alpha()]
        })
        .collect();
    let image = image::RgbaImage::from_raw(width, height, pixels)
        .ok_or_else(|| RasterError("Canvas size does not match its pixels".to_string()))?;

    let mut png = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut png), image::ImageFormat::Png)
        .map_err(|e| RasterError(format!("PNG encoding failed: {}", e)))?;
    log::trace!("Rasterized math to {}x{} ({} bytes)", width, height, png.len());

    Ok(format!("data:image/png;base64,{}", STANDARD.encode(&png)))
}
