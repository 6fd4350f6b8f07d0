#![allow(dead_code)]

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use book_export::transform::{RasterOptions, RenderedMath, ScratchContainer, SvgElement};
use book_export::*;
use std::io::Cursor;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Encode a blank PNG as a data URL
pub fn png_data_url(width: u32, height: u32) -> String {
    let img = image::RgbImage::from_pixel(width, height, image::Rgb([255, 255, 255]));
    let mut bytes = Vec::new();
    img.write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
        .unwrap();
    format!("data:image/png;base64,{}", STANDARD.encode(bytes))
}

/// Typesetter driven by markers in the markup:
///
/// - `\unrenderable` leaves the container empty
/// - `\novector` renders a node without an SVG element
/// - `\crash` returns a typesetting error
/// - anything else renders a 4ex x 2ex SVG
#[derive(Default)]
pub struct FakeTypesetter {
    pub calls: AtomicUsize,
    pub seen_markup: Mutex<Vec<String>>,
}

impl FakeTypesetter {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Typesetter for FakeTypesetter {
    async fn typeset(
        &self,
        container: &mut ScratchContainer,
    ) -> std::result::Result<(), TypesetError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen_markup
            .lock()
            .unwrap()
            .push(container.markup.clone());
        tokio::task::yield_now().await;

        if container.markup.contains("\\crash") {
            return Err(TypesetError("engine crashed".to_string()));
        }
        if container.markup.contains("\\unrenderable") {
            return Ok(());
        }
        if container.markup.contains("\\novector") {
            container.rendered.push(RenderedMath { svg: None });
            return Ok(());
        }
        container.rendered.push(RenderedMath {
            svg: Some(SvgElement::new("4ex", "2ex", "<path d=\"M0 0\"/>")),
        });
        Ok(())
    }
}

/// Rasterizer that records the definition blocks it was handed
#[derive(Default)]
pub struct FakeRasterizer {
    pub fail: bool,
    pub seen_defs: Mutex<Vec<usize>>,
    pub seen_scale: Mutex<Vec<f32>>,
}

impl FakeRasterizer {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn seen_defs(&self) -> Vec<usize> {
        self.seen_defs.lock().unwrap().clone()
    }
}

impl Rasterizer for FakeRasterizer {
    async fn rasterize(
        &self,
        svg: &SvgElement,
        options: &RasterOptions,
    ) -> std::result::Result<String, RasterError> {
        self.seen_defs.lock().unwrap().push(svg.defs.len());
        self.seen_scale.lock().unwrap().push(options.scale);
        tokio::task::yield_now().await;
        if self.fail {
            return Err(RasterError("canvas unavailable".to_string()));
        }
        Ok(png_data_url(8, 4))
    }
}

/// Lexer that always fails
pub struct BrokenLexer;

impl Lexer for BrokenLexer {
    fn tokenize(&self, _line: &str) -> std::result::Result<Vec<Token>, LexError> {
        Err(LexError::Other("grammar not loaded".to_string()))
    }
}

pub fn page_count(bytes: &[u8]) -> usize {
    lopdf::Document::load_mem(bytes).unwrap().get_pages().len()
}
