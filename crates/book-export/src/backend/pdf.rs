//! Flow layout onto fixed-size PDF pages with printpdf
//!
//! Blocks are placed top to bottom. A block that does not fit the remaining
//! space starts a new page; stacks are kept together when they fit on a
//! fresh page. Header and footer are drawn after layout, once the absolute
//! page numbers are known.

use super::RenderBackend;
use super::fonts::{FaceKey, FontSource, RegisteredFonts};
use crate::constants::*;
use crate::document::*;
use crate::transform::CodeBlock;
use crate::types::*;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use printpdf::{
    Mm, Op, PdfDocument, PdfPage, PdfSaveOptions, Point, Pt, RawImage, RawImageData,
    RawImageFormat, XObjectTransform,
};

const TAB_WIDTH: usize = 4;

/// printpdf-backed renderer
#[derive(Debug, Clone)]
pub struct PdfBackend {
    fonts: FontSource,
    title: String,
}

impl Default for PdfBackend {
    fn default() -> Self {
        Self::new(FontSource::default())
    }
}

impl PdfBackend {
    pub fn new(fonts: FontSource) -> Self {
        Self {
            fonts,
            title: "Book".to_string(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn fonts(&self) -> &FontSource {
        &self.fonts
    }
}

impl RenderBackend for PdfBackend {
    fn render(&self, document: &Document) -> Result<Vec<u8>> {
        let mut doc = PdfDocument::new(&self.title);
        let table = self.fonts.load_table()?;
        let fonts = table.register(&mut doc);

        let mut layout = FlowLayout::new(document, &fonts);
        for block in &document.content {
            layout.block(&mut doc, block)?;
        }
        let pages = layout.finish();
        log::debug!("Laid out {} pages", pages.len());

        let geometry = document.geometry;
        doc.pages = pages
            .into_iter()
            .enumerate()
            .map(|(index, mut ops)| {
                let page = index + 1;
                if let Some(header) = document.header.text_for_page(page) {
                    let style = &document.header.style;
                    let baseline =
                        geometry.height_pt - HEADER_FOOTER_OFFSET_PT - style.font_size;
                    ops.extend(decoration_ops(&fonts, &geometry, style, header, baseline));
                }
                let footer = document.footer.text_for_page(page);
                ops.extend(decoration_ops(
                    &fonts,
                    &geometry,
                    &document.footer.style,
                    &footer,
                    HEADER_FOOTER_OFFSET_PT,
                ));
                PdfPage::new(
                    Mm::from(Pt(geometry.width_pt)),
                    Mm::from(Pt(geometry.height_pt)),
                    ops,
                )
            })
            .collect();

        let mut warnings = Vec::new();
        let bytes = doc.save(&PdfSaveOptions::default(), &mut warnings);
        if !warnings.is_empty() {
            log::debug!("PDF serialization reported {} warnings", warnings.len());
        }
        Ok(bytes)
    }
}

/// Centered single-line text outside the content area
fn decoration_ops(
    fonts: &RegisteredFonts<'_>,
    geometry: &PageGeometry,
    style: &Style,
    text: &str,
    baseline: f32,
) -> Vec<Op> {
    let key = FaceKey::for_style(style);
    let width = fonts.measure(key, text, style.font_size);
    let x = (geometry.width_pt - width) / 2.0;
    text_ops(fonts, key, style.font_size, style.color, x, baseline, text)
}

fn text_ops(
    fonts: &RegisteredFonts<'_>,
    key: FaceKey,
    size: f32,
    color: Color,
    x: f32,
    baseline: f32,
    text: &str,
) -> Vec<Op> {
    let (r, g, b) = color.to_unit_rgb();
    let mut ops = vec![
        Op::StartTextSection,
        Op::SetFillColor {
            col: printpdf::Color::Rgb(printpdf::Rgb::new(r, g, b, None)),
        },
        Op::SetTextCursor {
            pos: Point {
                x: Pt(x),
                y: Pt(baseline),
            },
        },
    ];
    ops.extend(fonts.write_ops(key, size, text));
    ops.push(Op::EndTextSection);
    ops
}

/// Decode a `data:<mime>;base64,<payload>` image into RGB pixels
pub fn decode_data_url(data_url: &str) -> Result<RawImage> {
    let (header, payload) = data_url
        .split_once(',')
        .ok_or_else(|| ExportError::Backend("Malformed image data URL".to_string()))?;
    if !header.starts_with("data:") || !header.ends_with(";base64") {
        return Err(ExportError::Backend(format!(
            "Unsupported image data URL header: {}",
            header
        )));
    }

    let bytes = STANDARD
        .decode(payload.trim())
        .map_err(|e| ExportError::Backend(format!("Invalid base64 image data: {}", e)))?;
    let rgb = image::load_from_memory(&bytes)?.to_rgb8();
    let (width, height) = rgb.dimensions();

    Ok(RawImage {
        pixels: RawImageData::U8(rgb.into_raw()),
        width: width as usize,
        height: height as usize,
        data_format: RawImageFormat::RGB8,
        tag: Vec::new(),
    })
}

struct FlowLayout<'a> {
    document: &'a Document,
    fonts: &'a RegisteredFonts<'a>,
    pages: Vec<Vec<Op>>,
    ops: Vec<Op>,
    /// Distance from the top edge to the next free line
    y: f32,
    /// Nothing drawn on the current page yet
    empty: bool,
}

impl<'a> FlowLayout<'a> {
    fn new(document: &'a Document, fonts: &'a RegisteredFonts<'a>) -> Self {
        Self {
            document,
            fonts,
            pages: Vec::new(),
            ops: Vec::new(),
            y: document.geometry.margins.top,
            empty: true,
        }
    }

    fn geometry(&self) -> &PageGeometry {
        &self.document.geometry
    }

    fn bottom_limit(&self) -> f32 {
        self.geometry().height_pt - self.geometry().margins.bottom
    }

    fn new_page(&mut self) {
        self.pages.push(std::mem::take(&mut self.ops));
        self.y = self.geometry().margins.top;
        self.empty = true;
    }

    /// Break the page unless `height` more points fit
    fn ensure(&mut self, height: f32) {
        if !self.empty && self.y + height > self.bottom_limit() {
            self.new_page();
        }
    }

    fn finish(mut self) -> Vec<Vec<Op>> {
        if !self.empty || self.pages.is_empty() {
            self.pages.push(std::mem::take(&mut self.ops));
        }
        self.pages
    }

    fn block(&mut self, doc: &mut PdfDocument, block: &Block) -> Result<()> {
        match block {
            Block::Text {
                text,
                style,
                page_break_before,
            } => {
                if *page_break_before && !self.empty {
                    self.new_page();
                }
                let style = self.document.styles.resolve(*style);
                self.text(text, &style);
            }
            Block::Stack(children) => {
                let height = self.measure_all(children);
                let fits_fresh_page =
                    self.geometry().margins.top + height <= self.bottom_limit();
                if fits_fresh_page {
                    self.ensure(height);
                }
                for child in children {
                    self.block(doc, child)?;
                }
            }
            Block::Code { code, style } => {
                let style = self.document.styles.resolve(*style);
                self.code(code, &style);
            }
            Block::Image {
                data_url,
                width_pt,
                height_pt,
                alignment,
                margin,
            } => self.image(doc, data_url, *width_pt, *height_pt, *alignment, *margin)?,
        }
        Ok(())
    }

    fn measure_all(&self, blocks: &[Block]) -> f32 {
        blocks.iter().map(|block| self.measure(block)).sum()
    }

    fn measure(&self, block: &Block) -> f32 {
        match block {
            Block::Text { text, style, .. } => {
                let style = self.document.styles.resolve(*style);
                let lines = self.wrap(text, &style).len() as f32;
                style.margin.top + lines * line_height(&style) + style.margin.bottom
            }
            Block::Stack(children) => self.measure_all(children),
            Block::Code { code, style } => {
                let style = self.document.styles.resolve(*style);
                let rows = self.code_rows(code, &style).len() as f32;
                style.margin.top + rows * line_height(&style) + style.margin.bottom
            }
            Block::Image {
                height_pt, margin, ..
            } => margin.top + height_pt + margin.bottom,
        }
    }

    /// Left edge and usable width inside a block margin
    fn measure_box(&self, margin: &Insets) -> (f32, f32) {
        let geometry = self.geometry();
        (
            geometry.margins.left + margin.left,
            geometry.content_width() - margin.left - margin.right,
        )
    }

    /// Greedy word wrap; explicit newlines are kept
    fn wrap(&self, text: &str, style: &Style) -> Vec<String> {
        let key = FaceKey::for_style(style);
        let (_, width) = self.measure_box(&style.margin);
        let mut lines = Vec::new();

        for paragraph in text.split('\n') {
            let mut current = String::new();
            for word in paragraph.split_whitespace() {
                if current.is_empty() {
                    current.push_str(word);
                    continue;
                }
                let candidate = format!("{} {}", current, word);
                if self.fonts.measure(key, &candidate, style.font_size) > width {
                    lines.push(std::mem::replace(&mut current, word.to_string()));
                } else {
                    current = candidate;
                }
            }
            lines.push(current);
        }
        lines
    }

    fn write(&mut self, key: FaceKey, size: f32, color: Color, x: f32, text: &str) {
        if text.is_empty() {
            return;
        }
        let baseline = self.geometry().height_pt - self.y - size;
        self.ops
            .extend(text_ops(self.fonts, key, size, color, x, baseline, text));
        self.empty = false;
    }

    fn text(&mut self, text: &str, style: &Style) {
        let key = FaceKey::for_style(style);
        let (left, width) = self.measure_box(&style.margin);
        let height = line_height(style);

        self.y += style.margin.top;
        for line in self.wrap(text, style) {
            self.ensure(height);
            let x = match style.alignment {
                Alignment::Left => left,
                Alignment::Center => {
                    let line_width = self.fonts.measure(key, &line, style.font_size);
                    left + ((width - line_width) / 2.0).max(0.0)
                }
            };
            self.write(key, style.font_size, style.color, x, &line);
            self.y += height;
        }
        self.y += style.margin.bottom;
    }

    /// Split code into visual rows no wider than the code column.
    ///
    /// Long lines break at the character that would overflow; continuation
    /// rows carry no line number.
    fn code_rows(&self, code: &CodeBlock, style: &Style) -> Vec<CodeRow> {
        let key = FaceKey::for_style(style);
        let (_, width) = self.measure_box(&style.margin);
        let width = width - CODE_LINE_NUMBER_WIDTH_PT - CODE_LINE_NUMBER_GAP_PT;

        let lines: Vec<(Option<usize>, Vec<(String, Color)>)> = match code {
            CodeBlock::Highlighted(lines) => lines
                .iter()
                .map(|line| {
                    let runs = line
                        .runs
                        .iter()
                        .map(|run| (expand_tabs(&run.text), run.color))
                        .collect();
                    (Some(line.number), runs)
                })
                .collect(),
            CodeBlock::Plain(run) => run
                .text
                .split('\n')
                .map(|line| {
                    let text = expand_tabs(line.strip_suffix('\r').unwrap_or(line));
                    (None, vec![(text, run.color)])
                })
                .collect(),
        };

        let mut rows = Vec::new();
        for (number, runs) in lines {
            let mut row = CodeRow::new(number);
            let mut used = 0.0;
            for (text, color) in runs {
                let mut piece = String::new();
                for ch in text.chars() {
                    let advance = self
                        .fonts
                        .measure(key, ch.encode_utf8(&mut [0; 4]), style.font_size);
                    if used > 0.0 && used + advance > width {
                        if !piece.is_empty() {
                            row.runs.push((std::mem::take(&mut piece), color));
                        }
                        rows.push(std::mem::replace(&mut row, CodeRow::new(None)));
                        used = 0.0;
                    }
                    piece.push(ch);
                    used += advance;
                }
                if !piece.is_empty() {
                    row.runs.push((piece, color));
                }
            }
            rows.push(row);
        }
        rows
    }

    fn code(&mut self, code: &CodeBlock, style: &Style) {
        let key = FaceKey::for_style(style);
        let number_style = self.document.styles.resolve(StyleKey::CodeLineNumber);
        let number_key = FaceKey::for_style(&number_style);
        let (left, _) = self.measure_box(&style.margin);
        let text_left = left + CODE_LINE_NUMBER_WIDTH_PT + CODE_LINE_NUMBER_GAP_PT;
        let height = line_height(style);

        self.y += style.margin.top;
        for row in self.code_rows(code, style) {
            self.ensure(height);

            if let Some(number) = row.number {
                let number = number.to_string();
                let number_width = self
                    .fonts
                    .measure(number_key, &number, number_style.font_size);
                self.write(
                    number_key,
                    number_style.font_size,
                    number_style.color,
                    left + CODE_LINE_NUMBER_WIDTH_PT - number_width,
                    &number,
                );
            }

            let mut x = text_left;
            for (text, color) in &row.runs {
                self.write(key, style.font_size, *color, x, text);
                x += self.fonts.measure(key, text, style.font_size);
            }
            self.y += height;
        }
        self.y += style.margin.bottom;
    }

    fn image(
        &mut self,
        doc: &mut PdfDocument,
        data_url: &str,
        width_pt: f32,
        height_pt: f32,
        alignment: Alignment,
        margin: Insets,
    ) -> Result<()> {
        let raw = decode_data_url(data_url)?;
        if raw.width == 0 || raw.height == 0 {
            return Err(ExportError::Backend("Math image has no pixels".to_string()));
        }
        let (pixel_width, pixel_height) = (raw.width as f32, raw.height as f32);

        let (left, available) = self.measure_box(&margin);
        let shrink = if width_pt > available && width_pt > 0.0 {
            available / width_pt
        } else {
            1.0
        };
        let (width, height) = (width_pt * shrink, height_pt * shrink);

        self.y += margin.top;
        self.ensure(height);
        let x = match alignment {
            Alignment::Left => left,
            Alignment::Center => left + ((available - width) / 2.0).max(0.0),
        };
        let bottom = self.geometry().height_pt - self.y - height;

        let id = doc.add_image(&raw);
        self.ops.push(Op::UseXobject {
            id,
            transform: XObjectTransform {
                translate_x: Some(Pt(x)),
                translate_y: Some(Pt(bottom)),
                scale_x: Some(width / pixel_width),
                scale_y: Some(height / pixel_height),
                dpi: Some(72.0),
                ..Default::default()
            },
        });
        self.empty = false;
        self.y += height + margin.bottom;
        Ok(())
    }
}

/// One visual row of a code block
struct CodeRow {
    number: Option<usize>,
    runs: Vec<(String, Color)>,
}

impl CodeRow {
    fn new(number: Option<usize>) -> Self {
        Self {
            number,
            runs: Vec::new(),
        }
    }
}

fn line_height(style: &Style) -> f32 {
    style.font_size * LINE_HEIGHT_FACTOR
}

fn expand_tabs(text: &str) -> String {
    text.replace('\t', &" ".repeat(TAB_WIDTH))
}
