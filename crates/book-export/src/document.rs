//! Document description handed to a rendering backend
//!
//! Geometry, a style table, header and footer rules, and the ordered content
//! stream. A backend lays this out and serializes it; nothing here touches
//! files.

use crate::constants::*;
use crate::transform::CodeBlock;
use crate::types::Color;
use book_layout::Speaker;
use std::collections::HashMap;

/// Edge offsets in points, in left/top/right/bottom order
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Insets {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Insets {
    pub const fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub const ZERO: Insets = Insets::new(0.0, 0.0, 0.0, 0.0);
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub width_pt: f32,
    pub height_pt: f32,
    pub margins: Insets,
}

impl Default for PageGeometry {
    /// 6" x 9" trim with 0.75" side and 1" top/bottom margins
    fn default() -> Self {
        Self {
            width_pt: PAGE_WIDTH_PT,
            height_pt: PAGE_HEIGHT_PT,
            margins: Insets::new(
                MARGIN_SIDE_PT,
                MARGIN_VERTICAL_PT,
                MARGIN_SIDE_PT,
                MARGIN_VERTICAL_PT,
            ),
        }
    }
}

impl PageGeometry {
    pub fn content_width(&self) -> f32 {
        self.width_pt - self.margins.left - self.margins.right
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FontFamily {
    /// Body text face
    #[default]
    Serif,
    /// Code face
    Mono,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alignment {
    #[default]
    Left,
    Center,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Style {
    pub font: FontFamily,
    pub font_size: f32,
    pub bold: bool,
    pub italic: bool,
    pub color: Color,
    pub alignment: Alignment,
    pub margin: Insets,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            font: FontFamily::Serif,
            font_size: 12.0,
            bold: false,
            italic: false,
            color: BODY_TEXT_COLOR,
            alignment: Alignment::Left,
            margin: Insets::ZERO,
        }
    }
}

/// Keys of the style table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StyleKey {
    ChapterTitle,
    ChapterSubtitle,
    /// Speaker label above a dialogue line
    Speaker(Speaker),
    Dialogue(Speaker),
    CodeMarker,
    CodeContainer,
    CodeLineNumber,
    MathMarker,
    /// Raw markup shown when math could not be rasterized
    MathContainer,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct StyleTable {
    styles: HashMap<StyleKey, Style>,
}

impl StyleTable {
    pub fn insert(&mut self, key: StyleKey, style: Style) {
        self.styles.insert(key, style);
    }

    pub fn get(&self, key: StyleKey) -> Option<&Style> {
        self.styles.get(&key)
    }

    /// Style for `key`, or the default body style when absent
    pub fn resolve(&self, key: StyleKey) -> Style {
        self.get(key).cloned().unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.styles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }
}

/// Running header: none on page 1, then alternating by page parity
#[derive(Debug, Clone, PartialEq)]
pub struct HeaderRule {
    pub even: String,
    pub odd: String,
    pub style: Style,
}

impl HeaderRule {
    /// Header text for an absolute 1-based page number
    pub fn text_for_page(&self, page: usize) -> Option<&str> {
        match page {
            0 | 1 => None,
            p if p % 2 == 0 => Some(&self.even),
            _ => Some(&self.odd),
        }
    }
}

/// Footer: the absolute page number on every page
#[derive(Debug, Clone, PartialEq)]
pub struct FooterRule {
    pub style: Style,
}

impl FooterRule {
    pub fn text_for_page(&self, page: usize) -> String {
        page.to_string()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Text {
        text: String,
        style: StyleKey,
        page_break_before: bool,
    },
    /// Blocks kept in sequence as one unit
    Stack(Vec<Block>),
    Code {
        code: CodeBlock,
        style: StyleKey,
    },
    Image {
        data_url: String,
        width_pt: f32,
        height_pt: f32,
        alignment: Alignment,
        margin: Insets,
    },
}

impl Block {
    pub fn text(text: impl Into<String>, style: StyleKey) -> Self {
        Block::Text {
            text: text.into(),
            style,
            page_break_before: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub geometry: PageGeometry,
    pub default_font: FontFamily,
    pub styles: StyleTable,
    pub header: HeaderRule,
    pub footer: FooterRule,
    pub content: Vec<Block>,
}

impl Document {
    /// All leaf blocks in stream order, stacks expanded
    pub fn leaf_blocks(&self) -> Vec<&Block> {
        fn collect<'a>(blocks: &'a [Block], out: &mut Vec<&'a Block>) {
            for block in blocks {
                match block {
                    Block::Stack(children) => collect(children, out),
                    other => out.push(other),
                }
            }
        }
        let mut out = Vec::new();
        collect(&self.content, &mut out);
        out
    }
}
