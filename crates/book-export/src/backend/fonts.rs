//! Font resources for the PDF backend
//!
//! The backend only carries a [`FontSource`], which is plain bytes and safe
//! to move across threads. Each render parses it into a [`FontTable`] on the
//! rendering thread; parsed faces hold non-`Send` layout caches.

use crate::constants::{MONO_CHAR_WIDTH_RATIO, SERIF_CHAR_WIDTH_RATIO};
use crate::document::{FontFamily, Style};
use crate::types::*;
use printpdf::{BuiltinFont, FontId, Op, ParsedFont, PdfDocument, TextItem};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

pub const SERIF_REGULAR_FILE: &str = "CrimsonPro-Regular.ttf";
pub const SERIF_BOLD_FILE: &str = "CrimsonPro-Bold.ttf";
pub const SERIF_ITALIC_FILE: &str = "CrimsonPro-Italic.ttf";
pub const MONO_FILE: &str = "FiraCode-Regular.ttf";

/// Monospace face used when no font directory is given. Covers the Greek
/// and math symbols of the code and equation markers.
pub const BUNDLED_MONO: &[u8] = include_bytes!("../../fonts/DejaVuSansMono.ttf");

/// Face selector derived from a style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FaceKey {
    pub family: FontFamily,
    pub bold: bool,
    pub italic: bool,
}

impl FaceKey {
    pub fn for_style(style: &Style) -> Self {
        Self {
            family: style.font,
            bold: style.bold,
            italic: style.italic,
        }
    }

    const ALL: [FaceKey; 8] = [
        FaceKey::new(FontFamily::Serif, false, false),
        FaceKey::new(FontFamily::Serif, true, false),
        FaceKey::new(FontFamily::Serif, false, true),
        FaceKey::new(FontFamily::Serif, true, true),
        FaceKey::new(FontFamily::Mono, false, false),
        FaceKey::new(FontFamily::Mono, true, false),
        FaceKey::new(FontFamily::Mono, false, true),
        FaceKey::new(FontFamily::Mono, true, true),
    ];

    const fn new(family: FontFamily, bold: bool, italic: bool) -> Self {
        Self {
            family,
            bold,
            italic,
        }
    }

    fn builtin(self) -> BuiltinFont {
        match (self.family, self.bold, self.italic) {
            (FontFamily::Serif, false, false) => BuiltinFont::TimesRoman,
            (FontFamily::Serif, true, false) => BuiltinFont::TimesBold,
            (FontFamily::Serif, false, true) => BuiltinFont::TimesItalic,
            (FontFamily::Serif, true, true) => BuiltinFont::TimesBoldItalic,
            (FontFamily::Mono, false, false) => BuiltinFont::Courier,
            (FontFamily::Mono, true, false) => BuiltinFont::CourierBold,
            (FontFamily::Mono, false, true) => BuiltinFont::CourierOblique,
            (FontFamily::Mono, true, true) => BuiltinFont::CourierBoldOblique,
        }
    }
}

/// Raw TrueType data for the embedded faces
#[derive(Debug, Clone)]
pub struct FontSet {
    pub serif_regular: Vec<u8>,
    pub serif_bold: Vec<u8>,
    pub serif_italic: Vec<u8>,
    pub mono: Vec<u8>,
}

impl FontSet {
    /// Read the four font files from `dir`
    pub async fn load(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        Ok(Self {
            serif_regular: tokio::fs::read(dir.join(SERIF_REGULAR_FILE)).await?,
            serif_bold: tokio::fs::read(dir.join(SERIF_BOLD_FILE)).await?,
            serif_italic: tokio::fs::read(dir.join(SERIF_ITALIC_FILE)).await?,
            mono: tokio::fs::read(dir.join(MONO_FILE)).await?,
        })
    }
}

/// Where a render gets its faces from
#[derive(Debug, Clone, Default)]
pub enum FontSource {
    /// Base-14 Times and Courier only
    Builtin,
    /// Base-14 Times with the bundled monospace face
    #[default]
    BundledMono,
    /// Fonts read from a directory
    Files(Arc<FontSet>),
}

impl FontSource {
    /// Parse the faces into a table for one render
    pub fn load_table(&self) -> Result<FontTable> {
        match self {
            FontSource::Builtin => Ok(FontTable::builtin()),
            FontSource::BundledMono => FontTable::bundled_mono(),
            FontSource::Files(set) => FontTable::embedded(set),
        }
    }
}

fn parse_face(name: &str, bytes: &[u8]) -> Result<ParsedFont> {
    let mut warnings = Vec::new();
    ParsedFont::from_bytes(bytes, 0, &mut warnings)
        .ok_or_else(|| ExportError::Backend(format!("Failed to parse font {}", name)))
}

enum Face {
    Builtin,
    /// Index into `FontTable::parsed`
    Embedded(usize),
}

pub struct FontTable {
    faces: HashMap<FaceKey, Face>,
    parsed: Vec<ParsedFont>,
}

impl Default for FontTable {
    fn default() -> Self {
        Self::builtin()
    }
}

impl FontTable {
    /// Base-14 Times and Courier faces, nothing embedded
    pub fn builtin() -> Self {
        let faces = FaceKey::ALL
            .into_iter()
            .map(|key| (key, Face::Builtin))
            .collect();
        Self {
            faces,
            parsed: Vec::new(),
        }
    }

    /// Base-14 serif faces with [`BUNDLED_MONO`] for every mono style
    pub fn bundled_mono() -> Result<Self> {
        let parsed = vec![parse_face("DejaVuSansMono.ttf", BUNDLED_MONO)?];
        let faces = FaceKey::ALL
            .into_iter()
            .map(|key| {
                let face = match key.family {
                    FontFamily::Serif => Face::Builtin,
                    FontFamily::Mono => Face::Embedded(0),
                };
                (key, face)
            })
            .collect();
        Ok(Self { faces, parsed })
    }

    /// Parse a font set for embedding.
    ///
    /// Serif bold italic uses the bold face; every mono style uses the one
    /// mono face.
    pub fn embedded(set: &FontSet) -> Result<Self> {
        let parsed = [
            (SERIF_REGULAR_FILE, &set.serif_regular),
            (SERIF_BOLD_FILE, &set.serif_bold),
            (SERIF_ITALIC_FILE, &set.serif_italic),
            (MONO_FILE, &set.mono),
        ]
        .into_iter()
        .map(|(name, bytes)| parse_face(name, bytes))
        .collect::<Result<Vec<_>>>()?;

        let faces = FaceKey::ALL
            .into_iter()
            .map(|key| {
                let index = match (key.family, key.bold, key.italic) {
                    (FontFamily::Serif, false, false) => 0,
                    (FontFamily::Serif, true, _) => 1,
                    (FontFamily::Serif, false, true) => 2,
                    (FontFamily::Mono, _, _) => 3,
                };
                (key, Face::Embedded(index))
            })
            .collect();

        log::debug!("Parsed {} embedded font faces", parsed.len());
        Ok(Self { faces, parsed })
    }

    pub fn is_embedded(&self) -> bool {
        !self.parsed.is_empty()
    }

    /// Estimated advance width of `text` in points
    pub fn measure(&self, key: FaceKey, text: &str, size: f32) -> f32 {
        let estimate = |ch: char| {
            let ratio = match key.family {
                FontFamily::Serif => SERIF_CHAR_WIDTH_RATIO,
                FontFamily::Mono => MONO_CHAR_WIDTH_RATIO,
            };
            if ch.is_whitespace() && key.family == FontFamily::Serif {
                size * ratio * 0.5
            } else {
                size * ratio
            }
        };

        let parsed = match self.faces.get(&key) {
            Some(Face::Embedded(index)) => self.parsed.get(*index),
            _ => None,
        };
        match parsed {
            Some(font) => {
                let units_per_em = f32::from(font.font_metrics.units_per_em.max(1));
                text.chars()
                    .map(|ch| match font.lookup_glyph_index(ch as u32) {
                        Some(glyph) => {
                            f32::from(font.get_horizontal_advance(glyph)) / units_per_em * size
                        }
                        None => estimate(ch),
                    })
                    .sum()
            }
            None => text.chars().map(estimate).sum(),
        }
    }

    /// Add the embedded faces to `doc`
    pub(crate) fn register(&self, doc: &mut PdfDocument) -> RegisteredFonts<'_> {
        let ids = self.parsed.iter().map(|font| doc.add_font(font)).collect();
        RegisteredFonts { table: self, ids }
    }
}

/// Font table bound to one document
pub(crate) struct RegisteredFonts<'a> {
    table: &'a FontTable,
    /// Parallel to `FontTable::parsed`
    ids: Vec<FontId>,
}

impl RegisteredFonts<'_> {
    pub(crate) fn measure(&self, key: FaceKey, text: &str, size: f32) -> f32 {
        self.table.measure(key, text, size)
    }

    /// Select the face and write `text` at the current cursor
    pub(crate) fn write_ops(&self, key: FaceKey, size: f32, text: &str) -> [Op; 2] {
        let items = vec![TextItem::Text(text.to_string())];
        match self.table.faces.get(&key) {
            Some(Face::Embedded(index)) if *index < self.ids.len() => {
                let font = self.ids[*index].clone();
                [
                    Op::SetFontSize {
                        size: printpdf::Pt(size),
                        font: font.clone(),
                    },
                    Op::WriteText { items, font },
                ]
            }
            _ => {
                [
                    Op::SetFontSizeBuiltinFont {
                        size: printpdf::Pt(size),
                        font: key.builtin(),
                    },
                    Op::WriteTextBuiltinFont {
                        items,
                        font: key.builtin(),
                    },
                ]
            }
        }
    }
}
