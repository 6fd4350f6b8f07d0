//! Content transformation - enriching numbered units with render primitives
//!
//! Math units become rasterized images, code units become colored token
//! runs. All math units of the manuscript are transformed concurrently and
//! must all settle before any chapter is returned.

mod code;
mod math;
mod raster;
mod scratch;
mod syntax;

pub use code::*;
pub use math::*;
pub use raster::{ResvgRasterizer, rasterize_svg};
pub use scratch::*;
pub use syntax::SyntectLexer;

use crate::types::*;
use book_layout::{ContentUnit, Label, NumberedChapter, Speaker};
use futures_util::future::join_all;

/// A content unit with its render primitives attached
///
/// These are per-render artifacts and never written back to the manuscript.
#[derive(Debug, Clone, PartialEq)]
pub enum TransformedUnit {
    Dialogue {
        speaker: Speaker,
        text: String,
    },
    Code {
        label: Option<Label>,
        text: String,
        code: CodeBlock,
    },
    Math {
        label: Option<Label>,
        text: String,
        /// `None` when the markup could not be typeset
        image: Option<MathImage>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct TransformedChapter {
    pub id: u32,
    pub title: String,
    pub subtitle: String,
    pub units: Vec<TransformedUnit>,
}

/// Transform every unit of the numbered chapters.
///
/// Fails with the first math failure, but only after every math unit has
/// finished; nothing is abandoned mid-flight.
pub async fn transform_chapters<T, R, L>(
    chapters: &[NumberedChapter],
    math: &MathRenderer<'_, T, R>,
    lexer: &L,
) -> Result<Vec<TransformedChapter>>
where
    T: Typesetter,
    R: Rasterizer,
    L: Lexer,
{
    let math_jobs = chapters
        .iter()
        .flat_map(|chapter| chapter.units.iter())
        .filter_map(|numbered| match &numbered.unit {
            ContentUnit::Math { text } => Some(math.render(text)),
            _ => None,
        });

    let settled = join_all(math_jobs).await;
    log::debug!("Transformed {} math units", settled.len());
    let mut images = settled
        .into_iter()
        .collect::<Result<Vec<_>>>()?
        .into_iter();

    let transformed = chapters
        .iter()
        .map(|chapter| TransformedChapter {
            id: chapter.id,
            title: chapter.title.clone(),
            subtitle: chapter.subtitle.clone(),
            units: chapter
                .units
                .iter()
                .map(|numbered| match &numbered.unit {
                    ContentUnit::Dialogue { speaker, text } => TransformedUnit::Dialogue {
                        speaker: *speaker,
                        text: text.clone(),
                    },
                    ContentUnit::Code { text } => TransformedUnit::Code {
                        label: numbered.label,
                        text: text.clone(),
                        code: highlight_code(text, lexer),
                    },
                    ContentUnit::Math { text } => TransformedUnit::Math {
                        label: numbered.label,
                        text: text.clone(),
                        image: images.next().flatten(),
                    },
                })
                .collect(),
        })
        .collect();

    Ok(transformed)
}
