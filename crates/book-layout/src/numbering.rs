//! Chapter-scoped numbering of code blocks and equations
//!
//! Labels take the form `<chapter>.<n>` where `<chapter>` is the 1-based
//! position of the chapter in the manuscript (not its stored id) and `<n>`
//! restarts at 1 in every chapter. Code and math keep separate counters.

use crate::manuscript::{Chapter, ContentUnit, UnitKind};
use std::fmt;

/// A chapter-scoped ordinal such as `2.3`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Label {
    /// 1-based position of the chapter in the manuscript
    pub chapter: usize,
    /// 1-based counter within the chapter, per content kind
    pub ordinal: usize,
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.chapter, self.ordinal)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NumberedUnit {
    pub unit: ContentUnit,
    /// Present for code and math, absent for dialogue
    pub label: Option<Label>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NumberedChapter {
    pub id: u32,
    pub title: String,
    pub subtitle: String,
    pub units: Vec<NumberedUnit>,
}

/// Number every chapter of a manuscript in order
pub fn number_chapters(chapters: &[Chapter]) -> Vec<NumberedChapter> {
    chapters
        .iter()
        .enumerate()
        .map(|(index, chapter)| number_chapter(index + 1, chapter))
        .collect()
}

/// Number the units of one chapter sitting at `chapter_ordinal` (1-based)
pub fn number_chapter(chapter_ordinal: usize, chapter: &Chapter) -> NumberedChapter {
    let mut code_count = 0;
    let mut math_count = 0;

    let units = chapter
        .content
        .iter()
        .map(|unit| {
            let counter = match unit.kind() {
                UnitKind::Code => Some(&mut code_count),
                UnitKind::Math => Some(&mut math_count),
                UnitKind::Dialogue => None,
            };
            let label = counter.map(|count| {
                *count += 1;
                Label {
                    chapter: chapter_ordinal,
                    ordinal: *count,
                }
            });
            NumberedUnit {
                unit: unit.clone(),
                label,
            }
        })
        .collect();

    NumberedChapter {
        id: chapter.id,
        title: chapter.title.clone(),
        subtitle: chapter.subtitle.clone(),
        units,
    }
}
