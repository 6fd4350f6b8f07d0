use crate::constants::{DEFAULT_CHAPTER_SUBTITLE, DEFAULT_CHAPTER_TITLE, NEW_CHAPTER_SUBTITLE};
use crate::types::{LayoutError, Result};
use serde::{Deserialize, Serialize};

/// Who speaks a dialogue line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Speaker {
    /// The reader's voice (default, flush with the text column)
    #[default]
    You,
    /// The interlocutor (indented in both preview and print)
    Alan,
}

impl Speaker {
    pub const ALL: [Speaker; 2] = [Speaker::You, Speaker::Alan];

    pub fn name(self) -> &'static str {
        match self {
            Speaker::You => "You",
            Speaker::Alan => "Alan",
        }
    }

    /// Whether lines from this speaker are indented from the left edge
    pub fn is_indented(self) -> bool {
        self != Speaker::default()
    }
}

impl std::fmt::Display for Speaker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// One atomic piece of chapter content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ContentUnit {
    #[serde(rename = "text")]
    Dialogue { speaker: Speaker, text: String },
    #[serde(rename = "code")]
    Code { text: String },
    #[serde(rename = "math")]
    Math { text: String },
}

impl ContentUnit {
    pub fn dialogue(speaker: Speaker, text: impl Into<String>) -> Self {
        ContentUnit::Dialogue {
            speaker,
            text: text.into(),
        }
    }

    pub fn code(text: impl Into<String>) -> Self {
        ContentUnit::Code { text: text.into() }
    }

    pub fn math(text: impl Into<String>) -> Self {
        ContentUnit::Math { text: text.into() }
    }

    pub fn text(&self) -> &str {
        match self {
            ContentUnit::Dialogue { text, .. }
            | ContentUnit::Code { text }
            | ContentUnit::Math { text } => text,
        }
    }

    pub fn kind(&self) -> UnitKind {
        match self {
            ContentUnit::Dialogue { .. } => UnitKind::Dialogue,
            ContentUnit::Code { .. } => UnitKind::Code,
            ContentUnit::Math { .. } => UnitKind::Math,
        }
    }
}

/// Discriminant of a [`ContentUnit`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnitKind {
    Dialogue,
    Code,
    Math,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chapter {
    pub id: u32,
    pub title: String,
    pub subtitle: String,
    /// Authoring order, which is also reading order. Stored under the
    /// `dialogue` key for compatibility with existing chapter files.
    #[serde(rename = "dialogue", alias = "content", default)]
    pub content: Vec<ContentUnit>,
}

impl Chapter {
    pub fn new(id: u32, title: impl Into<String>, subtitle: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            subtitle: subtitle.into(),
            content: Vec::new(),
        }
    }
}

/// Field changes applied by [`Manuscript::update_chapter`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChapterUpdate {
    pub title: Option<String>,
    pub subtitle: Option<String>,
}

/// Ordered chapters making up the book
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Manuscript {
    pub chapters: Vec<Chapter>,
}

impl Default for Manuscript {
    fn default() -> Self {
        Self {
            chapters: vec![Chapter::new(
                1,
                DEFAULT_CHAPTER_TITLE,
                DEFAULT_CHAPTER_SUBTITLE,
            )],
        }
    }
}

impl Manuscript {
    pub fn new(chapters: Vec<Chapter>) -> Self {
        Self { chapters }
    }

    pub fn chapter(&self, id: u32) -> Option<&Chapter> {
        self.chapters.iter().find(|c| c.id == id)
    }

    fn chapter_mut(&mut self, id: u32) -> Result<&mut Chapter> {
        self.chapters
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(LayoutError::ChapterNotFound(id))
    }

    /// Id the next chapter will receive: one past the largest id in use
    pub fn next_chapter_id(&self) -> u32 {
        self.chapters.iter().map(|c| c.id).max().unwrap_or(0) + 1
    }

    /// Append a new empty chapter and return its id
    pub fn add_chapter(&mut self) -> u32 {
        let id = self.next_chapter_id();
        self.chapters.push(Chapter::new(
            id,
            format!("Chapter {}", id),
            NEW_CHAPTER_SUBTITLE,
        ));
        id
    }

    pub fn update_chapter(&mut self, id: u32, update: ChapterUpdate) -> Result<()> {
        let chapter = self.chapter_mut(id)?;
        if let Some(title) = update.title {
            chapter.title = title;
        }
        if let Some(subtitle) = update.subtitle {
            chapter.subtitle = subtitle;
        }
        Ok(())
    }

    pub fn add_unit(&mut self, chapter_id: u32, unit: ContentUnit) -> Result<()> {
        self.chapter_mut(chapter_id)?.content.push(unit);
        Ok(())
    }

    pub fn insert_unit(&mut self, chapter_id: u32, index: usize, unit: ContentUnit) -> Result<()> {
        let chapter = self.chapter_mut(chapter_id)?;
        if index > chapter.content.len() {
            return Err(LayoutError::UnitOutOfRange {
                chapter: chapter_id,
                index,
            });
        }
        chapter.content.insert(index, unit);
        Ok(())
    }

    pub fn remove_unit(&mut self, chapter_id: u32, index: usize) -> Result<ContentUnit> {
        let chapter = self.chapter_mut(chapter_id)?;
        if index >= chapter.content.len() {
            return Err(LayoutError::UnitOutOfRange {
                chapter: chapter_id,
                index,
            });
        }
        Ok(chapter.content.remove(index))
    }
}
