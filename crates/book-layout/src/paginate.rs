//! Packing numbered chapter content into preview pages
//!
//! Every chapter opens with a title page (page 1). Its units then fill
//! pages of `page_capacity` entries each; a short final page is emitted as is.
//! Odd-numbered pages carry the chapter title as running header, even-numbered
//! pages carry the configured book header.

use crate::manuscript::Manuscript;
use crate::numbering::{NumberedChapter, NumberedUnit, number_chapters};
use crate::options::PaginationOptions;

/// One renderable entry on a preview page
#[derive(Debug, Clone, PartialEq)]
pub enum PageEntry {
    ChapterTitle { title: String, subtitle: String },
    Unit(NumberedUnit),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub running_header: String,
    pub content: Vec<PageEntry>,
    /// 1-based position within the chapter
    pub page_number: usize,
    pub is_chapter_start: bool,
}

/// Running header for the page at `page_number` (1-based) of a chapter
pub fn running_header_for(
    page_number: usize,
    chapter_title: &str,
    options: &PaginationOptions,
) -> String {
    if page_number % 2 == 1 {
        chapter_title.to_string()
    } else {
        options.running_header.clone()
    }
}

/// Paginate one numbered chapter
pub fn paginate_chapter(chapter: &NumberedChapter, options: &PaginationOptions) -> Vec<Page> {
    // `validate` rejects zero
    let capacity = options.page_capacity.max(1);
    let mut pages = Vec::with_capacity(1 + chapter.units.len().div_ceil(capacity));

    pages.push(Page {
        running_header: running_header_for(1, &chapter.title, options),
        content: vec![PageEntry::ChapterTitle {
            title: chapter.title.clone(),
            subtitle: chapter.subtitle.clone(),
        }],
        page_number: 1,
        is_chapter_start: true,
    });

    for chunk in chapter.units.chunks(capacity) {
        let page_number = pages.len() + 1;
        pages.push(Page {
            running_header: running_header_for(page_number, &chapter.title, options),
            content: chunk.iter().cloned().map(PageEntry::Unit).collect(),
            page_number,
            is_chapter_start: false,
        });
    }

    pages
}

/// Number and paginate a whole manuscript, chapters in order
pub fn paginate(manuscript: &Manuscript, options: &PaginationOptions) -> Vec<Page> {
    let pages: Vec<Page> = number_chapters(&manuscript.chapters)
        .iter()
        .flat_map(|chapter| paginate_chapter(chapter, options))
        .collect();
    log::debug!(
        "Paginated {} chapters into {} pages",
        manuscript.chapters.len(),
        pages.len()
    );
    pages
}
