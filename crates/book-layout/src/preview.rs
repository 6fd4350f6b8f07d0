use crate::constants::{DEFAULT_ZOOM_PERCENT, MAX_ZOOM_PERCENT, MIN_ZOOM_PERCENT};
use crate::paginate::Page;

/// How the preview lays out pages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PreviewMode {
    /// Two facing pages at a time
    #[default]
    Spread,
    Single,
    /// Every page, one after another
    Continuous,
}

impl PreviewMode {
    /// Pages moved by one navigation step
    pub fn step(self) -> usize {
        match self {
            PreviewMode::Spread => 2,
            PreviewMode::Single | PreviewMode::Continuous => 1,
        }
    }
}

/// Presentation state for the paginated preview
///
/// Owned by the caller and passed in explicitly; pagination never reads it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreviewState {
    pub current_page: usize,
    pub mode: PreviewMode,
    zoom_percent: u16,
}

impl Default for PreviewState {
    fn default() -> Self {
        Self {
            current_page: 0,
            mode: PreviewMode::default(),
            zoom_percent: DEFAULT_ZOOM_PERCENT,
        }
    }
}

impl PreviewState {
    pub fn new(mode: PreviewMode) -> Self {
        Self {
            mode,
            ..Default::default()
        }
    }

    pub fn zoom_percent(&self) -> u16 {
        self.zoom_percent
    }

    /// Set zoom, clamped to the supported range
    pub fn set_zoom(&mut self, percent: u16) {
        self.zoom_percent = percent.clamp(MIN_ZOOM_PERCENT, MAX_ZOOM_PERCENT);
    }

    /// Zoom as a scale factor (1.0 = 100%)
    pub fn scale(&self) -> f32 {
        f32::from(self.zoom_percent) / 100.0
    }

    pub fn first(&mut self) {
        self.current_page = 0;
    }

    pub fn last(&mut self, page_count: usize) {
        self.current_page = page_count.max(1) - 1;
    }

    pub fn next(&mut self, page_count: usize) {
        let last = page_count.max(1) - 1;
        self.current_page = (self.current_page + self.mode.step()).min(last);
    }

    pub fn previous(&mut self) {
        self.current_page = self.current_page.saturating_sub(self.mode.step());
    }

    pub fn can_go_back(&self) -> bool {
        self.current_page > 0
    }

    pub fn can_go_forward(&self, page_count: usize) -> bool {
        self.current_page + 1 < page_count.max(1)
    }

    /// Pages shown for the current position and mode
    pub fn visible_pages<'a>(&self, pages: &'a [Page]) -> &'a [Page] {
        if pages.is_empty() {
            return pages;
        }
        let current = self.current_page.min(pages.len() - 1);
        match self.mode {
            PreviewMode::Spread => &pages[current..(current + 2).min(pages.len())],
            PreviewMode::Single => &pages[current..=current],
            PreviewMode::Continuous => pages,
        }
    }
}
