//! Shared constants for manuscript layout
//!
//! The pagination model is a fixed count of content units per page rather
//! than a measured height. Swapping in real measurement only needs to change
//! how a page decides it is full; the page list contract stays the same.

// =============================================================================
// Pagination
// =============================================================================

/// Content units accepted on one page before a new page starts
pub const DEFAULT_PAGE_CAPACITY: usize = 5;

/// Running header used on even-numbered pages of the preview
pub const DEFAULT_RUNNING_HEADER: &str = "VECTOR NEURAL NETWORKS";

// =============================================================================
// Default manuscript
// =============================================================================

pub const DEFAULT_CHAPTER_TITLE: &str = "Computational Minds";

pub const DEFAULT_CHAPTER_SUBTITLE: &str = "Chapter 1: The Shape of Belief";

/// Subtitle given to chapters created with `Manuscript::add_chapter`
pub const NEW_CHAPTER_SUBTITLE: &str = "New Chapter";

// =============================================================================
// Preview
// =============================================================================

/// Zoom bounds in percent
pub const MIN_ZOOM_PERCENT: u16 = 50;
pub const MAX_ZOOM_PERCENT: u16 = 150;
pub const DEFAULT_ZOOM_PERCENT: u16 = 100;
