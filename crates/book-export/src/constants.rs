//! Shared constants for document export
//!
//! Page geometry and the math scale factor are part of the output contract
//! and must not change.

use crate::types::Color;

// =============================================================================
// Page Geometry
// =============================================================================

/// Page width in points (6 inches)
pub const PAGE_WIDTH_PT: f32 = 432.0;

/// Page height in points (9 inches)
pub const PAGE_HEIGHT_PT: f32 = 648.0;

/// Side margins (0.75 inch)
pub const MARGIN_SIDE_PT: f32 = 54.0;

/// Top and bottom margins
pub const MARGIN_VERTICAL_PT: f32 = 72.0;

/// Distance of the running header and footer from the page edge
pub const HEADER_FOOTER_OFFSET_PT: f32 = 36.0;

// =============================================================================
// Math
// =============================================================================

/// Points per ex unit of typeset math. Calibrated against the preview, not
/// derived from font metrics.
pub const EX_TO_PT: f32 = 5.2;

/// Supersampling factor used when rasterizing math
pub const DEFAULT_SUPERSAMPLE_SCALE: f32 = 2.0;

/// Horizontal indent shared by code and math blocks
pub const BLOCK_INDENT_PT: f32 = 48.0;

// =============================================================================
// Dialogue
// =============================================================================

/// Indent applied to the non-default speaker
pub const SPEAKER_INDENT_PT: f32 = 36.0;

// =============================================================================
// Code
// =============================================================================

/// Width of the line-number column
pub const CODE_LINE_NUMBER_WIDTH_PT: f32 = 30.0;

/// Gap between line number and code
pub const CODE_LINE_NUMBER_GAP_PT: f32 = 8.0;

pub const CODE_FONT_SIZE: f32 = 10.0;

/// Color of token kinds missing from the color table
pub const DEFAULT_TOKEN_COLOR: Color = Color::from_hex(0x333333);

/// Color of text the lexer gives no kind, at any nesting depth
pub const UNTYPED_TOKEN_COLOR: Color = Color::from_hex(0xa31515);

/// Color of the single run produced when highlighting fails
pub const FALLBACK_CODE_COLOR: Color = Color::from_hex(0x000000);

pub const LINE_NUMBER_COLOR: Color = Color::from_hex(0x858585);

// =============================================================================
// Text
// =============================================================================

/// Secondary text color for speaker labels, markers, header
pub const MUTED_TEXT_COLOR: Color = Color::from_hex(0x4a5568);

pub const BODY_TEXT_COLOR: Color = Color::from_hex(0x000000);

/// Line height as a multiple of font size
pub const LINE_HEIGHT_FACTOR: f32 = 1.2;

/// Approximate advance of builtin serif glyphs as a fraction of font size
pub const SERIF_CHAR_WIDTH_RATIO: f32 = 0.5;

/// Advance of builtin monospace glyphs as a fraction of font size
pub const MONO_CHAR_WIDTH_RATIO: f32 = 0.6;

// =============================================================================
// Headers and Output
// =============================================================================

pub const DEFAULT_EVEN_HEADER: &str = "COMPUTATIONAL MINDS";

pub const DEFAULT_ODD_HEADER: &str = "THE SHAPE OF BELIEF";

pub const DEFAULT_OUTPUT_FILE_NAME: &str = "book.pdf";
