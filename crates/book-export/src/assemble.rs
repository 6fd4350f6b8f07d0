use crate::constants::*;
use crate::document::*;
use crate::options::ExportOptions;
use crate::transform::{TransformedChapter, TransformedUnit};
use book_layout::{Label, Speaker};

/// Build the document description for transformed chapters.
///
/// Pure: no rasterization or file output happens here.
pub fn assemble(chapters: &[TransformedChapter], options: &ExportOptions) -> Document {
    let mut content = Vec::new();
    for chapter in chapters {
        push_chapter(&mut content, chapter);
    }
    log::debug!(
        "Assembled {} chapters into {} blocks",
        chapters.len(),
        content.len()
    );

    Document {
        geometry: PageGeometry::default(),
        default_font: FontFamily::Serif,
        styles: default_styles(),
        header: HeaderRule {
            even: options.even_header.clone(),
            odd: options.odd_header.clone(),
            style: Style {
                font_size: 10.0,
                italic: true,
                color: MUTED_TEXT_COLOR,
                alignment: Alignment::Center,
                ..Style::default()
            },
        },
        footer: FooterRule {
            style: Style {
                font_size: 10.0,
                alignment: Alignment::Center,
                ..Style::default()
            },
        },
        content,
    }
}

fn push_chapter(content: &mut Vec<Block>, chapter: &TransformedChapter) {
    content.push(Block::Text {
        text: chapter.title.clone(),
        style: StyleKey::ChapterTitle,
        page_break_before: true,
    });
    content.push(Block::text(&chapter.subtitle, StyleKey::ChapterSubtitle));

    for unit in &chapter.units {
        match unit {
            TransformedUnit::Dialogue { speaker, text } => {
                content.push(Block::Stack(vec![
                    Block::text(speaker.name(), StyleKey::Speaker(*speaker)),
                    Block::text(text, StyleKey::Dialogue(*speaker)),
                ]));
            }
            TransformedUnit::Code { label, code, .. } => {
                content.push(Block::text(
                    format!("λ Code {}", label_text(*label)),
                    StyleKey::CodeMarker,
                ));
                content.push(Block::Code {
                    code: code.clone(),
                    style: StyleKey::CodeContainer,
                });
            }
            TransformedUnit::Math { label, text, image } => {
                content.push(Block::text(
                    format!("∑ Equation {}", label_text(*label)),
                    StyleKey::MathMarker,
                ));
                content.push(match image {
                    Some(image) => Block::Image {
                        data_url: image.data_url.clone(),
                        width_pt: image.dimensions.width_pt(),
                        height_pt: image.dimensions.height_pt(),
                        alignment: Alignment::Center,
                        margin: Insets::new(BLOCK_INDENT_PT, 12.0, 24.0, 12.0),
                    },
                    None => Block::text(text, StyleKey::MathContainer),
                });
            }
        }
    }
}

fn label_text(label: Option<Label>) -> String {
    label.map(|l| l.to_string()).unwrap_or_default()
}

/// Style table shared by every exported book
pub fn default_styles() -> StyleTable {
    let mut styles = StyleTable::default();

    styles.insert(
        StyleKey::ChapterTitle,
        Style {
            font_size: 24.0,
            bold: true,
            alignment: Alignment::Center,
            margin: Insets::new(0.0, 0.0, 0.0, 16.0),
            ..Style::default()
        },
    );
    styles.insert(
        StyleKey::ChapterSubtitle,
        Style {
            font_size: 18.0,
            italic: true,
            alignment: Alignment::Center,
            margin: Insets::new(0.0, 0.0, 0.0, 48.0),
            ..Style::default()
        },
    );

    for speaker in Speaker::ALL {
        let indent = if speaker.is_indented() {
            SPEAKER_INDENT_PT
        } else {
            0.0
        };
        styles.insert(
            StyleKey::Speaker(speaker),
            Style {
                font_size: 10.0,
                bold: true,
                color: MUTED_TEXT_COLOR,
                margin: Insets::new(indent, 0.0, 0.0, 2.0),
                ..Style::default()
            },
        );
        // Mirrored indent
        let margin = if speaker.is_indented() {
            Insets::new(SPEAKER_INDENT_PT, 0.0, 0.0, 12.0)
        } else {
            Insets::new(0.0, 0.0, SPEAKER_INDENT_PT, 12.0)
        };
        styles.insert(
            StyleKey::Dialogue(speaker),
            Style {
                margin,
                ..Style::default()
            },
        );
    }

    let marker = Style {
        font: FontFamily::Mono,
        font_size: 10.0,
        color: MUTED_TEXT_COLOR,
        margin: Insets::new(BLOCK_INDENT_PT, 0.0, 0.0, 0.0),
        ..Style::default()
    };
    styles.insert(StyleKey::CodeMarker, marker.clone());
    styles.insert(StyleKey::MathMarker, marker);

    styles.insert(
        StyleKey::CodeContainer,
        Style {
            font: FontFamily::Mono,
            font_size: CODE_FONT_SIZE,
            color: DEFAULT_TOKEN_COLOR,
            margin: Insets::new(BLOCK_INDENT_PT, 6.0, 24.0, 12.0),
            ..Style::default()
        },
    );
    styles.insert(
        StyleKey::CodeLineNumber,
        Style {
            font: FontFamily::Mono,
            font_size: CODE_FONT_SIZE,
            color: LINE_NUMBER_COLOR,
            ..Style::default()
        },
    );
    styles.insert(
        StyleKey::MathContainer,
        Style {
            font: FontFamily::Mono,
            font_size: 11.0,
            alignment: Alignment::Center,
            margin: Insets::new(BLOCK_INDENT_PT, 6.0, 24.0, 6.0),
            ..Style::default()
        },
    );

    styles
}
