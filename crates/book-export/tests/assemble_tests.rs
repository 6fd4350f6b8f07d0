mod common;

use book_export::transform::{LengthUnit, MathDimensions};
use book_export::*;
use book_layout::{Label, Speaker};

fn label(chapter: usize, ordinal: usize) -> Option<Label> {
    Some(Label { chapter, ordinal })
}

fn sample_chapters() -> Vec<TransformedChapter> {
    vec![
        TransformedChapter {
            id: 1,
            title: "Vectors".to_string(),
            subtitle: "Chapter 1".to_string(),
            units: vec![
                TransformedUnit::Dialogue {
                    speaker: Speaker::Alan,
                    text: "Consider a list of numbers.".to_string(),
                },
                TransformedUnit::Code {
                    label: label(1, 1),
                    text: "int x;".to_string(),
                    code: CodeBlock::Highlighted(Vec::new()),
                },
                TransformedUnit::Math {
                    label: label(1, 1),
                    text: "$$x$$".to_string(),
                    image: Some(MathImage {
                        data_url: common::png_data_url(8, 4),
                        dimensions: MathDimensions {
                            width: 10.0,
                            height: 2.5,
                            unit: LengthUnit::Ex,
                        },
                    }),
                },
            ],
        },
        TransformedChapter {
            id: 2,
            title: "Matrices".to_string(),
            subtitle: "Chapter 2".to_string(),
            units: vec![TransformedUnit::Math {
                label: label(2, 1),
                text: "$$\\broken$$".to_string(),
                image: None,
            }],
        },
    ]
}

fn texts(document: &Document) -> Vec<(String, StyleKey)> {
    document
        .leaf_blocks()
        .into_iter()
        .filter_map(|block| match block {
            Block::Text { text, style, .. } => Some((text.clone(), *style)),
            _ => None,
        })
        .collect()
}

#[test]
fn test_geometry_is_six_by_nine() {
    let document = assemble(&[], &ExportOptions::default());
    assert_eq!(document.geometry.width_pt, 432.0);
    assert_eq!(document.geometry.height_pt, 648.0);
    assert_eq!(document.geometry.margins, Insets::new(54.0, 72.0, 54.0, 72.0));
    assert_eq!(document.geometry.content_width(), 324.0);
    assert!(document.content.is_empty());
}

#[test]
fn test_chapter_titles_force_page_breaks() {
    let document = assemble(&sample_chapters(), &ExportOptions::default());
    let breaks: Vec<&str> = document
        .leaf_blocks()
        .into_iter()
        .filter_map(|block| match block {
            Block::Text {
                text,
                page_break_before: true,
                ..
            } => Some(text.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(breaks, vec!["Vectors", "Matrices"]);
}

#[test]
fn test_content_stream_order_and_markers() {
    let document = assemble(&sample_chapters(), &ExportOptions::default());

    assert_eq!(
        texts(&document),
        vec![
            ("Vectors".to_string(), StyleKey::ChapterTitle),
            ("Chapter 1".to_string(), StyleKey::ChapterSubtitle),
            ("Alan".to_string(), StyleKey::Speaker(Speaker::Alan)),
            (
                "Consider a list of numbers.".to_string(),
                StyleKey::Dialogue(Speaker::Alan)
            ),
            ("λ Code 1.1".to_string(), StyleKey::CodeMarker),
            ("∑ Equation 1.1".to_string(), StyleKey::MathMarker),
            ("Matrices".to_string(), StyleKey::ChapterTitle),
            ("Chapter 2".to_string(), StyleKey::ChapterSubtitle),
            ("∑ Equation 2.1".to_string(), StyleKey::MathMarker),
            ("$$\\broken$$".to_string(), StyleKey::MathContainer),
        ]
    );
}

#[test]
fn test_dialogue_is_one_stack() {
    let document = assemble(&sample_chapters(), &ExportOptions::default());
    let Block::Stack(children) = &document.content[2] else {
        panic!("expected dialogue stack");
    };
    assert_eq!(children.len(), 2);
}

#[test]
fn test_math_image_scaled_from_ex() {
    let document = assemble(&sample_chapters(), &ExportOptions::default());
    let images: Vec<(f32, f32, Alignment)> = document
        .leaf_blocks()
        .into_iter()
        .filter_map(|block| match block {
            Block::Image {
                width_pt,
                height_pt,
                alignment,
                ..
            } => Some((*width_pt, *height_pt, *alignment)),
            _ => None,
        })
        .collect();

    assert_eq!(images.len(), 1);
    let (width, height, alignment) = images[0];
    assert!((width - 52.0).abs() < 1e-4);
    assert!((height - 13.0).abs() < 1e-4);
    assert_eq!(alignment, Alignment::Center);
}

#[test]
fn test_unrendered_math_has_no_image_entry() {
    let chapters = vec![TransformedChapter {
        id: 1,
        title: "Only".to_string(),
        subtitle: String::new(),
        units: vec![TransformedUnit::Math {
            label: label(1, 1),
            text: "\\frac{1}{0".to_string(),
            image: None,
        }],
    }];
    let document = assemble(&chapters, &ExportOptions::default());

    assert!(
        !document
            .leaf_blocks()
            .iter()
            .any(|block| matches!(block, Block::Image { .. }))
    );
    assert!(texts(&document).contains(&("\\frac{1}{0".to_string(), StyleKey::MathContainer)));
}

#[test]
fn test_code_block_follows_marker() {
    let document = assemble(&sample_chapters(), &ExportOptions::default());
    let leaves = document.leaf_blocks();
    let marker = leaves
        .iter()
        .position(|block| matches!(block, Block::Text { style: StyleKey::CodeMarker, .. }))
        .unwrap();
    assert!(matches!(
        leaves[marker + 1],
        Block::Code {
            style: StyleKey::CodeContainer,
            ..
        }
    ));
}

#[test]
fn test_header_rule_by_absolute_parity() {
    let options = ExportOptions {
        even_header: "EVEN".to_string(),
        odd_header: "ODD".to_string(),
        ..ExportOptions::default()
    };
    let document = assemble(&[], &options);

    assert_eq!(document.header.text_for_page(1), None);
    assert_eq!(document.header.text_for_page(2), Some("EVEN"));
    assert_eq!(document.header.text_for_page(3), Some("ODD"));
    assert_eq!(document.header.text_for_page(10), Some("EVEN"));
    assert_eq!(document.footer.text_for_page(1), "1");
    assert_eq!(document.footer.text_for_page(42), "42");
    assert_eq!(document.footer.style.alignment, Alignment::Center);
}

#[test]
fn test_only_the_second_speaker_is_indented() {
    let styles = default_styles();
    let you = styles.resolve(StyleKey::Dialogue(Speaker::You));
    let alan = styles.resolve(StyleKey::Dialogue(Speaker::Alan));

    assert_eq!(you.margin.left, 0.0);
    assert_eq!(alan.margin.left, 36.0);
    assert_eq!(
        styles.resolve(StyleKey::Speaker(Speaker::Alan)).margin.left,
        36.0
    );
    assert_eq!(
        styles.resolve(StyleKey::Speaker(Speaker::You)).margin.left,
        0.0
    );
}

#[test]
fn test_style_table_covers_every_kind() {
    let styles = default_styles();
    for key in [
        StyleKey::ChapterTitle,
        StyleKey::ChapterSubtitle,
        StyleKey::CodeMarker,
        StyleKey::CodeContainer,
        StyleKey::CodeLineNumber,
        StyleKey::MathMarker,
        StyleKey::MathContainer,
    ] {
        assert!(styles.get(key).is_some(), "missing style {:?}", key);
    }
    assert_eq!(styles.len(), 11);
    assert_eq!(
        styles.resolve(StyleKey::ChapterTitle).alignment,
        Alignment::Center
    );
    assert_eq!(styles.resolve(StyleKey::CodeContainer).font, FontFamily::Mono);
}
