mod common;

use book_export::backend::decode_data_url;
use book_export::transform::{LengthUnit, MathDimensions};
use book_export::*;
use book_layout::Speaker;
use common::{page_count, png_data_url};

fn chapter(title: &str, units: Vec<TransformedUnit>) -> TransformedChapter {
    TransformedChapter {
        id: 1,
        title: title.to_string(),
        subtitle: "Subtitle".to_string(),
        units,
    }
}

fn dialogue(text: &str) -> TransformedUnit {
    TransformedUnit::Dialogue {
        speaker: Speaker::You,
        text: text.to_string(),
    }
}

#[test]
fn test_empty_document_has_one_page() {
    let document = assemble(&[], &ExportOptions::default());
    let bytes = PdfBackend::default().render(&document).unwrap();
    assert!(bytes.starts_with(b"%PDF"));
    assert_eq!(page_count(&bytes), 1);
}

#[test]
fn test_each_chapter_starts_a_page() {
    let chapters = vec![
        chapter("One", vec![dialogue("Hello.")]),
        chapter("Two", vec![dialogue("Again.")]),
        chapter("Three", Vec::new()),
    ];
    let document = assemble(&chapters, &ExportOptions::default());
    let bytes = PdfBackend::default().render(&document).unwrap();
    assert_eq!(page_count(&bytes), 3);
}

#[test]
fn test_long_content_flows_onto_more_pages() {
    let long = "The quick brown fox jumps over the lazy dog. ".repeat(20);
    let units = (0..20).map(|_| dialogue(&long)).collect();
    let document = assemble(&[chapter("Long", units)], &ExportOptions::default());
    let bytes = PdfBackend::default().render(&document).unwrap();
    assert!(page_count(&bytes) > 3);
}

#[test]
fn test_code_and_math_render() {
    let code = highlight_code_for_test("var x = 1;\n// done");
    let units = vec![
        TransformedUnit::Code {
            label: None,
            text: "var x = 1;".to_string(),
            code,
        },
        TransformedUnit::Math {
            label: None,
            text: "$$x$$".to_string(),
            image: Some(MathImage {
                data_url: png_data_url(16, 8),
                dimensions: MathDimensions {
                    width: 8.0,
                    height: 4.0,
                    unit: LengthUnit::Ex,
                },
            }),
        },
        TransformedUnit::Math {
            label: None,
            text: "\\unrendered".to_string(),
            image: None,
        },
    ];
    let document = assemble(&[chapter("Mixed", units)], &ExportOptions::default());
    let bytes = PdfBackend::default().render(&document).unwrap();
    assert_eq!(page_count(&bytes), 1);
}

#[test]
fn test_oversized_image_is_scaled_to_fit() {
    let units = vec![TransformedUnit::Math {
        label: None,
        text: "$$wide$$".to_string(),
        image: Some(MathImage {
            data_url: png_data_url(200, 10),
            dimensions: MathDimensions {
                width: 400.0,
                height: 20.0,
                unit: LengthUnit::Ex,
            },
        }),
    }];
    let document = assemble(&[chapter("Wide", units)], &ExportOptions::default());
    assert!(PdfBackend::default().render(&document).is_ok());
}

#[test]
fn test_corrupt_image_fails_render() {
    let units = vec![TransformedUnit::Math {
        label: None,
        text: "$$x$$".to_string(),
        image: Some(MathImage {
            data_url: "data:image/png;base64,AAAA".to_string(),
            dimensions: MathDimensions {
                width: 1.0,
                height: 1.0,
                unit: LengthUnit::Ex,
            },
        }),
    }];
    let document = assemble(&[chapter("Bad", units)], &ExportOptions::default());
    assert!(matches!(
        PdfBackend::default().render(&document),
        Err(ExportError::Image(_))
    ));
}

#[test]
fn test_decode_data_url() {
    let image = decode_data_url(&png_data_url(3, 2)).unwrap();
    assert_eq!((image.width, image.height), (3, 2));

    assert!(matches!(
        decode_data_url("not a data url"),
        Err(ExportError::Backend(_))
    ));
    assert!(matches!(
        decode_data_url("data:image/png,plain"),
        Err(ExportError::Backend(_))
    ));
    assert!(matches!(
        decode_data_url("data:image/png;base64,!!!"),
        Err(ExportError::Backend(_))
    ));
}

#[test]
fn test_builtin_measure_is_proportional() {
    let fonts = FontTable::builtin();
    let key = book_export::backend::FaceKey {
        family: FontFamily::Mono,
        bold: false,
        italic: false,
    };
    assert!(!fonts.is_embedded());
    assert!((fonts.measure(key, "abcd", 10.0) - 24.0).abs() < 1e-4);
}

fn highlight_code_for_test(source: &str) -> CodeBlock {
    book_export::transform::highlight_code(source, &SyntectLexer::csharp())
}

fn assert_movable_across_threads<T: Send + Sync + Clone + 'static>() {}

#[test]
fn test_backend_is_movable_to_the_blocking_pool() {
    assert_movable_across_threads::<PdfBackend>();
    assert_movable_across_threads::<FontSource>();
}

#[test]
fn test_default_fonts_embed_the_bundled_mono_face() {
    let table = FontSource::default().load_table().unwrap();
    assert!(table.is_embedded());

    let mono = book_export::backend::FaceKey {
        family: FontFamily::Mono,
        bold: false,
        italic: false,
    };
    let lambda = table.measure(mono, "λ", 10.0);
    let letter = table.measure(mono, "a", 10.0);
    assert!(lambda > 0.0);
    assert!((lambda - letter).abs() < 1e-3);
}

#[test]
fn test_builtin_source_embeds_nothing() {
    let table = FontSource::Builtin.load_table().unwrap();
    assert!(!table.is_embedded());
}

#[test]
fn test_unparseable_font_files_fail_render() {
    let set = FontSet {
        serif_regular: b"not a font".to_vec(),
        serif_bold: Vec::new(),
        serif_italic: Vec::new(),
        mono: Vec::new(),
    };
    let backend = PdfBackend::new(FontSource::Files(std::sync::Arc::new(set)));
    let document = assemble(&[], &ExportOptions::default());
    assert!(matches!(
        backend.render(&document),
        Err(ExportError::Backend(_))
    ));
}

#[test]
fn test_embedded_advance_is_scaled_by_units_per_em() {
    let table = FontSource::default().load_table().unwrap();
    let mono = book_export::backend::FaceKey {
        family: FontFamily::Mono,
        bold: false,
        italic: false,
    };
    // DejaVu Sans Mono advances are 0.6 em
    assert!((table.measure(mono, "abcd", 10.0) - 24.0).abs() < 0.5);
}
