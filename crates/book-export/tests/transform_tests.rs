mod common;

use book_export::*;
use book_layout::{Chapter, ContentUnit, Label, Manuscript, Speaker, number_chapters};
use common::{BrokenLexer, FakeRasterizer, FakeTypesetter};

fn two_chapter_manuscript() -> Manuscript {
    let mut first = Chapter::new(7, "Vectors", "Chapter 1");
    first.content = vec![
        ContentUnit::dialogue(Speaker::You, "Show me."),
        ContentUnit::math("$$a + b$$"),
        ContentUnit::code("int x = 1;"),
        ContentUnit::math("\\unrenderable"),
    ];
    let mut second = Chapter::new(3, "Matrices", "Chapter 2");
    second.content = vec![ContentUnit::math("$$M v$$")];
    Manuscript::new(vec![first, second])
}

#[tokio::test]
async fn test_transform_preserves_order_and_labels() {
    let manuscript = two_chapter_manuscript();
    let numbered = number_chapters(&manuscript.chapters);
    let typesetter = FakeTypesetter::default();
    let rasterizer = FakeRasterizer::default();
    let scratch = ScratchHost::new();
    let math = MathRenderer::new(&typesetter, &rasterizer, &scratch);

    let chapters = transform_chapters(&numbered, &math, &SyntectLexer::csharp())
        .await
        .unwrap();

    assert_eq!(chapters.len(), 2);
    assert_eq!(chapters[0].id, 7);
    assert_eq!(chapters[0].title, "Vectors");

    let units = &chapters[0].units;
    assert!(matches!(
        &units[0],
        TransformedUnit::Dialogue { speaker: Speaker::You, text } if text == "Show me."
    ));
    match &units[1] {
        TransformedUnit::Math { label, image, .. } => {
            assert_eq!(*label, Some(Label { chapter: 1, ordinal: 1 }));
            assert!(image.is_some());
        }
        other => panic!("unexpected unit {:?}", other),
    }
    match &units[2] {
        TransformedUnit::Code { label, code, .. } => {
            assert_eq!(*label, Some(Label { chapter: 1, ordinal: 1 }));
            assert!(matches!(code, CodeBlock::Highlighted(lines) if lines.len() == 1));
        }
        other => panic!("unexpected unit {:?}", other),
    }
    match &units[3] {
        TransformedUnit::Math { label, text, image } => {
            assert_eq!(label.map(|l| l.to_string()).as_deref(), Some("1.2"));
            assert_eq!(text, "\\unrenderable");
            assert!(image.is_none());
        }
        other => panic!("unexpected unit {:?}", other),
    }

    match &chapters[1].units[0] {
        TransformedUnit::Math { label, image, .. } => {
            assert_eq!(label.map(|l| l.to_string()).as_deref(), Some("2.1"));
            assert!(image.is_some());
        }
        other => panic!("unexpected unit {:?}", other),
    }

    assert_eq!(typesetter.calls(), 3);
    assert_eq!(scratch.attached_count(), 0);
}

#[tokio::test]
async fn test_failure_reported_after_all_math_settles() {
    let manuscript = two_chapter_manuscript();
    let numbered = number_chapters(&manuscript.chapters);
    let typesetter = FakeTypesetter::default();
    let rasterizer = FakeRasterizer::failing();
    let scratch = ScratchHost::new();
    let math = MathRenderer::new(&typesetter, &rasterizer, &scratch);

    let result = transform_chapters(&numbered, &math, &SyntectLexer::csharp()).await;

    assert!(matches!(result, Err(ExportError::Raster(_))));
    assert_eq!(typesetter.calls(), 3);
    assert_eq!(rasterizer.seen_defs().len(), 2);
    assert_eq!(scratch.attached_count(), 0);
}

#[tokio::test]
async fn test_lexer_failure_does_not_fail_transform() {
    let mut chapter = Chapter::new(1, "Code", "");
    chapter.content = vec![ContentUnit::code("anything")];
    let numbered = number_chapters(&[chapter]);
    let scratch = ScratchHost::new();
    let math = MathRenderer::new(&UnavailableTypesetter, &UnavailableRasterizer, &scratch);

    let chapters = transform_chapters(&numbered, &math, &BrokenLexer)
        .await
        .unwrap();

    match &chapters[0].units[0] {
        TransformedUnit::Code { code, .. } => {
            assert_eq!(
                *code,
                CodeBlock::Plain(TokenRun {
                    text: "anything".to_string(),
                    color: Color::from_hex(0x000000),
                })
            );
        }
        other => panic!("unexpected unit {:?}", other),
    }
}

#[tokio::test]
async fn test_transform_leaves_manuscript_untouched() {
    let manuscript = two_chapter_manuscript();
    let before = manuscript.clone();
    let numbered = number_chapters(&manuscript.chapters);
    let typesetter = FakeTypesetter::default();
    let rasterizer = FakeRasterizer::default();
    let scratch = ScratchHost::new();
    let math = MathRenderer::new(&typesetter, &rasterizer, &scratch);

    transform_chapters(&numbered, &math, &SyntectLexer::csharp())
        .await
        .unwrap();

    assert_eq!(manuscript, before);
}
