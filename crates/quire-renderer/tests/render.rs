mod common;

use common::*;
use quire_common::{Block, BlockKind, HeadingLevel, Page, QuireError, RichTextSpan};
use quire_renderer::build_document;

fn page() -> Page {
    Page::new("page-1", "Hello World")
}

#[tokio::test]
async fn test_empty_document() {
    let doc = build_document(&page(), &[], &MemorySource::new(), &MemoryStore::new("octocat"))
        .await
        .unwrap();
    assert_eq!(doc.markdown, "");
    assert!(doc.snippets.is_empty());
}

#[tokio::test]
async fn test_mixed_document() {
    let blocks = vec![
        heading("h1", HeadingLevel::One, "Intro"),
        Block::new("p1", BlockKind::Paragraph {
            rich_text: vec![
                RichTextSpan::new("Read "),
                RichTextSpan::new("the docs").bold().link("https://docs.rs"),
            ],
        }),
        bullet("b1", "first"),
        bullet("b2", "second"),
        heading("h2", HeadingLevel::Two, "Steps"),
        numbered("n1", "install"),
        numbered("n2", "run"),
        code("c1", "rust", "fn main() {}"),
    ];
    let doc = build_document(
        &page(),
        &blocks,
        &MemorySource::new(),
        &MemoryStore::new("octocat"),
    )
    .await
    .unwrap();

    insta::assert_snapshot!(doc.markdown.trim(), @r"
    # Intro
    Read[**the docs**](https://docs.rs)
    * first
    * second

    ## Steps
    1. install
    2. run
    {{< gist octocat gist1 >}}
    ");
}

#[tokio::test]
async fn test_heading_levels_use_plain_text() {
    let blocks = vec![
        Block::new("h3", BlockKind::Heading {
            level: HeadingLevel::Three,
            rich_text: vec![
                RichTextSpan::new("Deep ").bold(),
                RichTextSpan::new("dive").code(),
            ],
        }),
        Block::new("h-empty", BlockKind::Heading {
            level: HeadingLevel::One,
            rich_text: vec![],
        }),
    ];
    let doc = build_document(
        &page(),
        &blocks,
        &MemorySource::new(),
        &MemoryStore::new("octocat"),
    )
    .await
    .unwrap();
    assert_eq!(doc.markdown, "\n### Deep dive\n\n# \n");
}

#[tokio::test]
async fn test_children_follow_parent_in_preorder() {
    let source = MemorySource::new()
        .with("b1", vec![bullet("b1a", "nested").with_children(), paragraph("b1b", "after")])
        .with("b1a", vec![paragraph("b1a1", "deepest")]);
    let blocks = vec![bullet("b1", "top").with_children(), paragraph("p2", "tail")];

    let doc = build_document(&page(), &blocks, &source, &MemoryStore::new("octocat"))
        .await
        .unwrap();
    assert_eq!(doc.markdown, "* top\n* nested\ndeepest\nafter\ntail\n");
}

#[tokio::test]
async fn test_empty_paragraph_still_renders_children() {
    let source = MemorySource::new().with("p1", vec![paragraph("p1a", "child")]);
    let blocks = vec![
        Block::new("p1", BlockKind::Paragraph { rich_text: vec![] }).with_children(),
    ];

    let doc = build_document(&page(), &blocks, &source, &MemoryStore::new("octocat"))
        .await
        .unwrap();
    assert_eq!(doc.markdown, "\nchild\n");
}

#[tokio::test]
async fn test_numbering_restarts_after_interruption() {
    let blocks = vec![
        numbered("n1", "a"),
        paragraph("p1", "b"),
        numbered("n2", "c"),
        numbered("n3", "d"),
    ];
    let doc = build_document(
        &page(),
        &blocks,
        &MemorySource::new(),
        &MemoryStore::new("octocat"),
    )
    .await
    .unwrap();
    assert_eq!(doc.markdown, "1. a\nb\n1. c\n2. d\n");
}

#[tokio::test]
async fn test_numbering_is_reset_by_nested_blocks() {
    // The bullet inside n1 resets the count before n2 is visited.
    let source = MemorySource::new().with("n1", vec![bullet("n1a", "aside")]);
    let blocks = vec![
        numbered("n1", "first").with_children(),
        numbered("n2", "second"),
    ];

    let doc = build_document(&page(), &blocks, &source, &MemoryStore::new("octocat"))
        .await
        .unwrap();
    assert_eq!(doc.markdown, "1. first\n* aside\n1. second\n");
}

#[tokio::test]
async fn test_builds_do_not_share_numbering() {
    let blocks = vec![numbered("n1", "a"), numbered("n2", "b")];
    let source = MemorySource::new();
    let store = MemoryStore::new("octocat");

    let first = build_document(&page(), &blocks, &source, &store).await.unwrap();
    let second = build_document(&page(), &blocks, &source, &store).await.unwrap();
    assert_eq!(first.markdown, "1. a\n2. b\n");
    assert_eq!(second.markdown, first.markdown);
}

#[tokio::test]
async fn test_children_are_fully_paginated() {
    let children: Vec<_> = (1..=5)
        .map(|i| paragraph(&format!("c{i}"), &format!("line {i}")))
        .collect();
    let source = MemorySource::new().paged(2).with("p1", children);
    let blocks = vec![paragraph("p1", "parent").with_children()];

    let doc = build_document(&page(), &blocks, &source, &MemoryStore::new("octocat"))
        .await
        .unwrap();
    assert_eq!(
        doc.markdown,
        "parent\nline 1\nline 2\nline 3\nline 4\nline 5\n"
    );
    assert_eq!(source.requests.get(), 3);
}

#[tokio::test]
async fn test_leaf_blocks_are_not_queried_for_children() {
    let source = MemorySource::new();
    let blocks = vec![paragraph("p1", "a"), bullet("b1", "b")];

    build_document(&page(), &blocks, &source, &MemoryStore::new("octocat"))
        .await
        .unwrap();
    assert_eq!(source.requests.get(), 0);
}

#[tokio::test]
async fn test_unsupported_block_aborts_build() {
    let blocks = vec![
        paragraph("p1", "fine"),
        Block::new("d1", BlockKind::Unsupported("divider".into())),
    ];
    let err = build_document(
        &page(),
        &blocks,
        &MemorySource::new(),
        &MemoryStore::new("octocat"),
    )
    .await
    .unwrap_err();

    assert!(matches!(&err, QuireError::UnsupportedBlockType(tag) if tag == "divider"));
    assert_eq!(err.to_string(), "unsupported block type: divider");
}

#[tokio::test]
async fn test_unsupported_child_aborts_build() {
    let source = MemorySource::new().with(
        "b1",
        vec![Block::new("t1", BlockKind::Unsupported("table".into()))],
    );
    let blocks = vec![bullet("b1", "list").with_children()];

    let err = build_document(&page(), &blocks, &source, &MemoryStore::new("octocat"))
        .await
        .unwrap_err();
    assert!(matches!(err, QuireError::UnsupportedBlockType(tag) if tag == "table"));
}

#[tokio::test]
async fn test_child_lookup_failure_names_parent() {
    let source = MemorySource::new().failing_on("b1");
    let blocks = vec![bullet("b1", "list").with_children()];

    let err = build_document(&page(), &blocks, &source, &MemoryStore::new("octocat"))
        .await
        .unwrap_err();
    assert!(matches!(err, QuireError::Pagination { parent, .. } if parent == "b1"));
}
