use quire_common::{Block, ContentSource, Page, QuireError, SnippetStore};

use crate::block_renderer::RenderContext;
use crate::snippet::SyncedSnippet;

/// A fully rendered page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    pub markdown: String,
    /// Snippets created or updated while rendering, in document order
    pub snippets: Vec<SyncedSnippet>,
}

/// Render `blocks` (the page's top-level blocks, in source order) into one
/// Markdown document.
///
/// Fails on the first error. Snippets synced before the failure stay synced;
/// no partial document is returned.
pub async fn build_document<C, S>(
    page: &Page,
    blocks: &[Block],
    source: &C,
    store: &S,
) -> Result<Document, QuireError>
where
    C: ContentSource,
    S: SnippetStore,
{
    let mut ctx = RenderContext::new(page, source, store);
    let mut markdown = String::new();

    for block in blocks {
        markdown.push_str(&ctx.render_block(block, None).await?);
    }

    tracing::debug!(
        page_id = %page.id,
        bytes = markdown.len(),
        snippets = ctx.snippets().len(),
        "built document"
    );

    Ok(Document {
        markdown,
        snippets: ctx.into_snippets(),
    })
}
