use std::future::Future;
use std::pin::Pin;

use quire_common::{Block, BlockKind, ContentSource, Page, QuireError, SnippetStore};

use crate::inline::{plain_text, render_spans};
use crate::numbering::ListNumbering;
use crate::snippet::{SyncedSnippet, sync_code_block};

type RenderFuture<'b> = Pin<Box<dyn Future<Output = Result<String, QuireError>> + 'b>>;

/// Per-build render state.
///
/// Holds the collaborators plus the numbered-list counter and the snippets
/// synced so far. Create one per document; it is never shared across builds.
pub struct RenderContext<'a, C, S> {
    page: &'a Page,
    source: &'a C,
    store: &'a S,
    numbering: ListNumbering,
    snippets: Vec<SyncedSnippet>,
}

impl<'a, C: ContentSource, S: SnippetStore> RenderContext<'a, C, S> {
    pub fn new(page: &'a Page, source: &'a C, store: &'a S) -> Self {
        Self {
            page,
            source,
            store,
            numbering: ListNumbering::new(),
            snippets: Vec::new(),
        }
    }

    pub fn page(&self) -> &Page {
        self.page
    }

    /// Snippets synced during this build, in document order
    pub fn snippets(&self) -> &[SyncedSnippet] {
        &self.snippets
    }

    pub fn into_snippets(self) -> Vec<SyncedSnippet> {
        self.snippets
    }

    /// Render `block` and, depth-first, all of its children.
    ///
    /// The block's own line comes first, prefixed with `prefix` and ended with
    /// a newline; each child follows with no prefix. Children are fully
    /// paginated before any of them is rendered.
    pub fn render_block<'b>(
        &'b mut self,
        block: &'b Block,
        prefix: Option<&'b str>,
    ) -> RenderFuture<'b> {
        Box::pin(async move {
            self.numbering.observe(&block.kind);
            tracing::trace!(block_id = %block.id, kind = block.kind.type_tag(), "rendering block");

            let own = self.render_own(block).await?;

            let mut md = String::with_capacity(own.len() + 1);
            md.push_str(prefix.unwrap_or_default());
            md.push_str(&own);
            md.push('\n');

            if block.has_children {
                let children = self.source.all_children(&block.id).await.map_err(|source| {
                    QuireError::Pagination {
                        parent: block.id.to_string(),
                        source,
                    }
                })?;
                for child in &children {
                    md.push_str(&self.render_block(child, None).await?);
                }
            }

            Ok(md)
        })
    }

    async fn render_own(&mut self, block: &Block) -> Result<String, QuireError> {
        let text = match &block.kind {
            BlockKind::Paragraph { rich_text } => render_spans(rich_text),
            BlockKind::Heading { level, rich_text } => {
                format!("\n{} {}", level.marker(), plain_text(rich_text))
            }
            BlockKind::BulletedListItem { rich_text } => {
                format!("* {}", render_spans(rich_text))
            }
            BlockKind::NumberedListItem { rich_text } => {
                format!(
                    "{}. {}",
                    self.numbering.next_ordinal(),
                    render_spans(rich_text)
                )
            }
            BlockKind::Code {
                language,
                rich_text,
            } => {
                let synced =
                    sync_code_block(self.store, self.page, &block.id, language, rich_text).await?;
                let embed = synced.embed.clone();
                self.snippets.push(synced);
                embed
            }
            BlockKind::Unsupported(tag) => {
                return Err(QuireError::UnsupportedBlockType(tag.clone()));
            }
        };
        Ok(text)
    }
}
