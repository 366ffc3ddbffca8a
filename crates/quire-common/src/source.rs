use crate::error::SourceError;
use crate::model::{Block, BlockId};
use serde::Deserialize;
use std::future::Future;

/// One page of a block's children
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChildrenPage {
    pub results: Vec<Block>,
    #[serde(default)]
    pub has_more: bool,
    #[serde(default)]
    pub next_cursor: Option<String>,
}

/// Where block trees come from.
///
/// Implementations only need to fetch one page of children at a time;
/// [`ContentSource::all_children`] walks the cursor until the source reports
/// no more results.
pub trait ContentSource {
    /// Fetch one page of `parent`'s children, starting at `cursor`
    fn children(
        &self,
        parent: &BlockId,
        cursor: Option<&str>,
    ) -> impl Future<Output = Result<ChildrenPage, SourceError>>;

    /// Fetch every child of `parent`, in source order
    ///
    /// Either all pages resolve or an error is returned; a partially fetched
    /// list is never handed back.
    fn all_children(
        &self,
        parent: &BlockId,
    ) -> impl Future<Output = Result<Vec<Block>, SourceError>> {
        async move {
            let mut blocks = Vec::new();
            let mut cursor: Option<String> = None;
            loop {
                let page = self.children(parent, cursor.as_deref()).await?;
                blocks.extend(page.results);

                match page.next_cursor {
                    Some(next) if page.has_more => cursor = Some(next),
                    _ => break,
                }
            }
            tracing::trace!(parent = %parent, count = blocks.len(), "resolved children");
            Ok(blocks)
        }
    }
}

impl<T: ContentSource> ContentSource for &T {
    fn children(
        &self,
        parent: &BlockId,
        cursor: Option<&str>,
    ) -> impl Future<Output = Result<ChildrenPage, SourceError>> {
        (**self).children(parent, cursor)
    }
}
