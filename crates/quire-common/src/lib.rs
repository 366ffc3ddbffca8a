//! Shared pieces for quire: the content model, error types, configuration and
//! the clients for the content source and the snippet store.

pub mod config;
pub mod error;
pub mod gist;
pub mod model;
pub mod notion;
pub mod snippet;
pub mod source;
#[cfg(feature = "telemetry")]
pub mod telemetry;

pub use crate::config::{Config, FileStore, Loader, ResolvedConfig};
pub use crate::error::{ConfigError, QuireError, SnippetError, SourceError};
pub use crate::gist::GistClient;
pub use crate::model::{Annotations, Block, BlockId, BlockKind, HeadingLevel, Page, RichTextSpan};
pub use crate::notion::{NotionClient, PageQuery};
pub use crate::snippet::{Snippet, SnippetFile, SnippetStore, SnippetUpload};
pub use crate::source::{ChildrenPage, ContentSource};

/// Lowercase, underscore separated form of a title, used for file names.
///
/// Everything outside `[A-Za-z0-9 ]` is dropped, then spaces and hyphens
/// become underscores.
pub fn snake_case(title: &str) -> String {
    title
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == ' ')
        .map(|c| match c {
            ' ' | '-' => '_',
            c => c.to_ascii_lowercase(),
        })
        .collect()
}
