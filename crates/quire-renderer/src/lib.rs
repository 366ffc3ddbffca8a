//! Turns a content source's block tree into a Markdown document.
//!
//! Code blocks are not inlined: each one is upserted to the snippet store and
//! replaced by a gist shortcode. The finished document can then be wrapped in
//! front matter and written out as a draft.

pub mod block_renderer;
pub mod document;
pub mod draft;
pub mod inline;
pub mod numbering;
pub mod snippet;

pub use crate::block_renderer::RenderContext;
pub use crate::document::{Document, build_document};
pub use crate::draft::{DEFAULT_TEMPLATE, DraftInfo, DraftWriter, FilledDraft};
pub use crate::inline::{plain_text, render_span, render_spans};
pub use crate::numbering::ListNumbering;
pub use crate::snippet::{SyncedSnippet, gist_shortcode, snippet_filename, sync_code_block};
