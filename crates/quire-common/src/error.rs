//! Error types for quire.
//!
//! Every failure aborts the current build. Nothing here is recovered locally;
//! errors travel up to the binary, which reports them through miette.

use miette::Diagnostic;
use std::path::PathBuf;

/// Main error type for quire operations
#[derive(thiserror::Error, Debug, Diagnostic)]
pub enum QuireError {
    /// A block tag the renderer has no Markdown form for
    #[error("unsupported block type: {0}")]
    #[diagnostic(
        code(quire::render::unsupported_block),
        help("only paragraphs, headings 1-3, bulleted/numbered list items and code blocks can be converted")
    )]
    UnsupportedBlockType(String),

    /// The source page (or its database) could not be located
    #[error(transparent)]
    #[diagnostic_source]
    SourceLookup(#[from] SourceError),

    /// Fetching the children of a block failed part way through
    #[error("failed to fetch children of block {parent}")]
    #[diagnostic(code(quire::source::pagination))]
    Pagination {
        parent: String,
        #[source]
        source: SourceError,
    },

    /// Listing, creating or updating a snippet failed
    #[error("failed to sync snippet {filename}")]
    #[diagnostic(code(quire::snippet::sync))]
    SnippetSync {
        filename: String,
        #[source]
        source: SnippetError,
    },

    /// The draft file could not be rendered or written
    #[error("failed to write draft to {}", path.display())]
    #[diagnostic(code(quire::draft::write))]
    Write {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error(transparent)]
    #[diagnostic_source]
    Config(#[from] ConfigError),
}

/// Errors talking to the content source
#[derive(thiserror::Error, Debug, Diagnostic)]
#[non_exhaustive]
pub enum SourceError {
    #[error("content source request failed")]
    #[diagnostic(code(quire::source::http))]
    Http(#[from] reqwest::Error),

    #[error("content source returned {status}: {message}")]
    #[diagnostic(code(quire::source::api))]
    Api { status: u16, message: String },

    #[error("0 results were found matching: {0}")]
    #[diagnostic(
        code(quire::source::database_not_found),
        help("check `database_name` in your config and that the integration can see it")
    )]
    DatabaseNotFound(String),

    #[error("search for '{0}' doesn't return a database as its best match")]
    #[diagnostic(code(quire::source::not_a_database))]
    NotADatabase(String),

    #[error("best database match '{found}' does not match query: {query}")]
    #[diagnostic(code(quire::source::database_mismatch))]
    DatabaseMismatch { found: String, query: String },

    #[error("no pages were found matching the status {0}")]
    #[diagnostic(code(quire::source::page_not_found))]
    PageNotFound(String),

    #[error("found page does not match given title: {found} (found), {given} (given)")]
    #[diagnostic(code(quire::source::page_mismatch))]
    PageMismatch { found: String, given: String },

    #[error("page {0} has no `Name` title")]
    #[diagnostic(code(quire::source::missing_title))]
    MissingTitle(String),

    #[error("malformed response from content source")]
    #[diagnostic(code(quire::source::parse))]
    Parse(#[from] serde_json::Error),
}

/// Errors talking to the snippet store
#[derive(thiserror::Error, Debug, Diagnostic)]
#[non_exhaustive]
pub enum SnippetError {
    #[error("snippet store request failed")]
    #[diagnostic(code(quire::snippet::http))]
    Http(#[from] reqwest::Error),

    #[error("snippet store returned {status}: {message}")]
    #[diagnostic(code(quire::snippet::api))]
    Api { status: u16, message: String },

    #[error("snippet {0} does not exist")]
    #[diagnostic(code(quire::snippet::not_found))]
    NotFound(String),
}

/// Configuration loading errors
#[derive(thiserror::Error, Debug, Diagnostic)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("failed to read config file {}", path.display())]
    #[diagnostic(code(quire::config::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported config format: {}", path.display())]
    #[diagnostic(
        code(quire::config::format),
        help("use a .toml, .json, .yml or .yaml file")
    )]
    UnsupportedFormat { path: PathBuf },

    #[error("failed to parse config file {}", path.display())]
    #[diagnostic(code(quire::config::parse))]
    Parse {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("missing required config key `{key}`")]
    #[diagnostic(
        code(quire::config::missing_key),
        help("set `{key}` in the config file or the {env} environment variable")
    )]
    MissingKey { key: &'static str, env: &'static str },
}
