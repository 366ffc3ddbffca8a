use crate::error::SnippetError;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::future::Future;

/// A hosted bundle of named files, as returned by the store
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Snippet {
    pub id: String,
    #[serde(default)]
    pub html_url: String,
    #[serde(default)]
    pub files: BTreeMap<String, SnippetFile>,
}

impl Snippet {
    pub fn contains_file(&self, filename: &str) -> bool {
        self.files.contains_key(filename)
    }
}

/// One file inside a [`Snippet`]. Listings omit the content.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SnippetFile {
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

/// File contents to write on create or update
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnippetUpload {
    pub filename: String,
    pub language: String,
    pub content: String,
}

/// The external snippet store, scoped to one authenticated owner.
///
/// Every method is a single round trip. Nothing is cached between calls.
pub trait SnippetStore {
    /// Every snippet owned by the authenticated identity
    fn list(&self) -> impl Future<Output = Result<Vec<Snippet>, SnippetError>>;

    /// Create a new public snippet holding exactly `file`
    fn create(&self, file: &SnippetUpload)
    -> impl Future<Output = Result<Snippet, SnippetError>>;

    /// Replace `file` inside snippet `id`, leaving its other files alone
    fn update(
        &self,
        id: &str,
        file: &SnippetUpload,
    ) -> impl Future<Output = Result<Snippet, SnippetError>>;

    /// Public handle of the authenticated identity
    fn owner_handle(&self) -> impl Future<Output = Result<String, SnippetError>>;

    /// First owned snippet holding a file named `filename`
    fn find(
        &self,
        filename: &str,
    ) -> impl Future<Output = Result<Option<Snippet>, SnippetError>> {
        async move {
            Ok(self
                .list()
                .await?
                .into_iter()
                .find(|snippet| snippet.contains_file(filename)))
        }
    }
}

impl<T: SnippetStore> SnippetStore for &T {
    fn list(&self) -> impl Future<Output = Result<Vec<Snippet>, SnippetError>> {
        (**self).list()
    }

    fn create(
        &self,
        file: &SnippetUpload,
    ) -> impl Future<Output = Result<Snippet, SnippetError>> {
        (**self).create(file)
    }

    fn update(
        &self,
        id: &str,
        file: &SnippetUpload,
    ) -> impl Future<Output = Result<Snippet, SnippetError>> {
        (**self).update(id, file)
    }

    fn owner_handle(&self) -> impl Future<Output = Result<String, SnippetError>> {
        (**self).owner_handle()
    }
}
