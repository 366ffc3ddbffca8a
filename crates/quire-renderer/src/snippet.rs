//! Moves code blocks out to the snippet store and hands back embed shortcodes.

use quire_common::{
    BlockId, Page, QuireError, RichTextSpan, SnippetError, SnippetStore, SnippetUpload,
    snake_case,
};

/// Extension used when a code block's language has no table entry
pub const FALLBACK_EXTENSION: &str = "txt";

/// File extension for a code block language, if it is one we know
pub fn extension_for(language: &str) -> Option<&'static str> {
    let ext = match language {
        "bash" | "shell" => "sh",
        "c" => "c",
        "c++" => "cpp",
        "c#" => "cs",
        "css" => "css",
        "diff" => "diff",
        "docker" => "dockerfile",
        "elixir" => "ex",
        "go" | "golang" => "go",
        "graphql" => "graphql",
        "haskell" => "hs",
        "html" => "html",
        "java" => "java",
        "javascript" => "js",
        "json" => "json",
        "kotlin" => "kt",
        "lua" => "lua",
        "makefile" => "mk",
        "markdown" => "md",
        "php" => "php",
        "plain text" => "txt",
        "powershell" => "ps1",
        "python" => "py",
        "ruby" => "rb",
        "rust" => "rs",
        "scala" => "scala",
        "sql" => "sql",
        "swift" => "swift",
        "toml" => "toml",
        "typescript" => "ts",
        "xml" => "xml",
        "yaml" => "yml",
        _ => return None,
    };
    Some(ext)
}

/// `{snake_case(title)}:{compact block id}.{ext}`
pub fn snippet_filename(page: &Page, block_id: &BlockId, language: &str) -> String {
    let ext = extension_for(language).unwrap_or_else(|| {
        tracing::warn!(
            language,
            block_id = %block_id,
            fallback = FALLBACK_EXTENSION,
            "no file extension known for code language"
        );
        FALLBACK_EXTENSION
    });
    format!("{}:{}.{}", snake_case(&page.title), block_id.compact(), ext)
}

/// Hugo shortcode embedding a gist
pub fn gist_shortcode(handle: &str, snippet_id: &str) -> String {
    format!("{{{{< gist {handle} {snippet_id} >}}}}")
}

/// Outcome of syncing one code block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncedSnippet {
    pub filename: String,
    pub snippet_id: String,
    pub html_url: String,
    /// `false` when an existing snippet was updated in place
    pub created: bool,
    /// Shortcode that replaces the code block in the document
    pub embed: String,
}

/// Create or update the snippet for one code block.
///
/// The store is searched for a snippet already holding the derived filename;
/// it is updated if found and created otherwise. Nothing is cached, so every
/// call lists the store again.
pub async fn sync_code_block<S: SnippetStore>(
    store: &S,
    page: &Page,
    block_id: &BlockId,
    language: &str,
    rich_text: &[RichTextSpan],
) -> Result<SyncedSnippet, QuireError> {
    let upload = SnippetUpload {
        filename: snippet_filename(page, block_id, language),
        language: language.to_string(),
        content: rich_text
            .first()
            .map(|span| span.text.clone())
            .unwrap_or_default(),
    };

    upsert(store, &upload)
        .await
        .map_err(|source| QuireError::SnippetSync {
            filename: upload.filename.clone(),
            source,
        })
}

async fn upsert<S: SnippetStore>(
    store: &S,
    upload: &SnippetUpload,
) -> Result<SyncedSnippet, SnippetError> {
    let (snippet, created) = match store.find(&upload.filename).await? {
        Some(existing) => (store.update(&existing.id, upload).await?, false),
        None => (store.create(upload).await?, true),
    };
    tracing::info!(
        filename = %upload.filename,
        snippet_id = %snippet.id,
        created,
        "synced code snippet"
    );

    let handle = store.owner_handle().await?;
    Ok(SyncedSnippet {
        filename: upload.filename.clone(),
        embed: gist_shortcode(&handle, &snippet.id),
        snippet_id: snippet.id,
        html_url: snippet.html_url,
        created,
    })
}
