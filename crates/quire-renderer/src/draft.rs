//! Hugo draft files: front matter plus the rendered document.

use std::path::{Path, PathBuf};

use chrono::{DateTime, FixedOffset, Local, SecondsFormat};
use minijinja::{AutoEscape, Environment};
use quire_common::{QuireError, snake_case};
use serde::Serialize;

/// Built-in draft layout
pub const DEFAULT_TEMPLATE: &str = r#"---
title: {{ title | quote }}
date: {{ date }}
description: {{ description | quote }}
draft: {{ draft }}
---

{{ content }}
"#;

/// What goes into a draft. Unset optional fields get defaults on write.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DraftInfo {
    pub title: String,
    pub filename: String,
    pub description: Option<String>,
    pub date: Option<DateTime<FixedOffset>>,
    pub draft: Option<bool>,
    pub content: String,
}

impl DraftInfo {
    /// Draft for `title`, saved as `{snake_case(title)}.md`
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        let title = title.into();
        Self {
            filename: format!("{}.md", snake_case(&title)),
            title,
            content: content.into(),
            ..Default::default()
        }
    }

    /// Fill `description = ""`, `date = now` and `draft = true` where unset
    pub fn fill_defaults(self) -> FilledDraft {
        FilledDraft {
            title: self.title,
            filename: self.filename,
            description: self.description.unwrap_or_default(),
            date: self.date.unwrap_or_else(|| Local::now().fixed_offset()),
            draft: self.draft.unwrap_or(true),
            content: self.content,
        }
    }
}

/// A [`DraftInfo`] with every field set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilledDraft {
    pub title: String,
    pub filename: String,
    pub description: String,
    pub date: DateTime<FixedOffset>,
    pub draft: bool,
    pub content: String,
}

#[derive(Serialize)]
struct DraftContext<'a> {
    title: &'a str,
    description: &'a str,
    date: String,
    /// Lowercase YAML boolean; minijinja would print `True`
    draft: &'static str,
    content: &'a str,
}

fn quote(value: String) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}

/// Renders drafts and writes them into the content directory
pub struct DraftWriter {
    content_path: PathBuf,
    template: String,
}

impl DraftWriter {
    /// Writer using the built-in template
    pub fn new(content_path: impl Into<PathBuf>) -> Self {
        Self::with_template(content_path, DEFAULT_TEMPLATE)
    }

    /// Writer using `template` as the draft layout
    pub fn with_template(content_path: impl Into<PathBuf>, template: impl Into<String>) -> Self {
        Self {
            content_path: content_path.into(),
            template: template.into(),
        }
    }

    /// Writer using the template stored at `template_path`
    pub async fn with_template_file(
        content_path: impl Into<PathBuf>,
        template_path: &Path,
    ) -> Result<Self, QuireError> {
        let template = tokio::fs::read_to_string(template_path)
            .await
            .map_err(|e| QuireError::Write {
                path: template_path.to_path_buf(),
                source: Box::new(e),
            })?;
        Ok(Self::with_template(content_path, template))
    }

    pub fn content_path(&self) -> &Path {
        &self.content_path
    }

    /// Render the draft text without touching the filesystem
    pub fn render(&self, draft: &FilledDraft) -> Result<String, minijinja::Error> {
        let mut env = Environment::new();
        env.set_auto_escape_callback(|_| AutoEscape::None);
        env.set_keep_trailing_newline(true);
        env.add_filter("quote", quote);

        let template = env.template_from_str(&self.template)?;
        template.render(DraftContext {
            title: &draft.title,
            description: &draft.description,
            date: draft.date.to_rfc3339_opts(SecondsFormat::Secs, false),
            draft: if draft.draft { "true" } else { "false" },
            content: &draft.content,
        })
    }

    /// Fill defaults, render, and write to `{content_path}/{filename}`
    pub async fn write(&self, info: DraftInfo) -> Result<PathBuf, QuireError> {
        let draft = info.fill_defaults();
        let path = self.content_path.join(&draft.filename);

        let text = self.render(&draft).map_err(|e| QuireError::Write {
            path: path.clone(),
            source: Box::new(e),
        })?;
        tokio::fs::write(&path, text)
            .await
            .map_err(|e| QuireError::Write {
                path: path.clone(),
                source: Box::new(e),
            })?;

        tracing::info!(path = %path.display(), "wrote draft");
        Ok(path)
    }
}
