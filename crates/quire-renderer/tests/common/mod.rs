#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, HashMap};

use quire_common::{
    Block, BlockId, BlockKind, ChildrenPage, ContentSource, HeadingLevel, RichTextSpan, Snippet,
    SnippetError, SnippetFile, SnippetStore, SnippetUpload, SourceError,
};

/// In-memory block tree, served `page_size` children at a time
pub struct MemorySource {
    children: HashMap<String, Vec<Block>>,
    page_size: usize,
    failing: Option<String>,
    pub requests: Cell<usize>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self {
            children: HashMap::new(),
            page_size: 100,
            failing: None,
            requests: Cell::new(0),
        }
    }

    pub fn paged(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn with(mut self, parent: &str, children: Vec<Block>) -> Self {
        self.children.insert(parent.to_string(), children);
        self
    }

    /// Every children lookup for `parent` fails
    pub fn failing_on(mut self, parent: &str) -> Self {
        self.failing = Some(parent.to_string());
        self
    }
}

impl ContentSource for MemorySource {
    async fn children(
        &self,
        parent: &BlockId,
        cursor: Option<&str>,
    ) -> Result<ChildrenPage, SourceError> {
        self.requests.set(self.requests.get() + 1);
        if self.failing.as_deref() == Some(parent.as_str()) {
            return Err(SourceError::Api {
                status: 502,
                message: "bad gateway".into(),
            });
        }

        let all = self.children.get(parent.as_str()).cloned().unwrap_or_default();
        let start: usize = cursor.map(|c| c.parse().unwrap()).unwrap_or(0);
        let end = (start + self.page_size).min(all.len());
        let has_more = end < all.len();
        Ok(ChildrenPage {
            results: all[start..end].to_vec(),
            has_more,
            next_cursor: has_more.then(|| end.to_string()),
        })
    }
}

/// In-memory snippet store that counts round trips
pub struct MemoryStore {
    pub snippets: RefCell<Vec<Snippet>>,
    pub calls: Cell<usize>,
    pub handle: String,
    pub fail_writes: Cell<bool>,
}

impl MemoryStore {
    pub fn new(handle: &str) -> Self {
        Self {
            snippets: RefCell::new(Vec::new()),
            calls: Cell::new(0),
            handle: handle.to_string(),
            fail_writes: Cell::new(false),
        }
    }

    pub fn with_snippet(self, id: &str, files: &[(&str, &str)]) -> Self {
        let files = files
            .iter()
            .map(|(name, content)| {
                (
                    name.to_string(),
                    SnippetFile {
                        language: None,
                        content: Some(content.to_string()),
                    },
                )
            })
            .collect();
        self.snippets.borrow_mut().push(Snippet {
            id: id.to_string(),
            html_url: format!("https://gist.example/{id}"),
            files,
        });
        self
    }

    pub fn snippet(&self, id: &str) -> Option<Snippet> {
        self.snippets.borrow().iter().find(|s| s.id == id).cloned()
    }

    pub fn len(&self) -> usize {
        self.snippets.borrow().len()
    }

    fn tick(&self) {
        self.calls.set(self.calls.get() + 1);
    }

    fn check_writable(&self) -> Result<(), SnippetError> {
        if self.fail_writes.get() {
            return Err(SnippetError::Api {
                status: 422,
                message: "validation failed".into(),
            });
        }
        Ok(())
    }
}

fn file_of(upload: &SnippetUpload) -> SnippetFile {
    SnippetFile {
        language: Some(upload.language.clone()),
        content: Some(upload.content.clone()),
    }
}

impl SnippetStore for MemoryStore {
    async fn list(&self) -> Result<Vec<Snippet>, SnippetError> {
        self.tick();
        Ok(self.snippets.borrow().clone())
    }

    async fn create(&self, file: &SnippetUpload) -> Result<Snippet, SnippetError> {
        self.tick();
        self.check_writable()?;
        let id = format!("gist{}", self.len() + 1);
        let snippet = Snippet {
            html_url: format!("https://gist.example/{id}"),
            id,
            files: BTreeMap::from([(file.filename.clone(), file_of(file))]),
        };
        self.snippets.borrow_mut().push(snippet.clone());
        Ok(snippet)
    }

    async fn update(&self, id: &str, file: &SnippetUpload) -> Result<Snippet, SnippetError> {
        self.tick();
        self.check_writable()?;
        let mut snippets = self.snippets.borrow_mut();
        let snippet = snippets
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| SnippetError::NotFound(id.to_string()))?;
        snippet.files.insert(file.filename.clone(), file_of(file));
        Ok(snippet.clone())
    }

    async fn owner_handle(&self) -> Result<String, SnippetError> {
        self.tick();
        Ok(self.handle.clone())
    }
}

pub fn span(text: &str) -> RichTextSpan {
    RichTextSpan::new(text)
}

pub fn paragraph(id: &str, text: &str) -> Block {
    Block::new(id, BlockKind::Paragraph {
        rich_text: vec![span(text)],
    })
}

pub fn heading(id: &str, level: HeadingLevel, text: &str) -> Block {
    Block::new(id, BlockKind::Heading {
        level,
        rich_text: vec![span(text)],
    })
}

pub fn bullet(id: &str, text: &str) -> Block {
    Block::new(id, BlockKind::BulletedListItem {
        rich_text: vec![span(text)],
    })
}

pub fn numbered(id: &str, text: &str) -> Block {
    Block::new(id, BlockKind::NumberedListItem {
        rich_text: vec![span(text)],
    })
}

pub fn code(id: &str, language: &str, content: &str) -> Block {
    Block::new(id, BlockKind::Code {
        language: language.to_string(),
        rich_text: vec![span(content)],
    })
}
