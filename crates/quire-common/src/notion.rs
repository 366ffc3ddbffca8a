//! Notion API client: page discovery and block children.

use crate::error::{QuireError, SourceError};
use crate::model::{Block, BlockId, Page, RichTextSpan};
use crate::source::{ChildrenPage, ContentSource};
use reqwest::{Method, RequestBuilder};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value, json};

pub const NOTION_API_URL: &str = "https://api.notion.com/v1";
pub const NOTION_VERSION: &str = "2022-06-28";
const PAGE_SIZE: u32 = 100;
const TITLE_PROPERTY: &str = "Name";

/// What to look for when locating the page to convert
#[derive(Debug, Clone, Copy)]
pub struct PageQuery<'a> {
    /// Complete title, or a prefix of it
    pub title: &'a str,
    /// Name of the select property holding the publishing status
    pub status_property: &'a str,
    /// Status value the page must currently have
    pub status: &'a str,
}

/// A database found through search
#[derive(Debug, Clone, Deserialize)]
pub struct Database {
    pub id: String,
    #[serde(default)]
    pub title: Vec<RichTextSpan>,
}

impl Database {
    pub fn name(&self) -> &str {
        self.title
            .first()
            .map(|span| span.plain_text.as_str())
            .unwrap_or_default()
    }
}

#[derive(Deserialize)]
struct SearchResponse {
    results: Vec<SearchResult>,
}

#[derive(Deserialize)]
struct SearchResult {
    object: String,
    #[serde(flatten)]
    rest: Map<String, Value>,
}

#[derive(Deserialize)]
struct QueryResponse {
    results: Vec<RawPage>,
}

#[derive(Debug, Deserialize)]
struct RawPage {
    id: String,
    #[serde(default)]
    properties: Map<String, Value>,
}

#[derive(Deserialize)]
struct TitleProperty {
    title: Vec<RichTextSpan>,
}

#[derive(Default, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    code: String,
    #[serde(default)]
    message: String,
}

impl TryFrom<RawPage> for Page {
    type Error = SourceError;

    fn try_from(raw: RawPage) -> Result<Self, Self::Error> {
        let title = raw
            .properties
            .get(TITLE_PROPERTY)
            .and_then(|value| serde_json::from_value::<TitleProperty>(value.clone()).ok())
            .and_then(|prop| prop.title.into_iter().next())
            .map(|span| span.plain_text)
            .filter(|title| !title.is_empty())
            .ok_or_else(|| SourceError::MissingTitle(raw.id.clone()))?;
        Ok(Page::new(raw.id, title))
    }
}

/// Client for the hosted content source
#[derive(Debug, Clone)]
pub struct NotionClient {
    http: reqwest::Client,
    token: String,
    base_url: String,
}

impl NotionClient {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::default(),
            token: token.into(),
            base_url: NOTION_API_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http
            .request(method, format!("{}/{}", self.base_url, path))
            .bearer_auth(&self.token)
            .header("Notion-Version", NOTION_VERSION)
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, SourceError> {
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body: ApiErrorBody = response.json().await.unwrap_or_default();
            return Err(SourceError::Api {
                status: status.as_u16(),
                message: format!("{} {}", body.code, body.message).trim().to_string(),
            });
        }
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Find the database whose title matches `name`
    ///
    /// Only the best search hit is considered; it must be a database and its
    /// title must equal `name` ignoring case.
    pub async fn find_database(&self, name: &str) -> Result<Database, SourceError> {
        let response: SearchResponse = self
            .send(self.request(Method::POST, "search").json(&json!({ "query": name })))
            .await?;

        let database = pick_database(name, response.results)?;
        tracing::debug!(database_id = %database.id, "found content database");
        Ok(database)
    }

    /// Find the page in `database` matching `query`
    ///
    /// An exact title match is tried first, then a prefix match. Either way
    /// the page must also carry the requested status.
    pub async fn find_page(
        &self,
        database: &Database,
        query: &PageQuery<'_>,
    ) -> Result<Page, SourceError> {
        let path = format!("databases/{}/query", database.id);

        let mut response: QueryResponse = self
            .send(
                self.request(Method::POST, &path)
                    .json(&page_filter(query, TitleMatch::Equals)),
            )
            .await?;

        if response.results.is_empty() {
            tracing::debug!(title = query.title, "no exact title match, trying prefix");
            response = self
                .send(
                    self.request(Method::POST, &path)
                        .json(&page_filter(query, TitleMatch::StartsWith)),
                )
                .await?;
        }

        let best = response
            .results
            .into_iter()
            .next()
            .ok_or_else(|| SourceError::PageNotFound(query.status.to_string()))?;
        let page = Page::try_from(best)?;
        check_title(&page, query.title)?;
        Ok(page)
    }

    /// Locate the page for `query` and fetch its top-level blocks
    pub async fn content(
        &self,
        database_name: &str,
        query: &PageQuery<'_>,
    ) -> Result<(Page, Vec<Block>), QuireError> {
        let database = self.find_database(database_name).await?;
        let page = self.find_page(&database, query).await?;
        let blocks = self
            .all_children(&page.id)
            .await
            .map_err(|source| QuireError::Pagination {
                parent: page.id.to_string(),
                source,
            })?;
        tracing::info!(page_id = %page.id, title = %page.title, blocks = blocks.len(), "fetched page content");
        Ok((page, blocks))
    }
}

impl ContentSource for NotionClient {
    async fn children(
        &self,
        parent: &BlockId,
        cursor: Option<&str>,
    ) -> Result<ChildrenPage, SourceError> {
        let mut request = self
            .request(Method::GET, &format!("blocks/{parent}/children"))
            .query(&[("page_size", PAGE_SIZE.to_string())]);
        if let Some(cursor) = cursor {
            request = request.query(&[("start_cursor", cursor)]);
        }
        self.send(request).await
    }
}

/// The best search hit must be a database titled `name`, ignoring case
fn pick_database(name: &str, results: Vec<SearchResult>) -> Result<Database, SourceError> {
    let best = results
        .into_iter()
        .next()
        .ok_or_else(|| SourceError::DatabaseNotFound(name.to_string()))?;
    if best.object != "database" {
        return Err(SourceError::NotADatabase(name.to_string()));
    }

    let database: Database = serde_json::from_value(Value::Object(best.rest))?;
    if !eq_ignore_case(database.name(), name) {
        return Err(SourceError::DatabaseMismatch {
            found: database.name().to_string(),
            query: name.to_string(),
        });
    }
    Ok(database)
}

#[derive(Debug, Clone, Copy)]
enum TitleMatch {
    Equals,
    StartsWith,
}

fn page_filter(query: &PageQuery<'_>, title_match: TitleMatch) -> Value {
    let title_condition = match title_match {
        TitleMatch::Equals => json!({ "equals": query.title }),
        TitleMatch::StartsWith => json!({ "starts_with": query.title }),
    };
    json!({
        "filter": {
            "and": [
                { "property": TITLE_PROPERTY, "rich_text": title_condition },
                { "property": query.status_property, "select": { "equals": query.status } },
            ]
        }
    })
}

fn check_title(page: &Page, given: &str) -> Result<(), SourceError> {
    if eq_ignore_case(&page.title, given) || page.title.starts_with(given) {
        Ok(())
    } else {
        Err(SourceError::PageMismatch {
            found: page.title.clone(),
            given: given.to_string(),
        })
    }
}

fn eq_ignore_case(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}
