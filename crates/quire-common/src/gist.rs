//! GitHub Gist backed [`SnippetStore`].

use crate::error::SnippetError;
use crate::snippet::{Snippet, SnippetStore, SnippetUpload};
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::future::Future;

pub const GITHUB_API_URL: &str = "https://api.github.com";
const PER_PAGE: usize = 100;
const USER_AGENT: &str = concat!("quire/", env!("CARGO_PKG_VERSION"));

#[derive(Deserialize)]
struct User {
    login: String,
}

#[derive(Default, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    message: String,
}

#[derive(Debug, Clone)]
pub struct GistClient {
    http: reqwest::Client,
    token: String,
    base_url: String,
}

impl GistClient {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::default(),
            token: token.into(),
            base_url: GITHUB_API_URL.to_string(),
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
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .header(reqwest::header::ACCEPT, "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28")
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, SnippetError> {
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body: ApiErrorBody = response.json().await.unwrap_or_default();
            return Err(SnippetError::Api {
                status: status.as_u16(),
                message: body.message,
            });
        }
        Ok(response.json().await?)
    }
}

/// Request body for both create and update
fn gist_payload(file: &SnippetUpload, public: Option<bool>) -> Value {
    let mut payload = json!({
        "files": {
            file.filename.as_str(): {
                "filename": file.filename,
                "language": file.language,
                "content": file.content,
            }
        }
    });
    if let Some(public) = public {
        payload["public"] = Value::Bool(public);
    }
    payload
}

/// Request pages 1, 2, .. until one holds fewer than [`PER_PAGE`] gists
async fn collect_pages<F, Fut>(mut fetch: F) -> Result<Vec<Snippet>, SnippetError>
where
    F: FnMut(usize) -> Fut,
    Fut: Future<Output = Result<Vec<Snippet>, SnippetError>>,
{
    let mut snippets = Vec::new();
    for page in 1.. {
        let batch = fetch(page).await?;
        let done = batch.len() < PER_PAGE;
        snippets.extend(batch);
        if done {
            break;
        }
    }
    Ok(snippets)
}

fn missing_as_not_found<T>(
    id: &str,
    result: Result<T, SnippetError>,
) -> Result<T, SnippetError> {
    match result {
        Err(SnippetError::Api { status, .. }) if status == StatusCode::NOT_FOUND.as_u16() => {
            Err(SnippetError::NotFound(id.to_string()))
        }
        other => other,
    }
}

impl SnippetStore for GistClient {
    async fn list(&self) -> Result<Vec<Snippet>, SnippetError> {
        let client = self;
        let snippets = collect_pages(move |page| {
            client.send::<Vec<Snippet>>(
                client
                    .request(Method::GET, "gists")
                    .query(&[("per_page", PER_PAGE), ("page", page)]),
            )
        })
        .await?;
        tracing::debug!(count = snippets.len(), "listed gists");
        Ok(snippets)
    }

    async fn create(&self, file: &SnippetUpload) -> Result<Snippet, SnippetError> {
        self.send(
            self.request(Method::POST, "gists")
                .json(&gist_payload(file, Some(true))),
        )
        .await
    }

    async fn update(&self, id: &str, file: &SnippetUpload) -> Result<Snippet, SnippetError> {
        let result = self
            .send(
                self.request(Method::PATCH, &format!("gists/{id}"))
                    .json(&gist_payload(file, None)),
            )
            .await;
        missing_as_not_found(id, result)
    }

    async fn owner_handle(&self) -> Result<String, SnippetError> {
        let user: User = self.send(self.request(Method::GET, "user")).await?;
        Ok(user.login)
    }
}
