use std::time::{Duration, Instant};

use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{StatusCode, Url};

use crate::config::{HttpMethod, RestClientConfig, expand_path};
use crate::error::{BenchError, Result};
use crate::todo::TodoItem;

const MAX_ERROR_BODY_CHARS: usize = 256;

/// What a successful request left behind once its body was drained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResponseSummary {
    pub status: u16,
    pub elapsed: Duration,
    pub body_bytes: usize,
}

/// Result of a readiness probe against the list endpoint.
#[derive(Debug)]
pub enum ProbeOutcome {
    Ready,
    /// Connection refused or a 5xx: the application is deployed but still starting.
    Starting(String),
    /// Timeouts, resets and other transport failures.
    EnvironmentBroken(BenchError),
    /// A 4xx or a body that is not a todo list; paths or URL are wrong.
    Misconfigured(BenchError),
}

/// HTTP client for the todo API. Built once per trial and shared by every
/// iteration; JSON accept/content-type headers are attached to all requests.
#[derive(Debug, Clone)]
pub struct TodoRestClient {
    http: reqwest::Client,
    base_url: String,
    config: RestClientConfig,
}

impl TodoRestClient {
    pub fn new(config: &RestClientConfig) -> Result<Self> {
        config.validate()?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .pool_max_idle_per_host(config.max_connections_per_route)
            .build()
            .map_err(|e| BenchError::Configuration(format!("failed to build HTTP client: {}", e)))?;

        tracing::debug!(
            target: "todo_bench::client",
            "HTTP client ready for {} (connect timeout {:?}, request timeout {:?})",
            config.url,
            config.connect_timeout,
            config.request_timeout
        );

        Ok(Self {
            http,
            base_url: config.url.trim_end_matches('/').to_string(),
            config: config.clone(),
        })
    }

    pub fn config(&self) -> &RestClientConfig {
        &self.config
    }

    /// Resolves a path against the base URL, keeping any path prefix the base carries.
    pub fn url(&self, path: &str) -> Result<Url> {
        let joined = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        Url::parse(&joined)
            .map_err(|e| BenchError::Configuration(format!("invalid request url '{}': {}", joined, e)))
    }

    /// Sends `item` with `method` to `path_template` and drains the response.
    ///
    /// The body is always read in full so that timing covers the complete
    /// round-trip; only its length is kept.
    pub async fn send(
        &self,
        item: &TodoItem,
        method: HttpMethod,
        path_template: &str,
    ) -> Result<ResponseSummary> {
        let path = expand_path(path_template, item.id);
        let body = method.has_body().then_some(item);

        let start = Instant::now();
        let (status, bytes) = self.execute(method, &path, body).await?;
        let elapsed = start.elapsed();

        Ok(ResponseSummary {
            status: status.as_u16(),
            elapsed,
            body_bytes: std::hint::black_box(bytes).len(),
        })
    }

    pub async fn get_todos(&self) -> Result<Vec<TodoItem>> {
        self.list("").await
    }

    pub async fn get_todos_with_offset(&self, offset: u64) -> Result<Vec<TodoItem>> {
        self.list(&format!("offset={}", offset)).await
    }

    pub async fn get_todos_with_limit(&self, limit: u64) -> Result<Vec<TodoItem>> {
        self.list(&format!("limit={}", limit)).await
    }

    pub async fn get_todos_page(&self, offset: u64, limit: u64) -> Result<Vec<TodoItem>> {
        self.list(&format!("offset={}&limit={}", offset, limit)).await
    }

    async fn list(&self, query: &str) -> Result<Vec<TodoItem>> {
        let path = if query.is_empty() {
            self.config.todos_get_path.clone()
        } else {
            format!("{}?{}", self.config.todos_get_path, query)
        };
        let (_, bytes) = self.execute(HttpMethod::Get, &path, None).await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    pub async fn post_todo(&self, item: &TodoItem) -> Result<ResponseSummary> {
        let path = self.config.todos_post_path.clone();
        self.send(item, HttpMethod::Post, &path).await
    }

    pub async fn put_todo(&self, item: &TodoItem) -> Result<ResponseSummary> {
        let path = self.config.todos_put_path.clone();
        self.send(item, HttpMethod::Put, &path).await
    }

    pub async fn delete_todo(&self, id: u64) -> Result<ResponseSummary> {
        let path = expand_path(&self.config.todos_delete_path, id);
        let start = Instant::now();
        let (status, bytes) = self.execute(HttpMethod::Delete, &path, None).await?;
        Ok(ResponseSummary {
            status: status.as_u16(),
            elapsed: start.elapsed(),
            body_bytes: bytes.len(),
        })
    }

    /// Fetches the todo list and sorts the outcome into "still starting",
    /// "environment broken" or "misconfigured".
    pub async fn probe(&self) -> ProbeOutcome {
        let url = match self.url(&self.config.todos_get_path) {
            Ok(url) => url,
            Err(e) => return ProbeOutcome::Misconfigured(e),
        };

        let response = match self.http.get(url).send().await {
            Ok(response) => response,
            Err(e) if is_connection_refused(&e) => return ProbeOutcome::Starting(e.to_string()),
            Err(e) if e.is_builder() => return ProbeOutcome::Misconfigured(e.into()),
            Err(e) => return ProbeOutcome::EnvironmentBroken(e.into()),
        };

        let status = response.status();
        if status.is_server_error() {
            let _ = response.bytes().await;
            return ProbeOutcome::Starting(format!("list endpoint returned {}", status));
        }
        if !status.is_success() {
            let _ = response.bytes().await;
            return ProbeOutcome::Misconfigured(BenchError::Protocol {
                status: status.as_u16(),
                message: format!("readiness probe got {}", status),
            });
        }

        let bytes = match response.bytes().await {
            Ok(bytes) => bytes,
            Err(e) => return ProbeOutcome::EnvironmentBroken(e.into()),
        };
        match serde_json::from_slice::<Vec<TodoItem>>(&bytes) {
            Ok(_) => ProbeOutcome::Ready,
            Err(e) => ProbeOutcome::Misconfigured(e.into()),
        }
    }

    async fn execute(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<&TodoItem>,
    ) -> Result<(StatusCode, Vec<u8>)> {
        let url = self.url(path)?;
        let mut request = self.http.request(method.into(), url);
        if let Some(item) = body {
            request = request.json(item);
        }

        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let bytes = response.bytes().await.unwrap_or_default();
            let text = String::from_utf8_lossy(&bytes);
            let message: String = text.chars().take(MAX_ERROR_BODY_CHARS).collect();
            return Err(BenchError::Protocol {
                status: status.as_u16(),
                message: format!("{} {} returned {}: {}", method, path, status, message),
            });
        }

        let bytes = response.bytes().await?.to_vec();
        Ok((status, bytes))
    }
}

fn is_connection_refused(err: &reqwest::Error) -> bool {
    let mut source = std::error::Error::source(err);
    while let Some(inner) = source {
        if let Some(io) = inner.downcast_ref::<std::io::Error>() {
            if io.kind() == std::io::ErrorKind::ConnectionRefused {
                return true;
            }
        }
        source = inner.source();
    }
    false
}
