//! HTTP transport seam.
//!
//! Every endpoint goes through [`HttpTransport::send`], which takes a fully
//! described [`Request`] and yields the parsed JSON body. The default
//! implementation is [`ReqwestTransport`]; tests and callers with special
//! needs can plug in their own.

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, RETRY_AFTER};
use reqwest::{Method, Url};
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::base_url;
use crate::errors::{Error, Result};

pub(crate) const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Body of an outgoing request.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    /// Serialized as `application/json`.
    Json(Value),
    /// Serialized as `application/x-www-form-urlencoded`.
    Form(Vec<(String, String)>),
}

/// Everything needed to issue one HTTP call.
#[derive(Debug, Clone)]
pub struct Request {
    pub method: Method,
    pub hostname: String,
    pub path: String,
    /// `None` means no query string at all.
    pub query: Option<BTreeMap<String, String>>,
    pub headers: HeaderMap,
    pub body: Option<RequestBody>,
}

impl Request {
    pub fn new(method: Method, hostname: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method,
            hostname: hostname.into(),
            path: path.into(),
            query: None,
            headers: HeaderMap::new(),
            body: None,
        }
    }

    pub fn get(hostname: impl Into<String>, path: impl Into<String>) -> Self {
        Self::new(Method::GET, hostname, path)
    }

    pub fn post(hostname: impl Into<String>, path: impl Into<String>) -> Self {
        Self::new(Method::POST, hostname, path)
    }

    pub fn delete(hostname: impl Into<String>, path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, hostname, path)
    }

    /// Set one query parameter, replacing any previous value.
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query
            .get_or_insert_with(BTreeMap::new)
            .insert(key.into(), value.into());
        self
    }

    /// Merge a set of query parameters.
    pub fn query_pairs<I, K, V>(mut self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let query = self.query.get_or_insert_with(BTreeMap::new);
        for (k, v) in pairs {
            query.insert(k.into(), v.into());
        }
        self
    }

    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(RequestBody::Json(body));
        self
    }

    pub fn form(mut self, fields: Vec<(String, String)>) -> Self {
        self.body = Some(RequestBody::Form(fields));
        self
    }

    /// Value of a query parameter, if set.
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query.as_ref()?.get(key).map(String::as_str)
    }
}

/// Performs HTTP calls and returns parsed JSON bodies.
///
/// Implementations must turn any response outside the `[200, 400)` range
/// into an [`Error`]; callers never see a failed response as a value.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn send(&self, request: &Request) -> Result<Value>;
}

/// [`HttpTransport`] backed by a `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    http: reqwest::Client,
}

impl ReqwestTransport {
    /// Transport with the default 60 second timeout.
    pub fn new() -> Result<Self> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(Error::Http)?;
        Ok(Self { http })
    }

    /// Wrap an existing client, keeping its settings.
    pub fn from_client(http: reqwest::Client) -> Self {
        Self { http }
    }

    pub(crate) fn client(&self) -> &reqwest::Client {
        &self.http
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: &Request) -> Result<Value> {
        let url = format!("{}{}", base_url(&request.hostname), request.path);
        debug!(method = %request.method, %url, "sending request");

        let mut req = self
            .http
            .request(request.method.clone(), &url)
            .headers(request.headers.clone());

        if let Some(query) = request.query.as_ref().filter(|q| !q.is_empty()) {
            req = req.query(query);
        }

        match &request.body {
            Some(RequestBody::Json(body)) => req = req.json(body),
            Some(RequestBody::Form(fields)) => req = req.form(fields),
            None => {}
        }

        let response = req.send().await.map_err(Error::Http)?;
        let status = response.status();

        // Redirects reqwest does not follow (304 and friends) still carry a usable body.
        if status.is_success() || status.is_redirection() {
            let text = response.text().await.map_err(Error::Http)?;
            if text.trim().is_empty() {
                return Ok(Value::Null);
            }
            return serde_json::from_str(&text)
                .map_err(|e| Error::decode(format!("{} {}", request.method, request.path), e));
        }

        let retry_after = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok());
        let text = response.text().await.unwrap_or_default();

        warn!(status = status.as_u16(), %url, "request failed");
        Err(error_for_status(status.as_u16(), retry_after, &text))
    }
}

/// Percent-encode one path segment so `/`, `?` and `#` in an id stay inside it.
pub(crate) fn path_segment(segment: &str) -> String {
    let mut url = Url::parse("http://segment.invalid/").expect("static URL parses");
    url.path_segments_mut()
        .expect("http URLs have a path")
        .pop_if_empty()
        .push(segment);
    url.path().trim_start_matches('/').to_string()
}

/// Map a failed response onto the typed error taxonomy.
pub(crate) fn error_for_status(status_code: u16, retry_after: Option<u64>, text: &str) -> Error {
    let body: Option<Value> = serde_json::from_str(text).ok();

    let message = body
        .as_ref()
        .and_then(|b| {
            ["error_description", "message", "error"]
                .iter()
                .find_map(|key| b.get(*key).and_then(Value::as_str))
        })
        .unwrap_or(text)
        .to_string();

    match status_code {
        401 => Error::Authentication { message },
        403 => Error::PermissionDenied { message },
        404 => Error::NotFound { message },
        429 => Error::RateLimit {
            message,
            retry_after,
        },
        _ => Error::Api {
            status_code,
            message,
            body,
        },
    }
}
