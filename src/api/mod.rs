pub mod dto;
pub mod envelope;
pub mod errors;
#[cfg(test)]
pub(crate) mod mock;

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use reqwest::{
    header::{self, HeaderMap, HeaderValue},
    Client, Method, Response, Url,
};
use serde_json::Value;
use tracing::{debug, error};

pub use self::{envelope::ErrorEnvelope, errors::ApiError};
use crate::config::Config;

// ---------------------------------------------------------------------------
// Request options
// ---------------------------------------------------------------------------

/// Query parameters and JSON body for a single call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestOptions {
    /// `None` values are dropped, never sent as empty strings.
    pub query: Vec<(String, Option<String>)>,
    pub body: Option<Value>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn query(mut self, key: impl Into<String>, value: Option<String>) -> Self {
        self.query.push((key.into(), value));
        self
    }

    pub fn body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// The query pairs that actually go on the wire.
    pub fn present_query(&self) -> impl Iterator<Item = (&str, &str)> {
        self.query
            .iter()
            .filter_map(|(k, v)| v.as_deref().map(|v| (k.as_str(), v)))
    }

    /// Value of a query parameter as it will be sent.
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.present_query().find(|(k, _)| *k == key).map(|(_, v)| v)
    }
}

// ---------------------------------------------------------------------------
// Transport
// ---------------------------------------------------------------------------

/// The seam between resource services and the network.
///
/// Implementations resolve `path` against their base URL and return the
/// decoded JSON body (or the raw text as a JSON string for non-JSON
/// responses). Failures are already normalized into [`ApiError`].
#[async_trait]
pub trait Transport: Send + Sync {
    async fn request(
        &self,
        method: Method,
        path: &str,
        options: RequestOptions,
    ) -> Result<Value, ApiError>;

    async fn get(&self, path: &str) -> Result<Value, ApiError> {
        self.request(Method::GET, path, RequestOptions::new()).await
    }

    async fn get_with(&self, path: &str, options: RequestOptions) -> Result<Value, ApiError> {
        self.request(Method::GET, path, options).await
    }

    async fn post(&self, path: &str, body: Value) -> Result<Value, ApiError> {
        self.request(Method::POST, path, RequestOptions::new().body(body))
            .await
    }

    async fn put(&self, path: &str, body: Value) -> Result<Value, ApiError> {
        self.request(Method::PUT, path, RequestOptions::new().body(body))
            .await
    }

    async fn delete(&self, path: &str) -> Result<Value, ApiError> {
        self.request(Method::DELETE, path, RequestOptions::new())
            .await
    }
}

// ---------------------------------------------------------------------------
// HttpTransport
// ---------------------------------------------------------------------------

/// reqwest-backed [`Transport`]. Cheap to clone; clones share one connection
/// pool.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    http: Client,
    base_url: String,
    timeout: Duration,
}

impl HttpTransport {
    pub fn new(config: &Config) -> Result<Self, ApiError> {
        Self::with_client(config, Client::new())
    }

    /// Use a preconfigured reqwest client. The transport still applies its
    /// own per-request timeout on top of whatever the client does.
    pub fn with_client(config: &Config, http: Client) -> Result<Self, ApiError> {
        Url::parse(&config.api_url)
            .map_err(|e| ApiError::InvalidUrl(format!("{}: {e}", config.api_url)))?;

        Ok(Self {
            inner: Arc::new(Inner {
                http,
                base_url: config.api_url.clone(),
                timeout: config.timeout,
            }),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.inner.timeout
    }

    fn build_url(&self, path: &str, options: &RequestOptions) -> Result<Url, ApiError> {
        let raw = format!("{}{}", self.inner.base_url, path);
        let mut url = Url::parse(&raw).map_err(|e| ApiError::InvalidUrl(format!("{raw}: {e}")))?;

        if options.present_query().next().is_some() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in options.present_query() {
                pairs.append_pair(key, value);
            }
        }

        Ok(url)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn request(
        &self,
        method: Method,
        path: &str,
        options: RequestOptions,
    ) -> Result<Value, ApiError> {
        let endpoint = format!("{method} {path}");
        let url = self.build_url(path, &options).inspect_err(|e| {
            error!(endpoint = %endpoint, error = %e, "Request failed");
        })?;
        debug!(endpoint = %endpoint, url = %url, "Sending request");

        let mut builder = self
            .inner
            .http
            .request(method, url)
            .headers(default_headers());
        if let Some(body) = &options.body {
            builder = builder.body(body.to_string());
        }

        // Dropping the exchange future on expiry aborts the outbound call.
        let exchange = async {
            let response = builder.send().await.map_err(|source| ApiError::Network {
                endpoint: endpoint.clone(),
                source,
            })?;
            read_response(&endpoint, response).await
        };

        let result = match tokio::time::timeout(self.inner.timeout, exchange).await {
            Ok(result) => result,
            Err(_) => Err(ApiError::Timeout {
                endpoint: endpoint.clone(),
                timeout: self.inner.timeout,
            }),
        };

        if let Err(e) = &result {
            error!(endpoint = %endpoint, error = %e, "Request failed");
        }
        result
    }
}

/// `Content-Type` and `Accept` go on every request, with or without a body.
fn default_headers() -> HeaderMap {
    let json = HeaderValue::from_static("application/json");
    let mut headers = HeaderMap::new();
    headers.insert(header::CONTENT_TYPE, json.clone());
    headers.insert(header::ACCEPT, json);
    headers
}

async fn read_response(endpoint: &str, response: Response) -> Result<Value, ApiError> {
    let status = response.status();
    let is_json = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.contains("application/json"));

    if !status.is_success() {
        // An unreadable error body still reports the status.
        let envelope = match response.bytes().await {
            Ok(bytes) => ErrorEnvelope::from_body(&bytes),
            Err(e) => {
                debug!(endpoint = %endpoint, error = %e, "Error body unreadable");
                ErrorEnvelope::Unrecognized
            }
        };
        let message =
            envelope.into_message(status.as_u16(), status.canonical_reason().unwrap_or(""));
        return Err(ApiError::Http {
            status: status.as_u16(),
            message,
        });
    }

    let bytes = response.bytes().await.map_err(|source| ApiError::Network {
        endpoint: endpoint.to_owned(),
        source,
    })?;

    if is_json {
        serde_json::from_slice(&bytes).map_err(|source| ApiError::MalformedResponse {
            endpoint: endpoint.to_owned(),
            source,
        })
    } else {
        Ok(Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
