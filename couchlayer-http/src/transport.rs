use async_trait::async_trait;
use reqwest::{
    Client, Method,
    header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue},
};
use serde::Deserialize;
use std::{collections::BTreeMap, time::Duration};
use tracing::debug;

use couchlayer_core::{
    backend::{Response, Transport, TransportBuilder},
    error::{DocumentStoreError, DocumentStoreResult},
};

const JSON: &str = "application/json";

/// An HTTP transport for one site, e.g. `http://localhost:5984`.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    site: String,
    credentials: Option<Credentials>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Credentials {
    pub username: String,
    #[serde(default)]
    pub password: Option<String>,
}

impl HttpTransport {
    pub fn builder(site: &str) -> HttpTransportBuilder {
        HttpTransportBuilder::new(site)
    }

    /// The site requests are sent to, without a trailing slash.
    pub fn site(&self) -> &str {
        &self.site
    }

    async fn send(&self, method: Method, path: &str, body: Option<&str>) -> DocumentStoreResult<Response> {
        let url = format!("{}{}", self.site, path);
        let mut request = self.client.request(method.clone(), &url);

        if let Some(credentials) = &self.credentials {
            request = request.basic_auth(&credentials.username, credentials.password.as_ref());
        }
        if let Some(body) = body {
            request = request.header(CONTENT_TYPE, JSON).body(body.to_string());
        }

        let response = request
            .send()
            .await
            .map_err(|e| DocumentStoreError::Transport(e.to_string()))?;
        let code = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| DocumentStoreError::Transport(e.to_string()))?;

        debug!(%method, url = %url, code, "http request");
        Ok(Response::new(code, body))
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, path: &str) -> DocumentStoreResult<Response> {
        self.send(Method::GET, path, None).await
    }

    async fn put(&self, path: &str, body: Option<&str>) -> DocumentStoreResult<Response> {
        self.send(Method::PUT, path, body).await
    }

    async fn post(&self, path: &str, body: &str) -> DocumentStoreResult<Response> {
        self.send(Method::POST, path, Some(body)).await
    }

    async fn delete(&self, path: &str) -> DocumentStoreResult<Response> {
        self.send(Method::DELETE, path, None).await
    }
}

/// File or environment driven transport settings.
///
/// ```ignore
/// let config: HttpConfig = serde_json::from_str(r#"{
///     "site": "http://localhost:5984",
///     "timeout_secs": 10,
///     "credentials": {"username": "admin", "password": "secret"}
/// }"#)?;
/// let transport = HttpTransportBuilder::from(config).build().await?;
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HttpConfig {
    pub site: String,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
    #[serde(default)]
    pub credentials: Option<Credentials>,
}

/// Builder for [`HttpTransport`] instances.
#[derive(Debug, Clone)]
pub struct HttpTransportBuilder {
    site: String,
    timeout: Option<Duration>,
    headers: Vec<(String, String)>,
    credentials: Option<Credentials>,
}

impl HttpTransportBuilder {
    pub fn new(site: &str) -> Self {
        Self {
            site: site.trim_end_matches('/').to_string(),
            timeout: None,
            headers: Vec::new(),
            credentials: None,
        }
    }

    /// Fails requests that take longer than `timeout` as a whole.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sends `name: value` with every request.
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    /// Authenticates every request with HTTP basic auth.
    pub fn with_basic_auth(mut self, username: &str, password: Option<&str>) -> Self {
        self.credentials = Some(Credentials {
            username: username.to_string(),
            password: password.map(str::to_string),
        });
        self
    }

    fn default_headers(&self) -> DocumentStoreResult<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(JSON));

        for (name, value) in &self.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| DocumentStoreError::Argument(format!("header name {name:?}: {e}")))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| DocumentStoreError::Argument(format!("header {name:?}: {e}")))?;
            headers.insert(name, value);
        }

        Ok(headers)
    }
}

impl From<HttpConfig> for HttpTransportBuilder {
    fn from(config: HttpConfig) -> Self {
        let mut builder = HttpTransportBuilder::new(&config.site);
        builder.timeout = config.timeout_secs.map(Duration::from_secs);
        builder.headers = config.headers.into_iter().collect();
        builder.credentials = config.credentials;
        builder
    }
}

#[async_trait]
impl TransportBuilder for HttpTransportBuilder {
    type Transport = HttpTransport;

    async fn build(self) -> DocumentStoreResult<Self::Transport> {
        if !(self.site.starts_with("http://") || self.site.starts_with("https://")) {
            return Err(DocumentStoreError::Argument(format!(
                "site {:?} is not an http(s) URL",
                self.site
            )));
        }

        let mut client = Client::builder().default_headers(self.default_headers()?);
        if let Some(timeout) = self.timeout {
            client = client.timeout(timeout);
        }

        Ok(HttpTransport {
            client: client
                .build()
                .map_err(|e| DocumentStoreError::Transport(e.to_string()))?,
            site: self.site,
            credentials: self.credentials,
        })
    }
}
