use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{Client as ReqwestClient, Method};
use studentportal_core::{HttpMethod, RawResponse, RequestEnvelope, Transport};
use studentportal_domain::{ApiError, ClientConfig};
use tracing::debug;

use crate::errors::InfraError;

const APPLICATION_JSON: &str = "application/json";

/// reqwest-backed [`Transport`] bound to one base address.
///
/// Sends exactly one attempt per request. Every received status is handed
/// back as a [`RawResponse`]; only a missing response is an error.
#[derive(Clone)]
pub struct HttpClient {
    client: ReqwestClient,
    base_url: String,
}

impl HttpClient {
    /// Start building a new HTTP client.
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::default()
    }

    /// Build a client from the `[api]` configuration section.
    pub fn from_config(config: &ClientConfig) -> Result<Self, ApiError> {
        Self::builder()
            .base_url(&config.base_url)
            .timeout(config.timeout())
            .user_agent(&config.user_agent)
            .build()
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn header_map(headers: &[(String, String)]) -> Result<HeaderMap, ApiError> {
        let mut map = HeaderMap::with_capacity(headers.len());
        for (name, value) in headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| ApiError::Config(format!("invalid header name {name}: {e}")))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| ApiError::Config(format!("invalid value for header {name}: {e}")))?;
            map.insert(name, value);
        }
        Ok(map)
    }
}

const fn to_method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Patch => Method::PATCH,
        HttpMethod::Delete => Method::DELETE,
    }
}

#[async_trait]
impl Transport for HttpClient {
    async fn send(&self, request: RequestEnvelope) -> Result<RawResponse, ApiError> {
        let url = self.url(&request.path);
        let method = to_method(request.method);

        let mut builder =
            self.client.request(method.clone(), &url).headers(Self::header_map(&request.headers)?);
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        debug!(%method, %url, "sending HTTP request");

        let response = builder.send().await.map_err(|err| {
            debug!(%method, %url, error = %err, "HTTP request failed");
            ApiError::from(InfraError::from(err))
        })?;

        let status = response.status();
        debug!(%method, %url, %status, "received HTTP response");

        let body = response.text().await.map_err(|err| ApiError::from(InfraError::from(err)))?;
        Ok(RawResponse::new(status.as_u16(), body))
    }
}

/// Builder for [`HttpClient`].
#[derive(Debug)]
pub struct HttpClientBuilder {
    base_url: Option<String>,
    timeout: Duration,
    user_agent: Option<String>,
}

impl Default for HttpClientBuilder {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout: ClientConfig::default().timeout(),
            user_agent: None,
        }
    }
}

impl HttpClientBuilder {
    /// Base address every request path is appended to; trailing slashes are
    /// dropped.
    #[must_use]
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    pub fn build(self) -> Result<HttpClient, ApiError> {
        let base_url = self
            .base_url
            .ok_or_else(|| ApiError::Config("base URL not set".to_string()))?;
        let base_url = base_url.trim().trim_end_matches('/').to_string();
        url::Url::parse(&base_url)
            .map_err(|e| ApiError::Config(format!("invalid base URL {base_url}: {e}")))?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(APPLICATION_JSON));
        headers.insert(ACCEPT, HeaderValue::from_static(APPLICATION_JSON));

        let mut builder =
            ReqwestClient::builder().timeout(self.timeout).no_proxy().default_headers(headers);

        if let Some(agent) = self.user_agent {
            builder = builder.user_agent(agent);
        }

        let client = builder.build().map_err(|err| ApiError::from(InfraError::from(err)))?;

        Ok(HttpClient { client, base_url })
    }
}
