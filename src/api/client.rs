//! Pre-configured client for the content API.
//!
//! # Responsibilities
//! - Validate the base address once, at startup
//! - Apply base address and default headers to every request
//! - Let per-request headers replace defaults of the same name
//!
//! # Design Decisions
//! - Configuration is immutable and shared via `Arc`; clones are cheap
//! - Request paths are always resolved under the base path, never beside it
//! - No retry, timeout or caching policy; that belongs to the caller

use std::sync::Arc;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Method, Request, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;

use crate::api::ApiError;

/// The immutable client configuration: base address plus default headers.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    base_url: Url,
    default_headers: HeaderMap,
}

impl ClientConfig {
    /// Validate a base address and default headers.
    ///
    /// Duplicate header names resolve last-write-wins.
    pub fn new<I, K, V>(base_address: &str, default_headers: I) -> Result<Self, ApiError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let invalid = |reason: &str| ApiError::InvalidBaseUrl {
            url: base_address.to_string(),
            reason: reason.to_string(),
        };

        let mut base_url = Url::parse(base_address).map_err(|e| invalid(&e.to_string()))?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(invalid("scheme must be http or https"));
        }
        if base_url.cannot_be_a_base() || base_url.host().is_none() {
            return Err(invalid("not a base URL"));
        }
        if base_url.query().is_some() || base_url.fragment().is_some() {
            return Err(invalid("query and fragment are not allowed"));
        }
        // Trailing slash so joins land under the base path.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let mut headers = HeaderMap::new();
        for (name, value) in default_headers {
            let (name, value) = (name.as_ref(), value.as_ref());
            let header_name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|_| ApiError::InvalidHeader(name.to_string()))?;
            let header_value = HeaderValue::from_str(value)
                .map_err(|_| ApiError::InvalidHeader(name.to_string()))?;
            headers.insert(header_name, header_value);
        }

        Ok(Self {
            base_url,
            default_headers: headers,
        })
    }

    /// Base address, always ending in `/`.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn default_headers(&self) -> &HeaderMap {
        &self.default_headers
    }

    /// Resolve a request path (`/articles?populate=*`) under the base address.
    pub fn url_for(&self, path: &str) -> Result<Url, ApiError> {
        let relative = path.trim_start_matches('/');
        let url = self
            .base_url
            .join(relative)
            .map_err(|_| ApiError::InvalidPath(path.to_string()))?;

        if !url.as_str().starts_with(self.base_url.as_str()) {
            return Err(ApiError::InvalidPath(path.to_string()));
        }
        Ok(url)
    }
}

/// Shared handle used by every call site that talks to the content API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    config: Arc<ClientConfig>,
}

impl ApiClient {
    /// Build the client. Fails fast on a malformed base address.
    pub fn configure<I, K, V>(base_address: &str, default_headers: I) -> Result<Self, ApiError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let config = ClientConfig::new(base_address, default_headers)?;

        tracing::info!(
            base_url = %config.base_url,
            default_headers = config.default_headers.len(),
            "API client configured"
        );

        Ok(Self {
            http: Client::new(),
            config: Arc::new(config),
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Start a request against a path under the base address.
    pub fn request(&self, method: Method, path: impl Into<String>) -> ApiRequest<'_> {
        ApiRequest {
            client: self,
            method,
            path: path.into(),
            headers: HeaderMap::new(),
            body: None,
        }
    }

    pub fn get(&self, path: impl Into<String>) -> ApiRequest<'_> {
        self.request(Method::GET, path)
    }

    pub fn post(&self, path: impl Into<String>) -> ApiRequest<'_> {
        self.request(Method::POST, path)
    }

    /// GET a path and decode a JSON body. Non-2xx statuses are errors.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let resp = self.get(path).send().await?;

        let status = resp.status();
        let text = resp.text().await?;

        if !status.is_success() {
            tracing::warn!(path = %path, status = %status, "Content API returned error status");
            return Err(ApiError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        Ok(serde_json::from_str(&text)?)
    }
}

/// A request being assembled through an [`ApiClient`].
#[derive(Debug)]
pub struct ApiRequest<'a> {
    client: &'a ApiClient,
    method: Method,
    path: String,
    headers: HeaderMap,
    body: Option<Vec<u8>>,
}

impl ApiRequest<'_> {
    /// Add a per-request header. Replaces any default of the same name.
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.append(name, value);
        self
    }

    /// Serialize a JSON body.
    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self, ApiError> {
        self.body = Some(serde_json::to_vec(body)?);
        Ok(self)
    }

    /// Produce the outgoing request with defaults and overrides merged.
    pub fn build(self) -> Result<Request, ApiError> {
        let config = &self.client.config;
        let url = config.url_for(&self.path)?;

        let mut headers = config.default_headers.clone();
        for name in self.headers.keys() {
            headers.remove(name);
        }
        for (name, value) in &self.headers {
            headers.append(name.clone(), value.clone());
        }

        let mut request = Request::new(self.method, url);
        *request.headers_mut() = headers;
        if let Some(body) = self.body {
            *request.body_mut() = Some(body.into());
        }
        Ok(request)
    }

    /// Send the request through the shared HTTP client.
    pub async fn send(self) -> Result<Response, ApiError> {
        let http = self.client.http.clone();
        let request = self.build()?;

        tracing::debug!(
            method = %request.method(),
            url = %request.url(),
            "Sending content API request"
        );

        Ok(http.execute(request).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::{ACCEPT, CONTENT_TYPE};

    fn client() -> ApiClient {
        ApiClient::configure(
            "http://localhost:1337/api",
            [("Content-Type", "application/json")],
        )
        .unwrap()
    }

    #[test]
    fn test_defaults_applied() {
        let request = client().get("/articles").build().unwrap();

        assert_eq!(request.url().as_str(), "http://localhost:1337/api/articles");
        assert_eq!(request.method(), Method::GET);
        assert_eq!(request.headers()[CONTENT_TYPE], "application/json");
    }

    #[test]
    fn test_override_replaces_default() {
        let request = client()
            .post("projects")
            .header(CONTENT_TYPE, HeaderValue::from_static("text/plain"))
            .header(ACCEPT, HeaderValue::from_static("text/html"))
            .build()
            .unwrap();

        let content_types: Vec<_> = request.headers().get_all(CONTENT_TYPE).iter().collect();
        assert_eq!(content_types, vec!["text/plain"]);
        assert_eq!(request.headers()[ACCEPT], "text/html");

        // Defaults on the shared config are untouched.
        let again = client().get("projects").build().unwrap();
        assert_eq!(again.headers()[CONTENT_TYPE], "application/json");
    }

    #[test]
    fn test_json_body_keeps_default_content_type() {
        let body = serde_json::json!({ "data": { "title": "Hello", "slug": "hello" } });
        let request = client().post("/articles").json(&body).unwrap().build().unwrap();

        assert_eq!(request.method(), Method::POST);
        assert_eq!(request.headers()[CONTENT_TYPE], "application/json");

        let sent = request.body().and_then(|b| b.as_bytes()).unwrap();
        let decoded: serde_json::Value = serde_json::from_slice(sent).unwrap();
        assert_eq!(decoded, body);
    }

    #[test]
    fn test_get_without_body_sends_none() {
        let request = client().get("/articles").build().unwrap();
        assert!(request.body().is_none());
    }

    #[test]
    fn test_query_strings_survive_join() {
        let request = client()
            .get("articles?filters[slug][$eq]=my-post&populate=*")
            .build()
            .unwrap();
        assert_eq!(request.url().path(), "/api/articles");
        assert!(request.url().query().unwrap().contains("populate=*"));
    }

    #[test]
    fn test_rejects_malformed_base() {
        let no_headers: [(&str, &str); 0] = [];
        assert!(matches!(
            ApiClient::configure("localhost:1337/api", no_headers),
            Err(ApiError::InvalidBaseUrl { .. })
        ));
        assert!(ApiClient::configure("not a url", no_headers).is_err());
        assert!(ApiClient::configure("ftp://example.com/api", no_headers).is_err());
    }

    #[test]
    fn test_duplicate_headers_last_write_wins() {
        let client = ApiClient::configure(
            "https://cms.example.com/api/",
            [("X-Site", "one"), ("x-site", "two")],
        )
        .unwrap();
        assert_eq!(client.config().default_headers()["x-site"], "two");
        assert_eq!(client.config().default_headers().len(), 1);
    }

    #[test]
    fn test_rejects_invalid_header() {
        let err = ApiClient::configure("http://localhost:1337/api", [("Bad Header", "x")]);
        assert!(matches!(err, Err(ApiError::InvalidHeader(name)) if name == "Bad Header"));
    }

    #[test]
    fn test_paths_stay_under_base() {
        let client = client();
        assert!(client.config().url_for("../admin").is_err());
        assert!(client.config().url_for("//evil.example.com/x").is_ok_and(|u| {
            u.as_str() == "http://localhost:1337/api/evil.example.com/x"
        }));
    }
}
