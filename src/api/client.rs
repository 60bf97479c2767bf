//! Shared HTTP client for the backend API.
//!
//! # Responsibilities
//! - Read the bearer token from local storage once, at construction
//! - Carry the base address and default headers on every request
//! - Provide JSON request helpers that surface failures unchanged
//!
//! # Design Decisions
//! - No global instance: callers construct one client and share it by `Arc`
//! - The Authorization header is fixed for the lifetime of a client; a new
//!   token means a new client (`with_token`)
//! - No retries and no token refresh

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;

use crate::api::error::{ApiError, ApiResult};
use crate::config::ApiConfig;
use crate::storage::KeyValueStore;

/// HTTP client preconfigured with base address and default headers.
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: Url,
    headers: HeaderMap,
    authorization: Option<String>,
    config: ApiConfig,
}

impl ApiClient {
    /// Build a client, reading the token from `store` under `config.token_key`.
    ///
    /// A missing or empty token is valid and yields a client without an
    /// Authorization header. Storage failures are returned as-is.
    pub fn from_store(config: &ApiConfig, store: &dyn KeyValueStore) -> ApiResult<Self> {
        let token = store.get(&config.token_key)?;
        let client = Self::build(config, token.as_deref())?;

        if client.authorization.is_some() {
            tracing::info!(token_key = %config.token_key, "Token found and set in headers");
        } else {
            tracing::info!(token_key = %config.token_key, "No token in storage, requests are unauthenticated");
        }

        Ok(client)
    }

    /// Build a client with an explicit token (or none).
    pub fn new(config: &ApiConfig, token: Option<&str>) -> ApiResult<Self> {
        Self::build(config, token)
    }

    /// Build a fresh client sharing this client's configuration but carrying
    /// a different token. `self` is left untouched.
    pub fn with_token(&self, token: Option<&str>) -> ApiResult<Self> {
        Self::build(&self.config, token)
    }

    fn build(config: &ApiConfig, token: Option<&str>) -> ApiResult<Self> {
        let base_url = Url::parse(&config.base_url).map_err(|source| ApiError::InvalidUrl {
            url: config.base_url.clone(),
            source,
        })?;

        let mut headers = HeaderMap::new();
        let content_type = HeaderValue::from_str(&config.content_type).map_err(|source| {
            ApiError::InvalidHeader {
                name: "Content-Type",
                source,
            }
        })?;
        headers.insert(CONTENT_TYPE, content_type);

        let authorization = match token.filter(|t| !t.is_empty()) {
            Some(token) => {
                let value = format!("Bearer {}", token);
                let mut header = HeaderValue::from_str(&value).map_err(|source| {
                    ApiError::InvalidHeader {
                        name: "Authorization",
                        source,
                    }
                })?;
                header.set_sensitive(true);
                headers.insert(AUTHORIZATION, header);
                Some(value)
            }
            None => None,
        };

        let http = Client::builder()
            .default_headers(headers.clone())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(ApiError::Build)?;

        Ok(Self {
            http,
            base_url,
            headers,
            authorization,
            config: config.clone(),
        })
    }

    /// The active Authorization header value, e.g. `Bearer abc`.
    pub fn authorization(&self) -> Option<&str> {
        self.authorization.as_deref()
    }

    /// Headers sent with every request.
    pub fn default_headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Underlying reqwest client, for requests the helpers don't cover.
    pub fn http(&self) -> &Client {
        &self.http
    }

    /// Resolve a request path against the base address.
    ///
    /// Relative paths are appended to the base (keeping any base path).
    /// Only `scheme://…` URLs are used unchanged; a protocol-relative `//host`
    /// takes the base's scheme. Anything else, `items:batch` included, is
    /// relative.
    pub fn url(&self, path: &str) -> ApiResult<Url> {
        if let Some(rest) = path.strip_prefix("//") {
            let absolute = format!("{}://{}", self.base_url.scheme(), rest);
            return Url::parse(&absolute).map_err(|source| ApiError::InvalidUrl {
                url: path.to_string(),
                source,
            });
        }
        if has_scheme(path) {
            return Url::parse(path).map_err(|source| ApiError::InvalidUrl {
                url: path.to_string(),
                source,
            });
        }

        let joined = format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        Url::parse(&joined).map_err(|source| ApiError::InvalidUrl {
            url: joined,
            source,
        })
    }

    /// GET `path` and decode the JSON response.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        let url = self.url(path)?;
        tracing::debug!(method = "GET", url = %url, "Sending request");
        let resp = self.http.get(url).send().await?;
        decode(resp).await
    }

    /// POST `body` as JSON to `path` and decode the JSON response.
    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url(path)?;
        tracing::debug!(method = "POST", url = %url, "Sending request");
        let resp = self.http.post(url).json(body).send().await?;
        decode(resp).await
    }

    /// PUT `body` as JSON to `path` and decode the JSON response.
    pub async fn put_json<B, T>(&self, path: &str, body: &B) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url(path)?;
        tracing::debug!(method = "PUT", url = %url, "Sending request");
        let resp = self.http.put(url).json(body).send().await?;
        decode(resp).await
    }

    /// DELETE `path`, ignoring any response body.
    pub async fn delete(&self, path: &str) -> ApiResult<()> {
        let url = self.url(path)?;
        tracing::debug!(method = "DELETE", url = %url, "Sending request");
        let resp = self.http.delete(url).send().await?;
        check_status(resp).await.map(|_| ())
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url.as_str())
            .field("authenticated", &self.authorization.is_some())
            .finish_non_exhaustive()
    }
}

/// True for `scheme://…`, where scheme is a letter followed by letters,
/// digits, `+`, `-` or `.`.
fn has_scheme(path: &str) -> bool {
    let Some((scheme, _)) = path.split_once("://") else {
        return false;
    };
    let mut chars = scheme.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

async fn check_status(resp: Response) -> ApiResult<String> {
    let status = resp.status();
    let text = resp.text().await?;

    if !status.is_success() {
        tracing::warn!(status = %status, "API returned error status");
        return Err(ApiError::Status { status, body: text });
    }
    Ok(text)
}

async fn decode<T: DeserializeOwned>(resp: Response) -> ApiResult<T> {
    let text = check_status(resp).await?;
    // Empty success bodies decode as JSON null (e.g. into `()` or `Option`)
    let text = if text.trim().is_empty() { "null" } else { text.as_str() };
    Ok(serde_json::from_str(text)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryStore, StorageError, StorageResult};

    #[derive(Debug)]
    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn get(&self, _key: &str) -> StorageResult<Option<String>> {
            Err(StorageError::Io(std::io::Error::other("storage unavailable")))
        }
        fn set(&self, _key: &str, _value: &str) -> StorageResult<()> {
            Ok(())
        }
        fn remove(&self, _key: &str) -> StorageResult<()> {
            Ok(())
        }
    }

    #[test]
    fn test_token_sets_bearer_header() {
        for token in ["abc", "eyJhbGciOiJIUzI1NiJ9.e30.sig", "with space"] {
            let store = MemoryStore::with_entries([("token", token)]);
            let client = ApiClient::from_store(&ApiConfig::default(), &store).unwrap();

            let expected = format!("Bearer {}", token);
            assert_eq!(client.authorization(), Some(expected.as_str()));
            assert_eq!(
                client.default_headers().get(AUTHORIZATION).unwrap().to_str().unwrap(),
                expected
            );
        }
    }

    #[test]
    fn test_no_token_no_header() {
        let client = ApiClient::from_store(&ApiConfig::default(), &MemoryStore::new()).unwrap();
        assert!(client.authorization().is_none());
        assert!(client.default_headers().get(AUTHORIZATION).is_none());
        assert_eq!(
            client.default_headers().get(CONTENT_TYPE).unwrap(),
            "application/json"
        );
    }

    #[test]
    fn test_empty_token_is_absent() {
        let store = MemoryStore::with_entries([("token", "")]);
        let client = ApiClient::from_store(&ApiConfig::default(), &store).unwrap();
        assert!(client.authorization().is_none());
    }

    #[test]
    fn test_custom_token_key() {
        let config = ApiConfig {
            token_key: "session".into(),
            ..ApiConfig::default()
        };
        let store = MemoryStore::with_entries([("token", "ignored"), ("session", "s1")]);
        let client = ApiClient::from_store(&config, &store).unwrap();
        assert_eq!(client.authorization(), Some("Bearer s1"));
    }

    #[test]
    fn test_storage_failure_propagates() {
        let err = ApiClient::from_store(&ApiConfig::default(), &BrokenStore).unwrap_err();
        assert!(matches!(err, ApiError::Storage(_)));
    }

    #[test]
    fn test_malformed_token_is_rejected() {
        let store = MemoryStore::with_entries([("token", "bad\ntoken")]);
        let err = ApiClient::from_store(&ApiConfig::default(), &store).unwrap_err();
        assert!(matches!(err, ApiError::InvalidHeader { name: "Authorization", .. }));
    }

    #[test]
    fn test_invalid_base_url() {
        let config = ApiConfig {
            base_url: "::not-a-url".into(),
            ..ApiConfig::default()
        };
        let err = ApiClient::new(&config, None).unwrap_err();
        assert!(matches!(err, ApiError::InvalidUrl { .. }));
    }

    #[test]
    fn test_with_token_leaves_original() {
        let client = ApiClient::new(&ApiConfig::default(), Some("old")).unwrap();
        let relogged = client.with_token(Some("new")).unwrap();

        assert_eq!(client.authorization(), Some("Bearer old"));
        assert_eq!(relogged.authorization(), Some("Bearer new"));
        assert!(client.with_token(None).unwrap().authorization().is_none());
    }

    #[test]
    fn test_url_joining() {
        let client = ApiClient::new(&ApiConfig::default(), None).unwrap();
        assert_eq!(
            client.url("/api/users").unwrap().as_str(),
            "http://127.0.0.1:8080/api/users"
        );
        assert_eq!(
            client.url("api/users").unwrap().as_str(),
            "http://127.0.0.1:8080/api/users"
        );
        assert_eq!(
            client.url("https://other.example/x").unwrap().as_str(),
            "https://other.example/x"
        );
        assert_eq!(
            client.url("//cdn.example/asset.json").unwrap().as_str(),
            "http://cdn.example/asset.json"
        );
        // Colons without `://` don't make a path absolute
        assert_eq!(
            client.url("items:batch").unwrap().as_str(),
            "http://127.0.0.1:8080/items:batch"
        );
        assert_eq!(
            client.url("localhost:9000/api").unwrap().as_str(),
            "http://127.0.0.1:8080/localhost:9000/api"
        );
        assert_eq!(
            client.url("/search?q=http://x").unwrap().as_str(),
            "http://127.0.0.1:8080/search?q=http://x"
        );

        let prefixed = ApiClient::new(
            &ApiConfig {
                base_url: "http://127.0.0.1:8080/v1/".into(),
                ..ApiConfig::default()
            },
            None,
        )
        .unwrap();
        assert_eq!(
            prefixed.url("/models").unwrap().as_str(),
            "http://127.0.0.1:8080/v1/models"
        );
    }
}
