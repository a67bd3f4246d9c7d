//! HTTP client wrapper: request construction and response normalization.
//!
//! # Design
//! `ApiClient` holds the base URL, the static application token and a handle
//! to the token store. It carries no mutable state between calls. Resource
//! modules (`postings::api`, `profile::api`) add `build_*` / `parse_*`
//! methods on top of the two primitives here: [`ApiClient::request`], which
//! attaches headers, and [`ApiClient::check`], which turns any failure into
//! an [`ApiError`] before a body is ever deserialized.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;

use crate::auth::{MemoryTokenStore, TokenStore};
use crate::config::ClientConfig;
use crate::error::{ApiError, UNKNOWN_ERROR_TITLE};
use crate::http::{HttpMethod, HttpRequest, HttpResponse, JSON_API_MEDIA_TYPE};
use crate::jsonapi::{ErrorDocument, ErrorObject};

pub const APP_TOKEN_HEADER: &str = "x-app-token";

/// Stateless request builder and response parser for the tracker API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: Url,
    app_token: Option<String>,
    tokens: Arc<dyn TokenStore>,
}

impl ApiClient {
    pub fn new(config: &ClientConfig, tokens: Arc<dyn TokenStore>) -> Self {
        Self {
            base_url: config.base_url.clone(),
            app_token: config.app_token.clone(),
            tokens,
        }
    }

    /// Client using the token store `config` describes.
    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(config, config.token_store())
    }

    /// Client with an in-memory token store, mainly for tests and tools.
    pub fn anonymous(config: &ClientConfig) -> Self {
        Self::new(config, Arc::new(MemoryTokenStore::new()))
    }

    pub fn tokens(&self) -> &Arc<dyn TokenStore> {
        &self.tokens
    }

    /// Build a request for `segments` below the base URL.
    ///
    /// Each segment is percent-escaped on its own, so identifiers can never
    /// introduce extra path levels. Header values are read at build time.
    pub fn request(
        &self,
        method: HttpMethod,
        segments: &[&str],
        query: &[(String, String)],
        body: Option<String>,
    ) -> HttpRequest {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }

        let mut headers = vec![("accept".to_string(), JSON_API_MEDIA_TYPE.to_string())];
        if body.is_some() {
            headers.push(("content-type".to_string(), JSON_API_MEDIA_TYPE.to_string()));
        }
        if let Some(app_token) = &self.app_token {
            headers.push((APP_TOKEN_HEADER.to_string(), app_token.clone()));
        }
        if let Some(token) = self.tokens.token() {
            headers.push(("authorization".to_string(), format!("Bearer {token}")));
        }

        tracing::debug!(method = method.as_str(), url = %url, "built request");
        HttpRequest {
            method,
            url: url.into(),
            headers,
            body,
        }
    }

    /// Pass 2xx responses through; normalize everything else.
    pub fn check(&self, response: HttpResponse) -> Result<HttpResponse, ApiError> {
        if response.is_success() {
            return Ok(response);
        }
        let status = response.status;
        let errors = serde_json::from_str::<ErrorDocument>(&response.body)
            .ok()
            .and_then(|doc| doc.errors)
            .unwrap_or_else(|| {
                vec![ErrorObject::new(
                    UNKNOWN_ERROR_TITLE,
                    format!("Request failed with status code {status}"),
                )]
            });
        tracing::debug!(status, count = errors.len(), "request failed");
        Err(ApiError::Http {
            status: Some(status),
            errors,
        })
    }

    /// `check` followed by JSON deserialization of the body.
    pub fn decode<T: DeserializeOwned>(&self, response: HttpResponse) -> Result<T, ApiError> {
        let response = self.check(response)?;
        serde_json::from_str(&response.body).map_err(|e| ApiError::Deserialization(e.to_string()))
    }
}

pub(crate) fn encode<T: Serialize>(value: &T) -> Result<String, ApiError> {
    serde_json::to_string(value).map_err(|e| ApiError::Serialization(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ClientConfig {
        ClientConfig::new("http://localhost:3000").unwrap()
    }

    fn response(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            headers: Vec::new(),
            body: body.to_string(),
        }
    }

    #[test]
    fn request_joins_segments_under_base() {
        let req = ApiClient::anonymous(&config()).request(HttpMethod::Get, &["api", "v1", "me"], &[], None);
        assert_eq!(req.url, "http://localhost:3000/api/v1/me");
        assert_eq!(req.method, HttpMethod::Get);
        assert!(req.body.is_none());
    }

    #[test]
    fn base_path_prefix_is_kept() {
        let config = ClientConfig::new("https://example.com/tracker/").unwrap();
        let req = ApiClient::anonymous(&config).request(HttpMethod::Get, &["api", "v1", "me"], &[], None);
        assert_eq!(req.url, "https://example.com/tracker/api/v1/me");
    }

    #[test]
    fn segments_are_escaped() {
        let req = ApiClient::anonymous(&config()).request(HttpMethod::Get, &["postings", "a/b c"], &[], None);
        assert_eq!(req.url, "http://localhost:3000/postings/a%2Fb%20c");
    }

    #[test]
    fn anonymous_request_has_only_accept_header() {
        let req = ApiClient::anonymous(&config()).request(HttpMethod::Get, &["x"], &[], None);
        assert_eq!(req.headers, vec![("accept".to_string(), JSON_API_MEDIA_TYPE.to_string())]);
    }

    #[test]
    fn auth_headers_are_attached() {
        let config = config().with_app_token("app-secret");
        let client = ApiClient::new(&config, Arc::new(MemoryTokenStore::with_token("user-token")));
        let req = client.request(HttpMethod::Post, &["x"], &[], Some("{}".to_string()));
        assert_eq!(req.header("X-App-Token"), Some("app-secret"));
        assert_eq!(req.header("Authorization"), Some("Bearer user-token"));
        assert_eq!(req.header("content-type"), Some(JSON_API_MEDIA_TYPE));
    }

    #[test]
    fn token_is_read_per_request() {
        let tokens: Arc<dyn TokenStore> = Arc::new(MemoryTokenStore::new());
        let client = ApiClient::new(&config(), Arc::clone(&tokens));
        assert!(client.request(HttpMethod::Get, &["x"], &[], None).header("authorization").is_none());

        tokens.set_token("later").unwrap();
        let req = client.request(HttpMethod::Get, &["x"], &[], None);
        assert_eq!(req.header("authorization"), Some("Bearer later"));
    }

    #[test]
    fn check_passes_success_through() {
        let client = ApiClient::anonymous(&config());
        let ok = client.check(response(201, r#"{"data":{}}"#)).unwrap();
        assert_eq!(ok.body, r#"{"data":{}}"#);
    }

    #[test]
    fn check_keeps_structured_errors() {
        let client = ApiClient::anonymous(&config());
        let err = client
            .check(response(422, r#"{"errors":[{"title":"Invalid","detail":"Title required"}]}"#))
            .unwrap_err();
        assert_eq!(
            err,
            ApiError::Http {
                status: Some(422),
                errors: vec![ErrorObject::new("Invalid", "Title required")],
            }
        );
    }

    #[test]
    fn check_synthesizes_unknown_error() {
        let client = ApiClient::anonymous(&config());
        let err = client.check(response(502, "<html>Bad gateway</html>")).unwrap_err();
        match err {
            ApiError::Http { status, errors } => {
                assert_eq!(status, Some(502));
                assert_eq!(errors.len(), 1);
                assert_eq!(errors[0].title.as_deref(), Some(UNKNOWN_ERROR_TITLE));
                assert_eq!(errors[0].detail.as_deref(), Some("Request failed with status code 502"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn check_keeps_empty_error_list() {
        let client = ApiClient::anonymous(&config());
        let err = client.check(response(500, r#"{"errors":[]}"#)).unwrap_err();
        assert_eq!(err.message(), "Request failed (HTTP 500).");
    }

    #[test]
    fn decode_reports_bad_json() {
        let client = ApiClient::anonymous(&config());
        let err = client.decode::<serde_json::Value>(response(200, "not json")).unwrap_err();
        assert!(matches!(err, ApiError::Deserialization(_)));
    }

    #[test]
    fn from_config_reads_token_from_token_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(crate::auth::USER_TOKEN_KEY), "stored-token\n").unwrap();
        let client = ApiClient::from_config(&config().with_token_dir(dir.path()));

        let req = client.request(HttpMethod::Get, &["api", "v1", "me"], &[], None);
        assert_eq!(req.header("authorization"), Some("Bearer stored-token"));
    }
}
