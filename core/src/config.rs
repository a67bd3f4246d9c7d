//! Client configuration loaded from the environment.

use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;
use url::Url;

use crate::auth::{FileTokenStore, MemoryTokenStore, TokenStore};

pub const BASE_URL_VAR: &str = "JOBTRACK_API_BASE_URL";
pub const APP_TOKEN_VAR: &str = "JOBTRACK_APP_TOKEN";
pub const TOKEN_DIR_VAR: &str = "JOBTRACK_TOKEN_DIR";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("required environment variable '{0}' is not set")]
    Missing(&'static str),

    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

/// Settings the HTTP client wrapper needs: where the backend lives, the
/// static application credential, and where the user token is persisted.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: Url,
    pub app_token: Option<String>,
    pub token_dir: Option<PathBuf>,
}

impl ClientConfig {
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: parse_base_url(base_url)?,
            app_token: None,
            token_dir: None,
        })
    }

    pub fn with_app_token(mut self, token: impl Into<String>) -> Self {
        self.app_token = Some(token.into());
        self
    }

    pub fn with_token_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.token_dir = Some(dir.into());
        self
    }

    /// Reads `JOBTRACK_API_BASE_URL` (required), `JOBTRACK_APP_TOKEN` and
    /// `JOBTRACK_TOKEN_DIR`, loading a `.env` file first if one exists.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let base_url = std::env::var(BASE_URL_VAR).map_err(|_| ConfigError::Missing(BASE_URL_VAR))?;
        let mut config = Self::new(&base_url)?;
        config.app_token = non_empty_var(APP_TOKEN_VAR);
        config.token_dir = non_empty_var(TOKEN_DIR_VAR).map(PathBuf::from);
        Ok(config)
    }

    /// Token store for this configuration: a [`FileTokenStore`] under
    /// `token_dir` when set, otherwise in memory.
    pub fn token_store(&self) -> Arc<dyn TokenStore> {
        match &self.token_dir {
            Some(dir) => Arc::new(FileTokenStore::new(dir)),
            None => Arc::new(MemoryTokenStore::new()),
        }
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw.trim()).map_err(|e| ConfigError::InvalidBaseUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;
    if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidBaseUrl {
            url: raw.to_string(),
            reason: "expected an http(s) URL".to_string(),
        });
    }
    Ok(url)
}
