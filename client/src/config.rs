use std::env;

pub const DEFAULT_API_URL: &str = "http://localhost:3001";
pub const API_URL_ENV_VAR: &str = "LOBBY_API_URL";

/// Where the lobby API lives. Read-only once the client is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    base_url: String,
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Base url from `LOBBY_API_URL`, falling back to the local dev server.
    pub fn from_env() -> Self {
        Self::new(env::var(API_URL_ENV_VAR).unwrap_or_else(|_| DEFAULT_API_URL.to_string()))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute url of a resource path.
    pub fn url(&self, resource_path: &str) -> String {
        if resource_path.starts_with('/') {
            format!("{}{}", self.base_url, resource_path)
        } else {
            format!("{}/{}", self.base_url, resource_path)
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL)
    }
}
