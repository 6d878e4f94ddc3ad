//! Client configuration.
//!
//! Base URL resolution order:
//! 1. `DASHKIT_API_BASE_URL` environment variable (if set and non-empty)
//! 2. Caller-supplied override (if Some and non-empty)
//! 3. Default: `http://localhost:5000/api`

use std::time::Duration;

use anyhow::{Context, Result};

/// Default API base URL.
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000/api";

/// Environment variable overriding the base URL.
pub const BASE_URL_ENV: &str = "DASHKIT_API_BASE_URL";

/// Path fragment identifying the login endpoint. Requests whose path
/// contains it are never sent with an Authorization header.
const LOGIN_PATH: &str = "/auth/signing";

/// Path of the refresh exchange, relative to the base URL.
const REFRESH_PATH: &str = "/auth/refresh-token";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Configuration for [`crate::ApiClient`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API base URL, without a trailing slash.
    pub base_url: String,
    /// Path fragment exempt from credential attachment.
    pub login_path: String,
    /// Refresh endpoint path, relative to `base_url`.
    pub refresh_path: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl ClientConfig {
    /// Resolves a config with precedence: env > override > default.
    /// The resolved base URL must parse as a valid URL.
    pub fn resolve(override_base_url: Option<&str>) -> Result<Self> {
        // Try env var first
        if let Ok(env_url) = std::env::var(BASE_URL_ENV) {
            let trimmed = env_url.trim();
            if !trimmed.is_empty() {
                return Self::with_base_url(trimmed);
            }
        }

        if let Some(override_url) = override_base_url {
            let trimmed = override_url.trim();
            if !trimmed.is_empty() {
                return Self::with_base_url(trimmed);
            }
        }

        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Builds a config around a validated base URL.
    pub fn with_base_url(base_url: &str) -> Result<Self> {
        validate_url(base_url)?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            login_path: LOGIN_PATH.to_string(),
            refresh_path: REFRESH_PATH.to_string(),
            timeout: DEFAULT_TIMEOUT,
        })
    }

    /// Full URL of the refresh endpoint.
    pub fn refresh_url(&self) -> String {
        format!("{}{}", self.base_url, self.refresh_path)
    }

    /// Joins a request path onto the base URL.
    pub fn url_for(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }
}

/// Validates that a URL is well-formed.
fn validate_url(url: &str) -> Result<()> {
    url::Url::parse(url).with_context(|| format!("Invalid API base URL: {url}"))?;
    Ok(())
}
