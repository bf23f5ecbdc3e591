use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Details, EgnyteError, FailureKind, Result};

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Connection settings for an Egnyte domain.
///
/// Only `domain` is needed to talk to the API; `access_token` is needed for
/// anything but token requests, and `api_key`, `username` and `password` are
/// only read when requesting a token with the resource owner password flow.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Domain name, `acme` for `acme.egnyte.com`.
    pub domain: Option<String>,
    pub access_token: Option<String>,
    /// OAuth client id.
    pub api_key: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    /// Replaces `https://{domain}.egnyte.com`, e.g. for a staging host.
    pub base_url: Option<String>,
    pub timeout_secs: Option<u64>,
    pub user_agent: Option<String>,
}

impl Config {
    /// Read a JSON configuration file such as `~/.egnyte/config.json`.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            EgnyteError::Config(format!("failed to read {}: {e}", path.display()))
        })?;
        serde_json::from_str(&raw)
            .map_err(|e| EgnyteError::Config(format!("failed to parse {}: {e}", path.display())))
    }

    /// Build from `EGNYTE_*` environment variables; unset ones stay `None`.
    pub fn from_env() -> Self {
        let var = |name: &str| std::env::var(name).ok().filter(|v| !v.is_empty());
        Self {
            domain: var("EGNYTE_DOMAIN"),
            access_token: var("EGNYTE_ACCESS_TOKEN"),
            api_key: var("EGNYTE_API_KEY"),
            username: var("EGNYTE_USERNAME"),
            password: var("EGNYTE_PASSWORD"),
            base_url: var("EGNYTE_BASE_URL"),
            timeout_secs: var("EGNYTE_TIMEOUT_SECS").and_then(|v| v.parse().ok()),
            user_agent: var("EGNYTE_USER_AGENT"),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS))
    }

    /// API root without a trailing slash.
    pub fn base_url(&self) -> Result<String> {
        if let Some(url) = non_empty(&self.base_url) {
            return Ok(url.trim_end_matches('/').to_string());
        }
        let domain = required(&self.domain, FailureKind::DomainRequired)?;
        Ok(format!("https://{domain}.egnyte.com"))
    }

    /// Form fields for a resource owner password token request.
    pub fn password_grant_form(&self) -> Result<Vec<(&'static str, String)>> {
        let client_id = required(&self.api_key, FailureKind::ClientIdRequired)?;
        let username = required(&self.username, FailureKind::OAuthUsernameRequired)?;
        let password = required(&self.password, FailureKind::OAuthPasswordRequired)?;
        Ok(vec![
            ("client_id", client_id.to_string()),
            ("username", username.to_string()),
            ("password", password.to_string()),
            ("grant_type", "password".to_string()),
        ])
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn required(value: &Option<String>, missing: FailureKind) -> Result<&str> {
    non_empty(value).ok_or_else(|| missing.with_details(Details::new()))
}
