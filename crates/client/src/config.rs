use std::time::Duration;

use crate::error::ClientError;

/// Default API base URL for a local Entity Store.
pub const DEFAULT_API_URL: &str = "http://localhost:5257";

/// Client configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Entity Store base URL, without trailing slash.
    pub api_url: String,
    /// File service base URL (defaults to the API URL).
    pub files_url: String,
    /// Bearer token attached to every request when set.
    pub token: Option<String>,
    /// Per-request timeout. `None` keeps the HTTP client default.
    pub request_timeout: Option<Duration>,
}

impl ClientConfig {
    pub fn new(api_url: impl Into<String>) -> Self {
        let api_url = normalize_url(api_url.into());
        Self {
            files_url: api_url.clone(),
            api_url,
            token: None,
            request_timeout: None,
        }
    }

    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                    | Default                  |
    /// |----------------------------|--------------------------|
    /// | `TCC_API_URL`              | `http://localhost:5257`  |
    /// | `TCC_FILES_URL`            | value of `TCC_API_URL`   |
    /// | `TCC_API_TOKEN`            | none                     |
    /// | `TCC_REQUEST_TIMEOUT_SECS` | none (client default)    |
    pub fn from_env() -> Result<Self, ClientError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ClientConfig::from_env`] with an injectable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ClientError> {
        let api_url = lookup("TCC_API_URL")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.into());
        let api_url = parse_url("TCC_API_URL", api_url)?;

        let files_url = match lookup("TCC_FILES_URL").filter(|v| !v.trim().is_empty()) {
            Some(url) => parse_url("TCC_FILES_URL", url)?,
            None => api_url.clone(),
        };

        let token = lookup("TCC_API_TOKEN").filter(|v| !v.trim().is_empty());

        let request_timeout = match lookup("TCC_REQUEST_TIMEOUT_SECS") {
            Some(raw) => {
                let secs: u64 = raw.trim().parse().map_err(|_| {
                    ClientError::Config(format!(
                        "TCC_REQUEST_TIMEOUT_SECS must be a whole number of seconds, got {raw:?}"
                    ))
                })?;
                Some(Duration::from_secs(secs))
            }
            None => None,
        };

        Ok(Self {
            api_url,
            files_url,
            token,
            request_timeout,
        })
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }
}

fn parse_url(key: &str, raw: String) -> Result<String, ClientError> {
    let url = normalize_url(raw);
    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(url)
    } else {
        Err(ClientError::Config(format!(
            "{key} must be an http(s) URL, got {url:?}"
        )))
    }
}

fn normalize_url(raw: String) -> String {
    raw.trim().trim_end_matches('/').to_string()
}
