//! Runtime configuration loaded from the environment.

use std::env;
use std::time::Duration;

use crate::errors::{NotesError, NotesResult};

/// Custom field that receives approved release notes.
pub const DEFAULT_RELEASE_NOTES_FIELD: &str = "customfield_10204";

/// Model used for drafting when `OPENAI_MODEL` is unset.
pub const DEFAULT_MODEL: &str = "gpt-4o";

/// Outbound HTTP timeout when `HTTP_TIMEOUT_SECS` is unset.
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 60;

/// Jira connection settings.
#[derive(Clone)]
pub struct JiraConfig {
    /// Base URL of the Jira instance, without a trailing slash.
    pub base_url: String,
    /// Account email used for basic auth.
    pub email: String,
    /// API token used for basic auth.
    pub api_token: String,
    /// Custom field id written on approval.
    pub release_notes_field: String,
}

impl std::fmt::Debug for JiraConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JiraConfig")
            .field("base_url", &self.base_url)
            .field("email", &self.email)
            .field("api_token", &"<redacted>")
            .field("release_notes_field", &self.release_notes_field)
            .finish()
    }
}

/// OpenAI settings.
#[derive(Clone)]
pub struct OpenAIConfig {
    /// API key; drafting fails per story when absent.
    pub api_key: Option<String>,
    /// Optional override of the chat completions endpoint.
    pub base_url: Option<String>,
    /// Model id sent with every completion request.
    pub model: String,
}

impl std::fmt::Debug for OpenAIConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAIConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish()
    }
}

/// Complete configuration, loaded once at process start.
#[derive(Debug, Clone)]
pub struct Config {
    pub jira: JiraConfig,
    pub openai: OpenAIConfig,
    /// Timeout applied to every outbound HTTP request.
    pub http_timeout: Duration,
}

impl Config {
    /// Load configuration from process environment variables.
    pub fn from_env() -> NotesResult<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> NotesResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let require = |name: &str| {
            get(name).ok_or_else(|| NotesError::MissingEnv {
                var: name.to_string(),
            })
        };

        let base_url = match get("JIRA_BASE_URL") {
            Some(url) => url,
            None => {
                let domain = get("JIRA_DOMAIN").ok_or_else(|| NotesError::MissingEnv {
                    var: "JIRA_BASE_URL".to_string(),
                })?;
                format!("https://{domain}")
            }
        };

        let http_timeout = match get("HTTP_TIMEOUT_SECS") {
            Some(raw) => {
                let secs: u64 = raw.parse().map_err(|_| NotesError::Config {
                    reason: format!(
                        "HTTP_TIMEOUT_SECS must be a whole number of seconds, got '{raw}'"
                    ),
                })?;
                if secs == 0 {
                    return Err(NotesError::Config {
                        reason: "HTTP_TIMEOUT_SECS must be greater than zero".to_string(),
                    });
                }
                Duration::from_secs(secs)
            }
            None => Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        };

        Ok(Self {
            jira: JiraConfig {
                base_url: base_url.trim_end_matches('/').to_string(),
                email: require("JIRA_EMAIL")?,
                api_token: require("JIRA_API_TOKEN")?,
                release_notes_field: get("RELEASE_NOTES_FIELD")
                    .unwrap_or_else(|| DEFAULT_RELEASE_NOTES_FIELD.to_string()),
            },
            openai: OpenAIConfig {
                api_key: get("OPENAI_API_KEY"),
                base_url: get("OPENAI_BASE_URL"),
                model: get("OPENAI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            },
            http_timeout,
        })
    }
}
