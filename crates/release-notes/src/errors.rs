//! Error types for the release-notes crate.

use thiserror::Error;

/// Errors raised while reading issues, drafting notes, or writing them back.
#[derive(Error, Debug, Clone)]
pub enum NotesError {
    // Tracker errors
    #[error("Tracker request failed: {reason}")]
    TrackerRequest { reason: String },

    #[error("Tracker returned {status} for {key}: {body}")]
    TrackerStatus {
        key: String,
        status: u16,
        body: String,
    },

    #[error("Failed to decode tracker response for {key}: {reason}")]
    TrackerResponse { key: String, reason: String },

    // AI errors
    #[error("AI error: {0}")]
    Ai(String),

    #[error("AI provider not configured: {provider}")]
    ProviderNotConfigured { provider: String },

    #[error("Failed to render prompt '{template}': {reason}")]
    PromptRender { template: String, reason: String },

    // Configuration errors
    #[error("Configuration error: {reason}")]
    Config { reason: String },

    #[error("Missing required environment variable {var}")]
    MissingEnv { var: String },

    // Operator interaction
    #[error("Prompt failed: {reason}")]
    Prompt { reason: String },

    #[error("Invalid input '{input}'. Please enter Y, N, S, or E.")]
    InvalidDecision { input: String },

    #[error("Failed to parse JSON: {reason}")]
    JsonParse { reason: String },
}

impl NotesError {
    /// HTTP status carried by a tracker failure, if any.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::TrackerStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for NotesError {
    fn from(err: serde_json::Error) -> Self {
        Self::JsonParse {
            reason: err.to_string(),
        }
    }
}

/// Result type alias for release-notes operations
pub type NotesResult<T> = Result<T, NotesError>;
