//! Issue records read from the tracker.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Placeholder used when an issue has no description.
pub const NO_DESCRIPTION: &str = "No description available.";

/// Issue type classification used to dispatch a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IssueKind {
    Epic,
    /// Covers both "Story" and "User Story".
    Story,
    Other(String),
}

impl IssueKind {
    /// Classify a tracker issue-type label, ignoring case and surrounding whitespace.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "epic" => Self::Epic,
            "story" | "user story" => Self::Story,
            _ => Self::Other(label.to_string()),
        }
    }
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Epic => write!(f, "Epic"),
            Self::Story => write!(f, "Story"),
            Self::Other(label) => write!(f, "{label}"),
        }
    }
}

/// An issue as read for drafting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueDescriptor {
    pub key: String,
    /// Raw issue-type label as the tracker reports it.
    pub issue_type: String,
    /// Plain-text description, or [`NO_DESCRIPTION`].
    pub description: String,
}

impl IssueDescriptor {
    pub fn kind(&self) -> IssueKind {
        IssueKind::from_label(&self.issue_type)
    }
}

/// An open child story of an Epic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorySummary {
    pub key: String,
    pub summary: String,
    pub status: String,
}
