//! Issue tracker access.
//!
//! The [`Tracker`] trait is the seam between the workflow and the network:
//! [`JiraClient`] talks to Jira Cloud, tests substitute scripted fakes.

use async_trait::async_trait;

use crate::entities::{IssueDescriptor, StorySummary};
use crate::errors::NotesResult;

mod jira;

pub use jira::{epic_stories_jql, JiraClient};

/// Read, search and write operations against an issue tracker.
#[async_trait]
pub trait Tracker: Send + Sync {
    /// Fetch an issue's type label and plain-text description.
    async fn get_issue(&self, key: &str) -> NotesResult<IssueDescriptor>;

    /// List the Epic's child stories that are not Closed or Done, in tracker order.
    async fn search_epic_stories(&self, epic_key: &str) -> NotesResult<Vec<StorySummary>>;

    /// Store `text` in the rich-text custom field `field_id` of issue `key`.
    async fn update_field(&self, key: &str, field_id: &str, text: &str) -> NotesResult<()>;
}
