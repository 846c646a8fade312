//! REST client for Jira Cloud (API v3).

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{Response, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, instrument, warn};

use crate::config::JiraConfig;
use crate::entities::{adf, AdfDocument, IssueDescriptor, StorySummary, NO_DESCRIPTION};
use crate::errors::{NotesError, NotesResult};

use super::Tracker;

/// Fields requested from the search endpoint.
const SEARCH_FIELDS: &str = "key,summary,status";

/// JQL selecting an Epic's open stories.
pub fn epic_stories_jql(epic_key: &str) -> String {
    format!(
        r#"parent = {epic_key} AND issuetype in ("Story", "User Story") AND status not in (Closed, Done)"#
    )
}

/// Jira REST client authenticated with an account email and API token.
#[derive(Debug, Clone)]
pub struct JiraClient {
    client: reqwest::Client,
    base_url: String,
    email: String,
    api_token: String,
}

#[derive(Debug, Deserialize)]
struct IssueResponse {
    fields: IssueFields,
}

#[derive(Debug, Deserialize)]
struct IssueFields {
    issuetype: NamedField,
    #[serde(default)]
    description: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct NamedField {
    name: String,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    issues: Vec<SearchIssue>,
}

#[derive(Debug, Deserialize)]
struct SearchIssue {
    key: String,
    fields: SearchFields,
}

#[derive(Debug, Deserialize)]
struct SearchFields {
    #[serde(default)]
    summary: Option<String>,
    status: NamedField,
}

#[derive(Debug, Serialize)]
struct UpdateRequest<'a> {
    fields: HashMap<&'a str, AdfDocument>,
}

impl JiraClient {
    /// Build a client for the configured instance.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be constructed
    pub fn new(config: &JiraConfig, timeout: Duration) -> NotesResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| NotesError::Config {
                reason: format!("Failed to build HTTP client: {e}"),
            })?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            email: config.email.clone(),
            api_token: config.api_token.clone(),
        })
    }

    fn issue_url(&self, key: &str) -> String {
        format!("{}/rest/api/3/issue/{key}", self.base_url)
    }

    /// Read the body of a non-success response and turn it into an error.
    async fn status_error(key: &str, response: Response) -> NotesError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        warn!(%key, status = status.as_u16(), "Jira request failed");
        NotesError::TrackerStatus {
            key: key.to_string(),
            status: status.as_u16(),
            body,
        }
    }
}

fn request_error(e: &reqwest::Error) -> NotesError {
    NotesError::TrackerRequest {
        reason: e.to_string(),
    }
}

/// Plain-text form of a Jira description field.
fn description_text(description: Option<Value>) -> String {
    let text = match description {
        None | Some(Value::Null) => return NO_DESCRIPTION.to_string(),
        Some(Value::String(s)) => s,
        Some(other) => adf::to_plain_text(&other),
    };

    if text.trim().is_empty() {
        NO_DESCRIPTION.to_string()
    } else {
        text
    }
}

#[async_trait]
impl Tracker for JiraClient {
    #[instrument(skip(self), fields(key = %key))]
    async fn get_issue(&self, key: &str) -> NotesResult<IssueDescriptor> {
        let response = self
            .client
            .get(self.issue_url(key))
            .basic_auth(&self.email, Some(&self.api_token))
            .send()
            .await
            .map_err(|e| request_error(&e))?;

        if response.status() != StatusCode::OK {
            return Err(Self::status_error(key, response).await);
        }

        let issue: IssueResponse = response.json().await.map_err(|e| NotesError::TrackerResponse {
            key: key.to_string(),
            reason: e.to_string(),
        })?;

        debug!(issue_type = %issue.fields.issuetype.name, "Retrieved issue");

        Ok(IssueDescriptor {
            key: key.to_string(),
            issue_type: issue.fields.issuetype.name,
            description: description_text(issue.fields.description),
        })
    }

    #[instrument(skip(self), fields(epic = %epic_key))]
    async fn search_epic_stories(&self, epic_key: &str) -> NotesResult<Vec<StorySummary>> {
        let jql = epic_stories_jql(epic_key);
        debug!(%jql, "Searching epic stories");

        let response = self
            .client
            .get(format!("{}/rest/api/3/search", self.base_url))
            .basic_auth(&self.email, Some(&self.api_token))
            .query(&[("jql", jql.as_str()), ("fields", SEARCH_FIELDS)])
            .send()
            .await
            .map_err(|e| request_error(&e))?;

        if response.status() != StatusCode::OK {
            return Err(Self::status_error(epic_key, response).await);
        }

        let search: SearchResponse = response.json().await.map_err(|e| NotesError::TrackerResponse {
            key: epic_key.to_string(),
            reason: e.to_string(),
        })?;

        let stories: Vec<StorySummary> = search
            .issues
            .into_iter()
            .map(|issue| StorySummary {
                key: issue.key,
                summary: issue.fields.summary.unwrap_or_default(),
                status: issue.fields.status.name,
            })
            .collect();

        debug!(count = stories.len(), "Found epic stories");
        Ok(stories)
    }

    #[instrument(skip(self, text), fields(key = %key, field = %field_id))]
    async fn update_field(&self, key: &str, field_id: &str, text: &str) -> NotesResult<()> {
        let mut fields = HashMap::new();
        fields.insert(field_id, AdfDocument::paragraph(text));

        let response = self
            .client
            .put(self.issue_url(key))
            .basic_auth(&self.email, Some(&self.api_token))
            .json(&UpdateRequest { fields })
            .send()
            .await
            .map_err(|e| request_error(&e))?;

        if response.status() != StatusCode::NO_CONTENT {
            return Err(Self::status_error(key, response).await);
        }

        debug!("Updated release notes field");
        Ok(())
    }
}
