//! Release notes prompt template.
//!
//! Turns a story description into one or two declarative sentences.

use serde::Serialize;

use super::PromptTemplate;

pub const TEMPLATE_ID: &str = "release-notes";

/// Context for the release-notes prompt.
#[derive(Debug, Clone, Serialize)]
pub struct ReleaseNotesContext {
    /// Plain-text story description
    pub description: String,
}

/// Get the release-notes template.
pub fn template() -> PromptTemplate {
    PromptTemplate::new(TEMPLATE_ID, USER_PROMPT)
        .with_description("Draft release notes from a story description")
}

const USER_PROMPT: &str = r#"Write concise release notes in 1-2 declarative sentences based on the user story details. Please do not include words such as "in this release" or "users can do".
Clearly describe the functionality, key features, and benefits without omitting critical details.

User Story Description:
{{{description}}}

Release Notes:"#;
