//! Prompt template system for drafting.
//!
//! Templates are Handlebars strings rendered against a serializable context.
//! HTML escaping is disabled so descriptions reach the model verbatim.

use handlebars::Handlebars;
use serde::Serialize;
use std::collections::HashMap;

use crate::errors::{NotesError, NotesResult};

mod release_notes;

pub use release_notes::{ReleaseNotesContext, TEMPLATE_ID as RELEASE_NOTES_TEMPLATE};

/// A user-message prompt template.
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    /// Template ID
    pub id: String,
    /// Description
    pub description: String,
    /// User prompt template
    pub user: String,
}

impl PromptTemplate {
    /// Create a new prompt template.
    pub fn new(id: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            description: String::new(),
            user: user.into(),
        }
    }

    /// Set the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Render the template with the given context.
    pub fn render<T: Serialize>(&self, context: &T) -> NotesResult<String> {
        let mut handlebars = Handlebars::new();
        handlebars.register_escape_fn(handlebars::no_escape);
        handlebars.set_strict_mode(true);

        handlebars
            .register_template_string(&self.id, &self.user)
            .map_err(|e| NotesError::PromptRender {
                template: self.id.clone(),
                reason: e.to_string(),
            })?;

        handlebars
            .render(&self.id, context)
            .map_err(|e| NotesError::PromptRender {
                template: self.id.clone(),
                reason: e.to_string(),
            })
    }
}

/// Prompt manager for loading and rendering templates.
pub struct PromptManager {
    templates: HashMap<String, PromptTemplate>,
}

impl PromptManager {
    /// Create a new prompt manager with default templates.
    pub fn new() -> Self {
        let mut manager = Self {
            templates: HashMap::new(),
        };
        manager.register(release_notes::template());
        manager
    }

    /// Register a template, replacing any with the same ID.
    pub fn register(&mut self, template: PromptTemplate) {
        self.templates.insert(template.id.clone(), template);
    }

    /// Get a template by ID.
    pub fn get(&self, id: &str) -> Option<&PromptTemplate> {
        self.templates.get(id)
    }

    /// Render a template with context.
    pub fn render<T: Serialize>(&self, id: &str, context: &T) -> NotesResult<String> {
        let template = self.get(id).ok_or_else(|| NotesError::PromptRender {
            template: id.to_string(),
            reason: "template not found".to_string(),
        })?;
        template.render(context)
    }
}

impl Default for PromptManager {
    fn default() -> Self {
        Self::new()
    }
}
