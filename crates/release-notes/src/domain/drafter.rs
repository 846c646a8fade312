//! Release note drafting through an AI provider.

use std::sync::Arc;

use tracing::{debug, instrument};

use crate::ai::{AIMessage, AIProvider, PromptManager, ReleaseNotesContext, RELEASE_NOTES_TEMPLATE};
use crate::errors::{NotesError, NotesResult};

/// Produces a release note draft from a story description with one completion call.
pub struct NoteDrafter {
    provider: Arc<dyn AIProvider>,
    prompts: PromptManager,
    model: String,
}

impl NoteDrafter {
    /// Create a drafter that sends requests for `model` through `provider`.
    pub fn new(provider: Arc<dyn AIProvider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            prompts: PromptManager::default(),
            model: model.into(),
        }
    }

    /// Model id used for drafting.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Render the drafting prompt for a description.
    pub fn build_prompt(&self, description: &str) -> NotesResult<String> {
        self.prompts.render(
            RELEASE_NOTES_TEMPLATE,
            &ReleaseNotesContext {
                description: description.to_string(),
            },
        )
    }

    /// Draft release notes for `description`.
    ///
    /// Returns the trimmed text of the first choice. An empty completion is
    /// an error.
    #[instrument(skip(self, description), fields(model = %self.model))]
    pub async fn draft(&self, description: &str) -> NotesResult<String> {
        let prompt = self.build_prompt(description)?;
        let messages = [AIMessage::user(prompt)];

        let response = self.provider.generate_text(&self.model, &messages).await?;
        let draft = response.text.trim();

        if draft.is_empty() {
            return Err(NotesError::Ai(format!(
                "{} returned an empty draft",
                self.provider.name()
            )));
        }

        debug!(
            output_tokens = response.usage.output_tokens,
            "Draft generated"
        );
        Ok(draft.to_string())
    }
}
