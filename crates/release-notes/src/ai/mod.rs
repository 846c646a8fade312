//! AI integration for release note drafting.
//!
//! This module provides:
//! - AI provider abstraction
//! - OpenAI chat completions client
//! - Prompt template system with Handlebars

pub mod openai;
pub mod prompts;
pub mod provider;

// Re-exports
pub use openai::OpenAIProvider;
pub use prompts::{PromptManager, PromptTemplate, ReleaseNotesContext, RELEASE_NOTES_TEMPLATE};
pub use provider::{AIMessage, AIProvider, AIResponse, AIRole, TokenUsage};
