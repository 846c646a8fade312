//! Release notes drafting for Jira stories.
//!
//! Reads a Jira Epic or Story, drafts release notes from each story's
//! description with an LLM, asks the operator to approve every draft, and
//! writes approved notes into a rich-text custom field.
//!
//! # Architecture
//!
//! - [`tracker::Tracker`] abstracts Jira reads, searches and writes
//! - [`ai::AIProvider`] abstracts the completion backend
//! - [`ui::DecisionSource`] abstracts the operator prompt
//! - [`domain::ApprovalWorkflow`] runs one issue through draft and approval
//! - [`domain::RunController`] dispatches a top-level Epic or Story
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use release_notes::ai::OpenAIProvider;
//! use release_notes::config::Config;
//! use release_notes::domain::{ApprovalWorkflow, NoteDrafter, RunController};
//! use release_notes::tracker::JiraClient;
//! use release_notes::ui::TerminalDecisionSource;
//!
//! # async fn example() -> release_notes::errors::NotesResult<()> {
//! let config = Config::from_env()?;
//! let tracker = Arc::new(JiraClient::new(&config.jira, config.http_timeout)?);
//! let provider = Arc::new(OpenAIProvider::new(&config.openai, config.http_timeout)?);
//!
//! let workflow = ApprovalWorkflow::new(
//!     tracker.clone(),
//!     NoteDrafter::new(provider, config.openai.model.clone()),
//!     Arc::new(TerminalDecisionSource),
//!     config.jira.release_notes_field.clone(),
//! );
//! let report = RunController::new(tracker, workflow).run("PROJ-1").await?;
//! println!("{report:?}");
//! # Ok(())
//! # }
//! ```

#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]

pub mod ai;
pub mod config;
pub mod domain;
pub mod entities;
pub mod errors;
pub mod tracker;
pub mod ui;

pub use config::Config;
pub use domain::{ApprovalWorkflow, NoteDrafter, RunController, RunReport, RunSummary};
pub use entities::{ApprovalDecision, IssueDescriptor, StorySummary, WorkflowOutcome};
pub use errors::{NotesError, NotesResult};
