//! Run controller: dispatches a top-level issue to the approval workflow.

use std::sync::Arc;

use tracing::{info, instrument};

use crate::entities::{IssueKind, WorkflowOutcome};
use crate::errors::NotesResult;
use crate::tracker::Tracker;
use crate::ui;

use super::ApprovalWorkflow;

/// Counters for an Epic run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Open stories found under the Epic.
    pub total: usize,
    /// Stories handed to the workflow, including the one that requested exit.
    pub processed: usize,
    /// Stories whose notes were written to the tracker.
    pub approved: usize,
    /// Approved stories whose write failed.
    pub write_failures: usize,
    pub exited_early: bool,
}

impl RunSummary {
    /// Closing line for the run.
    pub fn message(&self) -> String {
        if self.exited_early {
            format!(
                "Exited early! Approved {} out of {} processed stories.",
                self.approved, self.processed
            )
        } else {
            format!(
                "Processing complete! Approved {} out of {} stories.",
                self.approved, self.total
            )
        }
    }
}

/// What a run did with its top-level issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunReport {
    /// The top-level issue or its stories could not be read.
    Unavailable,
    /// The issue is neither an Epic nor a Story; nothing was processed.
    UnsupportedType(String),
    /// The Epic has no open stories.
    NoStories,
    /// A single story went through the workflow.
    Story(WorkflowOutcome),
    /// An Epic's stories went through the workflow.
    Epic(RunSummary),
}

/// Entry point for processing one top-level issue key.
pub struct RunController {
    tracker: Arc<dyn Tracker>,
    workflow: ApprovalWorkflow,
}

impl RunController {
    pub fn new(tracker: Arc<dyn Tracker>, workflow: ApprovalWorkflow) -> Self {
        Self { tracker, workflow }
    }

    /// Resolve the issue type of `key` and process it.
    #[instrument(skip(self), fields(key = %key))]
    pub async fn run(&self, key: &str) -> NotesResult<RunReport> {
        ui::print_info(&format!("Fetching description for {key}..."));

        let issue = match self.tracker.get_issue(key).await {
            Ok(issue) => issue,
            Err(e) => {
                ui::print_error(&format!("Failed to fetch issue {key}: {e}"));
                return Ok(RunReport::Unavailable);
            }
        };

        match issue.kind() {
            IssueKind::Other(label) => {
                ui::print_warning(&format!(
                    "Issue type '{label}' is neither an Epic nor a User Story"
                ));
                Ok(RunReport::UnsupportedType(label))
            }
            IssueKind::Epic => {
                ui::print_info(&format!("Issue Type: {}", issue.issue_type));
                self.run_epic(key).await
            }
            IssueKind::Story => {
                ui::print_info(&format!("Issue Type: {}", issue.issue_type));
                ui::print_processing(key);
                let outcome = self.workflow.process_issue(&issue).await?;
                Ok(RunReport::Story(outcome))
            }
        }
    }

    async fn run_epic(&self, epic_key: &str) -> NotesResult<RunReport> {
        ui::print_info("Fetching non-closed stories for this epic...");

        let stories = match self.tracker.search_epic_stories(epic_key).await {
            Ok(stories) => stories,
            Err(e) => {
                ui::print_error(&format!("Failed to fetch stories for epic {epic_key}: {e}"));
                return Ok(RunReport::Unavailable);
            }
        };

        if stories.is_empty() {
            ui::print_info("No non-closed stories found for this epic.");
            return Ok(RunReport::NoStories);
        }

        ui::print_info(&format!(
            "Found {} non-closed stories in this epic.",
            stories.len()
        ));
        ui::print_story_table(&stories);

        let mut summary = RunSummary {
            total: stories.len(),
            ..RunSummary::default()
        };

        for story in &stories {
            summary.processed += 1;
            ui::print_story_progress(summary.processed, summary.total, story);

            let outcome = self.workflow.process(&story.key).await?;
            info!(story = %story.key, ?outcome, "Story processed");

            match outcome {
                WorkflowOutcome::ExitRequested => {
                    summary.exited_early = true;
                    break;
                }
                WorkflowOutcome::Approved => summary.approved += 1,
                WorkflowOutcome::WriteFailed { .. } => summary.write_failures += 1,
                WorkflowOutcome::Rejected
                | WorkflowOutcome::Skipped
                | WorkflowOutcome::Unavailable { .. } => {}
            }
        }

        ui::print_success(&summary.message());
        if summary.write_failures > 0 {
            ui::print_warning(&format!(
                "{} approved stories could not be written to Jira.",
                summary.write_failures
            ));
        }

        Ok(RunReport::Epic(summary))
    }
}
