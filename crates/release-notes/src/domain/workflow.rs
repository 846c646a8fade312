//! Per-issue approval workflow.
//!
//! Reading -> Drafting -> AwaitingApproval -> (Writing) -> Done. The tracker is
//! written at most once, only on approval, and only with the exact text the
//! operator approved.

use std::sync::Arc;

use tracing::{info, instrument, warn};

use crate::entities::{ApprovalDecision, IssueDescriptor, WorkflowOutcome};
use crate::errors::NotesResult;
use crate::tracker::Tracker;
use crate::ui::{self, DecisionSource};

use super::NoteDrafter;

/// Drives one issue from read to optional write-back.
pub struct ApprovalWorkflow {
    tracker: Arc<dyn Tracker>,
    drafter: NoteDrafter,
    decisions: Arc<dyn DecisionSource>,
    field_id: String,
}

impl ApprovalWorkflow {
    pub fn new(
        tracker: Arc<dyn Tracker>,
        drafter: NoteDrafter,
        decisions: Arc<dyn DecisionSource>,
        field_id: impl Into<String>,
    ) -> Self {
        Self {
            tracker,
            drafter,
            decisions,
            field_id: field_id.into(),
        }
    }

    /// Read issue `key` and run the workflow on it.
    ///
    /// Read and drafting failures are reported and yield
    /// [`WorkflowOutcome::Unavailable`]. Only a failure of the decision
    /// source itself is returned as an error.
    #[instrument(skip(self), fields(key = %key))]
    pub async fn process(&self, key: &str) -> NotesResult<WorkflowOutcome> {
        ui::print_processing(key);

        let issue = match self.tracker.get_issue(key).await {
            Ok(issue) => issue,
            Err(e) => {
                ui::print_error(&format!("Failed to fetch issue {key}: {e}"));
                return Ok(WorkflowOutcome::Unavailable {
                    reason: e.to_string(),
                });
            }
        };

        self.process_issue(&issue).await
    }

    /// Run the workflow on an issue that has already been read.
    #[instrument(skip(self, issue), fields(key = %issue.key))]
    pub async fn process_issue(&self, issue: &IssueDescriptor) -> NotesResult<WorkflowOutcome> {
        let spinner = ui::draft_spinner(&format!(
            "Generating release notes using {}...",
            self.drafter.model()
        ));
        let drafted = self.drafter.draft(&issue.description).await;
        spinner.finish_and_clear();

        let draft = match drafted {
            Ok(draft) => draft,
            Err(e) => {
                warn!(error = %e, "Drafting failed");
                ui::print_error(&format!(
                    "Failed to generate release notes for {}: {e}",
                    issue.key
                ));
                return Ok(WorkflowOutcome::Unavailable {
                    reason: e.to_string(),
                });
            }
        };

        let decision = self.decisions.decide(&issue.key, &draft).await?;
        info!(%decision, "Operator decision");

        let outcome = match decision {
            ApprovalDecision::Approved => self.write(&issue.key, &draft).await,
            ApprovalDecision::Rejected => {
                ui::print_info("Release notes rejected. Moving to next story...");
                WorkflowOutcome::Rejected
            }
            ApprovalDecision::Skipped => {
                ui::print_info("Skipping this story...");
                WorkflowOutcome::Skipped
            }
            ApprovalDecision::ExitRequested => {
                ui::print_info("Exiting...");
                WorkflowOutcome::ExitRequested
            }
        };

        Ok(outcome)
    }

    async fn write(&self, key: &str, draft: &str) -> WorkflowOutcome {
        ui::print_info(&format!(
            "Updating Jira field `{}` with release notes...",
            self.field_id
        ));

        match self.tracker.update_field(key, &self.field_id, draft).await {
            Ok(()) => {
                ui::print_success(&format!("Successfully updated {} in {key}", self.field_id));
                WorkflowOutcome::Approved
            }
            Err(e) => {
                ui::print_error(&format!("Failed to update {key}: {e}"));
                WorkflowOutcome::WriteFailed {
                    reason: e.to_string(),
                }
            }
        }
    }
}
