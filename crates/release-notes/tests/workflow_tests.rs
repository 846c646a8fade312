//! Workflow and run controller tests with scripted collaborators.
//!
//! The tracker, completion backend and operator are replaced by fakes that
//! record every call, so ordering and write-back guarantees can be checked
//! without a network or a terminal.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use release_notes::ai::{AIMessage, AIProvider, AIResponse, TokenUsage};
use release_notes::domain::{ApprovalWorkflow, NoteDrafter, RunController, RunReport, RunSummary};
use release_notes::entities::{ApprovalDecision, IssueDescriptor, StorySummary, WorkflowOutcome};
use release_notes::errors::{NotesError, NotesResult};
use release_notes::tracker::Tracker;
use release_notes::ui::DecisionSource;

const FIELD: &str = "customfield_10204";

// =============================================================================
// Fakes
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
enum TrackerCall {
    Get(String),
    Search(String),
    Update {
        key: String,
        field: String,
        text: String,
    },
}

#[derive(Default)]
struct FakeTracker {
    issues: HashMap<String, IssueDescriptor>,
    epics: HashMap<String, Vec<StorySummary>>,
    failing_writes: HashSet<String>,
    failing_search: bool,
    calls: Mutex<Vec<TrackerCall>>,
}

impl FakeTracker {
    fn with_issue(mut self, key: &str, issue_type: &str, description: &str) -> Self {
        self.issues.insert(
            key.to_string(),
            IssueDescriptor {
                key: key.to_string(),
                issue_type: issue_type.to_string(),
                description: description.to_string(),
            },
        );
        self
    }

    fn with_epic(mut self, key: &str, stories: &[(&str, &str)]) -> Self {
        self = self.with_issue(key, "Epic", "Epic description");
        let mut summaries = Vec::new();
        for (story_key, description) in stories {
            self = self.with_issue(story_key, "Story", description);
            summaries.push(StorySummary {
                key: (*story_key).to_string(),
                summary: format!("Summary of {story_key}"),
                status: "To Do".to_string(),
            });
        }
        self.epics.insert(key.to_string(), summaries);
        self
    }

    fn failing_write(mut self, key: &str) -> Self {
        self.failing_writes.insert(key.to_string());
        self
    }

    fn failing_search(mut self) -> Self {
        self.failing_search = true;
        self
    }

    fn calls(&self) -> Vec<TrackerCall> {
        self.calls.lock().unwrap().clone()
    }

    fn reads(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                TrackerCall::Get(key) => Some(key),
                _ => None,
            })
            .collect()
    }

    fn updates(&self) -> Vec<(String, String, String)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                TrackerCall::Update { key, field, text } => Some((key, field, text)),
                _ => None,
            })
            .collect()
    }
}

#[async_trait]
impl Tracker for FakeTracker {
    async fn get_issue(&self, key: &str) -> NotesResult<IssueDescriptor> {
        self.calls.lock().unwrap().push(TrackerCall::Get(key.to_string()));
        self.issues
            .get(key)
            .cloned()
            .ok_or_else(|| NotesError::TrackerStatus {
                key: key.to_string(),
                status: 404,
                body: r#"{"errorMessages":["Issue does not exist"]}"#.to_string(),
            })
    }

    async fn search_epic_stories(&self, epic_key: &str) -> NotesResult<Vec<StorySummary>> {
        self.calls
            .lock()
            .unwrap()
            .push(TrackerCall::Search(epic_key.to_string()));
        if self.failing_search {
            return Err(NotesError::TrackerStatus {
                key: epic_key.to_string(),
                status: 400,
                body: r#"{"errorMessages":["Error in the JQL Query"]}"#.to_string(),
            });
        }
        Ok(self.epics.get(epic_key).cloned().unwrap_or_default())
    }

    async fn update_field(&self, key: &str, field_id: &str, text: &str) -> NotesResult<()> {
        self.calls.lock().unwrap().push(TrackerCall::Update {
            key: key.to_string(),
            field: field_id.to_string(),
            text: text.to_string(),
        });
        if self.failing_writes.contains(key) {
            return Err(NotesError::TrackerStatus {
                key: key.to_string(),
                status: 400,
                body: "Field cannot be set.".to_string(),
            });
        }
        Ok(())
    }
}

/// Completion backend that echoes a numbered draft and records prompts.
#[derive(Default)]
struct RecordingProvider {
    prompts: Mutex<Vec<String>>,
    fail_on: Option<String>,
}

impl RecordingProvider {
    fn failing_on(description: &str) -> Self {
        Self {
            fail_on: Some(description.to_string()),
            ..Self::default()
        }
    }

    fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl AIProvider for RecordingProvider {
    fn name(&self) -> &'static str {
        "recording"
    }

    fn is_configured(&self) -> bool {
        true
    }

    async fn generate_text(&self, model: &str, messages: &[AIMessage]) -> NotesResult<AIResponse> {
        let prompt = messages[0].content.clone();
        let mut prompts = self.prompts.lock().unwrap();
        prompts.push(prompt.clone());

        if let Some(needle) = &self.fail_on {
            if prompt.contains(needle.as_str()) {
                return Err(NotesError::Ai("connection reset".to_string()));
            }
        }

        Ok(AIResponse {
            text: format!("  Draft #{} for the described feature.  ", prompts.len()),
            usage: TokenUsage::default(),
            model: model.to_string(),
            provider: "recording".to_string(),
        })
    }
}

/// Operator replaying a fixed script of decisions.
struct ScriptedDecisions {
    script: Mutex<VecDeque<ApprovalDecision>>,
    shown: Mutex<Vec<(String, String)>>,
}

impl ScriptedDecisions {
    fn new(script: &[ApprovalDecision]) -> Self {
        Self {
            script: Mutex::new(script.iter().copied().collect()),
            shown: Mutex::new(Vec::new()),
        }
    }

    fn shown(&self) -> Vec<(String, String)> {
        self.shown.lock().unwrap().clone()
    }
}

#[async_trait]
impl DecisionSource for ScriptedDecisions {
    async fn decide(&self, key: &str, draft: &str) -> NotesResult<ApprovalDecision> {
        self.shown
            .lock()
            .unwrap()
            .push((key.to_string(), draft.to_string()));
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| NotesError::Prompt {
                reason: "script exhausted".to_string(),
            })
    }
}

struct Harness {
    tracker: Arc<FakeTracker>,
    provider: Arc<RecordingProvider>,
    decisions: Arc<ScriptedDecisions>,
}

impl Harness {
    fn new(tracker: FakeTracker, provider: RecordingProvider, script: &[ApprovalDecision]) -> Self {
        Self {
            tracker: Arc::new(tracker),
            provider: Arc::new(provider),
            decisions: Arc::new(ScriptedDecisions::new(script)),
        }
    }

    fn workflow(&self) -> ApprovalWorkflow {
        ApprovalWorkflow::new(
            self.tracker.clone(),
            NoteDrafter::new(self.provider.clone(), "gpt-4o"),
            self.decisions.clone(),
            FIELD,
        )
    }

    fn controller(&self) -> RunController {
        RunController::new(self.tracker.clone(), self.workflow())
    }
}

// =============================================================================
// Approval workflow
// =============================================================================

#[tokio::test]
async fn approved_story_writes_exact_draft_once() {
    let harness = Harness::new(
        FakeTracker::default().with_issue("PROJ-1", "Story", "Adds dark mode toggle."),
        RecordingProvider::default(),
        &[ApprovalDecision::Approved],
    );

    let outcome = harness.workflow().process("PROJ-1").await.unwrap();

    assert_eq!(outcome, WorkflowOutcome::Approved);
    assert!(outcome.approved());
    assert!(!outcome.exit_requested());

    let prompts = harness.provider.prompts();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("Adds dark mode toggle."));

    let shown = harness.decisions.shown();
    assert_eq!(shown.len(), 1);
    assert_eq!(shown[0].1, "Draft #1 for the described feature.");

    assert_eq!(
        harness.tracker.updates(),
        vec![("PROJ-1".to_string(), FIELD.to_string(), shown[0].1.clone())]
    );
}

#[tokio::test]
async fn rejected_and_skipped_never_write() {
    for (decision, expected) in [
        (ApprovalDecision::Rejected, WorkflowOutcome::Rejected),
        (ApprovalDecision::Skipped, WorkflowOutcome::Skipped),
    ] {
        let harness = Harness::new(
            FakeTracker::default().with_issue("PROJ-1", "Story", "Adds dark mode toggle."),
            RecordingProvider::default(),
            &[decision],
        );

        let outcome = harness.workflow().process("PROJ-1").await.unwrap();

        assert_eq!(outcome, expected);
        assert!(!outcome.approved());
        assert!(!outcome.exit_requested());
        assert!(harness.tracker.updates().is_empty());
    }
}

#[tokio::test]
async fn exit_request_never_writes() {
    let harness = Harness::new(
        FakeTracker::default().with_issue("PROJ-1", "Story", "Adds dark mode toggle."),
        RecordingProvider::default(),
        &[ApprovalDecision::ExitRequested],
    );

    let outcome = harness.workflow().process("PROJ-1").await.unwrap();

    assert_eq!(outcome, WorkflowOutcome::ExitRequested);
    assert!(!outcome.approved());
    assert!(outcome.exit_requested());
    assert!(harness.tracker.updates().is_empty());
}

#[tokio::test]
async fn missing_issue_skips_drafting_and_writing() {
    let harness = Harness::new(FakeTracker::default(), RecordingProvider::default(), &[]);

    let outcome = harness.workflow().process("PROJ-9").await.unwrap();

    assert!(matches!(outcome, WorkflowOutcome::Unavailable { ref reason } if reason.contains("404")));
    assert!(!outcome.approved());
    assert!(!outcome.exit_requested());
    assert!(harness.provider.prompts().is_empty());
    assert!(harness.decisions.shown().is_empty());
    assert!(harness.tracker.updates().is_empty());
}

#[tokio::test]
async fn failed_write_is_not_reported_as_approved() {
    let harness = Harness::new(
        FakeTracker::default()
            .with_issue("PROJ-1", "Story", "Adds dark mode toggle.")
            .failing_write("PROJ-1"),
        RecordingProvider::default(),
        &[ApprovalDecision::Approved],
    );

    let outcome = harness.workflow().process("PROJ-1").await.unwrap();

    assert!(matches!(outcome, WorkflowOutcome::WriteFailed { .. }));
    assert!(!outcome.approved());
    assert!(!outcome.exit_requested());
    assert_eq!(harness.tracker.updates().len(), 1);
}

#[tokio::test]
async fn drafting_failure_skips_prompt_and_write() {
    let harness = Harness::new(
        FakeTracker::default().with_issue("PROJ-1", "Story", "Adds dark mode toggle."),
        RecordingProvider::failing_on("dark mode"),
        &[],
    );

    let outcome = harness.workflow().process("PROJ-1").await.unwrap();

    assert!(matches!(outcome, WorkflowOutcome::Unavailable { .. }));
    assert!(harness.decisions.shown().is_empty());
    assert!(harness.tracker.updates().is_empty());
}

#[tokio::test]
async fn decision_source_failure_propagates() {
    let harness = Harness::new(
        FakeTracker::default().with_issue("PROJ-1", "Story", "Adds dark mode toggle."),
        RecordingProvider::default(),
        &[],
    );

    let err = harness.workflow().process("PROJ-1").await.unwrap_err();

    assert!(matches!(err, NotesError::Prompt { .. }));
    assert!(harness.tracker.updates().is_empty());
}

// =============================================================================
// Run controller
// =============================================================================

#[tokio::test]
async fn direct_story_is_read_once_and_processed() {
    let harness = Harness::new(
        FakeTracker::default().with_issue("PROJ-1", "User Story", "Adds dark mode toggle."),
        RecordingProvider::default(),
        &[ApprovalDecision::Approved],
    );

    let report = harness.controller().run("PROJ-1").await.unwrap();

    assert_eq!(report, RunReport::Story(WorkflowOutcome::Approved));
    assert_eq!(harness.tracker.reads(), ["PROJ-1"]);
    assert_eq!(harness.provider.prompts().len(), 1);
    assert_eq!(harness.tracker.updates().len(), 1);
}

#[tokio::test]
async fn epic_stories_processed_in_order() {
    let harness = Harness::new(
        FakeTracker::default().with_epic(
            "PROJ-2",
            &[
                ("PROJ-3", "First story"),
                ("PROJ-4", "Second story"),
                ("PROJ-5", "Third story"),
            ],
        ),
        RecordingProvider::default(),
        &[
            ApprovalDecision::Approved,
            ApprovalDecision::Rejected,
            ApprovalDecision::Approved,
        ],
    );

    let report = harness.controller().run("PROJ-2").await.unwrap();

    assert_eq!(
        report,
        RunReport::Epic(RunSummary {
            total: 3,
            processed: 3,
            approved: 2,
            write_failures: 0,
            exited_early: false,
        })
    );
    assert_eq!(harness.tracker.reads(), ["PROJ-2", "PROJ-3", "PROJ-4", "PROJ-5"]);

    let shown: Vec<_> = harness.decisions.shown().into_iter().map(|(k, _)| k).collect();
    assert_eq!(shown, ["PROJ-3", "PROJ-4", "PROJ-5"]);

    let written: Vec<_> = harness.tracker.updates().into_iter().map(|(k, _, _)| k).collect();
    assert_eq!(written, ["PROJ-3", "PROJ-5"]);
}

#[tokio::test]
async fn exit_stops_remaining_stories() {
    let harness = Harness::new(
        FakeTracker::default().with_epic(
            "PROJ-2",
            &[
                ("PROJ-3", "First story"),
                ("PROJ-4", "Second story"),
                ("PROJ-5", "Third story"),
            ],
        ),
        RecordingProvider::default(),
        &[ApprovalDecision::Approved, ApprovalDecision::ExitRequested],
    );

    let report = harness.controller().run("PROJ-2").await.unwrap();

    let summary = match report {
        RunReport::Epic(summary) => summary,
        other => panic!("expected epic report, got {other:?}"),
    };
    assert!(summary.exited_early);
    assert_eq!(summary.processed, 2);
    assert_eq!(summary.approved, 1);
    assert_eq!(
        summary.message(),
        "Exited early! Approved 1 out of 2 processed stories."
    );

    assert!(!harness.tracker.reads().contains(&"PROJ-5".to_string()));
    assert_eq!(harness.provider.prompts().len(), 2);
}

#[tokio::test]
async fn drafting_failure_continues_with_next_story() {
    let harness = Harness::new(
        FakeTracker::default().with_epic(
            "PROJ-2",
            &[("PROJ-3", "Flaky story"), ("PROJ-4", "Second story")],
        ),
        RecordingProvider::failing_on("Flaky story"),
        &[ApprovalDecision::Approved],
    );

    let report = harness.controller().run("PROJ-2").await.unwrap();

    assert_eq!(
        report,
        RunReport::Epic(RunSummary {
            total: 2,
            processed: 2,
            approved: 1,
            write_failures: 0,
            exited_early: false,
        })
    );
    let written: Vec<_> = harness.tracker.updates().into_iter().map(|(k, _, _)| k).collect();
    assert_eq!(written, ["PROJ-4"]);
}

#[tokio::test]
async fn write_failures_counted_separately() {
    let harness = Harness::new(
        FakeTracker::default()
            .with_epic("PROJ-2", &[("PROJ-3", "First story"), ("PROJ-4", "Second story")])
            .failing_write("PROJ-3"),
        RecordingProvider::default(),
        &[ApprovalDecision::Approved, ApprovalDecision::Approved],
    );

    let report = harness.controller().run("PROJ-2").await.unwrap();

    assert_eq!(
        report,
        RunReport::Epic(RunSummary {
            total: 2,
            processed: 2,
            approved: 1,
            write_failures: 1,
            exited_early: false,
        })
    );
}

#[tokio::test]
async fn epic_without_open_stories_halts() {
    let harness = Harness::new(
        FakeTracker::default().with_epic("PROJ-2", &[]),
        RecordingProvider::default(),
        &[],
    );

    let report = harness.controller().run("PROJ-2").await.unwrap();

    assert_eq!(report, RunReport::NoStories);
    assert_eq!(
        harness.tracker.calls(),
        vec![
            TrackerCall::Get("PROJ-2".to_string()),
            TrackerCall::Search("PROJ-2".to_string()),
        ]
    );
    assert!(harness.provider.prompts().is_empty());
}

#[tokio::test]
async fn failed_epic_search_halts_before_any_story() {
    let harness = Harness::new(
        FakeTracker::default()
            .with_epic("PROJ-2", &[("PROJ-10", "Adds dark mode toggle.")])
            .failing_search(),
        RecordingProvider::default(),
        &[ApprovalDecision::Approved],
    );

    let report = harness.controller().run("PROJ-2").await.unwrap();

    assert_eq!(report, RunReport::Unavailable);
    assert_eq!(harness.tracker.reads(), vec!["PROJ-2".to_string()]);
    assert!(harness.tracker.updates().is_empty());
    assert!(harness.provider.prompts().is_empty());
    assert!(harness.decisions.shown().is_empty());
}

#[tokio::test]
async fn unsupported_type_makes_no_further_calls() {
    let harness = Harness::new(
        FakeTracker::default().with_issue("PROJ-7", "Bug", "Crash on save"),
        RecordingProvider::default(),
        &[],
    );

    let report = harness.controller().run("PROJ-7").await.unwrap();

    assert_eq!(report, RunReport::UnsupportedType("Bug".to_string()));
    assert_eq!(
        harness.tracker.calls(),
        vec![TrackerCall::Get("PROJ-7".to_string())]
    );
    assert!(harness.provider.prompts().is_empty());
    assert!(harness.decisions.shown().is_empty());
}

#[tokio::test]
async fn unreadable_top_level_issue_halts() {
    let harness = Harness::new(FakeTracker::default(), RecordingProvider::default(), &[]);

    let report = harness.controller().run("PROJ-9").await.unwrap();

    assert_eq!(report, RunReport::Unavailable);
    assert_eq!(
        harness.tracker.calls(),
        vec![TrackerCall::Get("PROJ-9".to_string())]
    );
}
