//! Domain entities for release note drafting.

pub mod adf;
mod decision;
mod issue;

pub use adf::{AdfDocument, AdfNode};
pub use decision::{ApprovalDecision, WorkflowOutcome};
pub use issue::{IssueDescriptor, IssueKind, StorySummary, NO_DESCRIPTION};
