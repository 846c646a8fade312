//! Domain layer: drafting, the approval workflow and the run controller.

mod drafter;
mod runner;
mod workflow;

pub use drafter::NoteDrafter;
pub use runner::{RunController, RunReport, RunSummary};
pub use workflow::ApprovalWorkflow;
