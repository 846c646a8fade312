//! Operator decisions and per-issue workflow outcomes.

use std::fmt;
use std::str::FromStr;

use crate::errors::NotesError;

/// The operator's answer to a drafted release note.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApprovalDecision {
    Approved,
    Rejected,
    Skipped,
    ExitRequested,
}

impl FromStr for ApprovalDecision {
    type Err = NotesError;

    /// Accepts exactly one of `Y`, `N`, `S`, `E` in either case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "Y" => Ok(Self::Approved),
            "N" => Ok(Self::Rejected),
            "S" => Ok(Self::Skipped),
            "E" => Ok(Self::ExitRequested),
            _ => Err(NotesError::InvalidDecision {
                input: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for ApprovalDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Skipped => "skipped",
            Self::ExitRequested => "exit requested",
        };
        write!(f, "{label}")
    }
}

/// Result of running the approval workflow for one issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkflowOutcome {
    /// Approved and the tracker accepted the write.
    Approved,
    /// Approved, but the tracker write failed.
    WriteFailed { reason: String },
    Rejected,
    Skipped,
    ExitRequested,
    /// The issue could not be read or no draft could be produced.
    Unavailable { reason: String },
}

impl WorkflowOutcome {
    /// True only when release notes were written to the tracker.
    pub fn approved(&self) -> bool {
        matches!(self, Self::Approved)
    }

    /// True when the operator asked to stop the whole run.
    pub fn exit_requested(&self) -> bool {
        matches!(self, Self::ExitRequested)
    }
}
