//! Operator decision sources.

use std::io::{self, BufRead, IsTerminal, Write};

use async_trait::async_trait;
use colored::Colorize;
use dialoguer::{theme::ColorfulTheme, Input};
use tracing::warn;

use crate::entities::ApprovalDecision;
use crate::errors::{NotesError, NotesResult};

/// Question shown to the operator for every draft.
pub const DECISION_PROMPT: &str =
    "Do you want to approve these release notes? (Y)es/(N)o/(S)kip/(E)xit";

/// Supplies the operator's decision for a drafted release note.
#[async_trait]
pub trait DecisionSource: Send + Sync {
    /// Present `draft` for issue `key` and return the operator's decision.
    async fn decide(&self, key: &str, draft: &str) -> NotesResult<ApprovalDecision>;
}

/// Reads decisions interactively from the terminal.
///
/// Anything other than a single Y, N, S or E is rejected and the question is
/// asked again. When stdin is not a terminal, answers are read line by line so
/// a run can be scripted (`printf 'Y\nE\n' | release-notes PROJ-2`).
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalDecisionSource;

impl TerminalDecisionSource {
    fn prompt() -> NotesResult<ApprovalDecision> {
        let stdin = io::stdin();
        if !stdin.is_terminal() {
            return read_decision(&mut stdin.lock(), &mut io::stdout().lock());
        }

        let answer: String = Input::with_theme(&ColorfulTheme::default())
            .with_prompt(DECISION_PROMPT)
            .validate_with(|input: &String| input.parse::<ApprovalDecision>().map(|_| ()))
            .interact_text()
            .map_err(|e| NotesError::Prompt {
                reason: e.to_string(),
            })?;

        answer.parse()
    }
}

fn io_error(e: &io::Error) -> NotesError {
    NotesError::Prompt {
        reason: e.to_string(),
    }
}

/// Ask for a decision on `output` and read answers from `input` until one parses.
///
/// End of input is treated as a request to exit, so nothing is written for
/// stories that were never answered.
fn read_decision<R, W>(input: &mut R, output: &mut W) -> NotesResult<ApprovalDecision>
where
    R: BufRead,
    W: Write,
{
    loop {
        write!(output, "{DECISION_PROMPT}: ").map_err(|e| io_error(&e))?;
        output.flush().map_err(|e| io_error(&e))?;

        let mut line = String::new();
        if input.read_line(&mut line).map_err(|e| io_error(&e))? == 0 {
            writeln!(output).map_err(|e| io_error(&e))?;
            warn!("Decision input closed, stopping the run");
            return Ok(ApprovalDecision::ExitRequested);
        }

        match line.trim_end_matches(['\r', '\n']).parse::<ApprovalDecision>() {
            Ok(decision) => return Ok(decision),
            Err(e) => writeln!(output, "{} {e}", "✗".red().bold()).map_err(|e| io_error(&e))?,
        }
    }
}

#[async_trait]
impl DecisionSource for TerminalDecisionSource {
    async fn decide(&self, _key: &str, draft: &str) -> NotesResult<ApprovalDecision> {
        super::display_draft(draft);

        tokio::task::spawn_blocking(Self::prompt)
            .await
            .map_err(|e| NotesError::Prompt {
                reason: e.to_string(),
            })?
    }
}
