//! release-notes CLI - draft and approve Jira release notes.

#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;

use release_notes::ai::{AIProvider, OpenAIProvider};
use release_notes::config::Config;
use release_notes::domain::{ApprovalWorkflow, NoteDrafter, RunController};
use release_notes::tracker::JiraClient;
use release_notes::ui::{self, TerminalDecisionSource};

#[derive(Parser)]
#[command(name = "release-notes")]
#[command(about = "Draft release notes for a Jira Epic or Story and write approved notes back", long_about = None)]
#[command(version)]
struct Cli {
    /// Jira issue key of an Epic, Story or User Story (e.g. PROJ-123)
    #[arg(value_parser = clap::builder::NonEmptyStringValueParser::new())]
    issue_key: String,
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::debug!(?config, "Loaded configuration");

    let tracker = Arc::new(
        JiraClient::new(&config.jira, config.http_timeout).context("Failed to create Jira client")?,
    );
    let provider = Arc::new(
        OpenAIProvider::new(&config.openai, config.http_timeout)
            .context("Failed to create OpenAI client")?,
    );
    if !provider.is_configured() {
        ui::print_warning("OPENAI_API_KEY is not set; drafting will fail for every story.");
    }

    let workflow = ApprovalWorkflow::new(
        tracker.clone(),
        NoteDrafter::new(provider, config.openai.model.clone()),
        Arc::new(TerminalDecisionSource),
        config.jira.release_notes_field.clone(),
    );

    let report = RunController::new(tracker, workflow)
        .run(cli.issue_key.trim())
        .await?;
    tracing::info!(?report, "Run finished");

    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            ui::print_error(&format!("{e:#}"));
            ExitCode::FAILURE
        }
    }
}
