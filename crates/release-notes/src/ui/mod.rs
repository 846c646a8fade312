//! Terminal UI helpers for the release-notes run.
//!
//! This module uses println! for CLI output, which is appropriate
//! for terminal user interfaces.

#![allow(clippy::disallowed_macros)]

use std::time::Duration;

use colored::Colorize;
use comfy_table::{Cell, Color, ContentArrangement, Table};
use indicatif::{ProgressBar, ProgressStyle};

use crate::entities::StorySummary;

mod decision;

pub use decision::{DecisionSource, TerminalDecisionSource, DECISION_PROMPT};

/// Create a table listing an Epic's open stories
pub fn story_table(stories: &[StorySummary]) -> Table {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("#").fg(Color::Cyan),
        Cell::new("Key").fg(Color::Cyan),
        Cell::new("Summary").fg(Color::Cyan),
        Cell::new("Status").fg(Color::Cyan),
    ]);

    for (index, story) in stories.iter().enumerate() {
        table.add_row(vec![
            Cell::new(index + 1),
            Cell::new(&story.key),
            Cell::new(&story.summary),
            Cell::new(&story.status).fg(Color::Yellow),
        ]);
    }

    table
}

/// Print the story table after a blank line
pub fn print_story_table(stories: &[StorySummary]) {
    println!();
    println!("{}", story_table(stories));
}

/// Display a drafted release note between rulers
pub fn display_draft(draft: &str) {
    println!();
    println!("{}", "Generated Release Notes:".bold());
    println!("{}", "─".repeat(60).dimmed());
    println!("{draft}");
    println!("{}", "─".repeat(60).dimmed());
}

/// Header line printed before an issue is processed
pub fn print_processing(key: &str) {
    println!();
    println!("{} {}", "Processing story:".cyan().bold(), key.cyan());
}

/// Header line for the i-th story of an Epic
pub fn print_story_progress(position: usize, total: usize, story: &StorySummary) {
    println!();
    println!(
        "{} {}: {}",
        format!("[{position}/{total}] Processing:").bold(),
        story.key.cyan(),
        story.summary
    );
}

/// Spinner shown while a draft is generated
pub fn draft_spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

/// Print success message
pub fn print_success(message: &str) {
    println!("{} {}", "✓".green().bold(), message);
}

/// Print error message
pub fn print_error(message: &str) {
    println!("{} {}", "✗".red().bold(), message);
}

/// Print info message
pub fn print_info(message: &str) {
    println!("{} {}", "ℹ".blue().bold(), message);
}

/// Print warning message
pub fn print_warning(message: &str) {
    println!("{} {}", "⚠".yellow().bold(), message);
}
