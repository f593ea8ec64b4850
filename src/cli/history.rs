//! `infogen history` command implementation.

use crate::cli::open_store;
use crate::config::load_config;
use crate::error::{Error, Result};
use crate::history::HistoryStore;
use chrono::{DateTime, Local, TimeDelta, Utc};

/// Default number of records to show.
const DEFAULT_LIMIT: usize = 20;

/// Maximum length for prompt preview.
const PROMPT_PREVIEW_LEN: usize = 50;

/// List recent generations, newest first.
///
/// # Errors
///
/// Returns an error if the history cannot be read.
pub fn list(limit: Option<usize>) -> Result<()> {
    let config = load_config()?;
    let store = open_store(&config)?;
    let limit = limit.unwrap_or(DEFAULT_LIMIT);

    let records = store.list()?;

    if records.is_empty() {
        println!("No history yet.");
        println!("\nHistory is stored in: {}", store.path().display());
        return Ok(());
    }

    println!("{:<38} {:<16} Prompt", "ID", "When");
    println!("{}", "─".repeat(90));

    let now = Utc::now();
    for record in records.iter().take(limit) {
        let when = format_relative(record.created_at(), now);
        let prompt = format_prompt_preview(&record.prompt);

        println!("{:<38} {:<16} {}", record.id, when, prompt);
    }

    println!("{}", "─".repeat(90));
    println!(
        "Showing {} of {} record(s)",
        records.len().min(limit),
        records.len()
    );

    Ok(())
}

/// Print one record in full.
///
/// # Errors
///
/// Returns [`Error::HistoryNotFound`] if no record has this id.
pub fn show(id: &str) -> Result<()> {
    let config = load_config()?;
    let store = open_store(&config)?;

    let record = store
        .get(id)?
        .ok_or_else(|| Error::HistoryNotFound(id.to_string()))?;

    let created: DateTime<Local> = record.created_at().into();
    println!("ID:      {}", record.id);
    println!("Created: {}", created.format("%Y-%m-%d %H:%M:%S"));
    println!("\nPrompt:\n{}", record.prompt);
    println!("\nReply:\n{}", record.content);

    Ok(())
}

/// Delete one record. Unknown ids are reported but not an error.
///
/// # Errors
///
/// Returns an error if the history cannot be written.
pub fn delete(id: &str) -> Result<()> {
    let config = load_config()?;
    let store = open_store(&config)?;

    if store.delete(id)? {
        println!("Deleted {id}");
    } else {
        println!("No record with id {id}");
    }
    Ok(())
}

/// Remove every record.
///
/// # Errors
///
/// Returns an error if the history cannot be written.
pub fn clear() -> Result<()> {
    let config = load_config()?;
    let store = open_store(&config)?;

    let count = store.list()?.len();
    store.clear()?;
    println!("Cleared {count} record(s)");
    Ok(())
}

/// Human-readable age of `then` relative to `now`.
fn format_relative(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let age = now.signed_duration_since(then).max(TimeDelta::zero());

    let minutes = age.num_minutes();
    let hours = age.num_hours();
    let days = age.num_days();

    if minutes < 1 {
        "just now".to_string()
    } else if minutes < 60 {
        format!("{minutes} minute{} ago", plural(minutes))
    } else if hours < 24 {
        format!("{hours} hour{} ago", plural(hours))
    } else if days < 7 {
        format!("{days} day{} ago", plural(days))
    } else {
        let local: DateTime<Local> = then.into();
        local.format("%b %-d").to_string()
    }
}

fn plural(n: i64) -> &'static str {
    if n == 1 { "" } else { "s" }
}

/// Format prompt preview, truncating if needed.
fn format_prompt_preview(prompt: &str) -> String {
    // Take first line only
    let first_line = prompt.lines().next().unwrap_or(prompt);
    if first_line.chars().count() > PROMPT_PREVIEW_LEN {
        let cut: String = first_line.chars().take(PROMPT_PREVIEW_LEN).collect();
        format!("{cut}...")
    } else {
        first_line.to_string()
    }
}
