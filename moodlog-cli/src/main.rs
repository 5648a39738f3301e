//! moodlog - command-line client for the moodlog journal HTTP API
//!
//! # Subcommands
//! - `add <content>`                   - create an entry, print its id and sentiment
//! - `list [--json]`                   - list all entries
//! - `show <id> [--json]`              - print one entry
//! - `delete <id>`                     - delete one entry
//! - `transcribe <wav-file> [--save]`  - speech-to-text, optionally saving the text as an entry
//! - `status`                          - show server health

use std::path::Path;
use std::time::Duration;

use anyhow::{anyhow, Context};
use clap::{Parser, Subcommand};
use reqwest::blocking::{multipart, Client, Response};
use serde::{Deserialize, Serialize};

const DEFAULT_SERVER: &str = "http://127.0.0.1:5000";

/// Sentiment magnitude below which an entry is shown as neutral.
const NEUTRAL_BAND: f64 = 0.1;

const PREVIEW_CHARS: usize = 60;

// ============================================================================
// CLI Definition
// ============================================================================

#[derive(Debug, Parser)]
#[command(name = "moodlog", version, about = "moodlog journal client")]
struct Cli {
    /// Journal HTTP server URL (overrides MOODLOG_HTTP_URL env var)
    #[arg(long, env = "MOODLOG_HTTP_URL", default_value = DEFAULT_SERVER)]
    server: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Write a new journal entry
    Add {
        /// Entry text
        content: String,
    },

    /// List all entries, oldest first
    List {
        /// Print the raw JSON array
        #[arg(long)]
        json: bool,
    },

    /// Show one entry
    Show {
        id: i64,

        /// Print the raw JSON object
        #[arg(long)]
        json: bool,
    },

    /// Delete one entry
    Delete { id: i64 },

    /// Transcribe a WAV recording
    Transcribe {
        /// Path to the WAV file
        file: String,

        /// Save the transcription as a new entry
        #[arg(long)]
        save: bool,
    },

    /// Show server status
    Status,
}

// ============================================================================
// API Response Types
// ============================================================================

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Entry {
    pub id: i64,
    pub content: String,
    pub timestamp: String,
    pub sentiment: f64,
}

#[derive(Debug, Deserialize)]
pub struct CreatedEntry {
    pub id: i64,
    pub sentiment: f64,
}

#[derive(Debug, Deserialize)]
pub struct Transcription {
    pub transcription: String,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: String,
}

// ============================================================================
// Formatting
// ============================================================================

pub fn mood_label(sentiment: f64) -> &'static str {
    if sentiment >= NEUTRAL_BAND {
        "positive"
    } else if sentiment <= -NEUTRAL_BAND {
        "negative"
    } else {
        "neutral"
    }
}

/// First non-empty line of `content`, capped at `max` characters.
pub fn preview(content: &str, max: usize) -> String {
    let line = content.lines().find(|l| !l.trim().is_empty()).unwrap_or("").trim();
    if line.chars().count() <= max {
        return line.to_string();
    }
    let mut cut: String = line.chars().take(max.saturating_sub(1)).collect();
    cut.push('…');
    cut
}

/// One-line summary used by `list`.
pub fn format_entry_line(entry: &Entry) -> String {
    format!(
        "#{:<5} {}  {:>+.2} {:<8}  {}",
        entry.id,
        entry.timestamp,
        entry.sentiment,
        mood_label(entry.sentiment),
        preview(&entry.content, PREVIEW_CHARS)
    )
}

// ============================================================================
// HTTP Client Calls
// ============================================================================

fn client(timeout_secs: u64) -> anyhow::Result<Client> {
    Ok(Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()?)
}

/// Turn a non-2xx response into an error carrying the server's message.
fn check(resp: Response) -> anyhow::Result<Response> {
    if resp.status().is_success() {
        return Ok(resp);
    }
    let status = resp.status();
    let text = resp.text().unwrap_or_default();
    let message = serde_json::from_str::<ApiErrorBody>(&text)
        .map(|b| b.error)
        .unwrap_or(text);
    Err(anyhow!("server returned {}: {}", status, message))
}

fn create_entry(server: &str, content: &str) -> anyhow::Result<CreatedEntry> {
    let url = format!("{}/entries", server);
    let resp = client(10)?
        .post(&url)
        .json(&serde_json::json!({ "content": content }))
        .send()
        .with_context(|| format!("connection failed to {}", url))?;
    Ok(check(resp)?.json()?)
}

fn do_add(server: &str, content: &str) -> anyhow::Result<()> {
    let created = create_entry(server, content)?;
    println!(
        "Saved entry #{} (sentiment {:+.2}, {})",
        created.id,
        created.sentiment,
        mood_label(created.sentiment)
    );
    Ok(())
}

fn do_list(server: &str, json_output: bool) -> anyhow::Result<()> {
    let url = format!("{}/entries", server);
    let resp = client(10)?
        .get(&url)
        .send()
        .with_context(|| format!("connection failed to {}", url))?;
    let entries: Vec<Entry> = check(resp)?.json()?;

    if json_output {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    if entries.is_empty() {
        eprintln!("No entries yet.");
        return Ok(());
    }
    for entry in &entries {
        println!("{}", format_entry_line(entry));
    }
    Ok(())
}

fn do_show(server: &str, id: i64, json_output: bool) -> anyhow::Result<()> {
    let url = format!("{}/entries/{}", server, id);
    let resp = client(10)?
        .get(&url)
        .send()
        .with_context(|| format!("connection failed to {}", url))?;
    let entry: Entry = check(resp)?.json()?;

    if json_output {
        println!("{}", serde_json::to_string_pretty(&entry)?);
    } else {
        println!("Entry #{}", entry.id);
        println!("Written:   {}", entry.timestamp);
        println!("Sentiment: {:+.2} ({})\n", entry.sentiment, mood_label(entry.sentiment));
        println!("{}", entry.content);
    }
    Ok(())
}

fn do_delete(server: &str, id: i64) -> anyhow::Result<()> {
    let url = format!("{}/entries/{}", server, id);
    let resp = client(10)?
        .delete(&url)
        .send()
        .with_context(|| format!("connection failed to {}", url))?;
    check(resp)?;
    println!("Deleted entry #{}", id);
    Ok(())
}

fn do_transcribe(server: &str, file: &str, save: bool) -> anyhow::Result<()> {
    let path = Path::new(file);
    let form = multipart::Form::new()
        .file("audio", path)
        .with_context(|| format!("cannot read {}", path.display()))?;

    let url = format!("{}/transcribe", server);
    let resp = client(120)?
        .post(&url)
        .multipart(form)
        .send()
        .with_context(|| format!("connection failed to {}", url))?;
    let result: Transcription = check(resp)?.json()?;

    println!("{}", result.transcription);

    if save {
        let created = create_entry(server, &result.transcription)?;
        eprintln!(
            "Saved entry #{} (sentiment {:+.2}, {})",
            created.id,
            created.sentiment,
            mood_label(created.sentiment)
        );
    }
    Ok(())
}

/// Show the server status by calling GET /health.
fn do_status(server: &str) -> anyhow::Result<()> {
    let url = format!("{}/health", server);
    let resp = client(10)?
        .get(&url)
        .send()
        .with_context(|| format!("cannot reach {}", url))?;

    if !resp.status().is_success() {
        return Err(anyhow!("server unhealthy (HTTP {})", resp.status()));
    }

    let body: serde_json::Value = resp.json().unwrap_or_default();
    println!("moodlog server: {}", body["status"].as_str().unwrap_or("unknown"));
    println!("Version:        {}", body["version"].as_str().unwrap_or("?"));
    println!("SQLite:         {}", body["sqlite"].as_str().unwrap_or("?"));
    match body["entries"].as_i64() {
        Some(n) => println!("Entries:        {}", n),
        None => println!("Entries:        ?"),
    }
    Ok(())
}

// ============================================================================
// Main
// ============================================================================

fn main() {
    let cli = Cli::parse();
    let server = cli.server.trim_end_matches('/').to_string();

    let result = match cli.command {
        Commands::Add { content } => do_add(&server, &content),
        Commands::List { json } => do_list(&server, json),
        Commands::Show { id, json } => do_show(&server, id, json),
        Commands::Delete { id } => do_delete(&server, id),
        Commands::Transcribe { file, save } => do_transcribe(&server, &file, save),
        Commands::Status => do_status(&server),
    };

    if let Err(e) = result {
        eprintln!("moodlog: {:#}", e);
        std::process::exit(1);
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: i64, content: &str, sentiment: f64) -> Entry {
        Entry {
            id,
            content: content.to_string(),
            timestamp: "2026-10-19 08:30:00".to_string(),
            sentiment,
        }
    }

    // ========================================================================
    // TEST 1: mood label bands
    // ========================================================================
    #[test]
    fn test_mood_label_bands() {
        assert_eq!(mood_label(0.8), "positive");
        assert_eq!(mood_label(0.1), "positive");
        assert_eq!(mood_label(0.05), "neutral");
        assert_eq!(mood_label(0.0), "neutral");
        assert_eq!(mood_label(-0.1), "negative");
        assert_eq!(mood_label(-1.0), "negative");
    }

    // ========================================================================
    // TEST 2: preview uses the first non-empty line
    // ========================================================================
    #[test]
    fn test_preview_first_nonempty_line() {
        assert_eq!(preview("\n\n  Morning run  \nthen coffee", 60), "Morning run");
        assert_eq!(preview("", 60), "");
    }

    // ========================================================================
    // TEST 3: preview truncates on characters, not bytes
    // ========================================================================
    #[test]
    fn test_preview_truncation_is_char_safe() {
        let long = "é".repeat(100);
        let p = preview(&long, 10);
        assert_eq!(p.chars().count(), 10);
        assert!(p.ends_with('…'));
    }

    // ========================================================================
    // TEST 4: list line carries id, timestamp, signed score and label
    // ========================================================================
    #[test]
    fn test_format_entry_line() {
        let line = format_entry_line(&entry(12, "I had a wonderful day", 1.0));
        assert!(line.starts_with("#12"));
        assert!(line.contains("2026-10-19 08:30:00"));
        assert!(line.contains("+1.00"));
        assert!(line.contains("positive"));
        assert!(line.ends_with("I had a wonderful day"));

        let line = format_entry_line(&entry(3, "awful", -1.0));
        assert!(line.contains("-1.00"));
        assert!(line.contains("negative"));
    }

    // ========================================================================
    // TEST 5: server JSON shapes deserialize
    // ========================================================================
    #[test]
    fn test_api_payloads_deserialize() {
        let created: CreatedEntry = serde_json::from_str(
            r#"{"message":"Entry created successfully","id":4,"sentiment":0.35}"#,
        )
        .unwrap();
        assert_eq!(created.id, 4);

        let entries: Vec<Entry> = serde_json::from_str(
            r#"[{"id":1,"content":"a","timestamp":"2026-10-19 08:30:00","sentiment":0.0}]"#,
        )
        .unwrap();
        assert_eq!(entries.len(), 1);

        let err: ApiErrorBody =
            serde_json::from_str(r#"{"error":"Entry not found","status":"error"}"#).unwrap();
        assert_eq!(err.error, "Entry not found");
    }
}
