//! Per-file processing and output rendering.

use anyhow::{Context, Result};
use serde::Serialize;
use std::io::Write;
use std::path::Path;
use stockledger_engine::Engine;
use tracing::{debug, warn};

/// The outcome of replaying one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileReport {
    /// Path of the processed file.
    pub file: String,
    /// Output lines produced by `CHECK` and `PROFIT`.
    pub lines: Vec<String>,
    /// Whether the ledger ended up invalidated.
    pub invalid: bool,
    /// Why the ledger was invalidated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// JSON output structure for a whole run.
#[derive(Debug, Serialize)]
pub struct JsonOutput {
    /// One entry per processed file, in order.
    pub files: Vec<FileReport>,
}

/// Replay already-loaded log text through a fresh ledger.
#[must_use]
pub fn process_source(file: &str, content: &str) -> FileReport {
    let mut engine = Engine::new();
    let lines = engine.run_lines(log_lines(content));
    let ledger = engine.into_ledger();

    if let Some(reason) = ledger.invalidation() {
        warn!(file, reason, "ledger invalidated");
    } else {
        debug!(file, items = ledger.len(), profit = %ledger.profit(), "processed");
    }

    FileReport {
        file: file.to_string(),
        lines,
        invalid: ledger.is_invalid(),
        reason: ledger.invalidation().map(str::to_string),
    }
}

/// Split log text on `\n`, `\r\n` or a lone `\r`.
fn log_lines(content: &str) -> impl Iterator<Item = &str> {
    content.lines().flat_map(|line| line.split('\r'))
}

/// Read a log file and replay it through a fresh ledger.
pub fn process_file(path: &Path) -> Result<FileReport> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    Ok(process_source(&path.display().to_string(), &content))
}

/// Write one file's lines as text, preceded by a blank separator line
/// unless it is the first block.
pub fn write_text_block<W: Write>(out: &mut W, report: &FileReport, first: bool) -> Result<()> {
    if !first {
        writeln!(out)?;
    }
    for line in &report.lines {
        writeln!(out, "{line}")?;
    }
    Ok(())
}

/// Write every report as a single JSON document.
pub fn write_json<W: Write>(out: &mut W, reports: Vec<FileReport>) -> Result<()> {
    let output = JsonOutput { files: reports };
    serde_json::to_writer_pretty(&mut *out, &output)?;
    writeln!(out)?;
    Ok(())
}
