//! One-shot loaders for the raw EtymDB dumps.
//!
//! The dumps are tab-separated with no header row. `etymdb_links_index`
//! has variable-length rows (one sequence id followed by its constituent
//! parents), which is why these are hand-parsed line by line instead of
//! going through a rectangular reader.
//!
//! Rows with too few fields are skipped and counted; a well-shaped row with
//! an unparsable id means a corrupt dump and fails the load.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use serde::Deserialize;
use tracing::{info, warn};

use crate::error::{EtymographError, Result};
use crate::graph::store::LexiconStore;
use crate::types::{Definition, LanguageInfo, LinkTarget, Word};

/// Per-file load summary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub loaded: usize,
    pub skipped: usize,
}

fn parse_id(path: &Path, line_no: usize, field: &str) -> Result<i64> {
    field
        .trim()
        .parse::<i64>()
        .map_err(|_| EtymographError::Ingest {
            path: path.to_path_buf(),
            line: line_no,
            message: format!("expected integer id, got {field:?}"),
        })
}

/// Load `etymdb_values`: `word_ix \t lang \t lexeme \t sense?`.
///
/// A missing or empty fourth field stores a NULL sense.
pub fn load_words(store: &LexiconStore, path: &Path) -> Result<LoadReport> {
    let tx = store.conn.unchecked_transaction()?;
    let mut report = LoadReport::default();

    for (idx, line) in BufReader::new(File::open(path)?).lines().enumerate() {
        let line = line?;
        let parts: Vec<&str> = line.split('\t').collect();
        if parts.len() < 3 || parts[0].trim().is_empty() {
            report.skipped += 1;
            continue;
        }
        let word = Word {
            id: parse_id(path, idx + 1, parts[0])?,
            lang: parts[1].trim().to_string(),
            lexeme: parts[2].trim().to_string(),
            sense: parts
                .get(3)
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .map(String::from),
        };
        if word.lang.is_empty() || word.lexeme.is_empty() {
            report.skipped += 1;
            continue;
        }
        store.insert_word(&word)?;
        report.loaded += 1;
    }

    tx.commit()?;
    log_report("words", path, report);
    Ok(report)
}

/// Load `etymdb_links_info`: `type \t source \t target`.
pub fn load_links(store: &LexiconStore, path: &Path) -> Result<LoadReport> {
    let tx = store.conn.unchecked_transaction()?;
    let mut report = LoadReport::default();

    for (idx, line) in BufReader::new(File::open(path)?).lines().enumerate() {
        let line = line?;
        let parts: Vec<&str> = line.split('\t').collect();
        if parts.len() < 3 || parts[0].trim().is_empty() {
            report.skipped += 1;
            continue;
        }
        let source = parse_id(path, idx + 1, parts[1])?;
        let target = parse_id(path, idx + 1, parts[2])?;
        store.insert_link(source, LinkTarget::from_raw(target), parts[0].trim())?;
        report.loaded += 1;
    }

    tx.commit()?;
    log_report("links", path, report);
    Ok(report)
}

/// Load `etymdb_links_index`: variable-length rows `seq_ix \t parent...`.
///
/// Positions are assigned densely from 0 in file order; empty trailing
/// fields are ignored.
pub fn load_sequences(store: &LexiconStore, path: &Path) -> Result<LoadReport> {
    let tx = store.conn.unchecked_transaction()?;
    let mut report = LoadReport::default();

    for (idx, line) in BufReader::new(File::open(path)?).lines().enumerate() {
        let line = line?;
        let parts: Vec<&str> = line.split('\t').collect();
        if parts.len() < 2 || parts[0].trim().is_empty() {
            report.skipped += 1;
            continue;
        }
        let seq_ix = parse_id(path, idx + 1, parts[0])?;
        let mut position: u32 = 0;
        for field in &parts[1..] {
            if field.trim().is_empty() {
                continue;
            }
            let parent = parse_id(path, idx + 1, field)?;
            store.insert_sequence_member(seq_ix, position, parent)?;
            position += 1;
        }
        report.loaded += 1;
    }

    tx.commit()?;
    log_report("sequences", path, report);
    Ok(report)
}

/// Entry shape of the language-codes reference file.
#[derive(Debug, Deserialize)]
struct LanguageCodeEntry {
    code: String,
    name: String,
    #[serde(default)]
    family: Option<String>,
    #[serde(default)]
    branch: Option<String>,
}

/// Load the language-codes JSON array into `language_families`.
pub fn load_language_codes(store: &LexiconStore, path: &Path) -> Result<LoadReport> {
    let entries: Vec<LanguageCodeEntry> = serde_json::from_reader(BufReader::new(File::open(path)?))?;

    let tx = store.conn.unchecked_transaction()?;
    let mut report = LoadReport::default();
    for entry in entries {
        store.insert_language(
            &entry.code,
            &LanguageInfo {
                name: entry.name,
                family: entry.family,
                branch: entry.branch,
            },
        )?;
        report.loaded += 1;
    }
    tx.commit()?;

    log_report("language codes", path, report);
    Ok(report)
}

/// Load pre-enriched definitions:
/// `lexeme \t definition \t part_of_speech? \t phonetic?`.
pub fn load_definitions(store: &LexiconStore, path: &Path) -> Result<LoadReport> {
    let tx = store.conn.unchecked_transaction()?;
    let mut report = LoadReport::default();

    for line in BufReader::new(File::open(path)?).lines() {
        let line = line?;
        let parts: Vec<&str> = line.split('\t').collect();
        if parts.len() < 2 || parts[0].trim().is_empty() || parts[1].trim().is_empty() {
            report.skipped += 1;
            continue;
        }
        let non_empty = |s: Option<&&str>| {
            s.map(|v| v.trim())
                .filter(|v| !v.is_empty())
                .map(String::from)
        };
        store.insert_definition(
            parts[0].trim(),
            &Definition {
                definition: parts[1].trim().to_string(),
                part_of_speech: non_empty(parts.get(2)),
                phonetic: non_empty(parts.get(3)),
            },
        )?;
        report.loaded += 1;
    }

    tx.commit()?;
    log_report("definitions", path, report);
    Ok(report)
}

fn log_report(what: &str, path: &Path, report: LoadReport) {
    if report.skipped > 0 {
        warn!(
            path = %path.display(),
            skipped = report.skipped,
            "skipped malformed {what} rows"
        );
    }
    info!(path = %path.display(), loaded = report.loaded, "loaded {what}");
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
