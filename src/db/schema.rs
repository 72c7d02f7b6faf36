//! SQLite schema initialization for the etymology database.
//!
//! Five static tables: the three EtymDB relations (`words`, `links`,
//! `sequences`) plus two reference tables (`language_families`,
//! `definitions`). All are written once at ingestion and read-only at
//! request time.

use rusqlite::Connection;

// ---------------------------------------------------------------------------
// DDL constants — kept as separate strings so each statement can be executed
// individually, which makes error reporting clearer than one big batch.
// ---------------------------------------------------------------------------

// `lexeme_lc` is the Unicode-lowercased spelling, written by the insert
// path. SQLite's lower() only folds ASCII, so every case-insensitive
// lookup goes through this column instead.
const CREATE_WORDS: &str = "\
CREATE TABLE IF NOT EXISTS words (
  word_ix INTEGER PRIMARY KEY,
  lang TEXT NOT NULL,
  lexeme TEXT NOT NULL,
  lexeme_lc TEXT NOT NULL,
  sense TEXT
)";

const CREATE_LINKS: &str = "\
CREATE TABLE IF NOT EXISTS links (
  id INTEGER PRIMARY KEY AUTOINCREMENT,
  type TEXT NOT NULL,
  source INTEGER NOT NULL,
  target INTEGER NOT NULL
)";

// A negative `links.target` refers to a seq_ix here; positions are dense
// from 0 within each sequence.
const CREATE_SEQUENCES: &str = "\
CREATE TABLE IF NOT EXISTS sequences (
  seq_ix INTEGER NOT NULL,
  position INTEGER NOT NULL,
  parent INTEGER NOT NULL,
  PRIMARY KEY (seq_ix, position)
)";

const CREATE_LANGUAGE_FAMILIES: &str = "\
CREATE TABLE IF NOT EXISTS language_families (
  lang_code TEXT PRIMARY KEY,
  lang_name TEXT NOT NULL,
  family TEXT,
  branch TEXT
)";

// Keyed by lowercased lexeme; populated by the out-of-band enrichment job.
const CREATE_DEFINITIONS: &str = "\
CREATE TABLE IF NOT EXISTS definitions (
  lexeme TEXT PRIMARY KEY,
  definition TEXT NOT NULL,
  part_of_speech TEXT,
  phonetic TEXT
)";

// Indexes ----------------------------------------------------------------

const CREATE_INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS idx_words_lexeme_lc ON words(lexeme_lc)",
    "CREATE INDEX IF NOT EXISTS idx_words_lang ON words(lang)",
    "CREATE INDEX IF NOT EXISTS idx_links_source ON links(source)",
    "CREATE INDEX IF NOT EXISTS idx_links_target ON links(target)",
];

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Open (or create) the SQLite database at `db_path` and apply the full
/// schema.
///
/// The returned connection has WAL mode and synchronous NORMAL configured.
/// Foreign keys stay off: link targets legitimately dangle (broken source
/// data is skipped at traversal time, not rejected at load time).
///
/// # Errors
///
/// Returns a `rusqlite::Error` if the database cannot be opened or any DDL
/// statement fails.
pub fn initialize_database(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;

    // -- Pragmas ----------------------------------------------------------
    conn.pragma_update(None, "journal_mode", "WAL")?;
    conn.pragma_update(None, "foreign_keys", "OFF")?;
    conn.pragma_update(None, "synchronous", "NORMAL")?;

    // -- Core tables ------------------------------------------------------
    conn.execute_batch(CREATE_WORDS)?;
    conn.execute_batch(CREATE_LINKS)?;
    conn.execute_batch(CREATE_SEQUENCES)?;
    conn.execute_batch(CREATE_LANGUAGE_FAMILIES)?;
    conn.execute_batch(CREATE_DEFINITIONS)?;

    // -- Indexes ----------------------------------------------------------
    for ddl in CREATE_INDEXES {
        conn.execute_batch(ddl)?;
    }

    Ok(conn)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
