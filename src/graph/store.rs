//! SQLite query layer over the static etymology tables.
//!
//! Read-only at request time; the insert helpers at the bottom exist for
//! ingestion and tests. Every query goes through
//! [`rusqlite::Connection::prepare_cached`], so the first call compiles the
//! statement and subsequent calls reuse it from the connection's cache.

use std::collections::HashMap;

use rusqlite::{params, Connection, OptionalExtension};

use crate::db::converters::{row_to_definition, row_to_language_info, row_to_link, row_to_word};
use crate::db::schema::initialize_database;
use crate::error::Result;
use crate::types::{Definition, LanguageInfo, Link, LinkTarget, SearchHit, SeqId, Word, WordId};

// ---------------------------------------------------------------------------
// LexiconStats
// ---------------------------------------------------------------------------

/// Aggregate row counts, mostly for post-ingest sanity logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LexiconStats {
    pub words: usize,
    pub links: usize,
    pub sequence_rows: usize,
    pub languages: usize,
    pub definitions: usize,
}

// ---------------------------------------------------------------------------
// SQL constants
// ---------------------------------------------------------------------------

// Starting-word resolution: prefer the primary language, then the entry with
// the most outgoing links (richer etymology), then the lowest word_ix so the
// result is deterministic. Matches against the Unicode-lowercased column,
// with the query side lowercased in Rust.
const RESOLVE_START_SQL: &str = "\
SELECT w.word_ix
FROM words w
LEFT JOIN links l ON l.source = w.word_ix
WHERE w.lexeme_lc = ?1
GROUP BY w.word_ix
ORDER BY CASE WHEN w.lang = ?2 THEN 0 ELSE 1 END,
         COUNT(l.target) DESC,
         w.word_ix
LIMIT 1";

const WORD_BY_ID_SQL: &str = "\
SELECT word_ix, lang, lexeme, sense FROM words WHERE word_ix = ?1";

const LINKS_FROM_SQL: &str = "\
SELECT type, source, target FROM links WHERE source = ?1 ORDER BY id";

const SEQUENCE_MEMBERS_SQL: &str = "\
SELECT parent FROM sequences WHERE seq_ix = ?1 ORDER BY position";

const LANGUAGE_FAMILIES_SQL: &str = "\
SELECT lang_code, lang_name, family, branch FROM language_families";

// Autocomplete over curated primary-language words: entries with at least one
// outgoing link, single-token, not capitalized (phrases and proper nouns have
// near-useless ancestry in the raw data). Deduplicated per lexeme keeping the
// entry with the most links; exact match first, then shorter lexemes.
// ?2 is the LIKE-escaped, Rust-lowercased prefix pattern; ?3 the plain
// lowercased query for exact-match ranking.
const SEARCH_WORDS_SQL: &str = "\
WITH word_links AS (
    SELECT w.word_ix, w.lexeme, w.lexeme_lc, w.sense, COUNT(l.target) AS ancestors
    FROM words w
    JOIN links l ON l.source = w.word_ix
    WHERE w.lang = ?1
      AND w.lexeme NOT LIKE '% %'
      AND substr(w.lexeme, 1, 1) = substr(w.lexeme_lc, 1, 1)
      AND w.lexeme_lc LIKE ?2 ESCAPE '\\'
    GROUP BY w.word_ix, w.lexeme, w.lexeme_lc, w.sense
),
best_per_lexeme AS (
    SELECT lexeme, lexeme_lc, sense, ancestors,
           ROW_NUMBER() OVER (
               PARTITION BY lexeme_lc
               ORDER BY ancestors DESC, word_ix
           ) AS rn
    FROM word_links
)
SELECT lexeme, sense, ancestors
FROM best_per_lexeme
WHERE rn = 1
ORDER BY
    CASE WHEN lexeme_lc = ?3 THEN 0 ELSE 1 END,
    length(lexeme),
    lexeme
LIMIT ?4";

const RANDOM_WORD_SQL: &str = "\
SELECT w.lexeme
FROM words w
WHERE w.lang = ?1
  AND w.lexeme NOT LIKE '% %'
  AND substr(w.lexeme, 1, 1) = substr(w.lexeme_lc, 1, 1)
  AND EXISTS (SELECT 1 FROM links l WHERE l.source = w.word_ix)
ORDER BY random()
LIMIT 1";

/// Escape LIKE wildcards so a user query matches literally.
fn escape_like(query: &str) -> String {
    let mut out = String::with_capacity(query.len());
    for ch in query.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

// ---------------------------------------------------------------------------
// LexiconStore
// ---------------------------------------------------------------------------

/// Typed query wrapper around the etymology SQLite database.
pub struct LexiconStore {
    pub conn: Connection,
}

impl std::fmt::Debug for LexiconStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LexiconStore").finish_non_exhaustive()
    }
}

impl LexiconStore {
    /// Open (or create) the database at `db_path` and apply the schema.
    pub fn open(db_path: &str) -> Result<Self> {
        let conn = initialize_database(db_path)?;
        Ok(Self { conn })
    }

    /// In-memory store with the schema applied. Used by tests and fixtures.
    pub fn in_memory() -> Result<Self> {
        Self::open(":memory:")
    }

    /// Wrap an already-open connection.
    pub fn from_connection(conn: Connection) -> Self {
        Self { conn }
    }

    // -------------------------------------------------------------------
    // Word lookups
    // -------------------------------------------------------------------

    /// Fetch a single word by id. `None` for dangling references.
    pub fn word(&self, id: WordId) -> Result<Option<Word>> {
        let mut stmt = self.conn.prepare_cached(WORD_BY_ID_SQL)?;
        Ok(stmt.query_row(params![id], row_to_word).optional()?)
    }

    /// Batch-fetch words by id. Ids with no row are silently absent from the
    /// result — callers treat them as dangling and drop the branch.
    pub fn words_by_ids(&self, ids: &[WordId]) -> Result<HashMap<WordId, Word>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let placeholders: String = ids.iter().map(|_| "?").collect::<Vec<_>>().join(",");
        let sql = format!(
            "SELECT word_ix, lang, lexeme, sense FROM words WHERE word_ix IN ({placeholders})"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let params_vec: Vec<&dyn rusqlite::types::ToSql> =
            ids.iter().map(|id| id as &dyn rusqlite::types::ToSql).collect();
        let rows = stmt.query_map(params_vec.as_slice(), row_to_word)?;

        let mut out = HashMap::with_capacity(ids.len());
        for row in rows {
            let word = row?;
            out.insert(word.id, word);
        }
        Ok(out)
    }

    /// Resolve a bare lexeme to the best starting word id (case-insensitive,
    /// full Unicode folding).
    ///
    /// Tie-break order: primary language first, then most outgoing links,
    /// then lowest word id. `None` when nothing matches.
    pub fn resolve_start(&self, lexeme: &str, primary_lang: &str) -> Result<Option<WordId>> {
        if lexeme.trim().is_empty() {
            return Ok(None);
        }
        let mut stmt = self.conn.prepare_cached(RESOLVE_START_SQL)?;
        Ok(stmt
            .query_row(params![lexeme.to_lowercase(), primary_lang], |row| {
                row.get(0)
            })
            .optional()?)
    }

    // -------------------------------------------------------------------
    // Link + sequence resolution
    // -------------------------------------------------------------------

    /// All outgoing derivation links of a word, in insertion order.
    pub fn links_from(&self, id: WordId) -> Result<Vec<Link>> {
        let mut stmt = self.conn.prepare_cached(LINKS_FROM_SQL)?;
        let rows = stmt.query_map(params![id], row_to_link)?;
        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Into::into)
    }

    /// The ordered constituent parents of a compound sequence. An unknown
    /// sequence id yields an empty list, not an error.
    pub fn sequence_members(&self, seq: SeqId) -> Result<Vec<WordId>> {
        let mut stmt = self.conn.prepare_cached(SEQUENCE_MEMBERS_SQL)?;
        let rows = stmt.query_map(params![seq], |row| row.get(0))?;
        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Into::into)
    }

    // -------------------------------------------------------------------
    // Reference tables
    // -------------------------------------------------------------------

    /// The full language-code → display metadata table (small, ~50 rows).
    pub fn language_families(&self) -> Result<HashMap<String, LanguageInfo>> {
        let mut stmt = self.conn.prepare_cached(LANGUAGE_FAMILIES_SQL)?;
        let rows = stmt.query_map([], |row| {
            let code: String = row.get("lang_code")?;
            let info = row_to_language_info(row)?;
            Ok((code, info))
        })?;
        rows.collect::<std::result::Result<HashMap<_, _>, _>>()
            .map_err(Into::into)
    }

    /// Enriched definitions for exactly the given lowercased lexemes.
    ///
    /// Always batched to the lexemes of the current graph — fetching the
    /// whole definitions table per request is the performance defect this
    /// signature exists to prevent.
    pub fn definitions_for(&self, lexemes: &[String]) -> Result<HashMap<String, Definition>> {
        if lexemes.is_empty() {
            return Ok(HashMap::new());
        }
        let placeholders: String = lexemes.iter().map(|_| "?").collect::<Vec<_>>().join(",");
        let sql = format!(
            "SELECT lexeme, definition, part_of_speech, phonetic \
             FROM definitions WHERE lexeme IN ({placeholders})"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let params_vec: Vec<&dyn rusqlite::types::ToSql> = lexemes
            .iter()
            .map(|l| l as &dyn rusqlite::types::ToSql)
            .collect();
        let rows = stmt.query_map(params_vec.as_slice(), |row| {
            let lexeme: String = row.get("lexeme")?;
            let def = row_to_definition(row)?;
            Ok((lexeme, def))
        })?;
        rows.collect::<std::result::Result<HashMap<_, _>, _>>()
            .map_err(Into::into)
    }

    // -------------------------------------------------------------------
    // Search / random
    // -------------------------------------------------------------------

    /// Prefix search over curated primary-language words. Case folding is
    /// Unicode; `%` and `_` in the query match themselves, not as wildcards.
    pub fn search_words(
        &self,
        query: &str,
        primary_lang: &str,
        limit: usize,
    ) -> Result<Vec<SearchHit>> {
        let query_lc = query.to_lowercase();
        let prefix = format!("{}%", escape_like(&query_lc));
        let mut stmt = self.conn.prepare_cached(SEARCH_WORDS_SQL)?;
        let rows = stmt.query_map(params![primary_lang, prefix, query_lc, limit as i64], |row| {
            let word: String = row.get("lexeme")?;
            let sense: Option<String> = row.get("sense")?;
            let ancestors: i64 = row.get("ancestors")?;
            Ok((word, sense, ancestors))
        })?;

        let mut hits = Vec::new();
        for row in rows {
            let (word, sense, ancestors) = row?;
            // Suppress glosses that merely echo the lexeme.
            let sense = sense.filter(|s| !s.eq_ignore_ascii_case(&word));
            hits.push(SearchHit {
                word,
                sense,
                ancestors,
            });
        }
        Ok(hits)
    }

    /// A random curated primary-language word, or `None` on an empty corpus.
    pub fn random_word(&self, primary_lang: &str) -> Result<Option<String>> {
        let mut stmt = self.conn.prepare_cached(RANDOM_WORD_SQL)?;
        Ok(stmt
            .query_row(params![primary_lang], |row| row.get(0))
            .optional()?)
    }

    /// Row counts across all tables.
    pub fn stats(&self) -> Result<LexiconStats> {
        let count = |table: &str| -> Result<usize> {
            let n: i64 = self
                .conn
                .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| {
                    row.get(0)
                })?;
            Ok(n as usize)
        };
        Ok(LexiconStats {
            words: count("words")?,
            links: count("links")?,
            sequence_rows: count("sequences")?,
            languages: count("language_families")?,
            definitions: count("definitions")?,
        })
    }

    // -------------------------------------------------------------------
    // Ingest-time writes
    // -------------------------------------------------------------------

    /// Insert a single word row. `lexeme_lc` is derived here so every
    /// lookup path sees the same Unicode folding.
    pub fn insert_word(&self, word: &Word) -> Result<()> {
        let mut stmt = self.conn.prepare_cached(
            "INSERT INTO words (word_ix, lang, lexeme, lexeme_lc, sense) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )?;
        stmt.execute(params![
            word.id,
            word.lang,
            word.lexeme,
            word.lexeme.to_lowercase(),
            word.sense
        ])?;
        Ok(())
    }

    /// Empty the three dump-backed tables so a fresh ingest can replace a
    /// previous load. Reference tables (languages, definitions) are upserted
    /// by their loaders and need no clearing.
    pub fn clear_lexicon(&self) -> Result<()> {
        self.conn.execute_batch(
            "DELETE FROM words;
             DELETE FROM links;
             DELETE FROM sequences;
             DELETE FROM sqlite_sequence WHERE name = 'links';",
        )?;
        Ok(())
    }

    /// Insert a single derivation link.
    pub fn insert_link(&self, source: WordId, target: LinkTarget, kind: &str) -> Result<()> {
        let mut stmt = self
            .conn
            .prepare_cached("INSERT INTO links (type, source, target) VALUES (?1, ?2, ?3)")?;
        stmt.execute(params![kind, source, target.as_raw()])?;
        Ok(())
    }

    /// Insert one constituent of a compound sequence.
    pub fn insert_sequence_member(&self, seq: SeqId, position: u32, parent: WordId) -> Result<()> {
        let mut stmt = self
            .conn
            .prepare_cached("INSERT INTO sequences (seq_ix, position, parent) VALUES (?1, ?2, ?3)")?;
        stmt.execute(params![seq, position, parent])?;
        Ok(())
    }

    /// Insert or replace a language-family row.
    pub fn insert_language(&self, code: &str, info: &LanguageInfo) -> Result<()> {
        let mut stmt = self.conn.prepare_cached(
            "INSERT OR REPLACE INTO language_families (lang_code, lang_name, family, branch) \
             VALUES (?1, ?2, ?3, ?4)",
        )?;
        stmt.execute(params![code, info.name, info.family, info.branch])?;
        Ok(())
    }

    /// Insert or replace an enriched definition. The key is lowercased here
    /// so lookups never have to guess.
    pub fn insert_definition(&self, lexeme: &str, def: &Definition) -> Result<()> {
        let mut stmt = self.conn.prepare_cached(
            "INSERT OR REPLACE INTO definitions (lexeme, definition, part_of_speech, phonetic) \
             VALUES (?1, ?2, ?3, ?4)",
        )?;
        stmt.execute(params![
            lexeme.to_lowercase(),
            def.definition,
            def.part_of_speech,
            def.phonetic
        ])?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
