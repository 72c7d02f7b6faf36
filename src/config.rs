//! Engine configuration: database location, primary language, default depth.

use std::path::PathBuf;

use directories::ProjectDirs;

/// Default traversal depth when the caller does not specify one.
pub const DEFAULT_MAX_DEPTH: u32 = 10;

/// Runtime configuration for the engine.
///
/// The primary language drives both the starting-word resolution tie-break
/// and the traversal gating rule; it is "en" for the EtymDB dataset but
/// configurable for other corpora.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Path to the SQLite database file.
    pub db_path: PathBuf,
    /// Language preferred at start resolution and gated during traversal.
    pub primary_lang: String,
    /// Depth used when a request does not carry its own.
    pub default_depth: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            primary_lang: "en".to_string(),
            default_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl EngineConfig {
    /// Build a config from the environment, falling back to defaults.
    ///
    /// Recognized variables: `ETYMOGRAPH_DB_PATH`, `ETYMOGRAPH_PRIMARY_LANG`,
    /// `ETYMOGRAPH_DEPTH`. An unparsable depth falls back to the default
    /// rather than failing — traversal is read-only, so graceful degradation
    /// beats a hard startup error.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(path) = std::env::var("ETYMOGRAPH_DB_PATH") {
            config.db_path = PathBuf::from(path);
        }
        if let Ok(lang) = std::env::var("ETYMOGRAPH_PRIMARY_LANG") {
            if !lang.trim().is_empty() {
                config.primary_lang = lang;
            }
        }
        if let Ok(depth) = std::env::var("ETYMOGRAPH_DEPTH") {
            config.default_depth = parse_depth(&depth).unwrap_or(DEFAULT_MAX_DEPTH);
        }
        config
    }

    /// Override the database path (CLI `--db` flag).
    pub fn with_db_path(mut self, path: PathBuf) -> Self {
        self.db_path = path;
        self
    }
}

/// Parse a depth string; non-positive or non-numeric values are rejected.
fn parse_depth(s: &str) -> Option<u32> {
    s.trim().parse::<u32>().ok().filter(|d| *d > 0)
}

/// Platform data directory (`~/.local/share/etymograph` on Linux), falling
/// back to the working directory when no home is available.
fn default_db_path() -> PathBuf {
    ProjectDirs::from("", "", "etymograph")
        .map(|dirs| dirs.data_dir().join("etymdb.sqlite"))
        .unwrap_or_else(|| PathBuf::from("etymdb.sqlite"))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
