//! Command-line interface: ingest the raw dumps, then query graphs,
//! autocomplete, or random words. Results go to stdout as JSON;
//! diagnostics go to stderr via tracing.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use serde_json::json;

use etymograph::config::EngineConfig;
use etymograph::error::Result;
use etymograph::graph::engine::EtymologyEngine;
use etymograph::graph::store::LexiconStore;
use etymograph::ingest;
use etymograph::observability::init_logging;

#[derive(Parser)]
#[command(name = "etymograph", version, about = "Etymology graph engine")]
struct Cli {
    /// Database path; overrides ETYMOGRAPH_DB_PATH and the platform default.
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Load the raw EtymDB dumps into the database, replacing any
    /// previous load.
    Ingest {
        /// etymdb_values TSV: word_ix, lang, lexeme, sense.
        #[arg(long)]
        values: PathBuf,
        /// etymdb_links_info TSV: type, source, target.
        #[arg(long)]
        links: PathBuf,
        /// etymdb_links_index TSV: seq_ix followed by its parents.
        #[arg(long)]
        links_index: PathBuf,
        /// Language-codes JSON reference file.
        #[arg(long)]
        languages: Option<PathBuf>,
        /// Pre-enriched definitions TSV.
        #[arg(long)]
        definitions: Option<PathBuf>,
    },
    /// Resolve a lexeme to its starting word id.
    Resolve { word: String },
    /// Fetch the etymology graph for a word.
    Graph {
        word: String,
        #[arg(long, default_value_t = 10)]
        depth: u32,
    },
    /// Autocomplete search over curated words.
    Search {
        query: String,
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
    /// Pick a random curated word.
    Random,
}

fn main() -> ExitCode {
    init_logging();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut config = EngineConfig::from_env();
    if let Some(db) = cli.db {
        config = config.with_db_path(db);
    }

    match cli.command {
        Command::Ingest {
            values,
            links,
            links_index,
            languages,
            definitions,
        } => {
            if let Some(parent) = config.db_path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let store = LexiconStore::open(&config.db_path.to_string_lossy())?;
            // Re-running ingest replaces the previous load.
            store.clear_lexicon()?;
            ingest::load_words(&store, &values)?;
            ingest::load_links(&store, &links)?;
            ingest::load_sequences(&store, &links_index)?;
            if let Some(path) = languages {
                ingest::load_language_codes(&store, &path)?;
            }
            if let Some(path) = definitions {
                ingest::load_definitions(&store, &path)?;
            }
            let stats = store.stats()?;
            println!("{}", serde_json::to_string_pretty(&json!({
                "words": stats.words,
                "links": stats.links,
                "sequence_rows": stats.sequence_rows,
                "languages": stats.languages,
                "definitions": stats.definitions,
            }))?);
        }
        Command::Resolve { word } => {
            let engine = EtymologyEngine::open(config)?;
            match engine.resolve_start(&word)? {
                Some(id) => println!("{}", json!({ "word": word, "word_ix": id })),
                None => println!("{}", json!({ "word": word, "word_ix": null })),
            }
        }
        Command::Graph { word, depth } => {
            let engine = EtymologyEngine::open(config)?;
            let outcome = engine.graph_for(&word, Some(depth))?;
            println!("{}", serde_json::to_string_pretty(&outcome)?);
        }
        Command::Search { query, limit } => {
            let engine = EtymologyEngine::open(config)?;
            let hits = engine.search(&query, limit)?;
            println!("{}", serde_json::to_string_pretty(&json!({ "results": hits }))?);
        }
        Command::Random => {
            let engine = EtymologyEngine::open(config)?;
            let word = engine.random_word()?;
            println!("{}", json!({ "word": word }));
        }
    }

    Ok(())
}
