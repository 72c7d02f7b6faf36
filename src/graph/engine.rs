//! Engine façade: the operations the service layer calls.
//!
//! Owns the store and configuration; each request is an independent,
//! read-only computation, so one engine is safe behind any number of
//! concurrent callers holding shared references.

use tracing::info;

use crate::config::EngineConfig;
use crate::error::Result;
use crate::graph::assembler::GraphAssembler;
use crate::graph::store::LexiconStore;
use crate::graph::traversal::{ExpansionPolicy, PrimaryLanguageGate, Traversal};
use crate::types::{Outcome, SearchHit, WordId};

/// Autocomplete queries shorter than this return nothing.
const MIN_SEARCH_LEN: usize = 2;

/// Autocomplete result cap, regardless of the requested limit.
const MAX_SEARCH_LIMIT: usize = 20;

pub struct EtymologyEngine {
    store: LexiconStore,
    config: EngineConfig,
    policy: Box<dyn ExpansionPolicy + Send + Sync>,
}

impl std::fmt::Debug for EtymologyEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EtymologyEngine")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl EtymologyEngine {
    /// Open the database named by the config and build the production gate.
    pub fn open(config: EngineConfig) -> Result<Self> {
        let store = LexiconStore::open(&config.db_path.to_string_lossy())?;
        Ok(Self::from_store(store, config))
    }

    /// Wrap an already-open store (tests, in-memory fixtures).
    pub fn from_store(store: LexiconStore, config: EngineConfig) -> Self {
        let policy = Box::new(PrimaryLanguageGate::new(config.primary_lang.clone()));
        Self {
            store,
            config,
            policy,
        }
    }

    /// Swap the expansion policy (diagnostics, policy experiments).
    pub fn with_policy(mut self, policy: Box<dyn ExpansionPolicy + Send + Sync>) -> Self {
        self.policy = policy;
        self
    }

    pub fn store(&self) -> &LexiconStore {
        &self.store
    }

    // -------------------------------------------------------------------
    // Core operations
    // -------------------------------------------------------------------

    /// Resolve a bare lexeme to the best starting word id.
    pub fn resolve_start(&self, lexeme: &str) -> Result<Option<WordId>> {
        self.store.resolve_start(lexeme, &self.config.primary_lang)
    }

    /// Compute the bounded ancestry graph of a word id.
    ///
    /// `max_depth == 0` is not an error: the result is the start node alone,
    /// reported as [`Outcome::NoEtymology`].
    pub fn traverse(&self, word_id: WordId, max_depth: u32) -> Result<Outcome> {
        let traversal = Traversal::new(&self.store, self.policy.as_ref());
        let edges = traversal.walk(word_id, max_depth)?;

        let assembler = GraphAssembler::new(&self.store, &self.config.primary_lang);
        let Some(graph) = assembler.assemble(word_id, &edges)? else {
            return Ok(Outcome::NotFound);
        };

        info!(
            word_id,
            max_depth,
            nodes = graph.nodes.len(),
            edges = graph.edges.len(),
            "traversal request served"
        );

        if graph.edges.is_empty() {
            Ok(Outcome::NoEtymology { graph })
        } else {
            Ok(Outcome::Graph { graph })
        }
    }

    /// Resolve a lexeme and traverse in one call. `depth` falls back to the
    /// configured default.
    pub fn graph_for(&self, lexeme: &str, depth: Option<u32>) -> Result<Outcome> {
        let Some(word_id) = self.resolve_start(lexeme)? else {
            return Ok(Outcome::NotFound);
        };
        self.traverse(word_id, depth.unwrap_or(self.config.default_depth))
    }

    // -------------------------------------------------------------------
    // Search / random
    // -------------------------------------------------------------------

    /// Autocomplete over curated primary-language words.
    pub fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchHit>> {
        if query.trim().len() < MIN_SEARCH_LEN {
            return Ok(Vec::new());
        }
        let limit = limit.min(MAX_SEARCH_LIMIT);
        self.store
            .search_words(query.trim(), &self.config.primary_lang, limit)
    }

    /// A random curated primary-language word.
    pub fn random_word(&self) -> Result<Option<String>> {
        self.store.random_word(&self.config.primary_lang)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
