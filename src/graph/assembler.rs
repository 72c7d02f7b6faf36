//! Turns traversal edges (word-id space) into the renderable graph
//! (lexeme+language key space), enriched with language metadata and
//! definitions.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use crate::error::Result;
use crate::graph::store::LexiconStore;
use crate::types::{
    node_key, Definition, EtymologyGraph, GraphEdge, GraphNode, LanguageInfo, TraversalEdge, Word,
    WordId,
};

/// Assembles presentation graphs from raw traversal output.
pub struct GraphAssembler<'a> {
    store: &'a LexiconStore,
    primary_lang: &'a str,
}

impl<'a> GraphAssembler<'a> {
    pub fn new(store: &'a LexiconStore, primary_lang: &'a str) -> Self {
        Self {
            store,
            primary_lang,
        }
    }

    /// Build the graph for `start` from its traversal edges.
    ///
    /// Returns `None` when the start word itself does not exist — the caller
    /// maps that to [`crate::types::Outcome::NotFound`]. An existing word
    /// with zero edges yields a single-node graph.
    ///
    /// Word ids whose rows vanished between traversal and assembly (possible
    /// only with broken data) drop out along with their edges, matching the
    /// dangling-reference policy elsewhere.
    pub fn assemble(
        &self,
        start: WordId,
        traversal_edges: &[TraversalEdge],
    ) -> Result<Option<EtymologyGraph>> {
        // Distinct ids: every endpoint plus the start itself. BTreeSet so the
        // node construction below is deterministic.
        let mut ids: BTreeSet<WordId> = BTreeSet::new();
        ids.insert(start);
        for edge in traversal_edges {
            ids.insert(edge.child);
            ids.insert(edge.parent);
        }

        let id_list: Vec<WordId> = ids.iter().copied().collect();
        let words = self.store.words_by_ids(&id_list)?;
        if !words.contains_key(&start) {
            return Ok(None);
        }

        let lang_families = self.store.language_families()?;

        // Definitions are fetched for exactly the lexemes in this graph.
        let lexemes: BTreeSet<String> = words
            .values()
            .map(|w| w.lexeme.to_lowercase())
            .collect();
        let lexeme_list: Vec<String> = lexemes.into_iter().collect();
        let definitions = self.store.definitions_for(&lexeme_list)?;

        // id → node key; many-to-one where homographs collapse.
        let key_of: HashMap<WordId, String> = words
            .iter()
            .map(|(id, w)| (*id, node_key(&w.lexeme, &w.lang)))
            .collect();

        // Nodes, first id per key wins (ids ascend, so the winner is stable).
        let mut nodes: BTreeMap<String, GraphNode> = BTreeMap::new();
        for id in &id_list {
            let Some(word) = words.get(id) else { continue };
            let key = &key_of[id];
            if !nodes.contains_key(key) {
                nodes.insert(
                    key.clone(),
                    self.build_node(key, word, &lang_families, &definitions),
                );
            }
        }

        // Edges re-keyed; self-loops after collapse dropped; (source, target)
        // deduplicated keeping the first (shallowest-level) occurrence.
        let mut edges: Vec<GraphEdge> = Vec::new();
        let mut seen: HashSet<(String, String)> = HashSet::new();
        for edge in traversal_edges {
            let (Some(source), Some(target)) = (key_of.get(&edge.child), key_of.get(&edge.parent))
            else {
                continue;
            };
            if source == target {
                continue;
            }
            if seen.insert((source.clone(), target.clone())) {
                edges.push(GraphEdge {
                    source: source.clone(),
                    target: target.clone(),
                    kind: edge.kind.clone(),
                    is_compound: edge.is_compound,
                });
            }
        }

        Ok(Some(EtymologyGraph {
            nodes: nodes.into_values().collect(),
            edges,
        }))
    }

    /// One presentation node with all available metadata attached.
    fn build_node(
        &self,
        key: &str,
        word: &Word,
        lang_families: &HashMap<String, LanguageInfo>,
        definitions: &HashMap<String, Definition>,
    ) -> GraphNode {
        let enriched = definitions.get(&word.lexeme.to_lowercase());

        // Display gloss preference: enriched definition for primary-language
        // words, else the word's own sense (when it says something).
        let sense = match enriched {
            Some(def) if word.lang == self.primary_lang => Some(def.definition.clone()),
            _ => word.display_sense().map(String::from),
        };

        let (lang_name, family, branch) = match lang_families.get(&word.lang) {
            Some(info) => (info.name.clone(), info.family.clone(), info.branch.clone()),
            // Unknown code: fall back to the code itself, not an error.
            None => (word.lang.clone(), None, None),
        };

        GraphNode {
            id: key.to_string(),
            lexeme: word.lexeme.clone(),
            lang: word.lang.clone(),
            lang_name,
            family,
            branch,
            sense,
            has_definition: enriched.is_some(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
