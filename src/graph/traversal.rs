//! Depth-bounded ancestry traversal with compound-sequence expansion.
//!
//! An explicit frontier/worklist walk rather than recursion or a recursive
//! CTE: compound targets expand to several parents mid-hop and the gating
//! policy must run between levels, neither of which SQL recursion expresses
//! cleanly. One batch of link lookups per level, capped by the level counter.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::error::Result;
use crate::graph::store::LexiconStore;
use crate::types::{LinkTarget, TraversalEdge, Word, WordId};

// ---------------------------------------------------------------------------
// ExpansionPolicy
// ---------------------------------------------------------------------------

/// Decides whether a reached word's own links are worth following.
///
/// Injected into the traversal so the data-quality heuristic can be tested
/// and swapped independently of the walk mechanics.
pub trait ExpansionPolicy {
    fn is_expandable(&self, word: &Word) -> bool;
}

/// Production gate: primary-language entries with no recorded sense carry
/// unreliable, high-fanout links in the raw data, so they terminate the
/// walk at that node. The node itself is kept; only its outgoing links are
/// ignored. Everything else expands.
#[derive(Debug, Clone)]
pub struct PrimaryLanguageGate {
    primary_lang: String,
}

impl PrimaryLanguageGate {
    pub fn new(primary_lang: impl Into<String>) -> Self {
        Self {
            primary_lang: primary_lang.into(),
        }
    }
}

impl ExpansionPolicy for PrimaryLanguageGate {
    fn is_expandable(&self, word: &Word) -> bool {
        word.lang != self.primary_lang || word.has_sense()
    }
}

/// Expands everything. For diagnostics and tests.
#[derive(Debug, Clone, Copy)]
pub struct ExpandAll;

impl ExpansionPolicy for ExpandAll {
    fn is_expandable(&self, _word: &Word) -> bool {
        true
    }
}

// ---------------------------------------------------------------------------
// Traversal
// ---------------------------------------------------------------------------

/// The ancestry walk, bound to a store and an expansion policy.
pub struct Traversal<'a> {
    store: &'a LexiconStore,
    policy: &'a dyn ExpansionPolicy,
}

impl<'a> Traversal<'a> {
    pub fn new(store: &'a LexiconStore, policy: &'a dyn ExpansionPolicy) -> Self {
        Self { store, policy }
    }

    /// Walk the ancestry of `start` up to `max_depth` hops.
    ///
    /// Returns a flat edge list tagged with discovery level. Guarantees:
    ///
    /// - each (child, parent) pair is emitted at most once, regardless of
    ///   how many paths reach it;
    /// - each word is expanded at most once, at its first-reached level, so
    ///   cyclic data terminates;
    /// - compound targets surface as one edge per resolved constituent,
    ///   flagged `is_compound`, never as a pseudo-word;
    /// - dangling word or sequence references drop their branch silently;
    /// - a nonexistent `start` or `max_depth == 0` yields an empty list.
    ///
    /// The gating policy applies to *reached* words; the start word always
    /// expands (its direct parents are the whole point of the request).
    pub fn walk(&self, start: WordId, max_depth: u32) -> Result<Vec<TraversalEdge>> {
        let mut edges: Vec<TraversalEdge> = Vec::new();
        if max_depth == 0 {
            return Ok(edges);
        }

        // Word rows are fetched once and cached; `None` records a dangling id
        // so repeated references don't requery.
        let mut words: HashMap<WordId, Option<Word>> = HashMap::new();
        let Some(start_word) = self.lookup(&mut words, start)? else {
            return Ok(edges);
        };

        let mut seen_edges: HashSet<(WordId, WordId)> = HashSet::new();
        let mut expanded: HashSet<WordId> = HashSet::new();
        expanded.insert(start);

        let mut frontier: Vec<Word> = vec![start_word];

        for level in 1..=max_depth {
            let mut next: Vec<Word> = Vec::new();

            for child in &frontier {
                for link in self.store.links_from(child.id)? {
                    let parents: Vec<(WordId, bool)> = match link.target {
                        LinkTarget::Word(id) => vec![(id, false)],
                        // A sequence with zero members is a dangling
                        // reference; the loop below simply sees no parents.
                        LinkTarget::Sequence(seq) => self
                            .store
                            .sequence_members(seq)?
                            .into_iter()
                            .map(|id| (id, true))
                            .collect(),
                    };

                    for (parent_id, is_compound) in parents {
                        let Some(parent) = self.lookup(&mut words, parent_id)? else {
                            continue; // dangling word reference
                        };

                        if seen_edges.insert((child.id, parent_id)) {
                            edges.push(TraversalEdge {
                                child: child.id,
                                parent: parent_id,
                                kind: link.kind.clone(),
                                level,
                                is_compound,
                            });
                        }

                        if level < max_depth
                            && !expanded.contains(&parent_id)
                            && self.policy.is_expandable(&parent)
                        {
                            expanded.insert(parent_id);
                            next.push(parent);
                        }
                    }
                }
            }

            if next.is_empty() {
                break;
            }
            frontier = next;
        }

        debug!(
            start,
            max_depth,
            edges = edges.len(),
            words = words.len(),
            "traversal complete"
        );
        Ok(edges)
    }

    fn lookup(
        &self,
        cache: &mut HashMap<WordId, Option<Word>>,
        id: WordId,
    ) -> Result<Option<Word>> {
        if let Some(cached) = cache.get(&id) {
            return Ok(cached.clone());
        }
        let word = self.store.word(id)?;
        cache.insert(id, word.clone());
        Ok(word)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
