//! Core domain types for the etymology graph.
//!
//! Two id spaces coexist: the relational layer works in raw `word_ix`
//! integers, while the presentation graph is keyed by `lexeme|lang` strings
//! so that multiple senses of the same spelling collapse to one node.

use serde::{Deserialize, Serialize};

/// Raw word identifier (`word_ix` in the `words` table).
pub type WordId = i64;

/// Compound-sequence identifier. Always negative in the raw data.
pub type SeqId = i64;

// ---------------------------------------------------------------------------
// Word
// ---------------------------------------------------------------------------

/// One row of the lexicon: a spelling in a language, with an optional gloss.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Word {
    pub id: WordId,
    /// ISO-style language code, e.g. "en", "grc", "la".
    pub lang: String,
    /// Surface spelling.
    pub lexeme: String,
    /// Source-database gloss. NULL for many entries; a sense equal to the
    /// lexeme itself carries no information and is treated as absent.
    pub sense: Option<String>,
}

impl Word {
    /// The sense, if it is non-blank and actually says something beyond
    /// repeating the lexeme.
    pub fn display_sense(&self) -> Option<&str> {
        match self.sense.as_deref() {
            Some(s) if !s.trim().is_empty() && !s.eq_ignore_ascii_case(&self.lexeme) => Some(s),
            _ => None,
        }
    }

    /// Whether the source database recorded any gloss at all.
    pub fn has_sense(&self) -> bool {
        self.sense.as_deref().is_some_and(|s| !s.trim().is_empty())
    }
}

// ---------------------------------------------------------------------------
// LinkTarget
// ---------------------------------------------------------------------------

/// Decoded form of a link's raw target column.
///
/// The raw data encodes a sum type in an integer's sign: a non-negative value
/// names a concrete parent word, a negative value names a row group in the
/// `sequences` table (the constituents of a compound). The sign is inspected
/// exactly once, here, so the rest of the crate never sign-checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkTarget {
    /// Direct parent word.
    Word(WordId),
    /// Reference into the sequence table; expands to one edge per parent.
    Sequence(SeqId),
}

impl LinkTarget {
    /// Decode a raw signed target id.
    pub fn from_raw(raw: i64) -> Self {
        if raw < 0 {
            Self::Sequence(raw)
        } else {
            Self::Word(raw)
        }
    }

    /// Re-encode for storage.
    pub fn as_raw(&self) -> i64 {
        match *self {
            Self::Word(id) => id,
            Self::Sequence(id) => id,
        }
    }
}

// ---------------------------------------------------------------------------
// Link
// ---------------------------------------------------------------------------

/// A directed derivation edge: `source` derives from `target`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub source: WordId,
    pub target: LinkTarget,
    /// Free-text classifier from the source data, e.g. "inh" (inherited),
    /// "bor" (borrowed), "der" (derived), "cmpd" (compound).
    pub kind: String,
}

// ---------------------------------------------------------------------------
// TraversalEdge
// ---------------------------------------------------------------------------

/// One ancestry edge discovered during traversal. Transient — lives only
/// between the traversal engine and the graph assembler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraversalEdge {
    pub child: WordId,
    pub parent: WordId,
    pub kind: String,
    /// Distance in hops from the starting word (1 = direct parent).
    pub level: u32,
    /// True when the edge passed through sequence resolution: the parent is
    /// one of several co-equal compound constituents, not a lineal ancestor.
    pub is_compound: bool,
}

// ---------------------------------------------------------------------------
// Language metadata
// ---------------------------------------------------------------------------

/// Display metadata for a language code, from the reference table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageInfo {
    pub name: String,
    pub family: Option<String>,
    pub branch: Option<String>,
}

/// An enriched dictionary definition, keyed by lowercased lexeme.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Definition {
    /// Primary sense: part-of-speech index 0, definition index 0.
    pub definition: String,
    pub part_of_speech: Option<String>,
    pub phonetic: Option<String>,
}

// ---------------------------------------------------------------------------
// Presentation graph
// ---------------------------------------------------------------------------

/// Stable node key: lowercased lexeme plus language code.
///
/// Multiple word ids with the same spelling and language (different senses)
/// intentionally collapse to a single key.
pub fn node_key(lexeme: &str, lang: &str) -> String {
    format!("{}|{}", lexeme.to_lowercase(), lang)
}

/// A node in the renderable etymology graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphNode {
    /// Node key (`lexeme|lang`), unique within one graph.
    pub id: String,
    pub lexeme: String,
    pub lang: String,
    /// Human-readable language name; falls back to the bare code.
    pub lang_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub family: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    /// Best-available display gloss: enriched definition when present,
    /// otherwise the word's own sense.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sense: Option<String>,
    /// Whether an enriched dictionary definition exists for this lexeme.
    pub has_definition: bool,
}

/// A directed edge in the renderable graph: `source` derives from `target`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub source: String,
    pub target: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub is_compound: bool,
}

/// The assembled, renderable graph for one traversal request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EtymologyGraph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

impl EtymologyGraph {
    pub fn node(&self, key: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| n.id == key)
    }

    pub fn has_edge(&self, source: &str, target: &str) -> bool {
        self.edges
            .iter()
            .any(|e| e.source == source && e.target == target)
    }
}

// ---------------------------------------------------------------------------
// Outcome
// ---------------------------------------------------------------------------

/// Result of a traversal request. "Unknown word" and "known word with no
/// etymology" are distinct outcomes with different user-facing handling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    /// The lexeme matched no word in any language.
    NotFound,
    /// The word exists but has zero ancestor edges; the graph holds exactly
    /// the start node.
    NoEtymology { graph: EtymologyGraph },
    /// A non-empty ancestry graph.
    Graph { graph: EtymologyGraph },
}

// ---------------------------------------------------------------------------
// SearchHit
// ---------------------------------------------------------------------------

/// One autocomplete result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    pub word: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sense: Option<String>,
    /// Number of direct etymology links — a proxy for tree richness.
    pub ancestors: i64,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
