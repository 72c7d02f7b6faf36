//! End-to-end tests of the engine façade against seeded datasets,
//! including the documented acceptance scenarios.

use pretty_assertions::assert_eq;
use test_case::test_case;

use etymograph::config::EngineConfig;
use etymograph::graph::engine::EtymologyEngine;
use etymograph::graph::store::LexiconStore;
use etymograph::types::{LinkTarget, Outcome, Word, WordId};

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

fn engine() -> EtymologyEngine {
    let store = LexiconStore::in_memory().expect("in-memory store");
    EtymologyEngine::from_store(store, EngineConfig::default())
}

fn word(id: WordId, lang: &str, lexeme: &str, sense: Option<&str>) -> Word {
    Word {
        id,
        lang: lang.to_string(),
        lexeme: lexeme.to_string(),
        sense: sense.map(String::from),
    }
}

/// The compound scenario: encyclopedia = enkyklios + paideia.
fn seed_encyclopedia(engine: &EtymologyEngine) {
    let store = engine.store();
    store
        .insert_word(&word(1, "en", "encyclopedia", None))
        .unwrap();
    store
        .insert_word(&word(2, "grc", "enkyklios", Some("circular")))
        .unwrap();
    store
        .insert_word(&word(3, "grc", "paideia", Some("education")))
        .unwrap();
    store.insert_sequence_member(-1, 0, 2).unwrap();
    store.insert_sequence_member(-1, 1, 3).unwrap();
    store
        .insert_link(1, LinkTarget::Sequence(-1), "compound")
        .unwrap();
}

fn graph_of(outcome: Outcome) -> etymograph::types::EtymologyGraph {
    match outcome {
        Outcome::Graph { graph } => graph,
        other => panic!("expected Graph, got {other:?}"),
    }
}

// ---------------------------------------------------------------------------
// Acceptance scenarios
// ---------------------------------------------------------------------------

#[test]
fn compound_scenario_yields_two_compound_edges() {
    let engine = engine();
    seed_encyclopedia(&engine);

    let graph = graph_of(engine.traverse(1, 5).unwrap());

    assert_eq!(graph.nodes.len(), 3);
    assert_eq!(graph.edges.len(), 2);
    assert!(graph.has_edge("encyclopedia|en", "enkyklios|grc"));
    assert!(graph.has_edge("encyclopedia|en", "paideia|grc"));
    assert!(graph.edges.iter().all(|e| e.is_compound));
    // The sequence id never surfaces as a pseudo-word.
    assert!(graph.node("-1|en").is_none());
}

#[test]
fn resolve_start_prefers_english_over_richer_foreign_entry() {
    let engine = engine();
    let store = engine.store();
    store
        .insert_word(&word(10, "en", "bank", Some("financial institution")))
        .unwrap();
    store
        .insert_word(&word(11, "fr", "bank", Some("bench")))
        .unwrap();
    // The French entry has more links, but English still wins.
    store.insert_link(10, LinkTarget::Word(20), "bor").unwrap();
    for target in [20, 21, 22] {
        store
            .insert_link(11, LinkTarget::Word(target), "inh")
            .unwrap();
    }

    assert_eq!(engine.resolve_start("bank").unwrap(), Some(10));
    assert_eq!(engine.resolve_start("BANK").unwrap(), Some(10));
}

#[test]
fn depth_zero_returns_only_the_start_node() {
    let engine = engine();
    seed_encyclopedia(&engine);

    match engine.traverse(1, 0).unwrap() {
        Outcome::NoEtymology { graph } => {
            assert_eq!(graph.nodes.len(), 1);
            assert_eq!(graph.nodes[0].id, "encyclopedia|en");
            assert!(graph.edges.is_empty());
        }
        other => panic!("expected NoEtymology at depth 0, got {other:?}"),
    }
}

#[test]
fn unknown_word_and_linkless_word_are_distinct_outcomes() {
    let engine = engine();
    engine
        .store()
        .insert_word(&word(1, "en", "izzard", Some("the letter z")))
        .unwrap();

    assert_eq!(engine.graph_for("zzyzx", None).unwrap(), Outcome::NotFound);
    assert!(matches!(
        engine.graph_for("izzard", None).unwrap(),
        Outcome::NoEtymology { .. }
    ));
}

#[test]
fn cycle_terminates_with_each_direction_once() {
    let engine = engine();
    let store = engine.store();
    store
        .insert_word(&word(1, "nl", "droog", Some("dry")))
        .unwrap();
    store
        .insert_word(&word(2, "de", "trocken", Some("dry")))
        .unwrap();
    store.insert_link(1, LinkTarget::Word(2), "bor").unwrap();
    store.insert_link(2, LinkTarget::Word(1), "bor").unwrap();

    let graph = graph_of(engine.traverse(1, 30).unwrap());
    assert_eq!(graph.nodes.len(), 2);
    assert_eq!(graph.edges.len(), 2);
    assert_eq!(
        graph
            .edges
            .iter()
            .filter(|e| e.source == "droog|nl" && e.target == "trocken|de")
            .count(),
        1
    );
    assert_eq!(
        graph
            .edges
            .iter()
            .filter(|e| e.source == "trocken|de" && e.target == "droog|nl")
            .count(),
        1
    );
}

#[test]
fn gated_word_appears_as_node_without_outgoing_edges() {
    let engine = engine();
    let store = engine.store();
    store
        .insert_word(&word(1, "en", "gloss", Some("explanation")))
        .unwrap();
    // English, NULL sense: reached but never expanded.
    store.insert_word(&word(2, "en", "glose", None)).unwrap();
    store
        .insert_word(&word(3, "fr", "glose", Some("gloss")))
        .unwrap();
    store.insert_link(1, LinkTarget::Word(2), "der").unwrap();
    store.insert_link(2, LinkTarget::Word(3), "bor").unwrap();

    let graph = graph_of(engine.graph_for("gloss", None).unwrap());
    assert!(graph.node("glose|en").is_some(), "gated node is kept");
    assert!(
        graph.edges.iter().all(|e| e.source != "glose|en"),
        "gated node contributes no outgoing edges"
    );
    assert!(graph.node("glose|fr").is_none());
}

// ---------------------------------------------------------------------------
// Depth behavior
// ---------------------------------------------------------------------------

/// la chain: each depth adds exactly one edge until exhausted.
fn seed_chain(engine: &EtymologyEngine, len: WordId) {
    let store = engine.store();
    for i in 0..len {
        store
            .insert_word(&word(i, "la", &format!("gradus{i}"), Some("step")))
            .unwrap();
    }
    for i in 0..len - 1 {
        store.insert_link(i, LinkTarget::Word(i + 1), "inh").unwrap();
    }
}

#[test_case(1, 1; "depth one")]
#[test_case(3, 3; "depth three")]
#[test_case(9, 9; "full chain")]
#[test_case(50, 9; "depth beyond data")]
fn chain_edge_count_tracks_depth(depth: u32, expected_edges: usize) {
    let engine = engine();
    seed_chain(&engine, 10);

    let graph = graph_of(engine.traverse(0, depth).unwrap());
    assert_eq!(graph.edges.len(), expected_edges);
}

#[test]
fn expansion_is_monotonic_in_depth() {
    let engine = engine();
    seed_encyclopedia(&engine);
    // Extend: paideia <- pais ("child").
    engine
        .store()
        .insert_word(&word(4, "grc", "pais", Some("child")))
        .unwrap();
    engine
        .store()
        .insert_link(3, LinkTarget::Word(4), "der")
        .unwrap();

    let shallow = graph_of(engine.traverse(1, 1).unwrap());
    let deep = graph_of(engine.traverse(1, 5).unwrap());

    for node in &shallow.nodes {
        assert!(
            deep.node(&node.id).is_some(),
            "node {} lost at greater depth",
            node.id
        );
    }
    for edge in &shallow.edges {
        assert!(
            deep.has_edge(&edge.source, &edge.target),
            "edge {} -> {} lost at greater depth",
            edge.source,
            edge.target
        );
    }
    assert!(deep.edges.len() > shallow.edges.len());
}

#[test]
fn traverse_is_idempotent() {
    let engine = engine();
    seed_encyclopedia(&engine);

    let a = graph_of(engine.traverse(1, 5).unwrap());
    let b = graph_of(engine.traverse(1, 5).unwrap());

    assert_eq!(a.nodes, b.nodes);
    assert_eq!(a.edges, b.edges);
}

// ---------------------------------------------------------------------------
// Metadata enrichment through the full pipeline
// ---------------------------------------------------------------------------

#[test]
fn nodes_carry_language_and_definition_metadata() {
    use etymograph::types::{Definition, LanguageInfo};

    let engine = engine();
    seed_encyclopedia(&engine);
    let store = engine.store();
    store
        .insert_language(
            "grc",
            &LanguageInfo {
                name: "Ancient Greek".into(),
                family: Some("Indo-European".into()),
                branch: Some("Hellenic".into()),
            },
        )
        .unwrap();
    store
        .insert_definition(
            "encyclopedia",
            &Definition {
                definition: "a comprehensive reference work".into(),
                part_of_speech: Some("noun".into()),
                phonetic: None,
            },
        )
        .unwrap();

    let graph = graph_of(engine.graph_for("encyclopedia", None).unwrap());

    let root = graph.node("encyclopedia|en").unwrap();
    assert!(root.has_definition);
    assert_eq!(
        root.sense.as_deref(),
        Some("a comprehensive reference work")
    );
    // Unknown "en" code falls back to the bare code.
    assert_eq!(root.lang_name, "en");

    let greek = graph.node("enkyklios|grc").unwrap();
    assert_eq!(greek.lang_name, "Ancient Greek");
    assert_eq!(greek.family.as_deref(), Some("Indo-European"));
    assert!(!greek.has_definition);
    assert_eq!(greek.sense.as_deref(), Some("circular"));
}

#[test]
fn outcome_serializes_for_the_http_layer() {
    let engine = engine();
    seed_encyclopedia(&engine);

    let outcome = engine.graph_for("encyclopedia", None).unwrap();
    let json = serde_json::to_value(&outcome).unwrap();

    assert_eq!(json["outcome"], "graph");
    assert_eq!(json["graph"]["nodes"].as_array().unwrap().len(), 3);
    let edge = &json["graph"]["edges"][0];
    assert_eq!(edge["type"], "compound");
    assert_eq!(edge["is_compound"], true);
}

// ---------------------------------------------------------------------------
// Search + random through the façade
// ---------------------------------------------------------------------------

#[test]
fn search_returns_ranked_hits_with_ancestor_counts() {
    let engine = engine();
    let store = engine.store();
    store
        .insert_word(&word(1, "en", "water", Some("clear liquid")))
        .unwrap();
    store
        .insert_word(&word(2, "en", "watershed", Some("drainage divide")))
        .unwrap();
    store.insert_link(1, LinkTarget::Word(10), "inh").unwrap();
    store.insert_link(1, LinkTarget::Word(11), "cog").unwrap();
    store.insert_link(2, LinkTarget::Word(12), "cmpd").unwrap();

    let hits = engine.search("water", 10).unwrap();
    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0].word, "water");
    assert_eq!(hits[0].ancestors, 2);
    assert_eq!(hits[1].word, "watershed");
}

#[test]
fn random_word_on_empty_corpus_is_none() {
    let engine = engine();
    assert_eq!(engine.random_word().unwrap(), None);
}
