//! etymograph — etymology graph engine.
//!
//! Resolves a word's etymological ancestry across languages: a depth-bounded,
//! cycle-safe traversal over static word/link/sequence tables, with compound
//! derivations expanded into their constituent parents, assembled into a
//! renderable node/edge graph.

pub mod config;
pub mod db;
pub mod error;
pub mod graph;
pub mod ingest;
pub mod observability;
pub mod types;
