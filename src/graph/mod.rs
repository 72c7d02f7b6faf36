//! Graph layer — lexicon store, ancestry traversal, and graph assembly.

pub mod assembler;
pub mod engine;
pub mod store;
pub mod traversal;
