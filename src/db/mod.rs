//! Database layer — schema DDL and row converters.

pub mod converters;
pub mod schema;
