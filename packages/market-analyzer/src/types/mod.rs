//! Data types for queries, product records and history entries.

pub mod history;
pub mod product;
pub mod query;
