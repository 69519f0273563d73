//! Core trait abstractions.
//!
//! Applications implement these to plug in an AI provider.

pub mod research;
