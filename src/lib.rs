//! MedMatch Groups - weekly group matching for verified medical professionals
//!
//! This library provides the compatibility scorer and the greedy group
//! assembler, plus the thin HTTP service that feeds them profiles from the
//! hosted profile store.

pub mod config;
pub mod core;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use core::{compatibility_score, GroupAssembler, MatchTables};
pub use models::{GroupMatch, MatchingPolicy, Profile, ScoringWeights};
