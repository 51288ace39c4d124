// Core algorithm exports
pub mod assembler;
pub mod career;
pub mod insights;
pub mod scoring;
pub mod tables;

pub use assembler::{AssemblyResult, GroupAssembler};
pub use career::career_stage;
pub use scoring::{compatibility_score, score_breakdown};
pub use tables::MatchTables;
