//! # orenda-research — deterministic ground-truth analytics
//!
//! Turns a corpus of recorded persona sessions into keyword-derived archetype
//! profiles, corpus-wide analytics and heuristic method suggestions, without
//! calling any model.
//!
//! Data flows one way: [`Corpus`] -> [`ResearchEngine`] -> profiles, analytics,
//! methods and sampled excerpts. The [`digest`] module renders the compact
//! hints string handed to prompt assembly.

pub mod config;
pub mod corpus;
pub mod digest;
pub mod engine;
pub mod error;
pub mod keywords;
pub mod report;
pub mod taxonomy;

// Re-exports
pub use config::{DigestConfig, ResearchConfig, SimulationConfig, load_config};
pub use corpus::{Corpus, Session, Speaker, Turn};
pub use digest::research_hints;
pub use engine::{EngineState, ResearchEngine};
pub use error::{ResearchError, Result};
pub use report::{CategorySpread, CorpusAnalytics, MethodSuggestion, SessionProfile};
