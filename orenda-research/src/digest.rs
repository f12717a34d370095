//! Compact research-hints digest for system-prompt assembly.
//!
//! The line format is consumed verbatim by the prompt builder:
//!
//! ```text
//! Archetype pattern: pricing, income, worry
//! Method hints: Money Thread: Map income streams...; Ask for... | Career Thread: ...
//! ```

use crate::config::DigestConfig;
use crate::engine::ResearchEngine;
use crate::report::{MethodSuggestion, SessionProfile};

/// Build the hints digest from the top archetype and top methods.
///
/// Returns an empty string when the corpus yields neither.
pub fn research_hints(engine: &ResearchEngine, limits: &DigestConfig) -> String {
    let archetype = engine.generate_archetypes(1).first();
    let methods = engine.generate_methods(limits.method_limit);
    format_hints(archetype, &methods, limits)
}

/// Format the digest from already-computed parts.
pub fn format_hints(
    archetype: Option<&SessionProfile>,
    methods: &[MethodSuggestion],
    limits: &DigestConfig,
) -> String {
    let mut parts = Vec::with_capacity(2);

    if let Some(profile) = archetype {
        let keywords: Vec<&str> = profile
            .top_keywords
            .iter()
            .take(limits.keyword_limit)
            .map(String::as_str)
            .collect();
        parts.push(format!("Archetype pattern: {}", keywords.join(", ")));
    }

    if !methods.is_empty() {
        let lines: Vec<String> = methods
            .iter()
            .take(limits.method_limit)
            .map(|method| {
                let moves: Vec<&str> = method
                    .suggested_moves
                    .iter()
                    .take(limits.moves_per_method)
                    .map(String::as_str)
                    .collect();
                format!("{}: {}", method.method, moves.join("; "))
            })
            .collect();
        parts.push(format!("Method hints: {}", lines.join(" | ")));
    }

    parts.join("\n")
}
