//! Output records consumed by reporting layers.
//!
//! These serialize verbatim into the archetype, analytics and methods
//! responses, so field names are part of the wire contract.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// Derived summary of one session's topics and representative lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionProfile {
    pub session_id: String,
    pub dominant_categories: Vec<String>,
    pub top_keywords: Vec<String>,
    pub representative_user_lines: Vec<String>,
    pub token_estimate: usize,
}

/// Number of archetype profiles that list each category, in first-seen order.
///
/// Serializes as a JSON object (`category -> count`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategorySpread {
    counts: Vec<(String, usize)>,
}

impl CategorySpread {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment(&mut self, category: &str) {
        match self.counts.iter().position(|(name, _)| name == category) {
            Some(slot) => self.counts[slot].1 += 1,
            None => self.counts.push((category.to_string(), 1)),
        }
    }

    pub fn get(&self, category: &str) -> usize {
        self.counts
            .iter()
            .find(|(name, _)| name == category)
            .map(|(_, count)| *count)
            .unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Entries in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.counts.iter().map(|(name, count)| (name.as_str(), *count))
    }

    /// Entries by descending count; equal counts keep first-seen order.
    pub fn ranked(&self) -> Vec<(&str, usize)> {
        let mut ranked: Vec<_> = self.iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked
    }
}

impl Serialize for CategorySpread {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.counts.len()))?;
        for (name, count) in &self.counts {
            map.serialize_entry(name, count)?;
        }
        map.end()
    }
}

/// Aggregate statistics over the whole corpus.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorpusAnalytics {
    pub total_sessions: usize,
    pub total_turns: usize,
    /// Rounded to two decimal places; `0.0` for an empty corpus.
    pub avg_turns_per_session: f64,
    pub token_estimate: usize,
    pub top_keywords: Vec<(String, usize)>,
    pub category_spread: CategorySpread,
}

/// A ranked, heuristic method idea derived from the category spread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MethodSuggestion {
    /// Display name, e.g. `"Money Thread"`.
    pub method: String,
    /// Raw category key.
    pub focus: String,
    pub evidence: String,
    pub suggested_moves: Vec<String>,
}

impl MethodSuggestion {
    pub fn for_category(category: &str, mentions: usize, moves: &[&str]) -> Self {
        Self {
            method: format!("{} Thread", title_case(category)),
            focus: category.to_string(),
            evidence: format!("{mentions} mentions across ground-truth sessions"),
            suggested_moves: moves.iter().map(|m| m.to_string()).collect(),
        }
    }
}

/// Uppercase the first letter of each alphabetic run, lowercase the rest.
pub(crate) fn title_case(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut at_word_start = true;
    for ch in input.chars() {
        if ch.is_alphabetic() {
            if at_word_start {
                out.extend(ch.to_uppercase());
            } else {
                out.extend(ch.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(ch);
            at_word_start = true;
        }
    }
    out
}
