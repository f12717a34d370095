//! Keyword extraction: a plain whitespace tokenizer and an insertion-ordered
//! frequency counter.

use std::collections::HashMap;
use unicode_normalization::char::is_combining_mark;

use crate::corpus::Session;

/// Tokens of this many characters or fewer are not keywords.
pub const MIN_KEYWORD_EXCLUSIVE_LEN: usize = 3;

/// Split text into lowercase alphanumeric tokens.
///
/// The whole text is lowercased first so context-sensitive mappings (final
/// sigma) see word boundaries. `/` and whitespace separate tokens; anything
/// outside the letter and number categories, combining marks included, is
/// stripped from inside a token.
pub fn tokenize(text: &str) -> impl Iterator<Item = String> {
    let lowered = text.to_lowercase();
    lowered
        .split(|c: char| c.is_whitespace() || c == '/')
        .map(|raw| raw.chars().filter(|&c| is_word_char(c)).collect::<String>())
        .filter(|token| !token.is_empty())
        .collect::<Vec<_>>()
        .into_iter()
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() && !is_combining_mark(c)
}

/// Tokens long enough to count as keywords.
pub fn keyword_tokens(text: &str) -> impl Iterator<Item = String> {
    tokenize(text).filter(|t| t.chars().count() > MIN_KEYWORD_EXCLUSIVE_LEN)
}

/// Frequency counter that remembers first-seen order.
///
/// [`KeywordCounter::most_common`] sorts by descending count with a stable
/// sort, so equal counts keep first-encountered order.
#[derive(Debug, Clone, Default)]
pub struct KeywordCounter {
    index: HashMap<String, usize>,
    entries: Vec<(String, usize)>,
}

impl KeywordCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count every keyword in a session's user turns.
    pub fn from_session(session: &Session) -> Self {
        let mut counter = Self::new();
        for turn in session.user_turns() {
            for token in keyword_tokens(turn.text()) {
                counter.add(token, 1);
            }
        }
        counter
    }

    pub fn add(&mut self, keyword: impl Into<String>, count: usize) {
        let keyword = keyword.into();
        match self.index.get(&keyword) {
            Some(&slot) => self.entries[slot].1 += count,
            None => {
                self.index.insert(keyword.clone(), self.entries.len());
                self.entries.push((keyword, count));
            }
        }
    }

    pub fn get(&self, keyword: &str) -> usize {
        self.index
            .get(keyword)
            .map(|&slot| self.entries[slot].1)
            .unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries ranked by descending count, optionally truncated.
    pub fn most_common(&self, limit: Option<usize>) -> Vec<(String, usize)> {
        let mut ranked = self.entries.clone();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        if let Some(limit) = limit {
            ranked.truncate(limit);
        }
        ranked
    }
}
