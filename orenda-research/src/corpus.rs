//! Ground-truth corpus: recorded sessions loaded from the parsed transcript JSON.
//!
//! The payload shape is produced upstream by the transcript processor:
//!
//! ```json
//! {"sessions": [{"session_id": "s1", "source_file": "s1.txt",
//!                "turns": [{"speaker": "user", "text": "..."}]}]}
//! ```
//!
//! A corpus is loaded once and never mutated afterwards.

use serde::Serialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::error::{ResearchError, Result};

/// Label used when a session record omits its id or source file.
const UNKNOWN: &str = "unknown";

/// Who produced a turn, derived from the free-text speaker label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Speaker {
    User,
    Assistant,
    Other,
}

impl Speaker {
    /// Classify a speaker label by case-insensitive prefix.
    pub fn classify(label: &str) -> Self {
        let lower = label.to_lowercase();
        if lower.starts_with("user") {
            Self::User
        } else if lower.starts_with("assistant") {
            Self::Assistant
        } else {
            Self::Other
        }
    }
}

/// One utterance within a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Turn {
    speaker: String,
    text: String,
}

impl Turn {
    pub fn new(speaker: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            speaker: speaker.into(),
            text: text.into(),
        }
    }

    pub fn speaker(&self) -> &str {
        &self.speaker
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn role(&self) -> Speaker {
        Speaker::classify(&self.speaker)
    }

    pub fn is_user(&self) -> bool {
        self.role() == Speaker::User
    }

    pub fn is_assistant(&self) -> bool {
        self.role() == Speaker::Assistant
    }
}

/// An ordered transcript of turns from one recorded conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Session {
    session_id: String,
    source_file: String,
    turns: Vec<Turn>,
}

impl Session {
    /// Build a session. Turns with empty text are dropped.
    pub fn new(
        session_id: impl Into<String>,
        source_file: impl Into<String>,
        turns: impl IntoIterator<Item = Turn>,
    ) -> Self {
        Self {
            session_id: session_id.into(),
            source_file: source_file.into(),
            turns: turns.into_iter().filter(|t| !t.text.is_empty()).collect(),
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn source_file(&self) -> &str {
        &self.source_file
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn user_turns(&self) -> impl Iterator<Item = &Turn> {
        self.turns.iter().filter(|t| t.is_user())
    }

    pub fn assistant_turns(&self) -> impl Iterator<Item = &Turn> {
        self.turns.iter().filter(|t| t.is_assistant())
    }

    pub fn user_turn_count(&self) -> usize {
        self.user_turns().count()
    }

    pub fn assistant_turn_count(&self) -> usize {
        self.assistant_turns().count()
    }

    /// Rough token count at four characters per token. Not a tokenizer;
    /// only stable across calls.
    pub fn token_estimate(&self) -> usize {
        self.turns.iter().map(|t| t.text.chars().count()).sum::<usize>() / 4
    }
}

/// The loaded collection of ground-truth sessions.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    path: Option<PathBuf>,
    sessions: Vec<Session>,
}

impl Corpus {
    /// Load and validate the corpus file at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ResearchError::missing_source(path));
        }

        let content = std::fs::read_to_string(path)?;
        let mut corpus = Self::from_json(&content)?;
        corpus.path = Some(path.to_path_buf());

        info!(
            path = %path.display(),
            sessions = corpus.len(),
            turns = corpus.total_turns(),
            "Loaded ground truth corpus"
        );
        Ok(corpus)
    }

    /// Parse a corpus from a JSON string.
    pub fn from_json(content: &str) -> Result<Self> {
        let raw: Value = serde_json::from_str(content)?;
        Self::from_value(&raw)
    }

    /// Build a corpus from an already-parsed payload.
    pub fn from_value(raw: &Value) -> Result<Self> {
        let entries = raw
            .get("sessions")
            .and_then(Value::as_array)
            .ok_or_else(|| ResearchError::malformed("payload must contain a 'sessions' list"))?;

        let sessions = entries
            .iter()
            .enumerate()
            .map(|(idx, entry)| parse_session(idx, entry))
            .collect::<Result<Vec<_>>>()?;

        if sessions.is_empty() {
            warn!("Ground truth corpus has no sessions");
        }

        Ok(Self {
            path: None,
            sessions,
        })
    }

    /// Build a corpus directly from sessions (tests, embedding hosts).
    pub fn from_sessions(sessions: Vec<Session>) -> Self {
        Self {
            path: None,
            sessions,
        }
    }

    /// Where the corpus was loaded from, if it came from disk.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Session> {
        self.sessions.iter()
    }

    pub fn sessions(&self) -> &[Session] {
        &self.sessions
    }

    pub fn get(&self, index: usize) -> Option<&Session> {
        self.sessions.get(index)
    }

    pub fn total_turns(&self) -> usize {
        self.sessions.iter().map(|s| s.turns.len()).sum()
    }

    pub fn total_token_estimate(&self) -> usize {
        self.sessions.iter().map(Session::token_estimate).sum()
    }

    /// The first `n` sessions, or all of them if the corpus is smaller.
    pub fn head(&self, n: usize) -> &[Session] {
        &self.sessions[..n.min(self.sessions.len())]
    }
}

impl<'a> IntoIterator for &'a Corpus {
    type Item = &'a Session;
    type IntoIter = std::slice::Iter<'a, Session>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

fn parse_session(idx: usize, entry: &Value) -> Result<Session> {
    let obj = entry
        .as_object()
        .ok_or_else(|| ResearchError::malformed(format!("session #{idx} is not an object")))?;

    let session_id = label_field(obj.get("session_id"));
    let source_file = label_field(obj.get("source_file"));

    let mut turns = Vec::new();
    for raw_turn in obj.get("turns").and_then(Value::as_array).into_iter().flatten() {
        let Some(turn) = raw_turn.as_object() else {
            continue;
        };
        let text = match turn.get("text").and_then(Value::as_str) {
            Some(text) if !text.is_empty() => text,
            _ => continue,
        };
        let speaker = turn.get("speaker").and_then(Value::as_str).ok_or_else(|| {
            ResearchError::malformed(format!(
                "session '{session_id}' has a turn without a string 'speaker'"
            ))
        })?;
        turns.push(Turn::new(speaker, text));
    }

    Ok(Session::new(session_id, source_file, turns))
}

fn label_field(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => UNKNOWN.to_string(),
        Some(other) => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload() -> Value {
        json!({
            "sessions": [
                {
                    "session_id": "s1",
                    "source_file": "s1.txt",
                    "turns": [
                        {"speaker": "user", "text": "Hello there friend"},
                        {"speaker": "assistant", "text": "Hi!"},
                        {"speaker": "user", "text": ""},
                        {"speaker": "user"}
                    ]
                },
                {"session_id": "s2", "source_file": "s2.txt", "turns": []}
            ]
        })
    }

    #[test]
    fn test_speaker_classification() {
        assert_eq!(Speaker::classify("User"), Speaker::User);
        assert_eq!(Speaker::classify("user_42"), Speaker::User);
        assert_eq!(Speaker::classify("ASSISTANT"), Speaker::Assistant);
        assert_eq!(Speaker::classify("narrator"), Speaker::Other);
        assert_eq!(Speaker::classify(""), Speaker::Other);
    }

    #[test]
    fn test_empty_text_turns_dropped() {
        let corpus = Corpus::from_value(&payload()).unwrap();
        assert_eq!(corpus.len(), 2);
        assert_eq!(corpus.total_turns(), 2);
        let s1 = corpus.get(0).unwrap();
        assert_eq!(s1.user_turn_count(), 1);
        assert_eq!(s1.assistant_turn_count(), 1);
        assert!(corpus.get(1).unwrap().is_empty());
    }

    #[test]
    fn test_session_new_enforces_nonempty_text() {
        let session = Session::new("s", "f", vec![Turn::new("user", ""), Turn::new("user", "ok")]);
        assert_eq!(session.turns().len(), 1);
    }

    #[test]
    fn test_token_estimate() {
        // 18 + 3 chars = 21 -> 5
        let corpus = Corpus::from_value(&payload()).unwrap();
        assert_eq!(corpus.get(0).unwrap().token_estimate(), 5);
        assert_eq!(corpus.total_token_estimate(), 5);
    }

    #[test]
    fn test_missing_sessions_key_is_malformed() {
        let err = Corpus::from_value(&json!({"items": []})).unwrap_err();
        assert!(matches!(err, ResearchError::MalformedSource(_)));
        let err = Corpus::from_value(&json!({"sessions": {"s1": {}}})).unwrap_err();
        assert!(matches!(err, ResearchError::MalformedSource(_)));
    }

    #[test]
    fn test_missing_labels_default_to_unknown() {
        let corpus = Corpus::from_value(&json!({"sessions": [{}]})).unwrap();
        let session = corpus.get(0).unwrap();
        assert_eq!(session.session_id(), "unknown");
        assert_eq!(session.source_file(), "unknown");
        assert!(session.is_empty());
    }

    #[test]
    fn test_turn_without_speaker_is_malformed() {
        let raw = json!({"sessions": [{"turns": [{"text": "orphan"}]}]});
        assert!(matches!(
            Corpus::from_value(&raw),
            Err(ResearchError::MalformedSource(_))
        ));
    }

    #[test]
    fn test_head_and_iteration() {
        let corpus = Corpus::from_value(&payload()).unwrap();
        assert_eq!(corpus.head(0).len(), 0);
        assert_eq!(corpus.head(1)[0].session_id(), "s1");
        assert_eq!(corpus.head(10).len(), 2);

        let first: Vec<_> = corpus.iter().map(Session::session_id).collect();
        let second: Vec<_> = (&corpus).into_iter().map(Session::session_id).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Corpus::load(dir.path().join("absent.json")).unwrap_err();
        assert!(err.is_missing_source());
    }

    #[test]
    fn test_load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ground_truth_sessions.json");
        std::fs::write(&path, payload().to_string()).unwrap();

        let corpus = Corpus::load(&path).unwrap();
        assert_eq!(corpus.path(), Some(path.as_path()));
        assert_eq!(corpus.len(), 2);
    }

    #[test]
    fn test_load_invalid_json_is_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{\"sessions\": [").unwrap();
        assert!(matches!(
            Corpus::load(&path),
            Err(ResearchError::MalformedSource(_))
        ));
    }
}
