//! The synthetic research engine.
//!
//! Derives keyword-based archetype profiles from the ground-truth corpus,
//! aggregates them into corpus analytics, turns the analytics into ranked
//! method suggestions, and samples reproducible transcript excerpts. Nothing
//! here calls a model; the same corpus always yields the same output.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, OnceLock, PoisonError};
use tracing::{debug, info};

use crate::config::{DEFAULT_SEED, ResearchConfig};
use crate::corpus::{Corpus, Session, Turn};
use crate::error::Result;
use crate::keywords::KeywordCounter;
use crate::report::{CategorySpread, CorpusAnalytics, MethodSuggestion, SessionProfile};
use crate::taxonomy;

/// Keywords kept on each archetype profile.
const PROFILE_KEYWORD_LIMIT: usize = 8;
/// Categories kept on each archetype profile.
const DOMINANT_CATEGORY_LIMIT: usize = 3;
/// User lines quoted on each archetype profile.
const REPRESENTATIVE_LINE_LIMIT: usize = 3;
/// Corpus-wide keywords reported by the analytics view.
const ANALYTICS_KEYWORD_LIMIT: usize = 12;

/// Whether the profile cache has been populated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Cold,
    Warm,
}

/// Deterministic, model-free analytics over a [`Corpus`].
///
/// The profile cache is filled on first use and lives as long as the engine;
/// build a new engine to pick up a reloaded corpus.
#[derive(Debug)]
pub struct ResearchEngine {
    corpus: Arc<Corpus>,
    seed: u64,
    rng: Mutex<StdRng>,
    profiles: OnceLock<Vec<SessionProfile>>,
    derivations: AtomicUsize,
}

impl ResearchEngine {
    /// Create an engine with the default sampling seed.
    pub fn new(corpus: impl Into<Arc<Corpus>>) -> Self {
        Self::with_seed(corpus, DEFAULT_SEED)
    }

    pub fn with_seed(corpus: impl Into<Arc<Corpus>>, seed: u64) -> Self {
        Self {
            corpus: corpus.into(),
            seed,
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
            profiles: OnceLock::new(),
            derivations: AtomicUsize::new(0),
        }
    }

    /// Load the corpus named by `config` and seed the engine from it.
    pub fn from_config(config: &ResearchConfig) -> Result<Self> {
        let corpus = Corpus::load(&config.corpus_path)?;
        Ok(Self::with_seed(corpus, config.seed))
    }

    pub fn corpus(&self) -> &Corpus {
        &self.corpus
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn state(&self) -> EngineState {
        if self.profiles.get().is_some() {
            EngineState::Warm
        } else {
            EngineState::Cold
        }
    }

    /// How many times the profile cache has been derived. Stays at 1 once warm.
    pub fn profile_derivations(&self) -> usize {
        self.derivations.load(Ordering::Relaxed)
    }

    /// Archetype profiles for every non-empty session, truncated to
    /// `max_archetypes`. The full list is derived once and reused.
    pub fn generate_archetypes(&self, max_archetypes: usize) -> &[SessionProfile] {
        let profiles = self.profiles();
        &profiles[..max_archetypes.min(profiles.len())]
    }

    /// Sample `count` contiguous excerpts of up to `max_turns` turns.
    ///
    /// Each draw picks a session uniformly, then a start offset uniformly in
    /// `0..=len - max_turns`. A draw that lands on an empty session is
    /// consumed without output, so fewer than `count` excerpts may come back.
    pub fn simulate_sessions(&self, count: usize, max_turns: usize) -> Vec<Vec<Turn>> {
        let sessions = self.corpus.sessions();
        if sessions.is_empty() {
            return Vec::new();
        }

        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        let mut simulations = Vec::new();
        for _ in 0..count {
            let session = &sessions[rng.gen_range(0..sessions.len())];
            let turns = session.turns();
            if turns.is_empty() {
                debug!(session_id = session.session_id(), "Skipped empty session draw");
                continue;
            }

            let start = rng.gen_range(0..=turns.len().saturating_sub(max_turns));
            let end = (start + max_turns).min(turns.len());
            simulations.push(turns[start..end].to_vec());
        }

        debug!(
            requested = count,
            produced = simulations.len(),
            max_turns,
            "Simulated sessions"
        );
        simulations
    }

    /// Corpus-wide totals, top keywords and the category spread of the
    /// cached archetypes. Recomputed on every call.
    pub fn analyze_sessions(&self) -> CorpusAnalytics {
        let total_sessions = self.corpus.len();
        let total_turns = self.corpus.total_turns();
        let avg_turns_per_session = if total_sessions == 0 {
            0.0
        } else {
            round2(total_turns as f64 / total_sessions as f64)
        };

        let mut keywords = KeywordCounter::new();
        for session in self.corpus.iter() {
            for (keyword, freq) in KeywordCounter::from_session(session).most_common(None) {
                keywords.add(keyword, freq);
            }
        }

        let category_spread = self.category_spread();

        debug!(
            total_sessions,
            total_turns,
            categories = category_spread.len(),
            "Analyzed sessions"
        );

        CorpusAnalytics {
            total_sessions,
            total_turns,
            avg_turns_per_session,
            token_estimate: self.corpus.total_token_estimate(),
            top_keywords: keywords.most_common(Some(ANALYTICS_KEYWORD_LIMIT)),
            category_spread,
        }
    }

    /// Method ideas for the most-mentioned categories, best first.
    pub fn generate_methods(&self, max_methods: usize) -> Vec<MethodSuggestion> {
        let analysis = self.analyze_sessions();
        let methods: Vec<_> = analysis
            .category_spread
            .ranked()
            .into_iter()
            .take(max_methods)
            .map(|(category, mentions)| {
                MethodSuggestion::for_category(
                    category,
                    mentions,
                    taxonomy::suggested_moves(category),
                )
            })
            .collect();

        debug!(methods = methods.len(), "Generated method suggestions");
        methods
    }

    fn profiles(&self) -> &[SessionProfile] {
        self.profiles.get_or_init(|| {
            self.derivations.fetch_add(1, Ordering::Relaxed);
            let profiles: Vec<_> = self
                .corpus
                .iter()
                .filter(|session| !session.is_empty())
                .map(derive_profile)
                .collect();
            info!(
                profiles = profiles.len(),
                skipped = self.corpus.len() - profiles.len(),
                "Archetype cache warmed"
            );
            profiles
        })
    }

    fn category_spread(&self) -> CategorySpread {
        let mut spread = CategorySpread::new();
        for profile in self.profiles() {
            for category in &profile.dominant_categories {
                spread.increment(category);
            }
        }
        spread
    }
}

fn derive_profile(session: &Session) -> SessionProfile {
    let keywords = KeywordCounter::from_session(session).most_common(None);
    let dominant_categories = taxonomy::detect_categories(&keywords, DOMINANT_CATEGORY_LIMIT);

    SessionProfile {
        session_id: session.session_id().to_string(),
        dominant_categories,
        top_keywords: keywords
            .into_iter()
            .take(PROFILE_KEYWORD_LIMIT)
            .map(|(keyword, _)| keyword)
            .collect(),
        representative_user_lines: representative_user_lines(session, REPRESENTATIVE_LINE_LIMIT),
        token_estimate: session.token_estimate(),
    }
}

/// The first `limit` user turns with whitespace collapsed, skipping blanks.
fn representative_user_lines(session: &Session, limit: usize) -> Vec<String> {
    session
        .user_turns()
        .map(|turn| turn.text().split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|line| !line.is_empty())
        .take(limit)
        .collect()
}

/// Round to two decimals from the exact binary value, half to even.
fn round2(value: f64) -> f64 {
    format!("{value:.2}").parse().unwrap_or(value)
}
