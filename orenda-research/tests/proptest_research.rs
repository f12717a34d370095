//! Property-based tests for the corpus and research engine using proptest.

use proptest::prelude::*;

use orenda_research::{Corpus, ResearchEngine, Session, Turn};

fn arb_turn() -> impl Strategy<Value = Turn> {
    (
        prop_oneof![Just("user"), Just("assistant"), Just("narrator")],
        prop_oneof![
            Just(String::new()),
            "[a-z]{1,8}( [a-z]{1,8}){0,6}",
            Just("pricing income career".to_string()),
        ],
    )
        .prop_map(|(speaker, text)| Turn::new(speaker, text))
}

fn arb_session() -> impl Strategy<Value = Session> {
    ("[a-z0-9]{1,6}", prop::collection::vec(arb_turn(), 0..8))
        .prop_map(|(id, turns)| Session::new(id.clone(), format!("{id}.txt"), turns))
}

fn arb_corpus() -> impl Strategy<Value = Corpus> {
    prop::collection::vec(arb_session(), 0..10).prop_map(Corpus::from_sessions)
}

// --- Corpus properties ---

proptest! {
    #[test]
    fn total_turns_is_sum_of_sessions(corpus in arb_corpus()) {
        let summed: usize = corpus.iter().map(|s| s.turns().len()).sum();
        prop_assert_eq!(corpus.total_turns(), summed);
        prop_assert!(corpus.iter().flat_map(|s| s.turns()).all(|t| !t.text().is_empty()));
    }

    #[test]
    fn head_never_exceeds_request(corpus in arb_corpus(), n in 0usize..20) {
        let head = corpus.head(n);
        prop_assert_eq!(head.len(), n.min(corpus.len()));
    }
}

// --- Engine properties ---

proptest! {
    #[test]
    fn archetypes_respect_limit_and_skip_empty(corpus in arb_corpus(), k in 0usize..12) {
        let non_empty = corpus.iter().filter(|s| !s.is_empty()).count();
        let engine = ResearchEngine::new(corpus);
        let profiles = engine.generate_archetypes(k);
        prop_assert!(profiles.len() <= k);
        prop_assert_eq!(profiles.len(), k.min(non_empty));
        for profile in profiles {
            prop_assert!(!profile.dominant_categories.is_empty());
            prop_assert!(profile.dominant_categories.len() <= 3);
            prop_assert!(profile.top_keywords.len() <= 8);
            prop_assert!(profile.representative_user_lines.len() <= 3);
        }
        prop_assert_eq!(engine.generate_archetypes(usize::MAX).len(), non_empty);
        prop_assert!(engine.profile_derivations() <= 1);
    }

    #[test]
    fn analytics_never_panics(corpus in arb_corpus()) {
        let engine = ResearchEngine::new(corpus);
        let analytics = engine.analyze_sessions();
        if analytics.total_sessions == 0 {
            prop_assert_eq!(analytics.avg_turns_per_session, 0.0);
        }
        prop_assert!(analytics.top_keywords.len() <= 12);
        let spread_total: usize = analytics.category_spread.iter().map(|(_, c)| c).sum();
        let profile_total: usize = engine
            .generate_archetypes(usize::MAX)
            .iter()
            .map(|p| p.dominant_categories.len())
            .sum();
        prop_assert_eq!(spread_total, profile_total);
        prop_assert!(engine.generate_methods(2).len() <= 2);
    }

    #[test]
    fn simulation_is_deterministic(corpus in arb_corpus(), seed in any::<u64>(), count in 0usize..8, max_turns in 1usize..5) {
        let corpus = std::sync::Arc::new(corpus);
        let a = ResearchEngine::with_seed(std::sync::Arc::clone(&corpus), seed);
        let b = ResearchEngine::with_seed(corpus, seed);
        let first = a.simulate_sessions(count, max_turns);
        prop_assert!(first.len() <= count);
        prop_assert!(first.iter().all(|segment| segment.len() <= max_turns));
        prop_assert_eq!(first, b.simulate_sessions(count, max_turns));
    }
}
