//! Fixed topic taxonomy and the per-category suggested moves.
//!
//! Both tables are compile-time constants. Category detection is an exact
//! keyword match against these vocabularies, nothing more.

/// Category assigned when no vocabulary keyword matched.
pub const GENERAL: &str = "general";

/// Category name -> trigger keywords, in ranking tie-break order.
pub static CATEGORY_KEYWORDS: &[(&str, &[&str])] = &[
    (
        "money",
        &["money", "income", "earn", "financial", "pricing", "cost"],
    ),
    (
        "career",
        &["career", "work", "job", "profession", "freelance", "consulting"],
    ),
    (
        "location",
        &["where", "city", "place", "country", "move", "location"],
    ),
    ("care", &["child", "care", "nurture", "support", "heal"]),
    (
        "creative",
        &["art", "music", "creative", "design", "paint", "write"],
    ),
    (
        "movement",
        &["body", "movement", "somatic", "dance", "physical"],
    ),
];

static SUGGESTED_MOVES: &[(&str, &[&str])] = &[
    (
        "money",
        &[
            "Map income streams mentioned in the chart.",
            "Ask for recent earning experiments before offering ideas.",
        ],
    ),
    (
        "career",
        &[
            "Contrast house rulers related to work vs. meaning.",
            "Offer a pacing cue before diving into 10th-house themes.",
        ],
    ),
    (
        "location",
        &[
            "Relate planetary dignities to geographies or climates.",
            "Invite the user to sense how place affects their nervous system.",
        ],
    ),
    (
        "care",
        &[
            "Notice Moon/6th-house cues about service orientation.",
            "Use guarded questions about emotional capacity.",
        ],
    ),
    (
        "creative",
        &[
            "Surface mythic references tied to Venus/Mercury placements.",
            "Balance praise with an observation about creative pacing.",
        ],
    ),
    (
        "movement",
        &[
            "Tie Mars/ASC signatures to somatic practices.",
            "Offer a pause for the user to notice bodily cues.",
        ],
    ),
    (
        GENERAL,
        &[
            "Stay slow; mirror back phrasing instead of inventing agendas.",
            "Track relationship depth to modulate question frequency.",
        ],
    ),
];

/// Suggested next moves for a category, falling back to the general list.
pub fn suggested_moves(category: &str) -> &'static [&'static str] {
    SUGGESTED_MOVES
        .iter()
        .find(|(name, _)| *name == category)
        .or_else(|| SUGGESTED_MOVES.iter().find(|(name, _)| *name == GENERAL))
        .map(|(_, moves)| *moves)
        .unwrap_or(&[])
}

/// Rank taxonomy categories by summed keyword frequency.
///
/// `keywords` is a ranked `(keyword, count)` list. Returns at most `limit`
/// category names by descending weight (ties in taxonomy order), or exactly
/// `["general"]` when nothing matched.
pub fn detect_categories(keywords: &[(String, usize)], limit: usize) -> Vec<String> {
    let mut hits: Vec<(&str, usize)> = CATEGORY_KEYWORDS
        .iter()
        .filter_map(|(category, vocab)| {
            let weight: usize = keywords
                .iter()
                .filter(|(kw, _)| vocab.contains(&kw.as_str()))
                .map(|(_, freq)| freq)
                .sum();
            (weight > 0).then_some((*category, weight))
        })
        .collect();

    if hits.is_empty() {
        return vec![GENERAL.to_string()];
    }

    hits.sort_by(|a, b| b.1.cmp(&a.1));
    hits.into_iter()
        .take(limit)
        .map(|(name, _)| name.to_string())
        .collect()
}
