use std::fmt;

/// Why a target matched a query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchReason {
    Exact,
    Prefix,
    Contains,
    BundleId,
    Category,
    Purpose,
}

impl fmt::Display for MatchReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = match self {
            MatchReason::Exact => "exact",
            MatchReason::Prefix => "prefix",
            MatchReason::Contains => "contains",
            MatchReason::BundleId => "bundleId",
            MatchReason::Category => "category",
            MatchReason::Purpose => "purpose",
        };
        f.write_str(code)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchScore {
    /// 0..=100
    pub score: u8,
    pub reason: MatchReason,
}

impl MatchScore {
    /// Sentinel for "no match"; the reason is never read downstream
    pub const NONE: MatchScore = MatchScore {
        score: 0,
        reason: MatchReason::Contains,
    };

    fn new(score: f64, reason: MatchReason) -> Self {
        Self {
            score: score.round().clamp(0.0, 100.0) as u8,
            reason,
        }
    }

    pub fn is_match(&self) -> bool {
        self.score > 0
    }
}

/// Lowercase, trim and collapse internal whitespace runs to a single space
pub fn normalize(s: &str) -> String {
    s.to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn normalize_separators(s: &str) -> String {
    s.replace(['-', '_'], " ")
}

/// Split on runs of whitespace, `-` and `_`. Empty fragments from leading or
/// trailing separators are dropped.
fn split_words(s: &str) -> Vec<&str> {
    s.split(|c: char| c.is_whitespace() || c == '-' || c == '_')
        .filter(|w| !w.is_empty())
        .collect()
}

fn char_ratio(part: &str, whole: &str) -> f64 {
    part.chars().count() as f64 / whole.chars().count() as f64
}

type Strategy = fn(&str, &str) -> Option<MatchScore>;

/// Evaluated in order; the first strategy that matches decides the score.
const STRATEGIES: [(&str, Strategy); 5] = [
    ("exact", exact_match),
    ("word", word_match),
    ("prefix", prefix_match),
    ("contains", contains_match),
    ("acronym", acronym_match),
];

fn exact_match(target: &str, query: &str) -> Option<MatchScore> {
    if target == query || normalize_separators(target) == normalize_separators(query) {
        return Some(MatchScore::new(100.0, MatchReason::Exact));
    }
    None
}

fn word_match(target: &str, query: &str) -> Option<MatchScore> {
    let target_words = split_words(target);

    if target_words.iter().any(|w| *w == query) {
        return Some(MatchScore::new(100.0, MatchReason::Exact));
    }

    let query_words = split_words(query);
    if query_words.len() > 1
        && query_words
            .iter()
            .all(|qw| target_words.iter().any(|tw| tw.contains(qw)))
    {
        return Some(MatchScore::new(85.0, MatchReason::Prefix));
    }

    None
}

fn prefix_match(target: &str, query: &str) -> Option<MatchScore> {
    if target.starts_with(query) {
        let score = 85.0 + char_ratio(query, target) * 10.0;
        return Some(MatchScore::new(score, MatchReason::Prefix));
    }

    split_words(target)
        .into_iter()
        .find(|word| word.starts_with(query))
        .map(|word| MatchScore::new(75.0 + char_ratio(query, word) * 10.0, MatchReason::Prefix))
}

fn contains_match(target: &str, query: &str) -> Option<MatchScore> {
    if !target.contains(query) {
        return None;
    }

    let ratio = char_ratio(query, target);
    let base = if ratio > 0.3 { 55.0 } else { 40.0 };
    Some(MatchScore::new(base + ratio * 15.0, MatchReason::Contains))
}

fn acronym_match(target: &str, query: &str) -> Option<MatchScore> {
    let acronym: String = split_words(target)
        .into_iter()
        .filter_map(|w| w.chars().next())
        .collect();

    if acronym.contains(query) {
        return Some(MatchScore::new(45.0, MatchReason::Contains));
    }
    None
}

/// Score how well `target` matches `query`. Both are normalized first.
pub fn score(target: &str, query: &str) -> MatchScore {
    let target = normalize(target);
    let query = normalize(query);

    if query.is_empty() {
        return MatchScore::NONE;
    }

    STRATEGIES
        .iter()
        .find_map(|(_, strategy)| strategy(&target, &query))
        .unwrap_or(MatchScore::NONE)
}

/// Name of the strategy that decides the score, if any
pub fn deciding_strategy(target: &str, query: &str) -> Option<&'static str> {
    let target = normalize(target);
    let query = normalize(query);

    if query.is_empty() {
        return None;
    }

    STRATEGIES
        .iter()
        .find(|(_, strategy)| strategy(&target, &query).is_some())
        .map(|(name, _)| *name)
}
