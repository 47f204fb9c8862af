use crate::app::{sort_by_score, Application, ResultLabel, SearchResult};

use super::scoring::{score, MatchReason, MatchScore};

/// Default minimum score for an app to be listed
pub const DEFAULT_MIN_SCORE: u8 = 35;

impl From<MatchReason> for ResultLabel {
    fn from(reason: MatchReason) -> Self {
        match reason {
            MatchReason::Exact => ResultLabel::Exact,
            MatchReason::Prefix => ResultLabel::Prefix,
            MatchReason::Contains => ResultLabel::Contains,
            MatchReason::BundleId => ResultLabel::BundleId,
            MatchReason::Category => ResultLabel::Category,
            MatchReason::Purpose => ResultLabel::Purpose,
        }
    }
}

/// Score one app against the query, keeping whichever of name and bundle id
/// scores strictly higher (the name wins ties).
fn best_match(app: &Application, query: &str) -> (MatchScore, bool) {
    let name_match = score(&app.name, query);
    let bundle_match = app
        .bundle_id
        .as_deref()
        .map(|id| score(id, query))
        .unwrap_or(MatchScore::NONE);

    if bundle_match.score > name_match.score {
        (bundle_match, true)
    } else {
        (name_match, false)
    }
}

/// Rank `apps` against `query`, dropping anything below `min_score`.
/// Results come back sorted by score, ties in input order.
pub fn fuzzy_match(apps: &[Application], query: &str, min_score: u8) -> Vec<SearchResult> {
    if query.is_empty() {
        return Vec::new();
    }

    let mut results: Vec<SearchResult> = apps
        .iter()
        .filter_map(|app| {
            let (best, from_bundle_id) = best_match(app, query);
            if best.score < min_score {
                return None;
            }

            let label = if from_bundle_id && best.is_match() {
                ResultLabel::BundleId
            } else {
                best.reason.into()
            };
            Some(SearchResult::new(app.clone(), best.score, label))
        })
        .collect();

    sort_by_score(&mut results);
    results
}
