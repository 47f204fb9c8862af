use std::collections::HashSet;

use crate::app::{sort_by_score, Application, ResultLabel, SearchResult, SearchResults, Suggestion};
use crate::config::FinderConfig;
use crate::error::FinderResult;
use crate::host::AppRegistry;
use crate::services::categories::CategoryTable;
use crate::services::interpreter::{IntentInterpreter, Interpretation, KeywordInterpreter};
use crate::services::matcher::fuzzy_match;

/// Score penalty for apps found only through an interpreted search term
const SEARCH_TERM_PENALTY: u8 = 5;
const ASSIST_BOOST: u8 = 15;
const ASSIST_CEILING: u8 = 98;
/// Results at or above this score are not boosted by the interpreter
const ASSIST_BOOST_LIMIT: u8 = 95;
const ASSIST_BACKFILL_SCORE: u8 = 85;
const CATEGORY_BOOST: u8 = 10;
const CATEGORY_CEILING: u8 = 95;
/// Results at or above this score are not boosted by category
const CATEGORY_BOOST_LIMIT: u8 = 90;
const CATEGORY_BACKFILL_SCORE: u8 = 70;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOptions {
    /// Propose well-known apps that are not installed when matches are sparse
    pub include_uninstalled: bool,
    /// Run the intent interpreter before ranking
    pub use_assist: bool,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            include_uninstalled: true,
            use_assist: true,
        }
    }
}

fn contains_app(results: &[SearchResult], app: &Application) -> bool {
    let key = app.dedup_key();
    results.iter().any(|r| r.app.dedup_key() == key)
}

fn name_matches_any(app: &Application, names: &[String]) -> bool {
    names.iter().any(|name| app.name_contains(name))
}

/// Append matches for each interpreted search term that the query itself missed
pub fn merge_search_term_results(
    results: &mut Vec<SearchResult>,
    apps: &[Application],
    interpretation: &Interpretation,
    query: &str,
    min_score: u8,
) {
    let query_lower = query.to_lowercase();

    for term in &interpretation.search_terms {
        if term.to_lowercase() == query_lower {
            continue;
        }

        for found in fuzzy_match(apps, term, min_score) {
            if contains_app(results, &found.app) {
                continue;
            }
            let score = found.match_score.saturating_sub(SEARCH_TERM_PENALTY);
            results.push(SearchResult::new(found.app, score, ResultLabel::AiSuggested));
        }
    }
}

/// Raise results whose name contains a suggested app name
pub fn boost_assisted_apps(results: &mut [SearchResult], suggested_names: &[String]) {
    for result in results.iter_mut() {
        if result.match_score < ASSIST_BOOST_LIMIT && name_matches_any(&result.app, suggested_names)
        {
            result.match_score = result
                .match_score
                .saturating_add(ASSIST_BOOST)
                .min(ASSIST_CEILING);
            result.match_reason = ResultLabel::AiRecommended;
        }
    }
}

/// Add installed apps for suggested names that no result covers yet
pub fn add_missing_assisted_apps(
    results: &mut Vec<SearchResult>,
    apps: &[Application],
    suggested_names: &[String],
) {
    for name in suggested_names {
        if results.iter().any(|r| r.app.name_contains(name)) {
            continue;
        }

        let found = apps
            .iter()
            .find(|app| app.name_contains(name) && !contains_app(results, app));
        if let Some(app) = found {
            results.push(SearchResult::new(
                app.clone(),
                ASSIST_BACKFILL_SCORE,
                ResultLabel::AiRecommended,
            ));
        }
    }
}

/// Raise results that are well-known apps of a matched category
pub fn boost_category_matches(results: &mut [SearchResult], common_apps: &[String]) {
    for result in results.iter_mut() {
        if result.match_score < CATEGORY_BOOST_LIMIT && name_matches_any(&result.app, common_apps) {
            result.match_score = result
                .match_score
                .saturating_add(CATEGORY_BOOST)
                .min(CATEGORY_CEILING);
            result.match_reason = ResultLabel::Category;
        }
    }
}

/// Add installed well-known apps of a matched category that are not listed yet
pub fn add_missing_category_matches(
    results: &mut Vec<SearchResult>,
    apps: &[Application],
    common_apps: &[String],
) {
    for app in apps {
        if contains_app(results, app) || !name_matches_any(app, common_apps) {
            continue;
        }
        results.push(SearchResult::new(
            app.clone(),
            CATEGORY_BACKFILL_SCORE,
            ResultLabel::Category,
        ));
    }
}

/// Boost and backfill by category, then re-sort. No-op without matched categories.
pub fn apply_category_matching(
    results: &mut Vec<SearchResult>,
    apps: &[Application],
    matched_categories: &[String],
    query: &str,
    categories: &CategoryTable,
) {
    if matched_categories.is_empty() {
        return;
    }

    let common_apps = categories.common_apps_for_query(query);
    boost_category_matches(results, &common_apps);
    add_missing_category_matches(results, apps, &common_apps);
    sort_by_score(results);
}

/// Well-known apps for the query's categories that are not installed
pub fn suggestions_for_query(
    query: &str,
    installed_names: &[&str],
    categories: &CategoryTable,
    config: &FinderConfig,
) -> Vec<Suggestion> {
    let max = config.search.max_suggestions;
    let installed_lower: Vec<String> = installed_names.iter().map(|n| n.to_lowercase()).collect();
    let mut suggestions: Vec<Suggestion> = Vec::new();

    for category in categories.matching(query) {
        for app_name in &category.common_apps {
            if suggestions.len() >= max {
                return suggestions;
            }
            let app_lower = app_name.to_lowercase();
            if installed_lower.iter().any(|name| name.contains(&app_lower)) {
                continue;
            }
            if suggestions.iter().any(|s| &s.name == app_name) {
                continue;
            }

            let label = category.label();
            suggestions.push(Suggestion {
                name: app_name.clone(),
                category: label.to_string(),
                description: format!("Popular {}", label.to_lowercase()),
                search_url: config.suggestions.search_url_for(app_name),
                official_url: category.official_url(app_name).map(str::to_string),
            });
        }
    }

    suggestions
}

/// Keep the first (highest ranked) entry per application identity
fn dedup_by_identity(results: &mut Vec<SearchResult>) {
    let mut seen = HashSet::new();
    results.retain(|r| seen.insert(r.app.dedup_key().to_string()));
}

/// Ranks installed applications and proposes uninstalled ones
pub struct AppFinder<'a> {
    registry: Box<dyn AppRegistry + 'a>,
    interpreter: Box<dyn IntentInterpreter + 'a>,
    categories: &'a CategoryTable,
    config: FinderConfig,
}

impl<'a> AppFinder<'a> {
    /// Finder with the keyword-only interpreter
    pub fn new(
        registry: impl AppRegistry + 'a,
        categories: &'a CategoryTable,
        config: FinderConfig,
    ) -> Self {
        let interpreter = KeywordInterpreter::new(config.interpreter.max_categories);
        Self {
            registry: Box::new(registry),
            interpreter: Box::new(interpreter),
            categories,
            config,
        }
    }

    pub fn with_interpreter(mut self, interpreter: impl IntentInterpreter + 'a) -> Self {
        self.interpreter = Box::new(interpreter);
        self
    }

    pub fn config(&self) -> &FinderConfig {
        &self.config
    }

    pub fn categories(&self) -> &CategoryTable {
        self.categories
    }

    /// Search installed apps. Never fails: registry errors yield empty results.
    pub fn search(&self, query: &str, options: SearchOptions) -> SearchResults {
        let query = query.trim();
        if query.is_empty() {
            return SearchResults::default();
        }

        match self.try_search(query, options) {
            Ok(results) => results,
            Err(e) => {
                tracing::error!(query, "Error searching apps: {}", e);
                SearchResults::default()
            }
        }
    }

    fn try_search(&self, query: &str, options: SearchOptions) -> FinderResult<SearchResults> {
        let apps = self.registry.list_installed_applications()?;
        let min_score = self.config.search.min_score;

        let interpretation = if options.use_assist
            && self.config.interpreter.enabled
            && query.chars().count() >= self.config.search.assist_min_query_len
        {
            Some(self.interpreter.interpret(query, &apps, self.categories))
        } else {
            None
        };

        let mut installed = fuzzy_match(&apps, query, min_score);

        if let Some(interpretation) = &interpretation {
            merge_search_term_results(&mut installed, &apps, interpretation, query, min_score);

            if !interpretation.suggested_app_names.is_empty() {
                boost_assisted_apps(&mut installed, &interpretation.suggested_app_names);
                add_missing_assisted_apps(
                    &mut installed,
                    &apps,
                    &interpretation.suggested_app_names,
                );
            }
        }

        let matched_categories = match &interpretation {
            Some(i) if !i.suggested_categories.is_empty() => i.suggested_categories.clone(),
            _ => self.categories.find_matching_categories(query),
        };
        apply_category_matching(
            &mut installed,
            &apps,
            &matched_categories,
            query,
            self.categories,
        );

        sort_by_score(&mut installed);
        dedup_by_identity(&mut installed);

        let suggestions = if options.include_uninstalled
            && installed.len() < self.config.search.suggestion_threshold
        {
            let names: Vec<&str> = installed.iter().map(|r| r.app.name.as_str()).collect();
            suggestions_for_query(query, &names, self.categories, &self.config)
        } else {
            Vec::new()
        };

        tracing::debug!(
            query,
            installed = installed.len(),
            suggestions = suggestions.len(),
            "Search finished"
        );

        Ok(SearchResults {
            installed,
            suggestions,
        })
    }
}
