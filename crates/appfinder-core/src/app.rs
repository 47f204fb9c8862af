use std::fmt;

use serde::{Deserialize, Serialize};

/// An installed application as reported by the host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bundle_id: Option<String>,
    pub path: String,
}

impl Application {
    pub fn new(name: impl Into<String>, bundle_id: Option<&str>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bundle_id: bundle_id.map(str::to_string),
            path: path.into(),
        }
    }

    /// Identity used to detect the same application across merge steps:
    /// the bundle identifier when present, otherwise the path.
    pub fn dedup_key(&self) -> &str {
        self.bundle_id.as_deref().unwrap_or(&self.path)
    }

    /// Case-insensitive check that `fragment` appears somewhere in the app name
    pub fn name_contains(&self, fragment: &str) -> bool {
        self.name.to_lowercase().contains(&fragment.to_lowercase())
    }
}

/// Label shown next to a ranked result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResultLabel {
    #[serde(rename = "Exact match")]
    Exact,
    #[serde(rename = "Prefix match")]
    Prefix,
    #[serde(rename = "Contains match")]
    Contains,
    #[serde(rename = "Bundle ID match")]
    BundleId,
    #[serde(rename = "Category match")]
    Category,
    #[serde(rename = "Purpose match")]
    Purpose,
    #[serde(rename = "AI suggested")]
    AiSuggested,
    #[serde(rename = "AI recommended")]
    AiRecommended,
}

impl ResultLabel {
    pub fn label(&self) -> &'static str {
        match self {
            ResultLabel::Exact => "Exact match",
            ResultLabel::Prefix => "Prefix match",
            ResultLabel::Contains => "Contains match",
            ResultLabel::BundleId => "Bundle ID match",
            ResultLabel::Category => "Category match",
            ResultLabel::Purpose => "Purpose match",
            ResultLabel::AiSuggested => "AI suggested",
            ResultLabel::AiRecommended => "AI recommended",
        }
    }
}

impl fmt::Display for ResultLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// An installed application ranked against a query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub app: Application,
    /// Always within 0..=100
    pub match_score: u8,
    pub match_reason: ResultLabel,
}

impl SearchResult {
    pub fn new(app: Application, match_score: u8, match_reason: ResultLabel) -> Self {
        Self {
            app,
            match_score: match_score.min(100),
            match_reason,
        }
    }
}

/// A well-known application that is not installed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    pub name: String,
    pub category: String,
    pub description: String,
    pub search_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub official_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResults {
    pub installed: Vec<SearchResult>,
    pub suggestions: Vec<Suggestion>,
}

impl SearchResults {
    pub fn is_empty(&self) -> bool {
        self.installed.is_empty() && self.suggestions.is_empty()
    }
}

/// Stable sort by score, highest first
pub(crate) fn sort_by_score(results: &mut [SearchResult]) {
    results.sort_by(|a, b| b.match_score.cmp(&a.match_score));
}
