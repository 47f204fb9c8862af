use serde::Serialize;

use crate::app::{ResultLabel, SearchResults, Suggestion};

/// Flattened installed result for tool-style callers
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InstalledEntry {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bundle_id: Option<String>,
    pub path: String,
    pub match_score: u8,
    pub match_reason: ResultLabel,
}

/// Summary of a search, serializable as JSON
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolReport {
    pub query: String,
    pub installed: Vec<InstalledEntry>,
    pub suggestions: Vec<Suggestion>,
    pub summary: String,
}

impl ToolReport {
    pub fn from_results(query: &str, results: &SearchResults) -> Self {
        let installed = results
            .installed
            .iter()
            .map(|r| InstalledEntry {
                name: r.app.name.clone(),
                bundle_id: r.app.bundle_id.clone(),
                path: r.app.path.clone(),
                match_score: r.match_score,
                match_reason: r.match_reason,
            })
            .collect::<Vec<_>>();

        let mut summary = format!("Found {} installed app(s)", installed.len());
        if !results.suggestions.is_empty() {
            summary.push_str(&format!(" and {} suggestion(s)", results.suggestions.len()));
        }

        Self {
            query: query.to_string(),
            installed,
            suggestions: results.suggestions.clone(),
            summary,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::{Application, SearchResult};

    #[test]
    fn test_summary_without_suggestions() {
        let results = SearchResults {
            installed: vec![SearchResult::new(
                Application::new("Mail", Some("com.apple.mail"), "/System/Applications/Mail.app"),
                100,
                ResultLabel::Exact,
            )],
            suggestions: Vec::new(),
        };
        let report = ToolReport::from_results("mail", &results);
        assert_eq!(report.summary, "Found 1 installed app(s)");
        assert_eq!(report.installed[0].bundle_id.as_deref(), Some("com.apple.mail"));
    }

    #[test]
    fn test_summary_with_suggestions_and_json_shape() {
        let results = SearchResults {
            installed: Vec::new(),
            suggestions: vec![Suggestion {
                name: "Warp".to_string(),
                category: "Terminal emulators".to_string(),
                description: "Popular terminal emulators".to_string(),
                search_url: "https://www.google.com/search?q=Warp%20mac%20app".to_string(),
                official_url: None,
            }],
        };
        let report = ToolReport::from_results("terminal", &results);
        assert_eq!(report.summary, "Found 0 installed app(s) and 1 suggestion(s)");

        let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
        assert_eq!(json["query"], "terminal");
        assert_eq!(json["suggestions"][0]["searchUrl"], "https://www.google.com/search?q=Warp%20mac%20app");
        assert!(json["suggestions"][0].get("officialUrl").is_none());
    }
}
