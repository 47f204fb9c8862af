use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{FinderError, FinderResult};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FinderConfig {
    pub search: SearchConfig,
    pub interpreter: InterpreterConfig,
    pub suggestions: SuggestionConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Minimum fuzzy score an app needs to be listed
    pub min_score: u8,
    /// Suggestions are only computed below this many installed results
    pub suggestion_threshold: usize,
    pub max_suggestions: usize,
    /// Interpretation runs when the trimmed query is at least this long
    pub assist_min_query_len: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InterpreterConfig {
    pub enabled: bool,
    pub model: Option<String>,
    pub max_categories: usize,
    pub max_app_names: usize,
    pub max_search_terms: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SuggestionConfig {
    /// Web search URL, `{query}` is replaced with the encoded query
    pub search_url: String,
    /// Appended to the app name before searching
    pub query_suffix: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            min_score: 35,
            suggestion_threshold: 3,
            max_suggestions: 5,
            assist_min_query_len: 3,
        }
    }
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            model: None,
            max_categories: 3,
            max_app_names: 5,
            max_search_terms: 3,
        }
    }
}

impl Default for SuggestionConfig {
    fn default() -> Self {
        Self {
            search_url: "https://www.google.com/search?q={query}".to_string(),
            query_suffix: "mac app".to_string(),
        }
    }
}

impl SuggestionConfig {
    /// Build the web search URL for an app that is not installed
    pub fn search_url_for(&self, app_name: &str) -> String {
        let query = if self.query_suffix.is_empty() {
            app_name.to_string()
        } else {
            format!("{} {}", app_name, self.query_suffix)
        };
        self.search_url
            .replace("{query}", &urlencoding::encode(&query))
    }
}

impl FinderConfig {
    /// Get the config file path
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| {
                dirs::home_dir()
                    .map(|h| h.join(".config"))
                    .unwrap_or_else(|| PathBuf::from("/tmp"))
            })
            .join("appfinder")
            .join("config.toml")
    }

    /// Load config from the default path, or return defaults if it is missing or broken
    pub fn load() -> Self {
        let path = Self::config_path();

        if !path.exists() {
            return Self::default();
        }

        match Self::load_from(&path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(path = %path.display(), "Failed to load config: {}", e);
                Self::default()
            }
        }
    }

    pub fn load_from(path: &Path) -> FinderResult<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> FinderResult<Self> {
        let mut config: Self = toml::from_str(content)?;
        config.validate();
        Ok(config)
    }

    /// Validate and clamp config values to acceptable ranges
    fn validate(&mut self) {
        self.search.min_score = self.search.min_score.min(100);
        self.search.max_suggestions = self.search.max_suggestions.clamp(1, 20);
        self.search.suggestion_threshold = self.search.suggestion_threshold.min(50);
        self.interpreter.max_categories = self.interpreter.max_categories.clamp(1, 10);
        self.interpreter.max_app_names = self.interpreter.max_app_names.clamp(1, 10);
        self.interpreter.max_search_terms = self.interpreter.max_search_terms.clamp(1, 10);
    }

    /// Save config to file
    pub fn save(&self, path: &Path) -> FinderResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                FinderError::Config(format!("Failed to create config directory: {}", e))
            })?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| FinderError::Config(format!("Failed to serialize config: {}", e)))?;

        fs::write(path, content)
            .map_err(|e| FinderError::Config(format!("Failed to write config: {}", e)))?;

        Ok(())
    }
}
