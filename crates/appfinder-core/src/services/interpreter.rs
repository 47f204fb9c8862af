use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::app::Application;
use crate::config::InterpreterConfig;
use crate::error::{FinderError, FinderResult};
use crate::host::{AskOptions, Creativity, LanguageBackend};

use super::categories::CategoryTable;

/// Structured reading of a free-text query
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Interpretation {
    pub original_query: String,
    pub interpreted_intent: String,
    pub suggested_categories: Vec<String>,
    pub suggested_app_names: Vec<String>,
    pub search_terms: Vec<String>,
}

impl Interpretation {
    /// Keyword-only reading: the query itself plus the first matching categories
    pub fn simple(query: &str, categories: &CategoryTable, max_categories: usize) -> Self {
        Self {
            original_query: query.to_string(),
            interpreted_intent: query.to_string(),
            suggested_categories: categories
                .matching(query)
                .take(max_categories)
                .map(|c| c.id.clone())
                .collect(),
            suggested_app_names: Vec::new(),
            search_terms: vec![query.to_string()],
        }
    }
}

/// Turns a query into an [`Interpretation`]. Implementations never fail:
/// anything that goes wrong degrades to a keyword reading.
pub trait IntentInterpreter: Send + Sync {
    fn interpret(
        &self,
        query: &str,
        installed: &[Application],
        categories: &CategoryTable,
    ) -> Interpretation;
}

/// Deterministic interpreter driven only by the category keywords
#[derive(Debug, Clone, Copy)]
pub struct KeywordInterpreter {
    max_categories: usize,
}

impl KeywordInterpreter {
    pub fn new(max_categories: usize) -> Self {
        Self { max_categories }
    }
}

impl Default for KeywordInterpreter {
    fn default() -> Self {
        Self::new(InterpreterConfig::default().max_categories)
    }
}

impl IntentInterpreter for KeywordInterpreter {
    fn interpret(
        &self,
        query: &str,
        _installed: &[Application],
        categories: &CategoryTable,
    ) -> Interpretation {
        Interpretation::simple(query, categories, self.max_categories)
    }
}

/// Interpreter that asks a [`LanguageBackend`] and falls back to keywords
pub struct AssistedInterpreter<B> {
    backend: B,
    config: InterpreterConfig,
}

impl<B: LanguageBackend> AssistedInterpreter<B> {
    pub fn new(backend: B, config: InterpreterConfig) -> Self {
        Self { backend, config }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    fn fallback(&self) -> KeywordInterpreter {
        KeywordInterpreter::new(self.config.max_categories)
    }

    fn ask(
        &self,
        query: &str,
        installed: &[Application],
        categories: &CategoryTable,
    ) -> FinderResult<Interpretation> {
        let prompt = build_prompt(query, installed, categories);
        let options = AskOptions {
            creativity: Creativity::Low,
            model: self.config.model.clone(),
        };

        let response = self.backend.ask(&prompt, &options)?;
        let mut interpretation = parse_response(&response)?;
        interpretation.original_query = query.to_string();
        interpretation
            .suggested_categories
            .truncate(self.config.max_categories);
        interpretation
            .suggested_app_names
            .truncate(self.config.max_app_names);
        interpretation.search_terms.truncate(self.config.max_search_terms);
        Ok(interpretation)
    }
}

impl<B: LanguageBackend> IntentInterpreter for AssistedInterpreter<B> {
    fn interpret(
        &self,
        query: &str,
        installed: &[Application],
        categories: &CategoryTable,
    ) -> Interpretation {
        if !self.backend.is_available() {
            tracing::warn!("Language backend unavailable, using keyword interpretation");
            return self.fallback().interpret(query, installed, categories);
        }

        match self.ask(query, installed, categories) {
            Ok(interpretation) => {
                tracing::debug!(?interpretation, "Query interpreted");
                interpretation
            }
            Err(e) => {
                tracing::warn!("Query interpretation failed, using keywords: {}", e);
                self.fallback().interpret(query, installed, categories)
            }
        }
    }
}

fn build_prompt(query: &str, installed: &[Application], categories: &CategoryTable) -> String {
    let app_list = installed
        .iter()
        .enumerate()
        .map(|(i, app)| match &app.bundle_id {
            Some(id) => format!("{}. {} ({})", i + 1, app.name, id),
            None => format!("{}. {}", i + 1, app.name),
        })
        .collect::<Vec<_>>()
        .join("\n");
    let category_list = categories.ids().collect::<Vec<_>>().join(", ");

    format!(
        r#"Help the user find an application installed on their computer.

Query: "{query}"

Installed applications:
{app_list}

Known categories: {category_list}

Only name applications that appear in the installed list above.

Reply with a single JSON object and nothing else:
- "interpretedIntent": what the user is looking for, in English
- "suggestedCategories": up to 3 category ids from the known categories
- "suggestedAppNames": up to 5 names copied from the installed list
- "searchTerms": up to 3 extra keywords to search for

For "メール書くアプリ" with Mail and Thunderbird installed:
{{"interpretedIntent": "email client", "suggestedCategories": ["email"], "suggestedAppNames": ["Mail", "Thunderbird"], "searchTerms": ["mail", "email"]}}"#
    )
}

/// Body of the first fenced code block, language tag skipped
fn fenced_block(response: &str) -> Option<&str> {
    let start = response.find("```")?;
    let after_fence = &response[start + 3..];
    let body_start = after_fence.find('\n').map(|i| i + 1).unwrap_or(0);
    let body = &after_fence[body_start..];
    body.find("```").map(|end| body[..end].trim())
}

/// The outermost `{...}` span, else the whole trimmed reply
fn brace_span(response: &str) -> &str {
    match (response.find('{'), response.rfind('}')) {
        (Some(start), Some(end)) if start < end => &response[start..=end],
        _ => response.trim(),
    }
}

fn parse_object(text: &str) -> Option<Value> {
    serde_json::from_str::<Value>(text)
        .ok()
        .filter(Value::is_object)
}

fn string_list(value: &Value, key: &str) -> Vec<String> {
    value
        .get(key)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// Parse a backend reply. Missing or mistyped fields become empty.
fn parse_response(response: &str) -> FinderResult<Interpretation> {
    // a fence that holds prose is skipped in favour of the brace span
    let value = match fenced_block(response).and_then(parse_object) {
        Some(value) => value,
        None => {
            let value: Value = serde_json::from_str(brace_span(response))?;
            if !value.is_object() {
                return Err(FinderError::Interpretation(
                    "response is not a JSON object".to_string(),
                ));
            }
            value
        }
    };

    Ok(Interpretation {
        original_query: String::new(),
        interpreted_intent: value
            .get("interpretedIntent")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        suggested_categories: string_list(&value, "suggestedCategories"),
        suggested_app_names: string_list(&value, "suggestedAppNames"),
        search_terms: string_list(&value, "searchTerms"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct ScriptedBackend {
        available: bool,
        reply: FinderResult<String>,
        prompts: Mutex<Vec<(String, AskOptions)>>,
    }

    impl ScriptedBackend {
        fn replying(reply: &str) -> Self {
            Self {
                available: true,
                reply: Ok(reply.to_string()),
                prompts: Mutex::new(Vec::new()),
            }
        }
    }

    impl LanguageBackend for ScriptedBackend {
        fn is_available(&self) -> bool {
            self.available
        }

        fn ask(&self, prompt: &str, options: &AskOptions) -> FinderResult<String> {
            self.prompts
                .lock()
                .unwrap()
                .push((prompt.to_string(), options.clone()));
            match &self.reply {
                Ok(reply) => Ok(reply.clone()),
                Err(e) => Err(FinderError::Backend(e.to_string())),
            }
        }
    }

    fn installed() -> Vec<Application> {
        vec![
            Application::new("Mail", Some("com.apple.mail"), "/System/Applications/Mail.app"),
            Application::new("Thunderbird", None, "/Applications/Thunderbird.app"),
        ]
    }

    fn interpret_with(backend: ScriptedBackend, query: &str) -> Interpretation {
        AssistedInterpreter::new(backend, InterpreterConfig::default()).interpret(
            query,
            &installed(),
            CategoryTable::builtin(),
        )
    }

    #[test]
    fn test_simple_interpretation() {
        let interpretation = KeywordInterpreter::default().interpret(
            "mail app",
            &[],
            CategoryTable::builtin(),
        );
        assert_eq!(interpretation.original_query, "mail app");
        assert_eq!(interpretation.interpreted_intent, "mail app");
        assert_eq!(interpretation.suggested_categories, ["email"]);
        assert!(interpretation.suggested_app_names.is_empty());
        assert_eq!(interpretation.search_terms, ["mail app"]);
    }

    #[test]
    fn test_simple_interpretation_caps_categories() {
        // image, video, code, terminal and notes categories all match
        let interpretation = Interpretation::simple(
            "photo video code terminal note",
            CategoryTable::builtin(),
            3,
        );
        assert_eq!(
            interpretation.suggested_categories,
            ["imageEdit", "videoEdit", "code"]
        );
    }

    #[test]
    fn test_plain_json_reply() {
        let backend = ScriptedBackend::replying(
            r#"{"interpretedIntent": "email client", "suggestedCategories": ["email"],
                "suggestedAppNames": ["Mail", "Thunderbird"], "searchTerms": ["mail", "email"]}"#,
        );
        let interpretation = interpret_with(backend, "something to write letters");
        assert_eq!(interpretation.original_query, "something to write letters");
        assert_eq!(interpretation.interpreted_intent, "email client");
        assert_eq!(interpretation.suggested_categories, ["email"]);
        assert_eq!(interpretation.suggested_app_names, ["Mail", "Thunderbird"]);
        assert_eq!(interpretation.search_terms, ["mail", "email"]);
    }

    #[test]
    fn test_fenced_reply() {
        let backend = ScriptedBackend::replying(
            "Sure!\n```json\n{\"interpretedIntent\": \"browser\", \"searchTerms\": [\"web\"]}\n```\n",
        );
        let interpretation = interpret_with(backend, "surf the net");
        assert_eq!(interpretation.interpreted_intent, "browser");
        assert_eq!(interpretation.search_terms, ["web"]);
        assert!(interpretation.suggested_app_names.is_empty());
        assert!(interpretation.suggested_categories.is_empty());
    }

    #[test]
    fn test_prose_fence_then_object_reply() {
        let reply = "Thinking:\n```\nno json here\n```\n{\"suggestedAppNames\": [\"Mail\"]}";
        let parsed = parse_response(reply).unwrap();
        assert_eq!(parsed.suggested_app_names, ["Mail"]);

        let interpretation = interpret_with(ScriptedBackend::replying(reply), "letters");
        assert_eq!(interpretation.suggested_app_names, ["Mail"]);
        assert_eq!(interpretation.interpreted_intent, "");
    }

    #[test]
    fn test_embedded_object_reply() {
        let backend = ScriptedBackend::replying(
            "Here you go: {\"suggestedAppNames\": [\"Mail\", \"  \", 7]} hope it helps",
        );
        let interpretation = interpret_with(backend, "letters");
        assert_eq!(interpretation.suggested_app_names, ["Mail"]);
        assert_eq!(interpretation.interpreted_intent, "");
    }

    #[test]
    fn test_lists_are_truncated() {
        let backend = ScriptedBackend::replying(
            r#"{"suggestedCategories": ["a", "b", "c", "d"], "searchTerms": ["1", "2", "3", "4", "5"]}"#,
        );
        let interpretation = interpret_with(backend, "whatever");
        assert_eq!(interpretation.suggested_categories.len(), 3);
        assert_eq!(interpretation.search_terms, ["1", "2", "3"]);
    }

    #[test]
    fn test_unparseable_reply_falls_back() {
        let backend = ScriptedBackend::replying("I think you want a mail client.");
        let interpretation = interpret_with(backend, "mail client");
        assert_eq!(
            interpretation,
            Interpretation::simple("mail client", CategoryTable::builtin(), 3)
        );
    }

    #[test]
    fn test_non_object_reply_falls_back() {
        let backend = ScriptedBackend::replying("[\"Mail\"]");
        let interpretation = interpret_with(backend, "mail");
        assert_eq!(interpretation.search_terms, ["mail"]);
        assert_eq!(interpretation.suggested_categories, ["email"]);
    }

    #[test]
    fn test_backend_error_falls_back() {
        let backend = ScriptedBackend {
            available: true,
            reply: Err(FinderError::Backend("timeout".to_string())),
            prompts: Mutex::new(Vec::new()),
        };
        let interpretation = interpret_with(backend, "browser");
        assert_eq!(interpretation.interpreted_intent, "browser");
        assert_eq!(interpretation.suggested_categories, ["browser"]);
    }

    #[test]
    fn test_unavailable_backend_is_not_called() {
        let interpreter = AssistedInterpreter::new(
            ScriptedBackend {
                available: false,
                reply: Ok("{}".to_string()),
                prompts: Mutex::new(Vec::new()),
            },
            InterpreterConfig::default(),
        );
        let interpretation = interpreter.interpret("terminal", &installed(), CategoryTable::builtin());
        assert_eq!(interpretation.suggested_categories, ["terminal"]);
        assert!(interpreter.backend().prompts.lock().unwrap().is_empty());
    }

    #[test]
    fn test_prompt_lists_apps_and_categories() {
        let interpreter = AssistedInterpreter::new(
            ScriptedBackend::replying("{}"),
            InterpreterConfig {
                model: Some("small".to_string()),
                ..InterpreterConfig::default()
            },
        );
        interpreter.interpret("write mail", &installed(), CategoryTable::builtin());

        let prompts = interpreter.backend().prompts.lock().unwrap();
        let (prompt, options) = &prompts[0];
        assert!(prompt.contains("Query: \"write mail\""));
        assert!(prompt.contains("1. Mail (com.apple.mail)"));
        assert!(prompt.contains("2. Thunderbird\n"));
        assert!(prompt.contains("browser, email, imageEdit"));
        assert_eq!(options.creativity, Creativity::Low);
        assert_eq!(options.model.as_deref(), Some("small"));
    }
}
