pub mod categories;
pub mod interpreter;
pub mod matcher;
pub mod scoring;

pub use categories::{Category, CategoryTable};
pub use interpreter::{AssistedInterpreter, IntentInterpreter, Interpretation, KeywordInterpreter};
pub use matcher::{fuzzy_match, DEFAULT_MIN_SCORE};
pub use scoring::{normalize, score, MatchReason, MatchScore};
