pub mod app;
pub mod config;
pub mod error;
pub mod host;
pub mod report;
pub mod search;
pub mod services;
pub mod session;

pub use app::{Application, ResultLabel, SearchResult, SearchResults, Suggestion};
pub use config::FinderConfig;
pub use error::{FinderError, FinderResult};
pub use host::{AppRegistry, AskOptions, Creativity, LanguageBackend, NoBackend, StaticRegistry};
pub use report::ToolReport;
pub use search::{AppFinder, SearchOptions};
pub use services::{
    fuzzy_match, normalize, score, AssistedInterpreter, Category, CategoryTable, IntentInterpreter,
    Interpretation, KeywordInterpreter, MatchReason, MatchScore,
};
pub use session::{offer_assist, wants_assist, SearchGeneration, SearchTicket};
