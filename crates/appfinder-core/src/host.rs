use crate::app::Application;
use crate::error::{FinderError, FinderResult};

/// Point-in-time listing of installed applications, supplied by the host
pub trait AppRegistry: Send + Sync {
    fn list_installed_applications(&self) -> FinderResult<Vec<Application>>;
}

/// How freely the backend may answer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Creativity {
    #[default]
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AskOptions {
    pub creativity: Creativity,
    pub model: Option<String>,
}

/// Natural-language reasoning capability used to interpret queries
pub trait LanguageBackend: Send + Sync {
    /// Whether the capability can be used at all right now
    fn is_available(&self) -> bool;

    fn ask(&self, prompt: &str, options: &AskOptions) -> FinderResult<String>;
}

/// Registry over a fixed list of applications
#[derive(Debug, Clone, Default)]
pub struct StaticRegistry {
    apps: Vec<Application>,
}

impl StaticRegistry {
    pub fn new(apps: Vec<Application>) -> Self {
        Self { apps }
    }
}

impl AppRegistry for StaticRegistry {
    fn list_installed_applications(&self) -> FinderResult<Vec<Application>> {
        Ok(self.apps.clone())
    }
}

impl<F> AppRegistry for F
where
    F: Fn() -> FinderResult<Vec<Application>> + Send + Sync,
{
    fn list_installed_applications(&self) -> FinderResult<Vec<Application>> {
        self()
    }
}

/// Backend for hosts without any reasoning capability
#[derive(Debug, Clone, Copy, Default)]
pub struct NoBackend;

impl LanguageBackend for NoBackend {
    fn is_available(&self) -> bool {
        false
    }

    fn ask(&self, _prompt: &str, _options: &AskOptions) -> FinderResult<String> {
        Err(FinderError::Backend("no language backend configured".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_registry_snapshot() {
        let registry = StaticRegistry::new(vec![Application::new("Mail", None, "/Mail.app")]);
        let apps = registry.list_installed_applications().unwrap();
        assert_eq!(apps.len(), 1);
        assert_eq!(apps[0].name, "Mail");
    }

    #[test]
    fn test_closure_registry() {
        let registry = || -> FinderResult<Vec<Application>> {
            Err(FinderError::Registry("permission denied".to_string()))
        };
        assert!(matches!(
            registry.list_installed_applications(),
            Err(FinderError::Registry(_))
        ));
    }

    #[test]
    fn test_no_backend() {
        assert!(!NoBackend.is_available());
        assert!(NoBackend.ask("hi", &AskOptions::default()).is_err());
    }
}
