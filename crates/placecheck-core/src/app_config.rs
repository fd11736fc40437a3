#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Application configuration, sourced from `PLACECHECK_*` environment
/// variables. Provider credentials are not configured here; they are
/// provisioned by the backend's key endpoint at session start.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Base URL of the search/autocomplete/key-provisioning backend,
    /// including the API prefix.
    pub api_base: String,
    pub env: Environment,
    pub log_level: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    /// Quiet period between keystrokes before an autocomplete request fires.
    pub debounce_ms: u64,
    /// Inputs shorter than this (in characters) never trigger suggestions.
    pub min_query_chars: usize,
}
