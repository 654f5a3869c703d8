use serde::{Deserialize, Serialize};

/// Google Calendar connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarConfig {
    /// Path to the Google OAuth client credentials JSON file
    #[serde(default = "default_credentials_path")]
    pub credentials_path: String,

    /// Path to store the OAuth token cache
    #[serde(default = "default_token_cache")]
    pub token_cache_path: String,

    /// Calendar to operate on ("primary" is the account's main calendar)
    #[serde(default = "default_calendar_id")]
    pub calendar_id: String,
}

fn default_credentials_path() -> String {
    "credentials.json".to_string()
}

fn default_token_cache() -> String {
    "calendar_token_cache.json".to_string()
}

fn default_calendar_id() -> String {
    "primary".to_string()
}

impl Default for CalendarConfig {
    fn default() -> Self {
        CalendarConfig {
            credentials_path: default_credentials_path(),
            token_cache_path: default_token_cache(),
            calendar_id: default_calendar_id(),
        }
    }
}
