use std::path::Path;

use availability::WorkingHours;
use calendar_client::CalendarConfig;
use serde::{Deserialize, Serialize};

/// Server configuration, loaded from a TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Google Calendar connection settings
    #[serde(default)]
    pub calendar: CalendarConfig,

    /// IANA timezone tool inputs and report times are interpreted in
    #[serde(default = "default_timezone")]
    pub timezone: String,

    /// Working hours applied when a query is restricted to business hours
    #[serde(default)]
    pub working_hours: WorkingHours,

    /// Default minimum slot / meeting length (minutes)
    #[serde(default = "default_duration_minutes")]
    pub default_duration_minutes: u32,

    /// Default lookahead for availability and upcoming-event queries (days)
    #[serde(default = "default_lookahead_days")]
    pub default_lookahead_days: u32,
}

fn default_timezone() -> String {
    "UTC".to_string()
}

fn default_duration_minutes() -> u32 {
    30
}

fn default_lookahead_days() -> u32 {
    7
}

impl Default for Config {
    fn default() -> Self {
        Config {
            calendar: CalendarConfig::default(),
            timezone: default_timezone(),
            working_hours: WorkingHours::default(),
            default_duration_minutes: default_duration_minutes(),
            default_lookahead_days: default_lookahead_days(),
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load from `path`, falling back to defaults when the file is absent.
    pub fn load_or_default(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            tracing::info!("No config file at {}, using defaults", path.display());
            Ok(Config::default())
        }
    }

    pub fn example() -> Self {
        Config {
            calendar: CalendarConfig {
                credentials_path: "credentials.json".to_string(),
                token_cache_path: "calendar_token_cache.json".to_string(),
                calendar_id: "primary".to_string(),
            },
            timezone: "America/Los_Angeles".to_string(),
            working_hours: WorkingHours {
                start_hour: 9,
                end_hour: 18,
            },
            default_duration_minutes: 30,
            default_lookahead_days: 7,
        }
    }
}
