//! Configuration types.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::ConfigError;

/// Default call-to-action link shown when a conversation completes.
pub const DEFAULT_DEMO_URL: &str = "https://wizklub.com";

/// Default phone number shown next to the demo link.
pub const DEFAULT_CALL_NUMBER: &str = "1800-123-4567";

/// Chat session configuration.
#[derive(Debug, Clone)]
pub struct ChatConfig {
    /// Percentage applied to every composing delay. 0 disables pacing.
    pub pacing_percent: u32,
    /// Validate phone and email answers instead of accepting any non-empty text.
    pub strict_contact: bool,
    /// Demo booking link offered at the end of a conversation.
    pub demo_url: String,
    /// Phone number offered alongside the demo link.
    pub call_number: String,
    /// Directory for the rolling log file, if file logging is wanted.
    pub log_dir: Option<PathBuf>,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            pacing_percent: 100,
            strict_contact: false,
            demo_url: DEFAULT_DEMO_URL.to_string(),
            call_number: DEFAULT_CALL_NUMBER.to_string(),
            log_dir: None,
        }
    }
}

impl ChatConfig {
    /// Load configuration from `WIZBOT_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let pacing_percent = match lookup("WIZBOT_PACING_PERCENT") {
            Some(raw) => raw
                .trim()
                .parse::<u32>()
                .map_err(|e| ConfigError::InvalidValue {
                    key: "WIZBOT_PACING_PERCENT".to_string(),
                    message: format!("{raw:?} is not a percentage: {e}"),
                })?,
            None => defaults.pacing_percent,
        };

        let strict_contact = match lookup("WIZBOT_STRICT_CONTACT") {
            Some(raw) => parse_flag("WIZBOT_STRICT_CONTACT", &raw)?,
            None => defaults.strict_contact,
        };

        let demo_url = lookup("WIZBOT_DEMO_URL")
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(defaults.demo_url);

        let call_number = lookup("WIZBOT_CALL_NUMBER")
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(defaults.call_number);

        let log_dir = lookup("WIZBOT_LOG_DIR")
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            pacing_percent,
            strict_contact,
            demo_url,
            call_number,
            log_dir,
        })
    }

    /// Configuration with pacing disabled, for tests and scripted runs.
    pub fn unpaced() -> Self {
        Self {
            pacing_percent: 0,
            ..Self::default()
        }
    }

    /// Scale a nominal composing delay by the configured pacing.
    pub fn scale_delay(&self, nominal: Duration) -> Duration {
        nominal * self.pacing_percent / 100
    }
}

fn parse_flag(key: &str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            message: format!("expected a boolean, got {other:?}"),
        }),
    }
}
