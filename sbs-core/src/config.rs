use std::env;
use std::time::Duration;

use tracing::warn;

pub const DEFAULT_COMMAND_PREFIX: &str = "+";
pub const DEFAULT_HELP_TIMEOUT_SECS: u64 = 120;
pub const DEFAULT_TIMEOUT_EMOJI: &str = "⏹️";

/// Runtime settings read from the environment at startup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BotConfig {
    pub prefix: String,
    /// Idle time the help view waits for a reaction before it stops listening.
    pub help_timeout: Duration,
    /// Send help output as a direct message instead of in the invoking channel.
    pub help_dm: bool,
    /// Icons added to a help message once its navigation has timed out.
    pub timeout_emoji: Vec<String>,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_COMMAND_PREFIX.to_owned(),
            help_timeout: Duration::from_secs(DEFAULT_HELP_TIMEOUT_SECS),
            help_dm: false,
            timeout_emoji: parse_emoji_list(DEFAULT_TIMEOUT_EMOJI),
        }
    }
}

impl BotConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let prefix = env::var("COMMAND_PREFIX")
            .ok()
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty())
            .unwrap_or(defaults.prefix);

        let help_timeout_secs = env_u64("HELP_TIMEOUT_SECS", DEFAULT_HELP_TIMEOUT_SECS);
        let help_timeout = if help_timeout_secs == 0 {
            warn!("HELP_TIMEOUT_SECS must be positive; using the default.");
            defaults.help_timeout
        } else {
            Duration::from_secs(help_timeout_secs)
        };

        let timeout_emoji = match env::var("TIMEOUT_EMOJI") {
            Ok(value) => parse_emoji_list(&value),
            Err(_) => defaults.timeout_emoji,
        };

        Self {
            prefix,
            help_timeout,
            help_dm: env_bool("HELP_DM", defaults.help_dm),
            timeout_emoji,
        }
    }
}

fn env_bool(key: &str, default: bool) -> bool {
    match env::var(key) {
        Ok(value) => parse_bool(&value),
        Err(_) => default,
    }
}

fn env_u64(key: &str, default: u64) -> u64 {
    match env::var(key) {
        Ok(value) => value.trim().parse::<u64>().unwrap_or(default),
        Err(_) => default,
    }
}

fn parse_bool(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

/// Split a comma separated emoji list, dropping blanks and duplicates.
fn parse_emoji_list(raw: &str) -> Vec<String> {
    let mut emoji: Vec<String> = Vec::new();

    for item in raw.split(',').map(str::trim).filter(|item| !item.is_empty()) {
        if !emoji.iter().any(|existing| existing == item) {
            emoji.push(item.to_owned());
        }
    }

    emoji
}

#[cfg(test)]
mod tests {
    use super::{BotConfig, parse_bool, parse_emoji_list};

    #[test]
    fn bool_values_are_lenient() {
        assert!(parse_bool("true"));
        assert!(parse_bool(" YES "));
        assert!(parse_bool("1"));
        assert!(!parse_bool("off"));
        assert!(!parse_bool(""));
    }

    #[test]
    fn emoji_lists_drop_blanks_and_duplicates() {
        assert_eq!(parse_emoji_list("⏹️, ⌛,,⏹️"), vec!["⏹️", "⌛"]);
        assert!(parse_emoji_list(" , ").is_empty());
    }

    #[test]
    fn defaults_match_documented_values() {
        let config = BotConfig::default();
        assert_eq!(config.prefix, "+");
        assert_eq!(config.help_timeout.as_secs(), 120);
        assert!(!config.help_dm);
        assert_eq!(config.timeout_emoji, vec!["⏹️"]);
    }
}
