//! Timing configuration.

use std::time::Duration;

use tracing::warn;

/// Environment variable overriding the show delay, in milliseconds.
pub const SHOW_DELAY_ENV: &str = "BUSYRUN_SHOW_DELAY_MS";

/// Environment variable overriding the minimum visible duration, in milliseconds.
pub const MIN_VISIBLE_ENV: &str = "BUSYRUN_MIN_VISIBLE_MS";

/// Indicator timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressConfig {
    /// How long a task may run before the indicator appears.
    pub show_delay: Duration,

    /// Minimum time the indicator stays up once shown.
    pub min_visible: Duration,
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            show_delay: Duration::from_millis(2000),
            min_visible: Duration::from_millis(1000),
        }
    }
}

impl ProgressConfig {
    /// Defaults, overridden by `BUSYRUN_SHOW_DELAY_MS` / `BUSYRUN_MIN_VISIBLE_MS`.
    pub fn from_env() -> Self {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from `lookup`. Unparsable values are ignored.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(ms) = parse_millis(SHOW_DELAY_ENV, lookup(SHOW_DELAY_ENV)) {
            self.show_delay = ms;
        }
        if let Some(ms) = parse_millis(MIN_VISIBLE_ENV, lookup(MIN_VISIBLE_ENV)) {
            self.min_visible = ms;
        }
        self
    }
}

fn parse_millis(key: &str, raw: Option<String>) -> Option<Duration> {
    let raw = raw?;
    match raw.trim().parse::<u64>() {
        Ok(ms) => Some(Duration::from_millis(ms)),
        Err(e) => {
            warn!(key = %key, value = %raw, error = %e, "Ignoring invalid duration override");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ProgressConfig::default();
        assert_eq!(config.show_delay, Duration::from_millis(2000));
        assert_eq!(config.min_visible, Duration::from_millis(1000));
    }

    #[test]
    fn test_overrides() {
        let config = ProgressConfig::default().with_overrides(|key| match key {
            SHOW_DELAY_ENV => Some("150".to_string()),
            MIN_VISIBLE_ENV => Some(" 75 ".to_string()),
            _ => None,
        });
        assert_eq!(config.show_delay, Duration::from_millis(150));
        assert_eq!(config.min_visible, Duration::from_millis(75));
    }

    #[test]
    fn test_invalid_override_ignored() {
        let config = ProgressConfig::default().with_overrides(|key| match key {
            SHOW_DELAY_ENV => Some("soon".to_string()),
            _ => None,
        });
        assert_eq!(config, ProgressConfig::default());
    }
}
