use std::path::PathBuf;

use crate::logging::LogSettings;
use crate::selector::{SelectorOptions, DEFAULT_RESERVOIR_THRESHOLD};
use crate::types::DEFAULT_TEST_DURATION_MINUTES;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizConfig {
    pub test_duration_minutes: u64,
    pub reservoir_threshold: usize,
    pub seed: Option<u64>,
    pub log_level: String,
    pub file_logs: bool,
    pub log_dir: PathBuf,
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            test_duration_minutes: DEFAULT_TEST_DURATION_MINUTES,
            reservoir_threshold: DEFAULT_RESERVOIR_THRESHOLD,
            seed: None,
            log_level: "info".to_string(),
            file_logs: false,
            log_dir: PathBuf::from("./logs"),
        }
    }
}

impl QuizConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; unparsable values fall back to defaults
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let test_duration_minutes = lookup("QUIZ_TEST_DURATION_MINUTES")
            .and_then(|value| value.parse::<u64>().ok())
            .filter(|&minutes| minutes > 0)
            .unwrap_or(defaults.test_duration_minutes);

        let reservoir_threshold = lookup("QUIZ_RESERVOIR_THRESHOLD")
            .and_then(|value| value.parse::<usize>().ok())
            .unwrap_or(defaults.reservoir_threshold);

        let seed = lookup("QUIZ_SEED").and_then(|value| value.parse::<u64>().ok());

        let log_level = lookup("RUST_LOG").unwrap_or(defaults.log_level);

        let file_logs = lookup("QUIZ_FILE_LOGS")
            .map(|value| value == "true" || value == "1")
            .unwrap_or(defaults.file_logs);

        let log_dir = lookup("QUIZ_LOG_DIR").map(PathBuf::from).unwrap_or(defaults.log_dir);

        Self {
            test_duration_minutes,
            reservoir_threshold,
            seed,
            log_level,
            file_logs,
            log_dir,
        }
    }

    pub fn test_duration_secs(&self) -> u64 {
        self.test_duration_minutes.saturating_mul(60)
    }

    pub fn log_settings(&self) -> LogSettings {
        LogSettings {
            level: self.log_level.clone(),
            file_dir: self.file_logs.then(|| self.log_dir.clone()),
        }
    }

    pub fn selector_options(&self) -> SelectorOptions {
        SelectorOptions {
            reservoir_threshold: self.reservoir_threshold,
            seed: self.seed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults_when_unset() {
        let config = QuizConfig::from_lookup(|_| None);
        assert_eq!(config, QuizConfig::default());
        assert_eq!(config.test_duration_secs(), 3600);
        assert_eq!(config.log_settings().file_dir, None);
    }

    #[test]
    fn test_values_from_lookup() {
        let env = HashMap::from([
            ("QUIZ_TEST_DURATION_MINUTES", "30"),
            ("QUIZ_RESERVOIR_THRESHOLD", "500"),
            ("QUIZ_SEED", "1234"),
            ("RUST_LOG", "debug"),
            ("QUIZ_FILE_LOGS", "1"),
            ("QUIZ_LOG_DIR", "/var/log/quiz"),
        ]);
        let config = QuizConfig::from_lookup(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.test_duration_secs(), 1800);
        assert_eq!(config.reservoir_threshold, 500);
        assert_eq!(config.seed, Some(1234));
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.selector_options().seed, Some(1234));
        assert_eq!(
            config.log_settings(),
            LogSettings {
                level: "debug".to_string(),
                file_dir: Some(PathBuf::from("/var/log/quiz")),
            }
        );
    }

    #[test]
    fn test_garbage_falls_back() {
        let env = HashMap::from([
            ("QUIZ_TEST_DURATION_MINUTES", "0"),
            ("QUIZ_RESERVOIR_THRESHOLD", "lots"),
            ("QUIZ_SEED", "-1"),
        ]);
        let config = QuizConfig::from_lookup(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.test_duration_minutes, 60);
        assert_eq!(config.reservoir_threshold, DEFAULT_RESERVOIR_THRESHOLD);
        assert_eq!(config.seed, None);
    }
}
