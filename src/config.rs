use std::env;
use std::str::FromStr;

use chrono::NaiveDate;

use crate::constants::{DEFAULT_DAILY_BUDGET_MINUTES, DEFAULT_SEED, DEFAULT_VALID_WEEKDAYS};

#[derive(Debug, Clone)]
pub struct Config {
    pub log_level: String,
    pub enable_file_logs: bool,
    pub log_dir: String,
    pub topics_path: String,
    /// Unset means `ScheduleConfig::default()`.
    pub schedule_config_path: Option<String>,
    /// Review outcomes fed to the adaptive pacer when re-planning.
    pub outcomes_path: Option<String>,
    pub run: RunConfig,
}

#[derive(Debug, Clone)]
pub struct RunConfig {
    pub start_date: NaiveDate,
    pub daily_budget_minutes: i64,
    pub valid_weekdays: Vec<u8>,
    pub seed: u64,
}

impl Config {
    pub fn from_env() -> Self {
        let today = chrono::Local::now().date_naive();
        Self {
            log_level: env_or("RUST_LOG", "info"),
            enable_file_logs: env_or_bool("ENABLE_FILE_LOGS", false),
            log_dir: env_or("LOG_DIR", "./logs"),
            topics_path: env_or("EARA_TOPICS_PATH", "./topics.json"),
            schedule_config_path: env::var("EARA_CONFIG_PATH")
                .ok()
                .filter(|p| !p.trim().is_empty()),
            outcomes_path: env::var("EARA_OUTCOMES_PATH")
                .ok()
                .filter(|p| !p.trim().is_empty()),
            run: RunConfig {
                start_date: env_or_parse("EARA_START_DATE", today),
                daily_budget_minutes: env_or_parse(
                    "EARA_DAILY_BUDGET_MINUTES",
                    DEFAULT_DAILY_BUDGET_MINUTES,
                ),
                valid_weekdays: env_or_weekdays("EARA_WEEKDAYS", DEFAULT_VALID_WEEKDAYS),
                seed: env_or_parse("EARA_SEED", DEFAULT_SEED),
            },
        }
    }
}

pub fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

pub fn env_or_parse<T>(key: &str, default: T) -> T
where
    T: FromStr + Copy,
{
    match env::var(key) {
        Ok(raw) => match raw.trim().parse::<T>() {
            Ok(v) => v,
            Err(_) => {
                tracing::warn!(
                    key,
                    value = %raw,
                    "Failed to parse env var, using default"
                );
                default
            }
        },
        Err(_) => default,
    }
}

pub fn env_or_bool(key: &str, default: bool) -> bool {
    match env::var(key) {
        Ok(raw) => match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => true,
            "0" | "false" | "no" | "off" => false,
            _ => default,
        },
        Err(_) => default,
    }
}

/// Comma-separated weekday indices, e.g. `1,2,3,4,5`. Out-of-range entries are left for the engine
/// to reject.
pub fn parse_weekday_list(raw: &str) -> Option<Vec<u8>> {
    raw.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| part.parse::<u8>().ok())
        .collect()
}

pub fn env_or_weekdays(key: &str, default: &[u8]) -> Vec<u8> {
    match env::var(key) {
        Ok(raw) => match parse_weekday_list(&raw) {
            Some(days) => days,
            None => {
                tracing::warn!(key, value = %raw, "Failed to parse weekday list, using default");
                default.to_vec()
            }
        },
        Err(_) => default.to_vec(),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Mutex, OnceLock};

    use super::*;

    fn env_lock() -> &'static Mutex<()> {
        static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
        LOCK.get_or_init(|| Mutex::new(()))
    }

    fn managed_keys() -> &'static [&'static str] {
        &[
            "RUST_LOG",
            "ENABLE_FILE_LOGS",
            "EARA_TOPICS_PATH",
            "EARA_CONFIG_PATH",
            "EARA_OUTCOMES_PATH",
            "EARA_START_DATE",
            "EARA_DAILY_BUDGET_MINUTES",
            "EARA_WEEKDAYS",
            "EARA_SEED",
        ]
    }

    fn clear_keys(keys: &[&str]) {
        for key in keys {
            env::remove_var(key);
        }
    }

    #[test]
    fn loads_defaults_when_missing() {
        let _guard = env_lock().lock().expect("env lock");
        clear_keys(managed_keys());

        let cfg = Config::from_env();
        assert_eq!(cfg.log_level, "info");
        assert_eq!(cfg.topics_path, "./topics.json");
        assert!(cfg.schedule_config_path.is_none());
        assert!(cfg.outcomes_path.is_none());
        assert_eq!(cfg.run.daily_budget_minutes, 240);
        assert_eq!(cfg.run.valid_weekdays, vec![1, 2, 3, 4, 5]);
        assert_eq!(cfg.run.seed, 42);
    }

    #[test]
    fn parses_run_values() {
        let _guard = env_lock().lock().expect("env lock");
        clear_keys(managed_keys());

        env::set_var("EARA_START_DATE", "2024-03-04");
        env::set_var("EARA_DAILY_BUDGET_MINUTES", "180");
        env::set_var("EARA_WEEKDAYS", "0, 6");
        env::set_var("EARA_SEED", "1234");
        env::set_var("EARA_CONFIG_PATH", "/etc/eara.json");

        let cfg = Config::from_env();
        assert_eq!(cfg.run.start_date, NaiveDate::from_ymd_opt(2024, 3, 4).unwrap());
        assert_eq!(cfg.run.daily_budget_minutes, 180);
        assert_eq!(cfg.run.valid_weekdays, vec![0, 6]);
        assert_eq!(cfg.run.seed, 1234);
        assert_eq!(cfg.schedule_config_path.as_deref(), Some("/etc/eara.json"));
        clear_keys(managed_keys());
    }

    #[test]
    fn invalid_values_fall_back() {
        let _guard = env_lock().lock().expect("env lock");
        clear_keys(managed_keys());

        env::set_var("EARA_DAILY_BUDGET_MINUTES", "lots");
        env::set_var("EARA_WEEKDAYS", "mon,tue");
        env::set_var("ENABLE_FILE_LOGS", "maybe");

        let cfg = Config::from_env();
        assert_eq!(cfg.run.daily_budget_minutes, 240);
        assert_eq!(cfg.run.valid_weekdays, vec![1, 2, 3, 4, 5]);
        assert!(!cfg.enable_file_logs);
        clear_keys(managed_keys());
    }

    #[test]
    fn weekday_list_parsing() {
        assert_eq!(parse_weekday_list("1,3,5"), Some(vec![1, 3, 5]));
        assert_eq!(parse_weekday_list(" 2 ,, 4 "), Some(vec![2, 4]));
        assert_eq!(parse_weekday_list("x"), None);
    }
}
