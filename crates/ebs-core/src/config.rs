//! TOML-based application configuration.
//!
//! Stores forecasting preferences including:
//! - Monte Carlo trial count and sigma level
//! - Work-day length and the default weekday calendar
//! - Rule capacities and the walk's day ceiling
//! - The representable time range
//!
//! Configuration is stored at `~/.config/ebs/config.toml`.

use std::path::{Path, PathBuf};

use chrono::Weekday;
use serde::{Deserialize, Serialize};

use crate::calendar::{Calendar, DEFAULT_MAX_DAYS, DEFAULT_MAX_RULES};
use crate::error::{ConfigError, Result};
use crate::forecast::ForecastSettings;
use crate::time::{NormalizedDate, TimeRangeKind};

/// Days of work the generated weekday calendar covers, about ten years.
///
/// Each membership test rescans a daily rule from its first day, so a walk
/// over a calendar of `n` days costs on the order of `n * min(n, horizon)`
/// date additions; a ten-year horizon cuts a walk to the full
/// [`DEFAULT_MAX_DAYS`] ceiling by more than an order of magnitude.
pub const DEFAULT_HORIZON_DAYS: u64 = 3650;

/// Monte Carlo configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastConfig {
    #[serde(default = "default_sample_count")]
    pub sample_count: usize,
    #[serde(default = "default_sigma_level")]
    pub sigma_level: f64,
}

/// Work calendar configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarConfig {
    #[serde(default = "default_seconds_per_workday")]
    pub seconds_per_workday: i64,
    /// Repetitions of the generated daily and weekly rules
    #[serde(default = "default_horizon_days")]
    pub horizon_days: u64,
    /// Day ceiling for completion walks
    #[serde(default = "default_max_days")]
    pub max_days: u64,
    #[serde(default = "default_max_rules")]
    pub max_inclusions: usize,
    #[serde(default = "default_max_rules")]
    pub max_exclusions: usize,
    #[serde(default = "default_weekend")]
    pub weekend: Vec<Weekday>,
}

/// Time representation configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TimeConfig {
    #[serde(default)]
    pub range: TimeRangeKind,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/ebs/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub forecast: ForecastConfig,
    #[serde(default)]
    pub calendar: CalendarConfig,
    #[serde(default)]
    pub time: TimeConfig,
}

// Default functions
fn default_sample_count() -> usize {
    100
}
fn default_sigma_level() -> f64 {
    2.0
}
fn default_seconds_per_workday() -> i64 {
    8 * 60 * 60
}
fn default_horizon_days() -> u64 {
    DEFAULT_HORIZON_DAYS
}
fn default_max_days() -> u64 {
    DEFAULT_MAX_DAYS
}
fn default_max_rules() -> usize {
    DEFAULT_MAX_RULES
}
fn default_weekend() -> Vec<Weekday> {
    vec![Weekday::Sat, Weekday::Sun]
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            sample_count: default_sample_count(),
            sigma_level: default_sigma_level(),
        }
    }
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            seconds_per_workday: default_seconds_per_workday(),
            horizon_days: default_horizon_days(),
            max_days: default_max_days(),
            max_inclusions: default_max_rules(),
            max_exclusions: default_max_rules(),
            weekend: default_weekend(),
        }
    }
}

/// Directory holding `config.toml`, created on first use.
///
/// Lives under `~/.config`; `EBS_ENV=dev` selects a separate `ebs-dev`
/// directory so experiments leave the real settings alone.
///
/// # Errors
///
/// [`ConfigError::LoadFailed`] if there is no home directory, or an IO error
/// if the directory cannot be created.
pub fn data_dir() -> Result<PathBuf> {
    let config_root = dirs::home_dir()
        .map(|home| home.join(".config"))
        .ok_or_else(|| ConfigError::LoadFailed {
            path: PathBuf::from("~/.config"),
            message: "home directory not found".to_string(),
        })?;
    let dir = config_root.join(dir_name(std::env::var("EBS_ENV").ok().as_deref()));
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

fn dir_name(env: Option<&str>) -> &'static str {
    match env {
        Some("dev") => "ebs-dev",
        _ => "ebs",
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> std::result::Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if key.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            if parts.peek().is_some() {
                current = current.get_mut(part).ok_or_else(unknown)?;
                continue;
            }

            let obj = current.as_object_mut().ok_or_else(unknown)?;
            let existing = obj.get(part).ok_or_else(unknown)?;

            let new_value = match existing {
                serde_json::Value::Bool(_) => serde_json::Value::Bool(
                    value.parse::<bool>().map_err(|e| invalid(e.to_string()))?,
                ),
                serde_json::Value::Number(_) => {
                    if let Ok(n) = value.parse::<i64>() {
                        serde_json::Value::Number(n.into())
                    } else if let Ok(n) = value.parse::<f64>() {
                        serde_json::Number::from_f64(n)
                            .map(serde_json::Value::Number)
                            .ok_or_else(|| invalid(format!("cannot parse '{value}' as number")))?
                    } else {
                        return Err(invalid(format!("cannot parse '{value}' as number")));
                    }
                }
                serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                    serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
                }
                _ => serde_json::Value::String(value.into()),
            };

            obj.insert(part.to_string(), new_value);
            return Ok(());
        }

        Err(unknown())
    }

    /// Default file location.
    pub fn path() -> Result<PathBuf> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from the default location, writing defaults if absent.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path()?)
    }

    /// Load from `path`, writing defaults there if the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be parsed, or if the
    /// default config cannot be written.
    pub fn load_from(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let cfg: Config = toml::from_str(&content).map_err(ConfigError::from)?;
                Ok(cfg)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }
            .into()),
        }
    }

    /// Persist to the default location.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    /// Persist to `path`.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by key without saving.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value does not fit the
    /// key's type.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut json = serde_json::to_value(&*self).map_err(ConfigError::from)?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        *self = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Ok(())
    }

    pub fn forecast_settings(&self) -> ForecastSettings {
        ForecastSettings {
            sample_count: self.forecast.sample_count,
            sigma_level: self.forecast.sigma_level,
            seconds_per_workday: self.calendar.seconds_per_workday,
            max_days: self.calendar.max_days,
        }
    }

    /// The default weekday calendar anchored at `today`, honoring the
    /// configured capacities and time range.
    pub fn weekday_calendar(&self, today: NormalizedDate) -> Result<Calendar> {
        let cal = &self.calendar;
        let mut calendar = Calendar::with_capacity(cal.max_inclusions, cal.max_exclusions)
            .with_range(self.time.range.range());
        calendar.add_weekday_rules(today, cal.horizon_days, &cal.weekend)?;
        Ok(calendar)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EbsError;
    use crate::time::{self, Period};
    use tempfile::TempDir;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.forecast.sample_count, 100);
        assert_eq!(parsed.calendar.weekend, vec![Weekday::Sat, Weekday::Sun]);
        assert_eq!(parsed.time.range, TimeRangeKind::Wide);
    }

    #[test]
    fn dev_env_gets_its_own_directory() {
        assert_eq!(dir_name(Some("dev")), "ebs-dev");
        assert_eq!(dir_name(Some("production")), "ebs");
        assert_eq!(dir_name(None), "ebs");
    }

    #[test]
    fn weekday_calendar_ends_at_horizon() {
        let today = time::parse("2016-09-12T09:00:00").unwrap();
        let cfg = Config::default();
        assert_eq!(cfg.calendar.horizon_days, DEFAULT_HORIZON_DAYS);
        assert_eq!(cfg.calendar.max_days, DEFAULT_MAX_DAYS);

        let calendar = cfg.weekday_calendar(today).unwrap();
        let last = time::add(&today, &Period::days(DEFAULT_HORIZON_DAYS as i64 - 1)).unwrap();
        let past = time::add(&today, &Period::days(DEFAULT_HORIZON_DAYS as i64)).unwrap();
        // A Wednesday and a Thursday, so only the horizon separates them.
        assert!(calendar.is_work_day(&last));
        assert!(!calendar.is_work_day(&past));
    }

    #[test]
    fn partial_file_fills_defaults() {
        let parsed: Config = toml::from_str("[forecast]\nsigma_level = 1.5\n").unwrap();
        assert_eq!(parsed.forecast.sigma_level, 1.5);
        assert_eq!(parsed.forecast.sample_count, 100);
        assert_eq!(parsed.calendar.seconds_per_workday, 28_800);
    }

    #[test]
    fn time_range_reads_snake_case() {
        let parsed: Config = toml::from_str("[time]\nrange = \"time_t_32\"\n").unwrap();
        assert_eq!(parsed.time.range, TimeRangeKind::TimeT32);
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("forecast.sample_count").as_deref(), Some("100"));
        assert_eq!(cfg.get("forecast.sigma_level").as_deref(), Some("2.0"));
        assert_eq!(cfg.get("time.range").as_deref(), Some("wide"));
        assert!(cfg.get("forecast.missing_key").is_none());
        assert!(cfg.get("").is_none());
    }

    #[test]
    fn set_updates_numbers_and_lists() {
        let mut cfg = Config::default();
        cfg.set("forecast.sample_count", "500").unwrap();
        cfg.set("forecast.sigma_level", "1.5").unwrap();
        cfg.set("calendar.weekend", "[\"Fri\"]").unwrap();
        assert_eq!(cfg.forecast.sample_count, 500);
        assert_eq!(cfg.forecast.sigma_level, 1.5);
        assert_eq!(cfg.calendar.weekend, vec![Weekday::Fri]);
    }

    #[test]
    fn set_rejects_unknown_key() {
        let mut cfg = Config::default();
        assert!(matches!(
            cfg.set("forecast.nonexistent_key", "1"),
            Err(EbsError::Config(ConfigError::UnknownKey(_)))
        ));
    }

    #[test]
    fn set_rejects_invalid_type() {
        let mut cfg = Config::default();
        assert!(matches!(
            cfg.set("forecast.sample_count", "lots"),
            Err(EbsError::Config(ConfigError::InvalidValue { .. }))
        ));
        assert!(matches!(
            cfg.set("time.range", "time_t_16"),
            Err(EbsError::Config(ConfigError::InvalidValue { .. }))
        ));
        assert_eq!(cfg.time.range, TimeRangeKind::Wide);
    }

    #[test]
    fn load_writes_defaults_when_missing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        let cfg = Config::load_from(&path).unwrap();
        assert!(path.exists());
        assert_eq!(cfg.calendar.max_days, DEFAULT_MAX_DAYS);

        let mut changed = cfg.clone();
        changed.set("calendar.seconds_per_workday", "3600").unwrap();
        changed.save_to(&path).unwrap();
        let reloaded = Config::load_from(&path).unwrap();
        assert_eq!(reloaded.calendar.seconds_per_workday, 3600);
    }

    #[test]
    fn load_rejects_malformed_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "forecast = 3").unwrap();
        assert!(matches!(
            Config::load_from(&path),
            Err(EbsError::Config(ConfigError::ParseFailed(_)))
        ));
    }

    #[test]
    fn weekday_calendar_honors_capacity() {
        let today = time::parse("2016-09-08T09:00:00").unwrap();
        let mut cfg = Config::default();
        cfg.calendar.max_exclusions = 1;
        assert!(matches!(
            cfg.weekday_calendar(today),
            Err(EbsError::CapacityExceeded { capacity: 1, .. })
        ));

        cfg.calendar.max_exclusions = 2;
        let calendar = cfg.weekday_calendar(today).unwrap();
        assert_eq!(calendar.exclusions().len(), 2);
        assert!(!calendar.is_work_day(&time::parse("2016-09-10T09:00:00").unwrap()));
    }
}
