//! TOML-based application configuration.
//!
//! Stores user preferences including:
//! - Default wake time, sleep amount and coffee count for `predict`
//! - The model artifact to load (empty = bundled)
//! - Clock format for displayed bedtimes
//!
//! Configuration is stored at `~/.config/bedtime/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::error::ConfigError;
use crate::input::{BedtimeRequest, CoffeeCount, SleepAmount, WakeTime};
use crate::model::ModelSource;
use crate::presenter::ClockFormat;

/// Values used when the caller does not supply one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    #[serde(default = "default_wake_time")]
    pub wake_time: WakeTime,
    #[serde(default = "default_sleep_amount")]
    pub sleep_amount: SleepAmount,
    #[serde(default = "default_coffee_count")]
    pub coffee_count: CoffeeCount,
}

/// Model artifact selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Path to a `.toml` or `.json` artifact. Empty selects the bundled model.
    #[serde(default = "default_model_path")]
    pub path: String,
}

/// Display configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default = "default_clock")]
    pub clock: ClockFormat,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/bedtime/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub defaults: DefaultsConfig,
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

// Default functions
fn default_wake_time() -> WakeTime {
    WakeTime::default()
}
fn default_sleep_amount() -> SleepAmount {
    SleepAmount::default()
}
fn default_coffee_count() -> CoffeeCount {
    CoffeeCount::default()
}
fn default_model_path() -> String {
    String::new()
}
fn default_clock() -> ClockFormat {
    ClockFormat::TwelveHour
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            wake_time: default_wake_time(),
            sleep_amount: default_sleep_amount(),
            coffee_count: default_coffee_count(),
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            path: default_model_path(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            clock: default_clock(),
        }
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
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if parts.peek().map_or(true, |p| p.is_empty()) {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            let is_leaf = parts.peek().is_none();
            if is_leaf {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value.parse::<bool>().map_err(|e| invalid(e.to_string()))?,
                    ),
                    serde_json::Value::Number(_) => {
                        if let Ok(n) = value.parse::<u64>() {
                            serde_json::Value::Number(n.into())
                        } else if let Ok(n) = value.parse::<f64>() {
                            let nan = || invalid(format!("cannot parse '{value}' as number"));
                            serde_json::Number::from_f64(n)
                                .map(serde_json::Value::Number)
                                .ok_or_else(nan)?
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

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    /// Default location inside the data directory.
    pub fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from the default location, writing defaults if the file is missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path()?)
    }

    /// Load from `path`, writing defaults there if the file is missing.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "config missing, writing defaults");
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(err) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: err.to_string(),
            }),
        }
    }

    /// Persist to the default location.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))
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
    /// Returns an error if the key is unknown or the value does not parse
    /// into the field's type and range.
    pub fn apply(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json = serde_json::to_value(&*self).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        *self = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Ok(())
    }

    /// Set a config value by key and save to the default location.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        self.apply(key, value)?;
        self.save()
    }

    /// Request built from the configured defaults.
    pub fn default_request(&self) -> BedtimeRequest {
        BedtimeRequest::new(
            self.defaults.wake_time,
            self.defaults.sleep_amount,
            self.defaults.coffee_count,
        )
    }

    pub fn model_source(&self) -> ModelSource {
        ModelSource::from_path_setting(&self.model.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.defaults.wake_time.to_string(), "07:00");
        assert_eq!(parsed.defaults.sleep_amount.hours(), 8.0);
        assert_eq!(parsed.defaults.coffee_count.cups(), 1);
        assert_eq!(parsed.display.clock, ClockFormat::TwelveHour);
        assert!(parsed.model.path.is_empty());
    }

    #[test]
    fn empty_file_yields_defaults() {
        let parsed: Config = toml::from_str("").unwrap();
        assert_eq!(parsed.defaults.sleep_amount.hours(), 8.0);
        assert_eq!(parsed.model_source(), ModelSource::Bundled);
    }

    #[test]
    fn partial_sections_fill_missing_fields() {
        let parsed: Config =
            toml::from_str("[defaults]\nsleep_amount = 9.5\n\n[display]\n").unwrap();
        assert_eq!(parsed.defaults.sleep_amount.hours(), 9.5);
        assert_eq!(parsed.defaults.wake_time.to_string(), "07:00");
        assert_eq!(parsed.defaults.coffee_count.cups(), 1);
        assert_eq!(parsed.display.clock, ClockFormat::TwelveHour);
        assert!(parsed.model.path.is_empty());
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("defaults.wake_time").as_deref(), Some("07:00"));
        assert_eq!(cfg.get("defaults.coffee_count").as_deref(), Some("1"));
        assert_eq!(cfg.get("display.clock").as_deref(), Some("12h"));
        assert!(cfg.get("display.missing_key").is_none());
        assert!(cfg.get("").is_none());
    }

    #[test]
    fn apply_updates_typed_values() {
        let mut cfg = Config::default();
        cfg.apply("defaults.sleep_amount", "7.5").unwrap();
        cfg.apply("defaults.coffee_count", "3").unwrap();
        cfg.apply("defaults.wake_time", "6:15 AM").unwrap();
        cfg.apply("display.clock", "24h").unwrap();
        cfg.apply("model.path", "/opt/models/trees.json").unwrap();

        assert_eq!(cfg.defaults.sleep_amount.hours(), 7.5);
        assert_eq!(cfg.defaults.coffee_count.cups(), 3);
        assert_eq!(cfg.defaults.wake_time.to_string(), "06:15");
        assert_eq!(cfg.display.clock, ClockFormat::TwentyFourHour);
        assert_eq!(
            cfg.model_source(),
            ModelSource::File(PathBuf::from("/opt/models/trees.json"))
        );
    }

    #[test]
    fn apply_sleep_amount_accepts_whole_hours() {
        let mut cfg = Config::default();
        cfg.apply("defaults.sleep_amount", "9").unwrap();
        assert_eq!(cfg.defaults.sleep_amount.hours(), 9.0);
    }

    #[test]
    fn apply_rejects_out_of_range_values() {
        let mut cfg = Config::default();
        assert!(matches!(
            cfg.apply("defaults.sleep_amount", "13"),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(matches!(
            cfg.apply("defaults.coffee_count", "0"),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(matches!(
            cfg.apply("defaults.wake_time", "25:00"),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(matches!(
            cfg.apply("display.clock", "13h"),
            Err(ConfigError::InvalidValue { .. })
        ));
        // Failed updates leave the config untouched
        assert_eq!(cfg.defaults.sleep_amount.hours(), 8.0);
    }

    #[test]
    fn apply_rejects_unknown_key() {
        let mut cfg = Config::default();
        assert!(matches!(
            cfg.apply("display.theme", "dark"),
            Err(ConfigError::UnknownKey(_))
        ));
        assert!(matches!(cfg.apply("", "x"), Err(ConfigError::UnknownKey(_))));
    }

    #[test]
    fn load_from_missing_file_writes_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");

        let cfg = Config::load_from(&path).unwrap();
        assert!(path.exists());
        assert_eq!(cfg.defaults.coffee_count.cups(), 1);
    }

    #[test]
    fn save_then_load_preserves_changes() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");

        let mut cfg = Config::default();
        cfg.apply("defaults.sleep_amount", "10.25").unwrap();
        cfg.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.defaults.sleep_amount.hours(), 10.25);
    }

    #[test]
    fn load_from_rejects_out_of_range_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[defaults]\ncoffee_count = 42\n").unwrap();

        assert!(matches!(
            Config::load_from(&path),
            Err(ConfigError::LoadFailed { .. })
        ));
    }
}
