//! TOML-based application configuration.
//!
//! Stores view preferences:
//! - Calendar week start and per-day entry cap
//! - Gantt handling of inverted date ranges and bar width
//! - Kanban work-in-progress limit
//!
//! Configuration is stored at `~/.config/projecthub/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::calendar::WeekStart;
use crate::error::ConfigError;
use crate::kanban::{Column, WipLimits};
use crate::timeline::InvertedRangePolicy;

/// Calendar view configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarConfig {
    #[serde(default)]
    pub week_start: WeekStart,
    /// Entries shown per day before "+N more".
    #[serde(default = "default_max_visible_entries")]
    pub max_visible_entries: usize,
}

/// Gantt view configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GanttConfig {
    #[serde(default)]
    pub inverted_range: InvertedRangePolicy,
    /// Track width in characters for terminal charts.
    #[serde(default = "default_bar_width")]
    pub bar_width: u32,
}

/// Kanban view configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KanbanConfig {
    /// 0 disables the limit.
    #[serde(default = "default_wip_limit")]
    pub in_progress_wip_limit: usize,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/projecthub/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub calendar: CalendarConfig,
    #[serde(default)]
    pub gantt: GanttConfig,
    #[serde(default)]
    pub kanban: KanbanConfig,
}

// Default functions
fn default_max_visible_entries() -> usize {
    3
}
fn default_bar_width() -> u32 {
    60
}
fn default_wip_limit() -> usize {
    3
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            week_start: WeekStart::Sun,
            max_visible_entries: default_max_visible_entries(),
        }
    }
}

impl Default for GanttConfig {
    fn default() -> Self {
        Self {
            inverted_range: InvertedRangePolicy::CollapseToStart,
            bar_width: default_bar_width(),
        }
    }
}

impl Default for KanbanConfig {
    fn default() -> Self {
        Self {
            in_progress_wip_limit: default_wip_limit(),
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

        if key.is_empty() {
            return Err(unknown());
        }
        let mut parts = key.split('.').peekable();

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
                            serde_json::Number::from_f64(n)
                                .map(serde_json::Value::Number)
                                .ok_or_else(|| invalid(format!("cannot parse '{value}' as number")))?
                        } else {
                            return Err(invalid(format!("cannot parse '{value}' as number")));
                        }
                    }
                    serde_json::Value::Object(_) => return Err(unknown()),
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
    ///
    /// # Errors
    /// Returns an error if the data directory cannot be resolved.
    pub fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from disk or return default.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::path()?;
        if path.exists() {
            Self::load_from(&path)
        } else {
            let cfg = Self::default();
            cfg.save_to(&path)?;
            Ok(cfg)
        }
    }

    /// Read and parse a specific file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let load_failed = |message: String| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = std::fs::read_to_string(path).map_err(|e| load_failed(e.to_string()))?;
        toml::from_str(&content).map_err(|e| load_failed(e.to_string()))
    }

    /// Persist to the default location.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    /// Persist to `path`.
    ///
    /// # Errors
    /// Returns an error if the config cannot be serialized or written.
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
            serde_json::Value::Object(_) => None,
            other => Some(other.to_string()),
        }
    }

    /// Every leaf as `(dot.key, value)`, sorted by key.
    pub fn entries(&self) -> Vec<(String, String)> {
        let mut out = Vec::new();
        if let Ok(serde_json::Value::Object(sections)) = serde_json::to_value(self) {
            for (section, fields) in sections {
                if let serde_json::Value::Object(fields) = fields {
                    for (field, value) in fields {
                        let value = match value {
                            serde_json::Value::String(s) => s,
                            other => other.to_string(),
                        };
                        out.push((format!("{section}.{field}"), value));
                    }
                }
            }
        }
        out
    }

    /// Change a value in memory. The key must exist and the value must
    /// parse as the field's type.
    ///
    /// # Errors
    /// Returns an error if the key is unknown or the value is invalid.
    pub fn apply(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };
        let mut json = serde_json::to_value(&*self).map_err(|e| invalid(e.to_string()))?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        *self = serde_json::from_value(json).map_err(|e| invalid(e.to_string()))?;
        Ok(())
    }

    /// Set a config value by key and save. Returns error if key is unknown.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value cannot be parsed,
    /// or the config cannot be saved.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        self.apply(key, value)?;
        self.save()
    }

    pub fn wip_limits(&self) -> WipLimits {
        let limit = self.kanban.in_progress_wip_limit;
        WipLimits::none().with_limit(Column::InProgress, (limit > 0).then_some(limit))
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            log::warn!("using default configuration: {e}");
            Self::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, cfg);
        assert!(toml_str.contains("week_start = \"sun\""));
        assert!(toml_str.contains("inverted_range = \"collapse_to_start\""));
    }

    #[test]
    fn partial_file_fills_defaults() {
        let parsed: Config = toml::from_str("[calendar]\nweek_start = \"mon\"\n").unwrap();
        assert_eq!(parsed.calendar.week_start, WeekStart::Mon);
        assert_eq!(parsed.calendar.max_visible_entries, 3);
        assert_eq!(parsed.kanban.in_progress_wip_limit, 3);
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("calendar.week_start").as_deref(), Some("sun"));
        assert_eq!(cfg.get("calendar.max_visible_entries").as_deref(), Some("3"));
        assert!(cfg.get("calendar.missing_key").is_none());
        assert!(cfg.get("calendar").is_none());
    }

    #[test]
    fn set_json_value_by_path_updates_nested_number() {
        let mut json = serde_json::to_value(Config::default()).unwrap();
        Config::set_json_value_by_path(&mut json, "kanban.in_progress_wip_limit", "5").unwrap();
        assert_eq!(
            Config::get_json_value_by_path(&json, "kanban.in_progress_wip_limit").unwrap(),
            &serde_json::Value::Number(5.into())
        );
    }

    #[test]
    fn set_json_value_by_path_rejects_unknown_key() {
        let mut json = serde_json::to_value(Config::default()).unwrap();
        let result = Config::set_json_value_by_path(&mut json, "calendar.nonexistent_key", "value");
        assert!(matches!(result, Err(ConfigError::UnknownKey(_))));
    }

    #[test]
    fn set_json_value_by_path_rejects_invalid_type() {
        let mut json = serde_json::to_value(Config::default()).unwrap();
        let result = Config::set_json_value_by_path(&mut json, "gantt.bar_width", "wide");
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn apply_validates_enum_values() {
        let mut cfg = Config::default();
        cfg.apply("gantt.inverted_range", "swap").unwrap();
        assert_eq!(cfg.gantt.inverted_range, InvertedRangePolicy::Swap);

        let err = cfg.apply("calendar.week_start", "someday").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
        assert_eq!(cfg.calendar.week_start, WeekStart::Sun);
    }

    #[test]
    fn wip_limit_zero_disables_cap() {
        let mut cfg = Config::default();
        assert_eq!(cfg.wip_limits().limit(Column::InProgress), Some(3));
        cfg.apply("kanban.in_progress_wip_limit", "0").unwrap();
        assert_eq!(cfg.wip_limits().limit(Column::InProgress), None);
    }

    #[test]
    fn entries_list_every_leaf() {
        let keys: Vec<_> = Config::default().entries().into_iter().map(|(k, _)| k).collect();
        assert!(keys.contains(&"calendar.week_start".to_string()));
        assert!(keys.contains(&"gantt.bar_width".to_string()));
        assert!(keys.contains(&"kanban.in_progress_wip_limit".to_string()));
    }

    #[test]
    fn save_to_and_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut cfg = Config::default();
        cfg.apply("calendar.max_visible_entries", "5").unwrap();
        cfg.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap(), cfg);

        std::fs::write(&path, "calendar = 7").unwrap();
        assert!(matches!(
            Config::load_from(&path),
            Err(ConfigError::LoadFailed { .. })
        ));
    }
}
