//! Configuration management with layered hierarchy

use serde::{Deserialize, Deserializer};
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::core::units::{Length, UnitError};

/// Environment variable pointing at an alternative config file
pub const CONFIG_ENV: &str = "HEXSCREW_CONFIG";

/// hexscrew configuration with layered hierarchy
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Host macro directory to install into
    pub macro_dir: Option<PathBuf>,

    /// Shaft length for new screws (e.g. "20", "20 mm", "0.75 in")
    #[serde(deserialize_with = "string_or_number")]
    pub default_length: Option<String>,

    /// Default output format
    pub default_format: Option<String>,

    /// Size table to use instead of the built-in one
    pub table: Option<PathBuf>,
}

impl Config {
    /// Load configuration from all sources, merging in priority order
    pub fn load() -> Self {
        let mut config = Config::default();

        // 1. Built-in defaults (already in Default impl)

        // 2. User config file (~/.config/hexscrew/config.yaml)
        if let Some(path) = Self::global_config_path() {
            if let Some(file_config) = Self::read_file(&path) {
                config.merge(file_config);
            }
        }

        // 3. Environment variables
        config.merge(Self::from_env());

        config
    }

    /// Path of the user config file; `HEXSCREW_CONFIG` overrides it
    pub fn global_config_path() -> Option<PathBuf> {
        if let Some(path) = std::env::var_os(CONFIG_ENV) {
            return Some(PathBuf::from(path));
        }
        directories::ProjectDirs::from("", "", "hexscrew")
            .map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    /// Read one config file; unreadable or malformed files are skipped
    fn read_file(path: &Path) -> Option<Config> {
        if !path.exists() {
            return None;
        }
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "cannot read config file");
                return None;
            }
        };
        if contents.trim().is_empty() {
            return None;
        }
        match serde_yml::from_str::<Config>(&contents) {
            Ok(config) => Some(config),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "ignoring malformed config file");
                None
            }
        }
    }

    fn from_env() -> Config {
        Config {
            macro_dir: std::env::var_os("HEXSCREW_MACRO_DIR").map(PathBuf::from),
            default_length: std::env::var("HEXSCREW_DEFAULT_LENGTH").ok(),
            default_format: None,
            table: std::env::var_os("HEXSCREW_TABLE").map(PathBuf::from),
        }
    }

    /// Merge another config into this one (other takes precedence)
    fn merge(&mut self, other: Config) {
        if other.macro_dir.is_some() {
            self.macro_dir = other.macro_dir;
        }
        if other.default_length.is_some() {
            self.default_length = other.default_length;
        }
        if other.default_format.is_some() {
            self.default_format = other.default_format;
        }
        if other.table.is_some() {
            self.table = other.table;
        }
    }

    /// Parsed default shaft length, if configured
    pub fn default_length(&self) -> Result<Option<Length>, UnitError> {
        self.default_length
            .as_deref()
            .map(str::parse::<Length>)
            .transpose()
    }

    /// Look up a value by key name
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "macro_dir" => self.macro_dir.as_ref().map(|p| p.display().to_string()),
            "default_length" => self.default_length.clone(),
            "default_format" => self.default_format.clone(),
            "table" => self.table.as_ref().map(|p| p.display().to_string()),
            _ => None,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    String(String),
    Integer(i64),
    Float(f64),
}

/// Accept `default_length: 20` as well as `default_length: "20 mm"`
fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(
        Option::<StringOrNumber>::deserialize(deserializer)?.map(|value| match value {
            StringOrNumber::String(s) => s,
            StringOrNumber::Integer(n) => n.to_string(),
            StringOrNumber::Float(x) => x.to_string(),
        }),
    )
}

/// Valid configuration keys
pub const VALID_KEYS: &[(&str, &str)] = &[
    ("macro_dir", "Host macro directory used by `hexscrew install`"),
    ("default_length", "Shaft length for new screws (e.g. \"20 mm\")"),
    ("default_format", "Default output format (yaml, json, tsv, csv, md)"),
    ("table", "Path of a YAML size table replacing the built-in one"),
];

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_merge_prefers_other() {
        let mut base = Config {
            macro_dir: Some(PathBuf::from("/a")),
            default_length: Some("10".to_string()),
            ..Default::default()
        };
        base.merge(Config {
            default_length: Some("20 mm".to_string()),
            ..Default::default()
        });

        assert_eq!(base.macro_dir, Some(PathBuf::from("/a")));
        assert_eq!(base.default_length().unwrap(), Some(Length::from_mm(20.0)));
    }

    #[test]
    fn test_read_file() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("config.yaml");
        std::fs::write(&path, "macro_dir: /opt/Macro\ndefault_format: json\n").unwrap();

        let config = Config::read_file(&path).unwrap();
        assert_eq!(config.macro_dir, Some(PathBuf::from("/opt/Macro")));
        assert_eq!(config.get("default_format").as_deref(), Some("json"));
        assert_eq!(config.get("unknown"), None);
    }

    #[test]
    fn test_malformed_file_is_skipped() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("config.yaml");
        std::fs::write(&path, "macro_dir: [unclosed\n").unwrap();
        assert!(Config::read_file(&path).is_none());
        assert!(Config::read_file(&tmp.path().join("missing.yaml")).is_none());
    }

    #[test]
    fn test_numeric_default_length() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("config.yaml");
        std::fs::write(&path, "default_length: 20\nmacro_dir: /opt/Macro\n").unwrap();

        let config = Config::read_file(&path).unwrap();
        assert_eq!(config.macro_dir, Some(PathBuf::from("/opt/Macro")));
        assert_eq!(config.default_length.as_deref(), Some("20"));
        assert_eq!(config.default_length().unwrap(), Some(Length::from_mm(20.0)));

        std::fs::write(&path, "default_length: 12.5\n").unwrap();
        let config = Config::read_file(&path).unwrap();
        assert_eq!(config.default_length().unwrap(), Some(Length::from_mm(12.5)));
    }

    #[test]
    fn test_bad_default_length() {
        let config = Config {
            default_length: Some("ten".to_string()),
            ..Default::default()
        };
        assert!(config.default_length().is_err());
        assert_eq!(Config::default().default_length().unwrap(), None);
    }
}
