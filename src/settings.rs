use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
    #[serde(default = "default_output_name")]
    pub default_output_name: String,
    /// Pre-check every month in the interactive picker.
    #[serde(default)]
    pub select_all_months: bool,
}

fn default_output_dir() -> String {
    ".".to_string()
}

fn default_output_name() -> String {
    "GST_Data_Report".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            default_output_name: default_output_name(),
            select_all_months: false,
        }
    }
}

fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("gstconv")
}

pub fn settings_path() -> PathBuf {
    config_dir().join("settings.json")
}

/// Missing or unreadable settings fall back to defaults.
pub fn load_settings() -> Settings {
    let path = settings_path();
    if path.exists() {
        let content = std::fs::read_to_string(&path).unwrap_or_default();
        serde_json::from_str(&content).unwrap_or_default()
    } else {
        Settings::default()
    }
}

pub fn save_settings(settings: &Settings) -> Result<()> {
    std::fs::create_dir_all(config_dir())?;
    let json = serde_json::to_string_pretty(settings)?;
    std::fs::write(settings_path(), format!("{json}\n"))?;
    Ok(())
}

pub fn expand_path(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix('~') {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest.trim_start_matches('/'));
        }
    }
    PathBuf::from(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let s = Settings::default();
        assert_eq!(s.output_dir, ".");
        assert_eq!(s.default_output_name, "GST_Data_Report");
        assert!(!s.select_all_months);
    }

    #[test]
    fn test_partial_file_merges_with_defaults() {
        let s: Settings = serde_json::from_str(r#"{"select_all_months": true}"#).unwrap();
        assert!(s.select_all_months);
        assert_eq!(s.default_output_name, "GST_Data_Report");
        assert_eq!(s.output_dir, ".");
    }

    #[test]
    fn test_roundtrip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let settings = Settings {
            output_dir: "/tmp/reports".to_string(),
            default_output_name: "FY24".to_string(),
            select_all_months: true,
        };
        std::fs::write(&path, serde_json::to_string_pretty(&settings).unwrap()).unwrap();
        let loaded: Settings = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_expand_path() {
        assert_eq!(expand_path("/abs/dir"), PathBuf::from("/abs/dir"));
        assert_eq!(expand_path("rel"), PathBuf::from("rel"));
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_path("~/reports"), home.join("reports"));
        }
    }
}
