use anyhow::{Context, Result};
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::constants::{DEFAULT_API_ENDPOINT, DEFAULT_PORT, DEMO_API_KEY};
use crate::utils::{ensure_directory_exists, get_config_path};

pub const API_KEY_ENV: &str = "NDVI_API_KEY";
pub const API_ENDPOINT_ENV: &str = "NDVI_API_ENDPOINT";
pub const PORT_ENV: &str = "NDVI_VIEWER_PORT";

#[derive(Clone, PartialEq)]
pub struct Settings {
    pub port: u16,
    pub api_endpoint: String,
    pub api_key: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            api_endpoint: DEFAULT_API_ENDPOINT.to_string(),
            api_key: DEMO_API_KEY.to_string(),
        }
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("port", &self.port)
            .field("api_endpoint", &self.api_endpoint)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

impl Settings {
    /// Reads `path`, falling back to defaults when the file does not exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Settings::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Ok(Self::from_ini_str(&content))
    }

    /// Parses `key = value` lines. Unknown keys and unparsable values are
    /// ignored so an old file never prevents startup.
    pub fn from_ini_str(content: &str) -> Self {
        let mut settings = Settings::default();
        let config_map: HashMap<&str, &str> = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .filter_map(|line| line.split_once('='))
            .map(|(key, value)| (key.trim(), value.trim().trim_matches('"')))
            .collect();

        if let Some(port) = config_map.get("port").and_then(|s| s.parse::<u16>().ok()) {
            settings.port = port;
        }
        if let Some(endpoint) = config_map.get("api_endpoint").filter(|s| !s.is_empty()) {
            settings.api_endpoint = endpoint.to_string();
        }
        if let Some(key) = config_map.get("api_key").filter(|s| !s.is_empty()) {
            settings.api_key = key.to_string();
        }
        settings
    }

    pub fn apply_env(&mut self) {
        self.apply_overrides(|name| std::env::var(name).ok());
    }

    /// Applies overrides from `lookup`, which maps a variable name to its value.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(key) = lookup(API_KEY_ENV).filter(|s| !s.trim().is_empty()) {
            self.api_key = key.trim().to_string();
        }
        if let Some(endpoint) = lookup(API_ENDPOINT_ENV).filter(|s| !s.trim().is_empty()) {
            self.api_endpoint = endpoint.trim().to_string();
        }
        if let Some(port) = lookup(PORT_ENV).and_then(|s| s.trim().parse::<u16>().ok()) {
            self.port = port;
        }
    }

    pub fn uses_demo_key(&self) -> bool {
        self.api_key == DEMO_API_KEY
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            ensure_directory_exists(parent).context("Creating config directory")?;
        }

        let mut content = String::new();
        content.push_str("# NDVI Viewer Configuration File\n");
        content.push_str(&format!("port = {}\n", self.port));
        content.push_str(&format!("api_endpoint = \"{}\"\n", self.api_endpoint));
        if self.uses_demo_key() {
            content.push_str(&format!("# api_key = \"<your api.nasa.gov key>\"  (or set {API_KEY_ENV})\n"));
        } else {
            content.push_str(&format!("api_key = \"{}\"\n", self.api_key));
        }

        std::fs::write(path, content).context("Failed to write to config file")?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        get_config_path()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_keys_and_skips_comments() {
        let settings = Settings::from_ini_str(
            "# comment\n\nport = 4100\napi_endpoint = \"http://localhost:9000/assets\"\napi_key = abc123\nunknown = 1\n",
        );

        assert_eq!(settings.port, 4100);
        assert_eq!(settings.api_endpoint, "http://localhost:9000/assets");
        assert_eq!(settings.api_key, "abc123");
    }

    #[test]
    fn bad_values_keep_defaults() {
        let settings = Settings::from_ini_str("port = not-a-port\napi_key = \"\"\n");

        assert_eq!(settings, Settings::default());
        assert!(settings.uses_demo_key());
    }

    #[test]
    fn overrides_win_over_file_values() {
        let mut settings = Settings::from_ini_str("port = 4100\napi_key = from-file\n");
        settings.apply_overrides(|name| match name {
            API_KEY_ENV => Some("from-env".to_string()),
            PORT_ENV => Some("5000".to_string()),
            _ => None,
        });

        assert_eq!(settings.api_key, "from-env");
        assert_eq!(settings.port, 5000);
        assert_eq!(settings.api_endpoint, DEFAULT_API_ENDPOINT);
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("ndvi_viewer.ini");
        let settings = Settings {
            port: 4200,
            api_endpoint: "http://localhost:9000/assets".to_string(),
            api_key: "real-key".to_string(),
        };

        settings.save_to(&path).unwrap();
        assert_eq!(Settings::load_from(&path).unwrap(), settings);
    }

    #[test]
    fn demo_key_is_not_written_to_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ndvi_viewer.ini");

        Settings::default().save_to(&path).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();

        assert!(!written.contains("api_key = \"DEMO_KEY\""));
        assert!(Settings::load_from(&path).unwrap().uses_demo_key());
    }

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load_from(&dir.path().join("absent.ini")).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn debug_redacts_the_key() {
        let settings = Settings {
            api_key: "real-key".to_string(),
            ..Settings::default()
        };
        assert!(!format!("{settings:?}").contains("real-key"));
    }
}
