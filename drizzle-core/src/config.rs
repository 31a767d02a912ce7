use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

/// Environment variable consulted for the OpenWeatherMap key, both at
/// runtime and when the crate is built.
pub const API_KEY_ENV: &str = "OWM_API_KEY";

const BUILD_TIME_API_KEY: Option<&str> = option_env!("OWM_API_KEY");

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// api_key = "..."
/// include_forecast = true
/// timeout_secs = 10
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_key: Option<String>,

    /// Overrides the OpenWeatherMap base URL.
    pub base_url: Option<String>,

    /// Fetch the 5-day forecast alongside current conditions.
    pub include_forecast: bool,

    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self { api_key: None, base_url: None, include_forecast: true, timeout_secs: 10 }
    }
}

impl Config {
    /// Resolve the API key: config file, then `OWM_API_KEY` at runtime, then
    /// the key baked in at build time.
    pub fn resolve_api_key(&self) -> Result<String> {
        self.resolve_api_key_with(std::env::var(API_KEY_ENV).ok())
    }

    fn resolve_api_key_with(&self, runtime_env: Option<String>) -> Result<String> {
        [self.api_key.clone(), runtime_env, BUILD_TIME_API_KEY.map(str::to_owned)]
            .into_iter()
            .flatten()
            .find(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                anyhow!(
                    "No OpenWeatherMap API key configured.\n\
                     Hint: run `drizzle configure` or set {API_KEY_ENV}."
                )
            })
    }

    pub fn set_api_key(&mut self, api_key: String) {
        self.api_key = Some(api_key);
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Load config from the platform location, or defaults on first run.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to the platform location, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_file_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Directory holding both `config.toml` and the settings file.
    pub fn config_dir() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "drizzle", "drizzle")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().to_path_buf())
    }

    pub fn config_file_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_enable_forecast() {
        let cfg = Config::default();
        assert!(cfg.include_forecast);
        assert_eq!(cfg.timeout(), Duration::from_secs(10));
        assert!(cfg.base_url.is_none());
    }

    #[test]
    fn configured_key_wins_over_environment() {
        let mut cfg = Config::default();
        cfg.set_api_key("FROM_FILE".into());

        let key = cfg.resolve_api_key_with(Some("FROM_ENV".into())).expect("key");
        assert_eq!(key, "FROM_FILE");
    }

    #[test]
    fn blank_configured_key_does_not_shadow_environment() {
        let mut cfg = Config::default();
        cfg.set_api_key("".into());
        let key = cfg.resolve_api_key_with(Some("FROM_ENV".into())).expect("key");
        assert_eq!(key, "FROM_ENV");
    }

    #[test]
    fn environment_key_used_when_file_has_none() {
        let cfg = Config::default();
        let key = cfg.resolve_api_key_with(Some("FROM_ENV".into())).expect("key");
        assert_eq!(key, "FROM_ENV");
    }

    #[test]
    fn blank_key_is_rejected_with_hint() {
        if BUILD_TIME_API_KEY.is_some() {
            return;
        }
        let mut cfg = Config::default();
        cfg.set_api_key("   ".into());

        let err = cfg.resolve_api_key_with(None).unwrap_err();
        assert!(err.to_string().contains("drizzle configure"));
    }

    #[test]
    fn partial_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("config.toml");
        fs::write(&path, "api_key = \"abc\"\n").expect("write");

        let cfg = Config::load_from(&path).expect("load");
        assert_eq!(cfg.api_key.as_deref(), Some("abc"));
        assert!(cfg.include_forecast);
        assert_eq!(cfg.timeout_secs, 10);
    }

    #[test]
    fn save_then_load_roundtrip() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("nested").join("config.toml");

        let mut cfg = Config::default();
        cfg.set_api_key("KEY".into());
        cfg.include_forecast = false;
        cfg.save_to(&path).expect("save");

        let loaded = Config::load_from(&path).expect("load");
        assert_eq!(loaded.api_key.as_deref(), Some("KEY"));
        assert!(!loaded.include_forecast);
    }

    #[test]
    fn missing_file_yields_default() {
        let dir = tempfile::tempdir().expect("temp dir");
        let cfg = Config::load_from(&dir.path().join("absent.toml")).expect("load");
        assert!(cfg.api_key.is_none());
    }
}
