use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use serde::Deserialize;
use thiserror::Error;
use url::Url;

pub const DEFAULT_API_URL: &str = "https://randomuser.me/api/";
pub const DEFAULT_BATCH_SIZE: usize = 10;
const CONFIG_FILE_NAME: &str = "swipe.toml";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read config file '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config file '{}': {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("invalid api url '{url}': {source}")]
    InvalidApiUrl { url: String, source: url::ParseError },
    #[error("batch size must be at least 1")]
    EmptyBatch,
    #[error("exit fallback of {fallback_ms}ms is shorter than the {animation_ms}ms exit animation")]
    FallbackBeforeAnimation { fallback_ms: u64, animation_ms: u64 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub api_url: String,
    pub batch_size: usize,
    /// Makes the API return the same profiles for the same seed.
    pub seed: Option<String>,
    /// Comma separated nationality filter, e.g. `gb,fr`.
    pub nationalities: Option<String>,
    pub exit_animation_ms: u64,
    pub exit_fallback_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.into(),
            batch_size: DEFAULT_BATCH_SIZE,
            seed: None,
            nationalities: None,
            exit_animation_ms: 350,
            exit_fallback_ms: 1000,
        }
    }
}

impl Settings {
    pub fn exit_animation(&self) -> Duration {
        Duration::from_millis(self.exit_animation_ms)
    }

    pub fn exit_fallback(&self) -> Duration {
        Duration::from_millis(self.exit_fallback_ms)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        Url::parse(&self.api_url).map_err(|source| SettingsError::InvalidApiUrl {
            url: self.api_url.clone(),
            source,
        })?;
        if self.batch_size == 0 {
            return Err(SettingsError::EmptyBatch);
        }
        if self.exit_fallback_ms < self.exit_animation_ms {
            return Err(SettingsError::FallbackBeforeAnimation {
                fallback_ms: self.exit_fallback_ms,
                animation_ms: self.exit_animation_ms,
            });
        }
        Ok(())
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileSettings {
    api_url: Option<String>,
    batch_size: Option<usize>,
    seed: Option<String>,
    nationalities: Option<String>,
    exit_animation_ms: Option<u64>,
    exit_fallback_ms: Option<u64>,
}

/// Loads settings: defaults, then the config file, then environment overrides.
///
/// With no explicit path, `swipe.toml` in the working directory is used, then
/// `<config dir>/swipe/swipe.toml`. A missing default file is not an error.
pub fn load_settings(explicit_path: Option<&Path>) -> Result<Settings, SettingsError> {
    let mut settings = Settings::default();

    let path = match explicit_path {
        Some(path) => Some(path.to_path_buf()),
        None => default_config_path(),
    };
    if let Some(path) = path {
        apply_file(&mut settings, &path)?;
    }

    apply_env_overrides(&mut settings, |name| std::env::var(name).ok());
    settings.validate()?;
    Ok(settings)
}

fn default_config_path() -> Option<PathBuf> {
    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.exists() {
        return Some(local);
    }
    dirs::config_dir()
        .map(|dir| dir.join("swipe").join(CONFIG_FILE_NAME))
        .filter(|path| path.exists())
}

fn apply_file(settings: &mut Settings, path: &Path) -> Result<(), SettingsError> {
    let raw = fs::read_to_string(path).map_err(|source| SettingsError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let file_cfg: FileSettings = toml::from_str(&raw).map_err(|source| SettingsError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    if let Some(v) = file_cfg.api_url {
        settings.api_url = v;
    }
    if let Some(v) = file_cfg.batch_size {
        settings.batch_size = v;
    }
    if file_cfg.seed.is_some() {
        settings.seed = file_cfg.seed;
    }
    if file_cfg.nationalities.is_some() {
        settings.nationalities = file_cfg.nationalities;
    }
    if let Some(v) = file_cfg.exit_animation_ms {
        settings.exit_animation_ms = v;
    }
    if let Some(v) = file_cfg.exit_fallback_ms {
        settings.exit_fallback_ms = v;
    }
    Ok(())
}

pub fn apply_env_overrides(settings: &mut Settings, lookup: impl Fn(&str) -> Option<String>) {
    let non_empty = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

    if let Some(v) = non_empty("SWIPE_API_URL") {
        settings.api_url = v;
    }
    if let Some(v) = non_empty("APP__API_URL") {
        settings.api_url = v;
    }
    if let Some(v) = non_empty("APP__BATCH_SIZE") {
        if let Ok(parsed) = v.trim().parse::<usize>() {
            settings.batch_size = parsed;
        }
    }
    if let Some(v) = non_empty("APP__SEED") {
        settings.seed = Some(v);
    }
    if let Some(v) = non_empty("APP__NAT") {
        settings.nationalities = Some(v);
    }
    if let Some(v) = non_empty("APP__EXIT_FALLBACK_MS") {
        if let Ok(parsed) = v.trim().parse::<u64>() {
            settings.exit_fallback_ms = parsed;
        }
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
