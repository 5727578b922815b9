pub mod state;
pub mod theme;
pub mod timeline;

pub use state::AppConfig;
pub use theme::Theme;
pub use timeline::TimelineConfig;

use std::fs;
use std::path::Path;

pub const CONFIG_FILE_NAME: &str = "config.json";

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config file: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

pub fn read_from_file(path: &Path) -> Result<AppConfig, ConfigError> {
    let contents = fs::read_to_string(path)?;
    let config: AppConfig = serde_json::from_str(&contents)?;
    config.timeline.validate()?;

    Ok(config)
}

pub fn write_to_file(config: &AppConfig, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(config)?;
    fs::write(path, json)?;

    Ok(())
}

/// Loads the app config from the data directory.
pub fn load() -> AppConfig {
    match crate::data_path(Some(CONFIG_FILE_NAME)) {
        Some(path) => load_from(&path),
        None => {
            log::warn!("No data directory available, using default config");
            AppConfig::default()
        }
    }
}

/// A missing file means defaults, written out so there is a file to edit.
/// A broken file is reported and left alone, the app still opens with defaults.
pub fn load_from(path: &Path) -> AppConfig {
    if !path.exists() {
        let config = AppConfig::default();
        match write_to_file(&config, path) {
            Ok(()) => log::info!("Wrote default config to {}", path.display()),
            Err(err) => log::warn!("{err}, continuing with defaults"),
        }
        return config;
    }

    match read_from_file(path) {
        Ok(config) => {
            log::info!("Loaded config from {}", path.display());
            config
        }
        Err(err) => {
            log::error!("{err}, falling back to defaults");
            AppConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("trackline-{name}-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn writes_and_reads_back() {
        let dir = scratch_dir("rw");
        let path = dir.join(CONFIG_FILE_NAME);

        let mut config = AppConfig::default();
        config.timeline.track_height = 40.0;
        config.sample_count = 42;
        write_to_file(&config, &path).unwrap();

        let read = read_from_file(&path).unwrap();
        assert_eq!(read.timeline.track_height, 40.0);
        assert_eq!(read.sample_count, 42);

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = scratch_dir("missing");
        let err = read_from_file(&dir.join(CONFIG_FILE_NAME)).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn invalid_values_are_rejected() {
        let dir = scratch_dir("invalid");
        let path = dir.join(CONFIG_FILE_NAME);
        fs::create_dir_all(&dir).unwrap();
        fs::write(&path, r#"{ "timeline": { "bar_height": 80.0 } }"#).unwrap();

        let err = read_from_file(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        fs::write(&path, "{ not json").unwrap();
        let err = read_from_file(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn missing_file_is_seeded_with_defaults() {
        let dir = scratch_dir("seed");
        let path = dir.join(CONFIG_FILE_NAME);

        let config = load_from(&path);
        assert_eq!(config.sample_count, AppConfig::default().sample_count);
        assert!(path.exists());

        let read = read_from_file(&path).unwrap();
        assert_eq!(read.timeline.track_height, config.timeline.track_height);

        fs::write(&path, "{ not json").unwrap();
        let fallback = load_from(&path);
        assert_eq!(fallback.sample_count, AppConfig::default().sample_count);
        assert_eq!(fs::read_to_string(&path).unwrap(), "{ not json");

        let _ = fs::remove_dir_all(&dir);
    }
}
