pub mod config;
pub mod timeline;
pub mod util;

pub use config::{AppConfig, ConfigError, Theme, TimelineConfig};
pub use timeline::{Interval, Observer, Timeline};

use std::path::PathBuf;

pub const APP_NAME: &str = "trackline";

/// Directory for config and log files, `None` when the platform has no data dir.
pub fn data_path(path_name: Option<&str>) -> Option<PathBuf> {
    if let Ok(path) = std::env::var("TRACKLINE_DATA_PATH") {
        let base = PathBuf::from(path);
        return Some(match path_name {
            Some(name) => base.join(name),
            None => base,
        });
    }

    let base = dirs_next::data_dir()?.join(APP_NAME);
    Some(match path_name {
        Some(name) => base.join(name),
        None => base,
    })
}
