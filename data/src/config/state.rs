use super::{Theme, TimelineConfig};
use crate::util::ok_or_default;

use serde::{Deserialize, Serialize};

pub const DEFAULT_SAMPLE_COUNT: usize = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct ScaleFactor(f64);

impl Default for ScaleFactor {
    fn default() -> Self {
        Self(1.0)
    }
}

impl From<f64> for ScaleFactor {
    fn from(value: f64) -> Self {
        ScaleFactor(value.clamp(0.8, 1.5))
    }
}

impl From<ScaleFactor> for f64 {
    fn from(value: ScaleFactor) -> Self {
        value.0
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    #[serde(deserialize_with = "ok_or_default")]
    pub timeline: TimelineConfig,
    #[serde(deserialize_with = "ok_or_default")]
    pub theme: Theme,
    #[serde(deserialize_with = "ok_or_default")]
    pub scale_factor: ScaleFactor,
    pub sample_count: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            timeline: TimelineConfig::default(),
            theme: Theme::default(),
            scale_factor: ScaleFactor::default(),
            sample_count: DEFAULT_SAMPLE_COUNT,
        }
    }
}
