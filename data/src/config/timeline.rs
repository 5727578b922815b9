use super::ConfigError;

use serde::{Deserialize, Serialize};

/// Geometry and interaction constants of the timeline.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct TimelineConfig {
    /// Height of one track lane, px.
    pub track_height: f64,
    /// Gap between lanes, also the offset of the first lane, px.
    pub track_padding: f64,
    /// Drawn bar height inside a lane, px.
    pub bar_height: f64,
    /// Multiplier applied per wheel notch.
    pub zoom_factor: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
    /// Share of the data range left visible before the first interval.
    pub start_padding_ratio: f64,
    /// Bars narrower than this never get a label, px.
    pub label_min_width: f64,
    /// Space required around a label inside its bar, px.
    pub label_margin: f64,
    pub text_size: f32,
    /// Horizontal travel after which a press turns into a drag, px.
    pub drag_threshold: f64,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            track_height: 35.0,
            track_padding: 5.0,
            bar_height: 25.0,
            zoom_factor: 1.1,
            min_zoom: 0.1,
            max_zoom: 100.0,
            start_padding_ratio: 0.1,
            label_min_width: 50.0,
            label_margin: 10.0,
            text_size: 12.0,
            drag_threshold: 3.0,
        }
    }
}

impl TimelineConfig {
    /// Vertical distance between the tops of two consecutive lanes.
    pub fn row_stride(&self) -> f64 {
        self.track_height + self.track_padding
    }

    /// Top of the bar drawn on `track_index`.
    pub fn row_y(&self, track_index: usize) -> f64 {
        track_index as f64 * self.row_stride() + self.track_padding
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let sizes = [
            ("track_height", self.track_height),
            ("bar_height", self.bar_height),
            ("label_min_width", self.label_min_width),
            ("text_size", f64::from(self.text_size)),
        ];
        for (name, value) in sizes {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::Invalid(format!("{name} must be positive, got {value}")));
            }
        }

        let non_negative = [
            ("track_padding", self.track_padding),
            ("label_margin", self.label_margin),
            ("drag_threshold", self.drag_threshold),
            ("start_padding_ratio", self.start_padding_ratio),
        ];
        for (name, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::Invalid(format!("{name} must not be negative, got {value}")));
            }
        }

        if self.bar_height > self.track_height {
            return Err(ConfigError::Invalid(format!(
                "bar_height ({}) exceeds track_height ({})",
                self.bar_height, self.track_height
            )));
        }
        if !(self.zoom_factor.is_finite() && self.zoom_factor > 1.0) {
            return Err(ConfigError::Invalid(format!(
                "zoom_factor must be greater than 1, got {}",
                self.zoom_factor
            )));
        }
        if !(self.min_zoom > 0.0 && self.min_zoom <= self.max_zoom && self.max_zoom.is_finite()) {
            return Err(ConfigError::Invalid(format!(
                "zoom bounds [{}, {}] are not a valid range",
                self.min_zoom, self.max_zoom
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_rows() {
        let config = TimelineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.row_y(0), 5.0);
        assert_eq!(config.row_y(1), 45.0);
        assert_eq!(config.row_y(10), 405.0);
    }

    #[test]
    fn rejects_inconsistent_values() {
        let bar_too_tall = TimelineConfig {
            bar_height: 36.0,
            ..TimelineConfig::default()
        };
        assert!(bar_too_tall.validate().is_err());

        let zoom_factor_one = TimelineConfig {
            zoom_factor: 1.0,
            ..TimelineConfig::default()
        };
        assert!(zoom_factor_one.validate().is_err());

        let inverted_zoom = TimelineConfig {
            min_zoom: 10.0,
            max_zoom: 1.0,
            ..TimelineConfig::default()
        };
        assert!(inverted_zoom.validate().is_err());

        let nan_height = TimelineConfig {
            track_height: f64::NAN,
            ..TimelineConfig::default()
        };
        assert!(nan_height.validate().is_err());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config: TimelineConfig = serde_json::from_str(r#"{ "track_height": 50.0 }"#).unwrap();
        assert_eq!(config.track_height, 50.0);
        assert_eq!(config.bar_height, 25.0);
        assert_eq!(config.row_y(1), 60.0);
    }
}
