//! Colors used by the timeline renderer.
//!
//! Color helpers follow <https://github.com/squidowl/halloy/blob/main/data/src/appearance/theme.rs>
//! and <https://github.com/iced-rs/iced/blob/master/core/src/theme/palette.rs>.
use iced_core::Color;
use palette::{FromColor, Hsl, RgbHue, Srgb};
use serde::{Deserialize, Serialize};

/// Golden angle in degrees, keeps hues of adjacent tracks far apart.
pub const GOLDEN_ANGLE: f32 = 137.5;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Theme {
    #[serde(with = "hex")]
    pub background: Color,
    #[serde(with = "hex")]
    pub grid: Color,
    #[serde(with = "hex")]
    pub axis_text: Color,
    #[serde(with = "hex")]
    pub bar_text: Color,
    #[serde(with = "hex")]
    pub hover_outline: Color,
    pub bar: Shade,
    pub bar_hovered: Shade,
}

/// Saturation and lightness in `[0, 1]`, hue comes from the track index.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Shade {
    pub saturation: f32,
    pub lightness: f32,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            background: Color::WHITE,
            grid: Color::from_rgb8(0xe0, 0xe0, 0xe0),
            axis_text: Color::from_rgb8(0x66, 0x66, 0x66),
            bar_text: Color::WHITE,
            hover_outline: Color::BLACK,
            bar: Shade {
                saturation: 0.6,
                lightness: 0.5,
            },
            bar_hovered: Shade {
                saturation: 0.8,
                lightness: 0.55,
            },
        }
    }
}

impl Theme {
    pub fn is_dark(&self) -> bool {
        is_dark(self.background)
    }

    pub fn track_color(&self, track_index: usize, hovered: bool) -> Color {
        let shade = if hovered { self.bar_hovered } else { self.bar };
        from_hsl_degrees(track_hue(track_index), shade.saturation, shade.lightness)
    }
}

pub fn track_hue(track_index: usize) -> f32 {
    // f64 keeps the product exact for large indices before folding into [0, 360)
    ((track_index as f64 * f64::from(GOLDEN_ANGLE)) % 360.0) as f32
}

pub fn from_hsl_degrees(h_deg: f32, s: f32, l: f32) -> Color {
    let hsl: Hsl = Hsl::new(RgbHue::from_degrees(h_deg), s.clamp(0.0, 1.0), l.clamp(0.0, 1.0));
    let rgb: Srgb = Srgb::from_color(hsl);

    Color {
        r: rgb.red,
        g: rgb.green,
        b: rgb.blue,
        a: 1.0,
    }
}

pub fn is_dark(color: Color) -> bool {
    let brightness = (color.r * 299.0 + color.g * 587.0 + color.b * 114.0) / 1000.0;
    brightness < 0.5
}

pub fn hex_to_color(hex: &str) -> Option<Color> {
    if !hex.is_ascii() || !(hex.len() == 7 || hex.len() == 9) {
        return None;
    }

    let hash = &hex[0..1];
    let r = u8::from_str_radix(&hex[1..3], 16);
    let g = u8::from_str_radix(&hex[3..5], 16);
    let b = u8::from_str_radix(&hex[5..7], 16);
    let a = (hex.len() == 9)
        .then(|| u8::from_str_radix(&hex[7..9], 16).ok())
        .flatten();

    match (hash, r, g, b, a) {
        ("#", Ok(r), Ok(g), Ok(b), None) => Some(Color::from_rgb8(r, g, b)),
        ("#", Ok(r), Ok(g), Ok(b), Some(a)) => Some(Color::from_rgba8(r, g, b, f32::from(a) / 255.0)),
        _ => None,
    }
}

pub fn color_to_hex(color: Color) -> String {
    use std::fmt::Write;

    let mut hex = String::with_capacity(9);

    let [r, g, b, a] = color.into_rgba8();

    let _ = write!(&mut hex, "#");
    let _ = write!(&mut hex, "{r:02X}");
    let _ = write!(&mut hex, "{g:02X}");
    let _ = write!(&mut hex, "{b:02X}");

    if a < u8::MAX {
        let _ = write!(&mut hex, "{a:02X}");
    }

    hex
}

mod hex {
    use iced_core::Color;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(color: &Color, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&super::color_to_hex(*color))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Color, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        super::hex_to_color(&s)
            .ok_or_else(|| serde::de::Error::custom(format!("Invalid color: {s}")))
    }
}
