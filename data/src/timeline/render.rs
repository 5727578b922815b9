use iced_core::alignment::Horizontal;
use iced_core::{Color, Point, Rectangle, Size};

use super::Surface;
use super::cull::VisibleBar;
use super::viewport::Viewport;
use crate::config::{Theme, TimelineConfig};

/// Upper bound on axis ticks emitted per frame.
pub const MAX_TICKS: usize = 2000;

/// Vertical center of the axis labels.
const AXIS_LABEL_Y: f32 = 11.0;
const LABEL_INSET: f32 = 5.0;
const GRID_LINE_WIDTH: f32 = 1.0;
const HOVER_OUTLINE_WIDTH: f32 = 2.0;

/// Drawing surface the renderer issues commands against, in logical pixels.
///
/// Text is positioned by its vertical center and the given horizontal anchor.
pub trait Canvas {
    fn clear(&mut self, color: Color);

    fn stroke_line(&mut self, from: Point, to: Point, color: Color, width: f32);

    fn fill_rect(&mut self, bounds: Rectangle, color: Color);

    fn stroke_rect(&mut self, bounds: Rectangle, color: Color, width: f32);

    fn fill_text(&mut self, text: &str, position: Point, color: Color, size: f32, align: Horizontal);

    fn measure_text(&self, text: &str, size: f32) -> f32;
}

/// Everything one frame needs.
pub struct Scene<'a> {
    pub viewport: &'a Viewport,
    pub bars: &'a [VisibleBar<'a>],
    /// Track index of the hovered assignment.
    pub hovered: Option<usize>,
    pub surface: Surface,
    pub config: &'a TimelineConfig,
    pub theme: &'a Theme,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tick {
    pub time: f64,
    pub x: f64,
}

impl Tick {
    pub fn label(&self) -> String {
        format!("{:.0}", self.time)
    }
}

/// Tick spacing in time units for a given pixel density.
pub fn tick_interval(pixels_per_time: f64) -> f64 {
    if pixels_per_time < 0.1 {
        1000.0
    } else if pixels_per_time < 1.0 {
        100.0
    } else if pixels_per_time < 10.0 {
        10.0
    } else {
        1.0
    }
}

/// Ticks on multiples of [`tick_interval`] that land on the canvas, pan included.
pub fn ticks(viewport: &Viewport) -> Vec<Tick> {
    let pixels_per_time = viewport.pixels_per_time();
    if pixels_per_time <= 0.0 {
        return Vec::new();
    }

    let step = tick_interval(pixels_per_time);
    let (visible_start, visible_end) = viewport.visible_window();
    let first = (visible_start / step).ceil();
    let last = (visible_end / step).floor();

    if !(first.is_finite() && last.is_finite()) || last < first {
        return Vec::new();
    }

    let count = ((last - first) as usize).saturating_add(1).min(MAX_TICKS);

    (0..count)
        .map(|i| {
            // + 0.0 turns -0 into 0 so the label never reads "-0"
            let time = (first + i as f64) * step + 0.0;
            Tick {
                time,
                x: viewport.time_to_pixel(time),
            }
        })
        .filter(|tick| tick.x >= 0.0 && tick.x <= viewport.pixel_width)
        .collect()
}

pub fn render(canvas: &mut impl Canvas, scene: &Scene<'_>) {
    canvas.clear(scene.theme.background);

    let Surface { width, height, .. } = scene.surface;
    if !(width > 0.0 && height > 0.0) {
        return;
    }

    draw_axis(canvas, scene);

    for bar in scene.bars {
        draw_bar(canvas, scene, bar);
    }
}

fn draw_axis(canvas: &mut impl Canvas, scene: &Scene<'_>) {
    let height = scene.surface.height as f32;

    for tick in ticks(scene.viewport) {
        let x = snap_to_device(tick.x, scene.surface.scale_factor) as f32;

        canvas.stroke_line(
            Point::new(x, 0.0),
            Point::new(x, height),
            scene.theme.grid,
            GRID_LINE_WIDTH,
        );
        canvas.fill_text(
            &tick.label(),
            Point::new(tick.x as f32, AXIS_LABEL_Y),
            scene.theme.axis_text,
            scene.config.text_size,
            Horizontal::Center,
        );
    }
}

fn draw_bar(canvas: &mut impl Canvas, scene: &Scene<'_>, bar: &VisibleBar<'_>) {
    let config = scene.config;
    let row_y = bar.assignment.row_y;
    if row_y >= scene.surface.height {
        return;
    }

    let (x, width) = bar.clipped(scene.viewport.pixel_width);
    if width <= 0.0 {
        return;
    }

    let hovered = scene.hovered == Some(bar.track_index());
    let bounds = Rectangle::new(
        Point::new(x as f32, row_y as f32),
        Size::new(width as f32, config.bar_height as f32),
    );

    canvas.fill_rect(bounds, scene.theme.track_color(bar.track_index(), hovered));
    if hovered {
        canvas.stroke_rect(bounds, scene.theme.hover_outline, HOVER_OUTLINE_WIDTH);
    }

    if width > config.label_min_width {
        let label = bar.assignment.interval.id.as_str();
        let text_width = f64::from(canvas.measure_text(label, config.text_size));

        if text_width < width - config.label_margin {
            canvas.fill_text(
                label,
                Point::new(bounds.x + LABEL_INSET, bounds.center_y()),
                scene.theme.bar_text,
                config.text_size,
                Horizontal::Left,
            );
        }
    }
}

/// Center of the device pixel containing `x`, keeps 1px lines crisp.
fn snap_to_device(x: f64, scale_factor: f64) -> f64 {
    let scale = if scale_factor.is_finite() && scale_factor > 0.0 {
        scale_factor
    } else {
        1.0
    };
    ((x * scale).floor() + 0.5) / scale
}
