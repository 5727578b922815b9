use super::Interval;

/// Bounds used when there is nothing to show.
pub const EMPTY_BOUNDS: (f64, f64) = (0.0, 1000.0);

/// Half-width given to a window that would otherwise collapse to a point.
const DEGENERATE_HALF_SPAN: f64 = 0.5;

/// Visible time window and its projection onto the canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub time_start: f64,
    pub time_end: f64,
    /// Canvas width in logical pixels.
    pub pixel_width: f64,
    /// Cumulative wheel zoom, bookkeeping only.
    pub zoom_level: f64,
    /// Translation applied after the time to pixel projection.
    pub pan_offset: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            time_start: EMPTY_BOUNDS.0,
            time_end: EMPTY_BOUNDS.1,
            pixel_width: 0.0,
            zoom_level: 1.0,
            pan_offset: 0.0,
        }
    }
}

impl Viewport {
    pub fn time_span(&self) -> f64 {
        self.time_end - self.time_start
    }

    /// Non-empty, non-inverted, finite window.
    pub fn is_valid(&self) -> bool {
        self.time_start.is_finite() && self.time_end.is_finite() && self.time_end > self.time_start
    }

    pub fn time_to_pixel(&self, time: f64) -> f64 {
        let span = self.time_span();
        if span == 0.0 || !span.is_finite() {
            return 0.0;
        }
        let normalized = (time - self.time_start) / span;
        let px = normalized * self.pixel_width + self.pan_offset;

        if px.is_finite() { px } else { 0.0 }
    }

    pub fn pixel_to_time(&self, x: f64) -> f64 {
        self.pixel_to_time_with_offset(x, self.pan_offset)
    }

    /// Same as [`Viewport::pixel_to_time`] under a candidate pan offset.
    pub fn pixel_to_time_with_offset(&self, x: f64, pan_offset: f64) -> f64 {
        if self.pixel_width <= 0.0 || !self.pixel_width.is_finite() {
            return 0.0;
        }
        let normalized = (x - pan_offset) / self.pixel_width;
        let time = self.time_start + normalized * self.time_span();

        if time.is_finite() { time } else { 0.0 }
    }

    /// Time range currently covered by `[0, pixel_width]`.
    pub fn visible_window(&self) -> (f64, f64) {
        (self.pixel_to_time(0.0), self.pixel_to_time(self.pixel_width))
    }

    /// Horizontal pixels per time unit, pan does not change it.
    pub fn pixels_per_time(&self) -> f64 {
        let span = self.time_span();
        if span <= 0.0 || !span.is_finite() {
            return 0.0;
        }
        self.pixel_width / span
    }

    pub fn reset_to(&mut self, bounds: &DataBounds, start_padding_ratio: f64) {
        let (start, end) = bounds.allowed_window(start_padding_ratio);
        self.time_start = start;
        self.time_end = end;
        self.zoom_level = 1.0;
        self.pan_offset = 0.0;
    }
}

/// Smallest start and largest end over the current interval set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DataBounds {
    pub min_time: f64,
    pub max_time: f64,
}

impl Default for DataBounds {
    fn default() -> Self {
        Self {
            min_time: EMPTY_BOUNDS.0,
            max_time: EMPTY_BOUNDS.1,
        }
    }
}

impl DataBounds {
    /// Non-finite times are skipped, an empty or fully non-finite list gives the empty bounds.
    pub fn from_intervals(intervals: &[Interval]) -> Self {
        let min_time = intervals
            .iter()
            .map(|iv| iv.start_time)
            .filter(|t| t.is_finite())
            .min_by(f64::total_cmp);
        let max_time = intervals
            .iter()
            .map(|iv| iv.end_time)
            .filter(|t| t.is_finite())
            .max_by(f64::total_cmp);

        match (min_time, max_time) {
            (Some(min_time), Some(max_time)) => Self { min_time, max_time },
            _ => Self::default(),
        }
    }

    pub fn range(&self) -> f64 {
        self.max_time - self.min_time
    }

    /// Window the viewport may occupy: `[min - ratio * range, max]`.
    ///
    /// Collapsed or inverted bounds, e.g. a single zero-length interval, are
    /// widened around their midpoint so the window never becomes empty.
    pub fn allowed_window(&self, start_padding_ratio: f64) -> (f64, f64) {
        let start = self.min_time - self.range() * start_padding_ratio;
        let end = self.max_time;

        if end > start {
            (start, end)
        } else {
            let lo = self.min_time.min(self.max_time);
            let hi = self.min_time.max(self.max_time);
            (lo - DEGENERATE_HALF_SPAN, hi + DEGENERATE_HALF_SPAN)
        }
    }
}
