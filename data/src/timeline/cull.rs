use super::track::{TrackAssignment, Tracks};
use super::viewport::Viewport;

/// An assignment that intersects the canvas, with its pixel span for this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisibleBar<'a> {
    pub assignment: &'a TrackAssignment,
    pub pixel_x: f64,
    /// `time_to_pixel(end) - pixel_x`, negative for inverted intervals.
    pub pixel_width: f64,
}

impl VisibleBar<'_> {
    pub fn track_index(&self) -> usize {
        self.assignment.track_index
    }

    /// Span clipped to `[0, canvas_width]` as `(x, width)`, width never negative.
    pub fn clipped(&self, canvas_width: f64) -> (f64, f64) {
        let left = self.pixel_x.max(0.0);
        let right = (self.pixel_x + self.pixel_width).min(canvas_width);
        (left, (right - left).max(0.0))
    }
}

/// Assignments whose pixel span intersects `[0, pixel_width]`, in start-time order.
///
/// Two phases: a lower-bound search for the first index whose end-time reach
/// is at or after the left edge, then a forward scan that stops at the first
/// start past the right edge.
pub fn visible<'a>(tracks: &'a Tracks, viewport: &Viewport) -> Vec<VisibleBar<'a>> {
    if tracks.is_empty() || viewport.pixel_width <= 0.0 {
        return Vec::new();
    }

    let (visible_start, visible_end) = viewport.visible_window();
    let first = first_candidate(tracks, visible_start);

    let mut bars = Vec::new();
    for assignment in &tracks.as_slice()[first..] {
        if assignment.start_time() > visible_end {
            break;
        }

        let pixel_x = viewport.time_to_pixel(assignment.start_time());
        let pixel_width = viewport.time_to_pixel(assignment.end_time()) - pixel_x;

        if pixel_x + pixel_width >= 0.0 && pixel_x < viewport.pixel_width {
            bars.push(VisibleBar {
                assignment,
                pixel_x,
                pixel_width,
            });
        }
    }

    bars
}

/// First index whose reach (running max of end time) is `>= visible_start`.
///
/// Everything before it ends left of the canvas, so skipping it never drops a
/// visible bar.
pub fn first_candidate(tracks: &Tracks, visible_start: f64) -> usize {
    let mut lo = 0;
    let mut hi = tracks.len();

    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        if tracks.reach(mid) < visible_start {
            lo = mid + 1;
        } else {
            hi = mid;
        }
    }

    lo
}
