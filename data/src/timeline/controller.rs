use super::viewport::{DataBounds, Viewport};
use crate::config::TimelineConfig;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Gesture {
    #[default]
    Idle,
    Dragging {
        start_x: f64,
        start_pan_offset: f64,
        /// Pointer travelled past the drag threshold.
        moved: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanOutcome {
    Moved,
    /// Candidate offset would expose time outside the data bounds.
    Stalled,
    /// Not dragging.
    Ignored,
}

/// Translates drag and wheel input into viewport changes.
#[derive(Debug, Clone, Default)]
pub struct Controller {
    gesture: Gesture,
    last_gesture_was_drag: bool,
}

impl Controller {
    pub fn is_dragging(&self) -> bool {
        matches!(self.gesture, Gesture::Dragging { .. })
    }

    /// Whether the gesture that ended last moved far enough to count as a drag.
    pub fn last_gesture_was_drag(&self) -> bool {
        self.last_gesture_was_drag
    }

    pub fn begin_drag(&mut self, pointer_x: f64, viewport: &Viewport) {
        self.gesture = Gesture::Dragging {
            start_x: pointer_x,
            start_pan_offset: viewport.pan_offset,
            moved: false,
        };
        self.last_gesture_was_drag = false;
    }

    pub fn drag_move(
        &mut self,
        pointer_x: f64,
        viewport: &mut Viewport,
        bounds: &DataBounds,
        config: &TimelineConfig,
    ) -> PanOutcome {
        let Gesture::Dragging {
            start_x,
            start_pan_offset,
            moved,
        } = &mut self.gesture
        else {
            return PanOutcome::Ignored;
        };

        let delta = pointer_x - *start_x;
        if delta.abs() >= config.drag_threshold {
            *moved = true;
        }

        let candidate = *start_pan_offset + delta;
        if !candidate.is_finite() {
            return PanOutcome::Stalled;
        }

        let left_time = viewport.pixel_to_time_with_offset(0.0, candidate);
        let right_time = viewport.pixel_to_time_with_offset(viewport.pixel_width, candidate);
        let (min_start, max_end) = bounds.allowed_window(config.start_padding_ratio);
        let slack = tolerance(viewport.time_span());

        if right_time <= max_end + slack && left_time >= min_start - slack {
            viewport.pan_offset = candidate;
            PanOutcome::Moved
        } else {
            PanOutcome::Stalled
        }
    }

    /// Back to idle, returns whether the finished gesture was a drag.
    pub fn end_drag(&mut self) -> bool {
        let was_drag = matches!(self.gesture, Gesture::Dragging { moved: true, .. });
        self.gesture = Gesture::Idle;
        self.last_gesture_was_drag = was_drag;
        was_drag
    }

    /// Zooms around `pointer_x`. Positive `delta_y` zooms out, negative zooms in.
    ///
    /// The new window keeps the time under the pointer in place, then slides
    /// back inside the allowed window without changing its width, unless it
    /// is wider than the allowed window, in which case it becomes that window.
    /// Pan offset is folded away and a drag in progress continues from
    /// `pointer_x`. Returns `false` when the viewport is left as is.
    pub fn wheel(
        &mut self,
        pointer_x: f64,
        delta_y: f64,
        viewport: &mut Viewport,
        bounds: &DataBounds,
        config: &TimelineConfig,
    ) -> bool {
        let width = viewport.pixel_width;
        if !viewport.is_valid() || !(width > 0.0) || !pointer_x.is_finite() {
            return false;
        }

        let multiplier = if delta_y > 0.0 {
            1.0 / config.zoom_factor
        } else if delta_y < 0.0 {
            config.zoom_factor
        } else {
            return false;
        };

        let span = viewport.time_span();
        let pointer_time = viewport.pixel_to_time(pointer_x);
        let pointer_ratio = pointer_x / width;

        let (min_start, max_end) = bounds.allowed_window(config.start_padding_ratio);
        let allowed_span = max_end - min_start;

        let mut new_span = span / multiplier;
        if !new_span.is_finite() || new_span <= tolerance(pointer_time.abs().max(span)) {
            log::debug!("Zoom stopped at span {span}");
            return false;
        }

        let (start, end) = if new_span >= allowed_span {
            new_span = allowed_span;
            (min_start, max_end)
        } else {
            let mut start = pointer_time - new_span * pointer_ratio;
            let mut end = start + new_span;

            if end > max_end {
                let overflow = end - max_end;
                end = max_end;
                start -= overflow;
            }
            if start < min_start {
                let underflow = min_start - start;
                start = min_start;
                end += underflow;
            }
            (start, end)
        };

        if !(start.is_finite() && end.is_finite() && end > start) {
            return false;
        }

        viewport.time_start = start;
        viewport.time_end = end;
        viewport.zoom_level = (viewport.zoom_level * multiplier).clamp(config.min_zoom, config.max_zoom);
        viewport.pan_offset = 0.0;

        if let Gesture::Dragging {
            start_x,
            start_pan_offset,
            ..
        } = &mut self.gesture
        {
            *start_x = pointer_x;
            *start_pan_offset = 0.0;
        }

        log::trace!(
            "Zoom x{multiplier:.3} -> [{start}, {end}] span {new_span}, level {}",
            viewport.zoom_level
        );
        true
    }

    /// Drops any drag without counting it as one, e.g. when the pointer leaves.
    pub fn cancel(&mut self) {
        self.gesture = Gesture::Idle;
    }
}

fn tolerance(magnitude: f64) -> f64 {
    magnitude.abs() * 1e-12
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timeline::Interval;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() <= 1e-9 * (1.0 + a.abs().max(b.abs()))
    }

    fn setup(intervals: &[Interval], width: f64) -> (Viewport, DataBounds, TimelineConfig) {
        let config = TimelineConfig::default();
        let bounds = DataBounds::from_intervals(intervals);
        let mut viewport = Viewport {
            pixel_width: width,
            ..Viewport::default()
        };
        viewport.reset_to(&bounds, config.start_padding_ratio);
        (viewport, bounds, config)
    }

    #[test]
    fn pan_past_max_time_is_rejected() {
        let (mut vp, bounds, config) = setup(&[Interval::new("a", 0.0, 10.0)], 1100.0);
        assert!(approx(vp.time_start, -1.0));
        assert_eq!(vp.time_end, 10.0);

        let mut controller = Controller::default();
        controller.begin_drag(600.0, &vp);

        // offset -500 puts time 15 at the right edge
        assert!(approx(vp.pixel_to_time_with_offset(1100.0, -500.0), 15.0));
        let before = vp;
        assert_eq!(controller.drag_move(100.0, &mut vp, &bounds, &config), PanOutcome::Stalled);
        assert_eq!(vp, before);
    }

    #[test]
    fn pan_within_bounds_moves() {
        let (mut vp, bounds, config) = setup(&[Interval::new("a", 0.0, 100.0)], 1000.0);
        let mut controller = Controller::default();

        // zoom in first so there is room to pan
        assert!(controller.wheel(500.0, -1.0, &mut vp, &bounds, &config));
        assert!(controller.wheel(500.0, -1.0, &mut vp, &bounds, &config));

        controller.begin_drag(500.0, &vp);
        assert_eq!(controller.drag_move(520.0, &mut vp, &bounds, &config), PanOutcome::Moved);
        assert_eq!(vp.pan_offset, 20.0);

        // a large jump past the left bound stalls at the last accepted offset
        assert_eq!(controller.drag_move(5000.0, &mut vp, &bounds, &config), PanOutcome::Stalled);
        assert_eq!(vp.pan_offset, 20.0);

        assert!(controller.end_drag());
        assert!(controller.last_gesture_was_drag());
        assert!(!controller.is_dragging());
    }

    #[test]
    fn short_press_is_not_a_drag() {
        let (mut vp, bounds, config) = setup(&[Interval::new("a", 0.0, 100.0)], 1000.0);
        let mut controller = Controller::default();

        controller.begin_drag(300.0, &vp);
        controller.drag_move(301.5, &mut vp, &bounds, &config);
        assert!(!controller.end_drag());
        assert!(!controller.last_gesture_was_drag());
    }

    #[test]
    fn drag_move_when_idle_is_ignored() {
        let (mut vp, bounds, config) = setup(&[Interval::new("a", 0.0, 100.0)], 1000.0);
        let mut controller = Controller::default();
        assert_eq!(controller.drag_move(10.0, &mut vp, &bounds, &config), PanOutcome::Ignored);
    }

    #[test]
    fn zoom_in_keeps_time_under_pointer() {
        let (mut vp, bounds, config) = setup(&[Interval::new("a", 0.0, 100.0)], 1000.0);
        let mut controller = Controller::default();

        for pointer in [300.0, 512.0, 777.0] {
            let before = vp.pixel_to_time(pointer);
            let span_before = vp.time_span();
            assert!(controller.wheel(pointer, -120.0, &mut vp, &bounds, &config));

            assert!(approx(vp.pixel_to_time(pointer), before));
            assert!(approx(vp.time_span(), span_before / 1.1));
        }
        assert!(approx(vp.zoom_level, 1.1f64.powi(3)));
    }

    #[test]
    fn zoom_folds_pan_offset_and_keeps_pointer_time() {
        let (mut vp, bounds, config) = setup(&[Interval::new("a", 0.0, 100.0)], 1000.0);
        let mut controller = Controller::default();
        for _ in 0..5 {
            controller.wheel(500.0, -1.0, &mut vp, &bounds, &config);
        }
        controller.begin_drag(400.0, &vp);
        assert_eq!(controller.drag_move(460.0, &mut vp, &bounds, &config), PanOutcome::Moved);
        controller.end_drag();

        let before = vp.pixel_to_time(250.0);
        assert!(controller.wheel(250.0, -1.0, &mut vp, &bounds, &config));
        assert_eq!(vp.pan_offset, 0.0);
        assert!(approx(vp.pixel_to_time(250.0), before));
    }

    #[test]
    fn wheel_during_drag_reanchors_the_drag() {
        let (mut vp, bounds, config) = setup(&[Interval::new("a", 0.0, 100.0)], 1000.0);
        let mut controller = Controller::default();
        for _ in 0..5 {
            controller.wheel(500.0, -1.0, &mut vp, &bounds, &config);
        }

        controller.begin_drag(500.0, &vp);
        assert_eq!(controller.drag_move(560.0, &mut vp, &bounds, &config), PanOutcome::Moved);
        assert_eq!(vp.pan_offset, 60.0);

        let before = vp.pixel_to_time(560.0);
        assert!(controller.wheel(560.0, -1.0, &mut vp, &bounds, &config));
        assert_eq!(vp.pan_offset, 0.0);
        assert!(approx(vp.pixel_to_time(560.0), before));

        let grabbed = vp.pixel_to_time(560.0);
        assert_eq!(controller.drag_move(561.0, &mut vp, &bounds, &config), PanOutcome::Moved);
        assert_eq!(vp.pan_offset, 1.0);
        assert!(approx(vp.pixel_to_time(561.0), grabbed));
        assert!(controller.end_drag());
    }

    #[test]
    fn zoom_out_slides_inside_bounds() {
        let (mut vp, bounds, config) = setup(&[Interval::new("a", 0.0, 100.0)], 1000.0);
        let mut controller = Controller::default();
        for _ in 0..10 {
            controller.wheel(1000.0, -1.0, &mut vp, &bounds, &config);
        }
        assert!(approx(vp.time_end, 100.0));
        let span = vp.time_span();

        // growing around the center pushes the right edge past max_time
        assert!(controller.wheel(500.0, 1.0, &mut vp, &bounds, &config));
        assert!(approx(vp.time_end, 100.0));
        assert!(approx(vp.time_span(), span * 1.1));

        for _ in 0..50 {
            controller.wheel(10.0, 1.0, &mut vp, &bounds, &config);
            assert!(vp.time_start >= -10.0 - 1e-9);
            assert!(vp.time_end <= 100.0 + 1e-9);
            assert!(vp.time_end > vp.time_start);
        }
        assert!(approx(vp.time_start, -10.0));
        assert!(approx(vp.time_end, 100.0));
        assert_eq!(vp.zoom_level, config.min_zoom);
    }

    #[test]
    fn zoom_level_is_clamped() {
        let (mut vp, bounds, config) = setup(&[Interval::new("a", 0.0, 1e9)], 1000.0);
        let mut controller = Controller::default();
        for _ in 0..80 {
            controller.wheel(500.0, -1.0, &mut vp, &bounds, &config);
        }
        assert_eq!(vp.zoom_level, config.max_zoom);
        assert!(vp.is_valid());
    }

    #[test]
    fn wheel_ignores_degenerate_input() {
        let (mut vp, bounds, config) = setup(&[Interval::new("a", 0.0, 100.0)], 1000.0);
        let mut controller = Controller::default();
        let before = vp;

        assert!(!controller.wheel(500.0, 0.0, &mut vp, &bounds, &config));
        assert!(!controller.wheel(500.0, f64::NAN, &mut vp, &bounds, &config));
        assert!(!controller.wheel(f64::INFINITY, 1.0, &mut vp, &bounds, &config));
        assert_eq!(vp, before);

        let mut zero_width = Viewport {
            pixel_width: 0.0,
            ..before
        };
        assert!(!controller.wheel(0.0, -1.0, &mut zero_width, &bounds, &config));
    }

    #[test]
    fn cancel_does_not_mark_a_drag() {
        let (vp, _, _) = setup(&[Interval::new("a", 0.0, 100.0)], 1000.0);
        let mut controller = Controller::default();
        controller.begin_drag(10.0, &vp);
        controller.cancel();
        assert!(!controller.is_dragging());
        assert!(!controller.last_gesture_was_drag());
    }
}
