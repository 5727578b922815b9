//! Virtualized interval timeline: one lane per interval, pan and wheel zoom,
//! culled drawing and pointer hit testing.
//!
//! [`Timeline`] owns all state. The host feeds it data, size and pointer input
//! and renders it whenever [`Timeline::take_redraw`] says so.
pub mod controller;
pub mod cull;
pub mod hit;
pub mod render;
pub mod track;
pub mod viewport;

use serde::{Deserialize, Serialize};

use crate::config::{Theme, TimelineConfig};
use controller::{Controller, PanOutcome};
use cull::VisibleBar;
use render::{Canvas, Scene};
use track::{TrackAssignment, Tracks};
use viewport::{DataBounds, Viewport};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Interval {
    pub id: String,
    pub start_time: f64,
    pub end_time: f64,
}

impl Interval {
    pub fn new(id: impl Into<String>, start_time: f64, end_time: f64) -> Self {
        Self {
            id: id.into(),
            start_time,
            end_time,
        }
    }

    pub fn duration(&self) -> f64 {
        self.end_time - self.start_time
    }
}

impl std::fmt::Display for Interval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} [{}, {}]", self.id, self.start_time, self.end_time)
    }
}

/// Receives hover and click notifications.
pub trait Observer {
    /// Hovered interval changed, `None` when the pointer left every bar.
    fn hover_changed(&mut self, interval: Option<&Interval>);

    fn clicked(&mut self, interval: &Interval);
}

impl Observer for () {
    fn hover_changed(&mut self, _interval: Option<&Interval>) {}

    fn clicked(&mut self, _interval: &Interval) {}
}

/// Size of the canvas the timeline draws into, in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Surface {
    pub width: f64,
    pub height: f64,
    /// Device pixels per logical pixel.
    pub scale_factor: f64,
}

impl Surface {
    pub fn new(width: f64, height: f64, scale_factor: f64) -> Self {
        Self {
            width: crate::util::finite_or(width, 0.0).max(0.0),
            height: crate::util::finite_or(height, 0.0).max(0.0),
            scale_factor: crate::util::finite_or(scale_factor, 1.0),
        }
    }
}

/// Pointer feedback the host should show over the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cursor {
    #[default]
    Idle,
    Grab,
    Grabbing,
    Pointer,
}

pub struct Timeline<O: Observer = ()> {
    config: TimelineConfig,
    observer: O,
    surface: Option<Surface>,
    viewport: Viewport,
    bounds: DataBounds,
    tracks: Tracks,
    controller: Controller,
    /// Track index of the hovered assignment.
    hovered: Option<usize>,
    pointer_inside: bool,
    needs_redraw: bool,
}

impl<O: Observer> Timeline<O> {
    pub fn new(config: TimelineConfig, observer: O) -> Self {
        Self {
            config,
            observer,
            surface: None,
            viewport: Viewport::default(),
            bounds: DataBounds::default(),
            tracks: Tracks::default(),
            controller: Controller::default(),
            hovered: None,
            pointer_inside: false,
            needs_redraw: false,
        }
    }

    /// Attaches the timeline to a canvas. Input is ignored until this is called.
    ///
    /// Data set before attaching is kept, the viewport only takes the new width.
    pub fn initialize(&mut self, surface: Surface) {
        log::info!(
            "Timeline attached to {}x{} surface (scale {})",
            surface.width,
            surface.height,
            surface.scale_factor
        );
        self.surface = Some(surface);
        self.viewport.pixel_width = surface.width;
        self.needs_redraw = true;
    }

    pub fn is_initialized(&self) -> bool {
        self.surface.is_some()
    }

    /// Replaces the interval set: new bounds, new lanes, viewport reset to the data.
    pub fn on_data_changed(&mut self, intervals: Vec<Interval>) {
        let count = intervals.len();

        self.bounds = DataBounds::from_intervals(&intervals);
        self.tracks = Tracks::build(intervals, &self.config);
        self.viewport
            .reset_to(&self.bounds, self.config.start_padding_ratio);
        self.controller.cancel();
        self.set_hovered(None);
        self.needs_redraw = true;

        log::info!(
            "Timeline data replaced: {count} intervals in [{}, {}]",
            self.bounds.min_time,
            self.bounds.max_time
        );
    }

    pub fn set_intervals(&mut self, intervals: Vec<Interval>) {
        self.on_data_changed(intervals);
    }

    /// New canvas size. Keeps the time window, pan and lanes as they are.
    pub fn on_resize(&mut self, width: f64, height: f64, scale_factor: f64) {
        if !self.is_initialized() {
            log::debug!("Resize to {width}x{height} ignored, timeline not attached");
            return;
        }

        let surface = Surface::new(width, height, scale_factor);
        if self.surface == Some(surface) {
            return;
        }

        log::debug!("Timeline resized to {}x{}", surface.width, surface.height);
        self.surface = Some(surface);
        self.viewport.pixel_width = surface.width;
        self.needs_redraw = true;
    }

    /// Detaches from the canvas. Any drag ends and hover is cleared.
    pub fn dispose(&mut self) {
        if self.surface.take().is_none() {
            return;
        }

        self.controller.cancel();
        self.set_hovered(None);
        self.pointer_inside = false;
        self.needs_redraw = false;

        log::info!("Timeline detached");
    }

    pub fn pointer_down(&mut self, x: f64, _y: f64) {
        if !self.accepts_input("pointer down") {
            return;
        }

        self.pointer_inside = true;
        self.controller.begin_drag(x, &self.viewport);
    }

    /// Pans while dragging, otherwise updates hover.
    pub fn pointer_move(&mut self, x: f64, y: f64) {
        if !self.accepts_input("pointer move") {
            return;
        }

        self.pointer_inside = true;

        if self.controller.is_dragging() {
            match self.controller.drag_move(
                x,
                &mut self.viewport,
                &self.bounds,
                &self.config,
            ) {
                PanOutcome::Moved => self.needs_redraw = true,
                PanOutcome::Stalled => {
                    log::trace!("Pan stalled at data bounds, offset {}", self.viewport.pan_offset);
                }
                PanOutcome::Ignored => {}
            }
        } else {
            let hovered = self.hit_index(x, y);
            self.set_hovered(hovered);
        }
    }

    pub fn pointer_up(&mut self, _x: f64, _y: f64) {
        if !self.accepts_input("pointer up") {
            return;
        }

        if self.controller.end_drag() {
            log::debug!(
                "Drag ended, pan offset {}, window [{}, {}]",
                self.viewport.pan_offset,
                self.viewport.time_start,
                self.viewport.time_end
            );
        }
    }

    pub fn pointer_leave(&mut self) {
        if !self.accepts_input("pointer leave") {
            return;
        }

        self.controller.cancel();
        self.pointer_inside = false;
        self.set_hovered(None);
        self.needs_redraw = true;
    }

    /// Wheel zoom around `x`. Positive `delta_y` zooms out.
    pub fn wheel(&mut self, x: f64, delta_y: f64) {
        if !self.accepts_input("wheel") {
            return;
        }

        if self
            .controller
            .wheel(x, delta_y, &mut self.viewport, &self.bounds, &self.config)
        {
            self.needs_redraw = true;
        }
    }

    /// Reports the interval under `(x, y)`, unless the gesture that just ended was a drag.
    pub fn click(&mut self, x: f64, y: f64) {
        if !self.accepts_input("click") {
            return;
        }

        if self.controller.is_dragging() || self.controller.last_gesture_was_drag() {
            log::trace!("Click at ({x}, {y}) suppressed after drag");
            return;
        }

        let Some(index) = self.hit_index(x, y) else {
            return;
        };
        if let Some(assignment) = self.tracks.get(index) {
            log::debug!("Interval clicked: {}", assignment.interval);
            self.observer.clicked(&assignment.interval);
        }
    }

    /// Assignments intersecting the canvas under the current viewport.
    pub fn visible(&self) -> Vec<VisibleBar<'_>> {
        cull::visible(&self.tracks, &self.viewport)
    }

    pub fn hit_test(&self, x: f64, y: f64) -> Option<&Interval> {
        self.hit_assignment(x, y).map(|assignment| &assignment.interval)
    }

    /// Draws one frame. Does nothing while detached.
    pub fn render(&self, canvas: &mut impl Canvas, theme: &Theme) {
        let Some(surface) = self.surface else {
            return;
        };

        let bars = self.visible();
        let scene = Scene {
            viewport: &self.viewport,
            bars: &bars,
            hovered: self.hovered,
            surface,
            config: &self.config,
            theme,
        };

        render::render(canvas, &scene);
    }

    pub fn needs_redraw(&self) -> bool {
        self.needs_redraw
    }

    /// Returns and clears the pending redraw flag.
    pub fn take_redraw(&mut self) -> bool {
        std::mem::take(&mut self.needs_redraw)
    }

    pub fn cursor(&self) -> Cursor {
        if self.controller.is_dragging() {
            Cursor::Grabbing
        } else if self.hovered.is_some() {
            Cursor::Pointer
        } else if self.pointer_inside {
            Cursor::Grab
        } else {
            Cursor::Idle
        }
    }

    pub fn hovered(&self) -> Option<&Interval> {
        self.hovered
            .and_then(|index| self.tracks.get(index))
            .map(|assignment| &assignment.interval)
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn bounds(&self) -> &DataBounds {
        &self.bounds
    }

    pub fn tracks(&self) -> &Tracks {
        &self.tracks
    }

    pub fn config(&self) -> &TimelineConfig {
        &self.config
    }

    pub fn surface(&self) -> Option<Surface> {
        self.surface
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn observer_mut(&mut self) -> &mut O {
        &mut self.observer
    }

    fn accepts_input(&self, what: &str) -> bool {
        if self.surface.is_none() {
            log::trace!("Ignoring {what}, timeline not attached");
            return false;
        }
        true
    }

    fn hit_assignment(&self, x: f64, y: f64) -> Option<&TrackAssignment> {
        hit::hit_test(&self.tracks, &self.viewport, x, y, self.config.bar_height)
    }

    fn hit_index(&self, x: f64, y: f64) -> Option<usize> {
        self.hit_assignment(x, y).map(|assignment| assignment.track_index)
    }

    /// Notifies the observer only when the hovered lane changes.
    fn set_hovered(&mut self, hovered: Option<usize>) {
        if self.hovered == hovered {
            return;
        }

        self.hovered = hovered;
        self.needs_redraw = true;

        let interval = hovered
            .and_then(|index| self.tracks.get(index))
            .map(|assignment| &assignment.interval);
        self.observer.hover_changed(interval);
    }
}

impl<O: Observer + Default> Default for Timeline<O> {
    fn default() -> Self {
        Self::new(TimelineConfig::default(), O::default())
    }
}

impl<O: Observer> std::fmt::Debug for Timeline<O> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Timeline")
            .field("surface", &self.surface)
            .field("viewport", &self.viewport)
            .field("bounds", &self.bounds)
            .field("intervals", &self.tracks.len())
            .field("hovered", &self.hovered)
            .finish()
    }
}
