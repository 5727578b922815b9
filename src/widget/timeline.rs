use data::Theme as Palette;
use data::TimelineConfig;
use data::timeline::render;
use data::timeline::{Cursor, Interval, Observer, Surface, Timeline};

use iced::advanced::widget::tree::{self, Tree};
use iced::advanced::{self, Clipboard, Layout, Shell, Widget, layout, renderer};
use iced::alignment::Horizontal;
use iced::widget::canvas;
use iced::{Color, Element, Event, Length, Point, Rectangle, Renderer, Size, Theme, Vector, mouse, window};

/// Estimated glyph advance as a fraction of the font size.
const CHAR_W_RATIO: f32 = 0.64;

#[derive(Debug, Clone)]
pub enum TimelineEvent {
    Hovered(Option<Interval>),
    Clicked(Interval),
}

/// Collects notifications until the widget can publish them.
#[derive(Debug, Default)]
struct Outbox(Vec<TimelineEvent>);

impl Observer for Outbox {
    fn hover_changed(&mut self, interval: Option<&Interval>) {
        self.0.push(TimelineEvent::Hovered(interval.cloned()));
    }

    fn clicked(&mut self, interval: &Interval) {
        self.0.push(TimelineEvent::Clicked(interval.clone()));
    }
}

struct State {
    timeline: Timeline<Outbox>,
    cache: canvas::Cache,
    last_version: Option<u64>,
    /// Window scale factor reported by the windowing system.
    window_scale: f64,
    cursor_inside: bool,
    /// Left button went down over the widget and is not released yet.
    pressed: bool,
}

impl State {
    fn new(config: TimelineConfig) -> Self {
        Self {
            timeline: Timeline::new(config, Outbox::default()),
            cache: canvas::Cache::new(),
            last_version: None,
            window_scale: 1.0,
            cursor_inside: false,
            pressed: false,
        }
    }

    /// Replaces the intervals when the widget carries a newer version.
    fn sync_data(&mut self, view: &TimelineView<'_>) {
        if self.last_version != Some(view.version) {
            self.timeline.set_intervals(view.intervals.to_vec());
            self.last_version = Some(view.version);
        }
    }

    /// Attaches or resizes the core to the laid out size.
    fn sync_size(&mut self, size: Size, app_scale: f64) {
        let width = f64::from(size.width);
        let height = f64::from(size.height);
        let scale_factor = app_scale * self.window_scale;

        if self.timeline.is_initialized() {
            self.timeline.on_resize(width, height, scale_factor);
        } else {
            self.timeline
                .initialize(Surface::new(width, height, scale_factor));
        }
    }

    fn press(&mut self, x: f64, y: f64) {
        self.cursor_inside = true;
        self.pressed = true;
        self.timeline.pointer_down(x, y);
    }

    /// Ends a press that started over the widget. Returns `false` otherwise.
    fn release(&mut self, x: f64, y: f64) -> bool {
        if !std::mem::take(&mut self.pressed) {
            return false;
        }

        self.timeline.pointer_up(x, y);
        self.timeline.click(x, y);
        true
    }

    fn leave(&mut self) {
        self.pressed = false;

        if self.cursor_inside {
            self.cursor_inside = false;
            self.timeline.pointer_leave();
        }
    }

    fn flush_redraw(&mut self) {
        if self.timeline.take_redraw() {
            self.cache.clear();
        }
    }
}

impl Drop for State {
    fn drop(&mut self) {
        self.timeline.dispose();
    }
}

pub struct TimelineView<'a> {
    intervals: &'a [Interval],
    config: &'a TimelineConfig,
    palette: &'a Palette,
    scale_factor: f64,
    version: u64,
}

impl<'a> TimelineView<'a> {
    pub fn new(intervals: &'a [Interval], config: &'a TimelineConfig, palette: &'a Palette) -> Self {
        Self {
            intervals,
            config,
            palette,
            scale_factor: 1.0,
            version: 0,
        }
    }

    /// App level scale factor, multiplied with the window's own.
    pub fn scale_factor(mut self, scale_factor: f64) -> Self {
        self.scale_factor = scale_factor;
        self
    }

    /// Bump whenever `intervals` is replaced.
    pub fn version(mut self, rev: u64) -> Self {
        self.version = rev;
        self
    }
}

impl<M> Widget<M, Theme, Renderer> for TimelineView<'_>
where
    M: Clone + 'static + From<TimelineEvent>,
{
    fn tag(&self) -> tree::Tag {
        tree::Tag::of::<State>()
    }

    fn state(&self) -> tree::State {
        tree::State::new(State::new(self.config.clone()))
    }

    fn size(&self) -> Size<Length> {
        Size {
            width: Length::Fill,
            height: Length::Fill,
        }
    }

    fn layout(
        &mut self,
        tree: &mut Tree,
        _renderer: &Renderer,
        limits: &layout::Limits,
    ) -> layout::Node {
        let node = layout::atomic(limits, Length::Fill, Length::Fill);

        let state = tree.state.downcast_mut::<State>();
        state.sync_data(self);
        state.sync_size(node.size(), self.scale_factor);
        state.flush_redraw();

        node
    }

    fn update(
        &mut self,
        tree: &mut Tree,
        event: &Event,
        layout: Layout<'_>,
        cursor: mouse::Cursor,
        _renderer: &Renderer,
        _clipboard: &mut dyn Clipboard,
        shell: &mut Shell<'_, M>,
        _viewport: &Rectangle,
    ) {
        let state = tree.state.downcast_mut::<State>();
        let bounds = layout.bounds();

        state.sync_data(self);

        if let Event::Window(window::Event::Rescaled(factor)) = event {
            state.window_scale = f64::from(*factor);
            state.sync_size(bounds.size(), self.scale_factor);
        }

        if !shell.is_event_captured()
            && let Event::Mouse(mouse_event) = event
        {
            match cursor.position_in(bounds) {
                Some(position) => {
                    let (x, y) = (f64::from(position.x), f64::from(position.y));

                    match mouse_event {
                        mouse::Event::CursorMoved { .. } => {
                            state.cursor_inside = true;
                            state.timeline.pointer_move(x, y);
                        }
                        mouse::Event::ButtonPressed(mouse::Button::Left) => {
                            state.press(x, y);
                            shell.capture_event();
                        }
                        mouse::Event::ButtonReleased(mouse::Button::Left) => {
                            if state.release(x, y) {
                                shell.capture_event();
                            }
                        }
                        mouse::Event::WheelScrolled { delta } => {
                            let (mouse::ScrollDelta::Lines { y: delta_y, .. }
                            | mouse::ScrollDelta::Pixels { y: delta_y, .. }) = *delta;

                            if delta_y != 0.0 {
                                // iced reports scroll-up as positive, the core zooms out on positive
                                state.timeline.wheel(x, -f64::from(delta_y));
                                shell.capture_event();
                            }
                        }
                        mouse::Event::CursorLeft => state.leave(),
                        _ => {}
                    }
                }
                None => state.leave(),
            }
        }

        state.flush_redraw();

        for event in state.timeline.observer_mut().0.drain(..) {
            shell.publish(M::from(event));
        }
    }

    fn draw(
        &self,
        tree: &Tree,
        renderer: &mut Renderer,
        _theme: &Theme,
        _style: &renderer::Style,
        layout: Layout<'_>,
        _cursor: mouse::Cursor,
        _viewport: &Rectangle,
    ) {
        use advanced::Renderer as _;

        let state = tree.state.downcast_ref::<State>();
        let bounds = layout.bounds();

        let geometry = state.cache.draw(renderer, bounds.size(), |frame| {
            state
                .timeline
                .render(&mut FrameCanvas { frame }, self.palette);
        });

        renderer.with_layer(bounds, |r| {
            r.with_translation(Vector::new(bounds.x, bounds.y), |r| {
                use iced::advanced::graphics::geometry::Renderer as _;
                r.draw_geometry(geometry);
            });
        });
    }

    fn mouse_interaction(
        &self,
        tree: &Tree,
        layout: Layout<'_>,
        cursor: advanced::mouse::Cursor,
        _viewport: &Rectangle,
        _renderer: &Renderer,
    ) -> advanced::mouse::Interaction {
        if !cursor.is_over(layout.bounds()) {
            return advanced::mouse::Interaction::default();
        }

        let state = tree.state.downcast_ref::<State>();
        match state.timeline.cursor() {
            Cursor::Grabbing => advanced::mouse::Interaction::Grabbing,
            Cursor::Pointer => advanced::mouse::Interaction::Pointer,
            Cursor::Grab => advanced::mouse::Interaction::Grab,
            Cursor::Idle => advanced::mouse::Interaction::default(),
        }
    }
}

impl<'a, M> From<TimelineView<'a>> for Element<'a, M, Theme, Renderer>
where
    M: Clone + 'a + 'static + From<TimelineEvent>,
{
    fn from(view: TimelineView<'a>) -> Self {
        Element::new(view)
    }
}

/// Renders timeline drawing commands into a canvas frame.
struct FrameCanvas<'f> {
    frame: &'f mut canvas::Frame,
}

impl render::Canvas for FrameCanvas<'_> {
    fn clear(&mut self, color: Color) {
        let size = self.frame.size();
        self.frame.fill_rectangle(Point::ORIGIN, size, color);
    }

    fn stroke_line(&mut self, from: Point, to: Point, color: Color, width: f32) {
        self.frame.stroke(
            &canvas::Path::line(from, to),
            canvas::Stroke::default().with_color(color).with_width(width),
        );
    }

    fn fill_rect(&mut self, bounds: Rectangle, color: Color) {
        self.frame
            .fill_rectangle(bounds.position(), bounds.size(), color);
    }

    fn stroke_rect(&mut self, bounds: Rectangle, color: Color, width: f32) {
        self.frame.stroke(
            &canvas::Path::rectangle(bounds.position(), bounds.size()),
            canvas::Stroke::default().with_color(color).with_width(width),
        );
    }

    fn fill_text(&mut self, text: &str, position: Point, color: Color, size: f32, align: Horizontal) {
        let align_x = match align {
            Horizontal::Left => iced::Alignment::Start,
            Horizontal::Center => iced::Alignment::Center,
            Horizontal::Right => iced::Alignment::End,
        };

        self.frame.fill_text(canvas::Text {
            content: text.to_owned(),
            position,
            color,
            size: size.into(),
            align_x: align_x.into(),
            align_y: iced::Alignment::Center.into(),
            ..Default::default()
        });
    }

    fn measure_text(&self, text: &str, size: f32) -> f32 {
        text.chars().count() as f32 * size * CHAR_W_RATIO
    }
}
