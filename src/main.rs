mod logger;
mod source;
mod widget;

use data::{AppConfig, Interval};
use widget::timeline::{TimelineEvent, TimelineView};

use iced::widget::{column, container, text};
use iced::{Element, Length, Size, Theme};

use std::path::PathBuf;

const STATUS_TEXT_SIZE: f32 = 13.0;

fn main() -> iced::Result {
    match logger::setup(cfg!(debug_assertions)) {
        Ok(Some(path)) => log::info!("Logging to {}", path.display()),
        Ok(None) => {}
        Err(err) => eprintln!("Failed to set up logging: {err}"),
    }

    let config = data::config::load();
    let intervals = startup_intervals(&config);

    iced::application(
        move || Trackline::new(config.clone(), intervals.clone()),
        Trackline::update,
        Trackline::view,
    )
    .title(Trackline::title)
    .theme(Trackline::theme)
    .scale_factor(Trackline::scale_factor)
    .window_size(Size::new(1280.0, 720.0))
    .antialiasing(true)
    .run()
}

/// Intervals from the JSON file given as first argument, else generated samples.
fn startup_intervals(config: &AppConfig) -> Vec<Interval> {
    if let Some(path) = std::env::args_os().nth(1).map(PathBuf::from) {
        match source::from_file(&path) {
            Ok(intervals) => return intervals,
            Err(err) => log::error!("{err}, showing sample data instead"),
        }
    }

    source::sample(config.sample_count)
}

#[derive(Debug, Clone)]
enum Message {
    Timeline(TimelineEvent),
}

impl From<TimelineEvent> for Message {
    fn from(event: TimelineEvent) -> Self {
        Message::Timeline(event)
    }
}

struct Trackline {
    config: AppConfig,
    intervals: Vec<Interval>,
    /// Bumped whenever `intervals` is replaced.
    data_version: u64,
    hovered: Option<Interval>,
    selected: Option<Interval>,
}

impl Trackline {
    fn new(config: AppConfig, intervals: Vec<Interval>) -> Self {
        Self {
            config,
            intervals,
            data_version: 1,
            hovered: None,
            selected: None,
        }
    }

    fn title(&self) -> String {
        format!("{} ({} intervals)", data::APP_NAME, self.intervals.len())
    }

    fn theme(&self) -> Theme {
        if self.config.theme.is_dark() {
            Theme::Dark
        } else {
            Theme::Light
        }
    }

    fn scale_factor(&self) -> f32 {
        f64::from(self.config.scale_factor) as f32
    }

    fn update(&mut self, message: Message) {
        match message {
            Message::Timeline(TimelineEvent::Hovered(interval)) => {
                if let Some(interval) = &interval {
                    log::debug!("Hovering {interval}");
                }
                self.hovered = interval;
            }
            Message::Timeline(TimelineEvent::Clicked(interval)) => {
                log::info!(
                    "Element clicked: id={}, start={}, end={}",
                    interval.id,
                    interval.start_time,
                    interval.end_time
                );
                self.selected = Some(interval);
            }
        }
    }

    fn view(&self) -> Element<'_, Message> {
        let describe = |interval: Option<&Interval>| {
            interval.map_or_else(|| "-".to_string(), ToString::to_string)
        };

        let status = text(format!(
            "Hover: {}    Selected: {}",
            describe(self.hovered.as_ref()),
            describe(self.selected.as_ref()),
        ))
        .size(STATUS_TEXT_SIZE);

        let timeline = TimelineView::new(
            &self.intervals,
            &self.config.timeline,
            &self.config.theme,
        )
        .scale_factor(f64::from(self.config.scale_factor))
        .version(self.data_version);

        column![
            container(status).padding([4, 8]),
            container(timeline).width(Length::Fill).height(Length::Fill),
        ]
        .into()
    }
}
