use super::Interval;
use crate::config::TimelineConfig;

/// One interval placed on its own lane.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackAssignment {
    pub interval: Interval,
    /// Rank of the interval in start-time order.
    pub track_index: usize,
    /// Top of the bar, px.
    pub row_y: f64,
}

impl TrackAssignment {
    pub fn start_time(&self) -> f64 {
        self.interval.start_time
    }

    pub fn end_time(&self) -> f64 {
        self.interval.end_time
    }

    pub fn contains_time(&self, time: f64) -> bool {
        self.interval.start_time <= time && time <= self.interval.end_time
    }

    pub fn contains_y(&self, y: f64, bar_height: f64) -> bool {
        y >= self.row_y && y <= self.row_y + bar_height
    }
}

/// Assignments sorted ascending by start time, rebuilt only when the input list is replaced.
///
/// Alongside the assignments it keeps the running maximum of end times. End
/// times are not sorted, their running maximum is, and the searches in
/// `cull` and `hit` key on it.
#[derive(Debug, Clone, Default)]
pub struct Tracks {
    assignments: Vec<TrackAssignment>,
    reach: Vec<f64>,
}

impl Tracks {
    pub fn build(mut intervals: Vec<Interval>, config: &TimelineConfig) -> Self {
        intervals.sort_by(|a, b| a.start_time.total_cmp(&b.start_time));

        let mut reach = Vec::with_capacity(intervals.len());
        let mut furthest = f64::NEG_INFINITY;

        let assignments = intervals
            .into_iter()
            .enumerate()
            .map(|(track_index, interval)| {
                furthest = furthest.max(interval.end_time);
                reach.push(furthest);

                TrackAssignment {
                    row_y: config.row_y(track_index),
                    track_index,
                    interval,
                }
            })
            .collect();

        Self { assignments, reach }
    }

    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&TrackAssignment> {
        self.assignments.get(index)
    }

    pub fn as_slice(&self) -> &[TrackAssignment] {
        &self.assignments
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TrackAssignment> {
        self.assignments.iter()
    }

    /// Largest end time among assignments `0..=index`.
    pub fn reach(&self, index: usize) -> f64 {
        self.reach.get(index).copied().unwrap_or(f64::NEG_INFINITY)
    }
}

impl<'a> IntoIterator for &'a Tracks {
    type Item = &'a TrackAssignment;
    type IntoIter = std::slice::Iter<'a, TrackAssignment>;

    fn into_iter(self) -> Self::IntoIter {
        self.assignments.iter()
    }
}
