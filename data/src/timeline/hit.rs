use super::track::{TrackAssignment, Tracks};
use super::viewport::Viewport;

/// Assignment whose bar covers the pointer at `(x, y)`, if any.
///
/// Binary search on the time under the pointer: go left while the time is
/// before a start, go right while it is past the end-time reach. On the first
/// candidate, check it and then probe its neighbours on both sides for a bar
/// that contains both the time and `y`.
pub fn hit_test<'a>(
    tracks: &'a Tracks,
    viewport: &Viewport,
    x: f64,
    y: f64,
    bar_height: f64,
) -> Option<&'a TrackAssignment> {
    if tracks.is_empty() || viewport.pixel_width <= 0.0 {
        return None;
    }

    let time = viewport.pixel_to_time(x);
    if !time.is_finite() || !y.is_finite() {
        return None;
    }

    let mut lo = 0;
    let mut hi = tracks.len();

    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        let assignment = tracks.get(mid)?;

        if time < assignment.start_time() {
            hi = mid;
        } else if time > tracks.reach(mid) {
            lo = mid + 1;
        } else {
            return probe(tracks, mid, time, y, bar_height);
        }
    }

    None
}

fn probe(
    tracks: &Tracks,
    candidate: usize,
    time: f64,
    y: f64,
    bar_height: f64,
) -> Option<&TrackAssignment> {
    let covers = |a: &TrackAssignment| a.contains_time(time) && a.contains_y(y, bar_height);
    let slice = tracks.as_slice();

    if covers(&slice[candidate]) {
        return Some(&slice[candidate]);
    }

    // left side: nothing at or before `i` reaches `time` once reach drops below it
    for i in (0..candidate).rev() {
        if tracks.reach(i) < time {
            break;
        }
        if covers(&slice[i]) {
            return Some(&slice[i]);
        }
    }

    // right side: sorted by start, nothing further can contain `time`
    for assignment in &slice[candidate + 1..] {
        if assignment.start_time() > time {
            break;
        }
        if covers(assignment) {
            return Some(assignment);
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TimelineConfig;
    use crate::timeline::Interval;
    use crate::timeline::cull;

    const BAR: f64 = 25.0;

    fn viewport(start: f64, end: f64, width: f64, pan: f64) -> Viewport {
        Viewport {
            time_start: start,
            time_end: end,
            pixel_width: width,
            zoom_level: 1.0,
            pan_offset: pan,
        }
    }

    fn build(intervals: Vec<Interval>) -> Tracks {
        Tracks::build(intervals, &TimelineConfig::default())
    }

    fn id(hit: Option<&TrackAssignment>) -> Option<&str> {
        hit.map(|a| a.interval.id.as_str())
    }

    #[test]
    fn resolves_row_among_overlapping_intervals() {
        let tracks = build(vec![
            Interval::new("e0", 0.0, 5.0),
            Interval::new("e1", 3.0, 7.0),
        ]);
        let vp = viewport(0.0, 10.0, 1000.0, 0.0);
        let x = vp.time_to_pixel(4.0);

        assert_eq!(id(hit_test(&tracks, &vp, x, 5.0 + 10.0, BAR)), Some("e0"));
        assert_eq!(id(hit_test(&tracks, &vp, x, 45.0 + 10.0, BAR)), Some("e1"));
        // between the two bars
        assert_eq!(id(hit_test(&tracks, &vp, x, 38.0, BAR)), None);
    }

    #[test]
    fn bar_edges_are_inclusive() {
        let tracks = build(vec![Interval::new("a", 2.0, 4.0)]);
        let vp = viewport(0.0, 10.0, 100.0, 0.0);

        assert_eq!(id(hit_test(&tracks, &vp, 20.0, 5.0, BAR)), Some("a"));
        assert_eq!(id(hit_test(&tracks, &vp, 40.0, 30.0, BAR)), Some("a"));
        assert_eq!(id(hit_test(&tracks, &vp, 41.0, 30.0, BAR)), None);
        assert_eq!(id(hit_test(&tracks, &vp, 30.0, 31.0, BAR)), None);
        assert_eq!(id(hit_test(&tracks, &vp, 30.0, 4.0, BAR)), None);
    }

    #[test]
    fn nothing_in_empty_space() {
        let tracks = build(vec![
            Interval::new("a", 0.0, 1.0),
            Interval::new("b", 8.0, 9.0),
        ]);
        let vp = viewport(0.0, 10.0, 100.0, 0.0);

        assert_eq!(id(hit_test(&tracks, &vp, 50.0, 10.0, BAR)), None);
        assert_eq!(id(hit_test(&tracks, &vp, 50.0, 50.0, BAR)), None);
        assert_eq!(id(hit_test(&tracks, &vp, 85.0, 50.0, BAR)), Some("b"));
    }

    #[test]
    fn finds_bar_behind_a_long_early_interval() {
        // "long" reaches past the pointer time, shorter ones in between do not
        let tracks = build(vec![
            Interval::new("long", 0.0, 100.0),
            Interval::new("s1", 1.0, 2.0),
            Interval::new("s2", 3.0, 4.0),
            Interval::new("s3", 50.0, 60.0),
            Interval::new("s4", 70.0, 80.0),
        ]);
        let vp = viewport(0.0, 100.0, 100.0, 0.0);

        assert_eq!(id(hit_test(&tracks, &vp, 55.0, 5.0 + 1.0, BAR)), Some("long"));
        assert_eq!(id(hit_test(&tracks, &vp, 55.0, 125.0 + 1.0, BAR)), Some("s3"));
        assert_eq!(id(hit_test(&tracks, &vp, 55.0, 45.0 + 1.0, BAR)), None);
        assert_eq!(id(hit_test(&tracks, &vp, 75.0, 165.0 + 1.0, BAR)), Some("s4"));
    }

    #[test]
    fn respects_pan_offset() {
        let tracks = build(vec![Interval::new("a", 0.0, 1.0)]);
        let vp = viewport(0.0, 10.0, 100.0, 50.0);

        assert_eq!(id(hit_test(&tracks, &vp, 55.0, 10.0, BAR)), Some("a"));
        assert_eq!(id(hit_test(&tracks, &vp, 5.0, 10.0, BAR)), None);
    }

    #[test]
    fn every_drawn_bar_is_hit_at_its_center() {
        let intervals: Vec<Interval> = (0..300)
            .map(|i| {
                let start = ((i * 37) % 500) as f64;
                let len = if i % 11 == 0 { 200.0 } else { 1.0 + (i % 9) as f64 };
                Interval::new(format!("i{i}"), start, start + len)
            })
            .collect();
        let tracks = build(intervals);
        let config = TimelineConfig::default();
        let vp = viewport(100.0, 300.0, 1600.0, -120.0);

        let bars = cull::visible(&tracks, &vp);
        assert!(bars.len() > 10);

        for bar in bars {
            let (left, width) = bar.clipped(vp.pixel_width);
            if width < 1.0 {
                continue;
            }
            let x = left + width / 2.0;
            let y = bar.assignment.row_y + config.bar_height / 2.0;

            let hit = hit_test(&tracks, &vp, x, y, config.bar_height);
            assert_eq!(hit.map(|a| a.track_index), Some(bar.track_index()));
        }
    }

    #[test]
    fn degenerate_inputs_miss() {
        let empty = build(Vec::new());
        assert!(hit_test(&empty, &viewport(0.0, 10.0, 100.0, 0.0), 5.0, 5.0, BAR).is_none());

        let tracks = build(vec![Interval::new("a", 0.0, 10.0)]);
        assert!(hit_test(&tracks, &viewport(0.0, 10.0, 0.0, 0.0), 5.0, 10.0, BAR).is_none());
        assert!(hit_test(&tracks, &viewport(0.0, 10.0, 100.0, 0.0), 5.0, f64::NAN, BAR).is_none());

        let inverted = build(vec![Interval::new("x", 7.0, 2.0)]);
        let vp = viewport(0.0, 10.0, 100.0, 0.0);
        assert!(hit_test(&inverted, &vp, 50.0, 10.0, BAR).is_none());
    }
}
