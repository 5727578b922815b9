//! Where the intervals shown at startup come from.
use data::Interval;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::Path;

const SAMPLE_MAX_TIME: f64 = 100_000.0;
const SAMPLE_MIN_DURATION: f64 = 2.0;
const SAMPLE_MAX_DURATION: f64 = 1000.0;
const SAMPLE_SEED: u64 = 0x9e37_79b9_7f4a_7c15;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("failed to read intervals: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid intervals file: {0}")]
    Json(#[from] serde_json::Error),
}

/// Reads a JSON array of `{ "id", "startTime", "endTime" }` objects.
pub fn from_file(path: &Path) -> Result<Vec<Interval>, Error> {
    let contents = std::fs::read_to_string(path)?;
    let intervals: Vec<Interval> = serde_json::from_str(&contents)?;

    log::info!("Loaded {} intervals from {}", intervals.len(), path.display());
    Ok(intervals)
}

/// `count` pseudo-random intervals spread over `[0, 100 000]`, same output on every run.
pub fn sample(count: usize) -> Vec<Interval> {
    let mut rng = StdRng::seed_from_u64(SAMPLE_SEED);

    (0..count)
        .map(|i| {
            let start_time = rng.gen_range(0.0..SAMPLE_MAX_TIME - SAMPLE_MAX_DURATION);
            let duration = rng.gen_range(SAMPLE_MIN_DURATION..=SAMPLE_MAX_DURATION);

            Interval::new(format!("element-{i}"), start_time, start_time + duration)
        })
        .collect()
}
