//! Client-side aggregation over a single server's log array
//!
//! All functions are pure and run over already-fetched entries; the
//! dashboard recomputes them on every render.

use chrono::Duration;
use serde::Serialize;

use super::entry::{LogEntry, LogField};

/// Width of the window used for the request-rate peak
pub const PEAK_WINDOW_MINUTES: i64 = 10;

/// Count per category, in first-seen order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CategoryCounts {
    buckets: Vec<(String, usize)>,
}

impl CategoryCounts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one occurrence of `category`
    pub fn record(&mut self, category: &str) {
        match self.buckets.iter_mut().find(|(name, _)| name == category) {
            Some((_, count)) => *count += 1,
            None => self.buckets.push((category.to_string(), 1)),
        }
    }

    /// Count for `category`, 0 when never seen
    pub fn get(&self, category: &str) -> usize {
        self.buckets
            .iter()
            .find(|(name, _)| name == category)
            .map(|(_, count)| *count)
            .unwrap_or(0)
    }

    /// Sum over all buckets
    pub fn total(&self) -> usize {
        self.buckets.iter().map(|(_, count)| count).sum()
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.buckets.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.buckets.iter().map(|(name, count)| (name.as_str(), *count))
    }
}

impl<'a> FromIterator<&'a str> for CategoryCounts {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut counts = CategoryCounts::new();
        for category in iter {
            counts.record(category);
        }
        counts
    }
}

/// Group entries by `field` and count each distinct value
pub fn count_by(entries: &[LogEntry], field: LogField) -> CategoryCounts {
    entries.iter().map(|e| e.field(field)).collect()
}

/// Mean response time in milliseconds, rounded to the nearest integer.
///
/// Entries with an unparseable response time count as 0 ms. An empty slice
/// yields 0.
pub fn average_response_time(entries: &[LogEntry]) -> u64 {
    if entries.is_empty() {
        return 0;
    }
    let total: u128 = entries.iter().map(|e| u128::from(e.response_time_ms)).sum();
    (total as f64 / entries.len() as f64).round() as u64
}

/// Largest number of requests whose timestamps fit in one window.
///
/// A window starting at `t` holds every timestamp in `[t, t + window]`.
/// Entries without a timestamp are ignored.
pub fn peak_requests_in_window(entries: &[LogEntry], window: Duration) -> usize {
    let mut timestamps: Vec<i64> = entries
        .iter()
        .filter_map(|e| e.timestamp.map(|t| t.timestamp_millis()))
        .collect();
    timestamps.sort_unstable();

    let window_ms = window.num_milliseconds();
    let mut peak = 0;
    let mut end = 0;

    for start in 0..timestamps.len() {
        if end < start {
            end = start;
        }
        while end < timestamps.len() && timestamps[end] - timestamps[start] <= window_ms {
            end += 1;
        }
        peak = peak.max(end - start);
    }

    peak
}

/// Peak request count over the standard ten-minute window
pub fn peak_requests_10min(entries: &[LogEntry]) -> usize {
    peak_requests_in_window(entries, Duration::minutes(PEAK_WINDOW_MINUTES))
}
