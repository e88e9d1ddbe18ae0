//! Chart-ready data
//!
//! Renderers receive complete, aligned series: every label has a value in
//! every dataset, missing categories are zero.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, DurationRound, Utc};
use serde::Serialize;

use super::aggregate::CategoryCounts;
use super::entry::LogEntry;

/// Series colour for server 1
pub const SERVER1_COLOR: &str = "#0d6efd";
/// Series colour for server 2
pub const SERVER2_COLOR: &str = "#198754";

/// Slice colours for pie charts, cycled when there are more categories
pub const PIE_PALETTE: [&str; 6] = [
    "#0d6efd", "#dc3545", "#ffc107", "#198754", "#6f42c1", "#fd7e14",
];

/// One named series
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dataset {
    pub label: String,
    pub data: Vec<usize>,
    pub color: String,
}

/// Grouped bar chart comparing the two servers
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarChart {
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
}

impl BarChart {
    /// Largest value over all datasets, used for axis scaling
    pub fn max_value(&self) -> usize {
        self.datasets
            .iter()
            .flat_map(|d| d.data.iter().copied())
            .max()
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Align two servers' counts on the union of their categories.
///
/// Labels keep server 1's order followed by categories only server 2 has.
pub fn bar_chart(server1: &CategoryCounts, server2: &CategoryCounts) -> BarChart {
    let mut labels: Vec<String> = server1.categories().map(str::to_string).collect();
    for category in server2.categories() {
        if !labels.iter().any(|l| l == category) {
            labels.push(category.to_string());
        }
    }

    let series = |counts: &CategoryCounts| labels.iter().map(|l| counts.get(l)).collect();

    BarChart {
        datasets: vec![
            Dataset {
                label: "Servidor 1".to_string(),
                data: series(server1),
                color: SERVER1_COLOR.to_string(),
            },
            Dataset {
                label: "Servidor 2".to_string(),
                data: series(server2),
                color: SERVER2_COLOR.to_string(),
            },
        ],
        labels,
    }
}

/// One slice of a pie chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieSlice {
    pub label: String,
    pub value: usize,
    pub color: String,
}

/// Distribution of a single server's categories
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieChart {
    pub slices: Vec<PieSlice>,
}

impl PieChart {
    pub fn total(&self) -> usize {
        self.slices.iter().map(|s| s.value).sum()
    }

    /// Fraction of the whole for each slice; all zero when the chart is empty
    pub fn fractions(&self) -> Vec<f64> {
        let total = self.total();
        self.slices
            .iter()
            .map(|s| {
                if total == 0 {
                    0.0
                } else {
                    s.value as f64 / total as f64
                }
            })
            .collect()
    }
}

pub fn pie_chart(counts: &CategoryCounts) -> PieChart {
    PieChart {
        slices: counts
            .iter()
            .enumerate()
            .map(|(idx, (label, value))| PieSlice {
                label: label.to_string(),
                value,
                color: PIE_PALETTE[idx % PIE_PALETTE.len()].to_string(),
            })
            .collect(),
    }
}

/// Requests per time bucket for both servers
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineChart {
    /// Bucket start times, ascending
    pub buckets: Vec<DateTime<Utc>>,
    pub datasets: Vec<Dataset>,
}

impl LineChart {
    pub fn max_value(&self) -> usize {
        self.datasets
            .iter()
            .flat_map(|d| d.data.iter().copied())
            .max()
            .unwrap_or(0)
    }

    /// Bucket labels formatted for the x axis.
    ///
    /// Labels carry the day as well when the buckets cross midnight.
    pub fn labels(&self) -> Vec<String> {
        let spans_days = match (self.buckets.first(), self.buckets.last()) {
            (Some(first), Some(last)) => first.date_naive() != last.date_naive(),
            _ => false,
        };
        let format = if spans_days { "%d/%m %H:%M" } else { "%H:%M" };

        self.buckets
            .iter()
            .map(|b| b.format(format).to_string())
            .collect()
    }
}

/// Longest run of empty buckets filled in between two occupied ones
pub const MAX_FILLED_GAP: i64 = 36;

/// Request counts per `bucket`-wide interval.
///
/// Buckets come from the intervals that hold at least one timestamp on
/// either server, so both lines share one x axis. Runs of up to
/// [`MAX_FILLED_GAP`] empty buckets between them are zero-filled; longer
/// gaps are skipped. Entries without a timestamp are ignored.
pub fn line_chart(server1: &[LogEntry], server2: &[LogEntry], bucket: Duration) -> LineChart {
    let floor = |t: DateTime<Utc>| t.duration_trunc(bucket).unwrap_or(t);

    let mut counts: BTreeMap<DateTime<Utc>, (usize, usize)> = BTreeMap::new();
    for stamp in server1.iter().filter_map(|e| e.timestamp).map(floor) {
        counts.entry(stamp).or_default().0 += 1;
    }
    for stamp in server2.iter().filter_map(|e| e.timestamp).map(floor) {
        counts.entry(stamp).or_default().1 += 1;
    }

    let bucket_ms = bucket.num_milliseconds();
    let mut buckets = Vec::with_capacity(counts.len());
    let mut data1 = Vec::with_capacity(counts.len());
    let mut data2 = Vec::with_capacity(counts.len());
    let mut previous: Option<DateTime<Utc>> = None;

    for (stamp, (count1, count2)) in counts {
        if let Some(prev) = previous {
            let missing = if bucket_ms > 0 {
                (stamp - prev).num_milliseconds() / bucket_ms - 1
            } else {
                0
            };
            if (1..=MAX_FILLED_GAP).contains(&missing) {
                for step in 1..=missing as i32 {
                    buckets.push(prev + bucket * step);
                    data1.push(0);
                    data2.push(0);
                }
            }
        }
        buckets.push(stamp);
        data1.push(count1);
        data2.push(count2);
        previous = Some(stamp);
    }

    LineChart {
        datasets: vec![
            Dataset {
                label: "Servidor 1".to_string(),
                data: data1,
                color: SERVER1_COLOR.to_string(),
            },
            Dataset {
                label: "Servidor 2".to_string(),
                data: data2,
                color: SERVER2_COLOR.to_string(),
            },
        ],
        buckets,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logs::aggregate::count_by;
    use crate::logs::entry::LogField;
    use chrono::TimeZone;

    fn counts(values: &[&str]) -> CategoryCounts {
        values.iter().copied().collect()
    }

    #[test]
    fn test_bar_chart_aligns_series() {
        let chart = bar_chart(&counts(&["info", "info", "error"]), &counts(&["warn", "info"]));

        assert_eq!(chart.labels, vec!["info", "error", "warn"]);
        assert_eq!(chart.datasets[0].data, vec![2, 1, 0]);
        assert_eq!(chart.datasets[1].data, vec![1, 0, 1]);
        assert_eq!(chart.max_value(), 2);
    }

    #[test]
    fn test_bar_chart_single_server() {
        let chart = bar_chart(&CategoryCounts::new(), &counts(&["GET", "POST", "GET"]));

        assert_eq!(chart.labels, vec!["GET", "POST"]);
        assert_eq!(chart.datasets[0].data, vec![0, 0]);
        assert_eq!(chart.datasets[1].data, vec![2, 1]);
    }

    #[test]
    fn test_bar_chart_empty() {
        let chart = bar_chart(&CategoryCounts::new(), &CategoryCounts::new());
        assert!(chart.is_empty());
        assert_eq!(chart.max_value(), 0);
    }

    #[test]
    fn test_pie_chart_cycles_palette() {
        let values = ["a", "b", "c", "d", "e", "f", "g"];
        let chart = pie_chart(&counts(&values));

        assert_eq!(chart.slices.len(), 7);
        assert_eq!(chart.slices[6].color, PIE_PALETTE[0]);
        assert_eq!(chart.total(), 7);
    }

    #[test]
    fn test_pie_fractions() {
        let entries = vec![
            LogEntry::new("info", "GET", "200"),
            LogEntry::new("info", "GET", "200"),
            LogEntry::new("error", "GET", "500"),
            LogEntry::new("warn", "GET", "200"),
        ];
        let chart = pie_chart(&count_by(&entries, LogField::Level));
        assert_eq!(chart.fractions(), vec![0.5, 0.25, 0.25]);

        assert!(pie_chart(&CategoryCounts::new()).fractions().is_empty());
    }

    #[test]
    fn test_line_chart_zero_fills_gaps() {
        let base = Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap();
        let server1 = vec![
            LogEntry::new("info", "GET", "200").at(base + Duration::minutes(1)),
            LogEntry::new("info", "GET", "200").at(base + Duration::minutes(4)),
            LogEntry::new("info", "GET", "200").at(base + Duration::minutes(32)),
        ];
        let server2 = vec![
            LogEntry::new("info", "GET", "200").at(base + Duration::minutes(12)),
            LogEntry::new("info", "GET", "200"),
        ];

        let chart = line_chart(&server1, &server2, Duration::minutes(10));

        assert_eq!(chart.buckets.len(), 4);
        assert_eq!(chart.buckets[0], base);
        assert_eq!(chart.datasets[0].data, vec![2, 0, 0, 1]);
        assert_eq!(chart.datasets[1].data, vec![0, 1, 0, 0]);
        assert_eq!(chart.labels()[1], "10:10");
    }

    #[test]
    fn test_line_chart_without_timestamps() {
        let chart = line_chart(
            &[LogEntry::new("info", "GET", "200")],
            &[],
            Duration::minutes(10),
        );
        assert!(chart.buckets.is_empty());
        assert_eq!(chart.max_value(), 0);
    }

    #[test]
    fn test_line_chart_skips_long_gaps() {
        // Epoch seconds sent where milliseconds were expected land in 1970
        let outlier: LogEntry = serde_json::from_str::<crate::logs::RawLogEntry>(
            r#"{"timestamp":1714557600}"#,
        )
        .map(LogEntry::from)
        .unwrap();
        assert!(outlier.timestamp.unwrap() < Utc.with_ymd_and_hms(1971, 1, 1, 0, 0, 0).unwrap());

        let base = Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap();
        let server1 = vec![outlier, LogEntry::new("info", "GET", "200").at(base)];

        let chart = line_chart(&server1, &[], Duration::minutes(10));

        assert_eq!(chart.buckets.len(), 2);
        assert_eq!(chart.buckets[1], base);
        assert_eq!(chart.datasets[0].data, vec![1, 1]);
        assert_eq!(chart.datasets[1].data, vec![0, 0]);
    }

    #[test]
    fn test_line_chart_far_future_stamp_stays_small() {
        let base = Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap();
        let far = Utc.with_ymd_and_hms(9999, 12, 31, 23, 50, 0).unwrap();
        let server2 = vec![
            LogEntry::new("info", "GET", "200").at(base),
            LogEntry::new("info", "GET", "200").at(far),
        ];

        let chart = line_chart(&[], &server2, Duration::minutes(10));

        assert_eq!(chart.buckets, vec![base, far]);
        assert!(chart.buckets.len() < 10_000);
    }

    #[test]
    fn test_line_chart_fills_gap_up_to_limit() {
        let base = Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap();
        let at_limit = base + Duration::minutes(10 * (MAX_FILLED_GAP + 1));
        let chart = line_chart(
            &[
                LogEntry::new("info", "GET", "200").at(base),
                LogEntry::new("info", "GET", "200").at(at_limit),
            ],
            &[],
            Duration::minutes(10),
        );
        assert_eq!(chart.buckets.len() as i64, MAX_FILLED_GAP + 2);
        assert!(chart.buckets.windows(2).all(|w| w[1] - w[0] == Duration::minutes(10)));
    }

    #[test]
    fn test_labels_include_day_across_midnight() {
        let base = Utc.with_ymd_and_hms(2024, 5, 1, 23, 50, 0).unwrap();
        let entries = vec![
            LogEntry::new("info", "GET", "200").at(base),
            LogEntry::new("info", "GET", "200").at(base + Duration::minutes(10)),
        ];

        let chart = line_chart(&entries, &[], Duration::minutes(10));

        assert_eq!(chart.labels(), vec!["01/05 23:50", "02/05 00:00"]);
    }
}
