//! Request log model and client-side aggregation
//!
//! - [`entry`]: wire shape and the validated [`LogEntry`]
//! - [`aggregate`]: counts, averages and the windowed request peak
//! - [`chart`]: aligned series for bar, pie and line renderers

pub mod aggregate;
pub mod chart;
pub mod entry;

pub use aggregate::{
    average_response_time, count_by, peak_requests_10min, peak_requests_in_window,
    CategoryCounts, PEAK_WINDOW_MINUTES,
};
pub use chart::{bar_chart, line_chart, pie_chart, BarChart, Dataset, LineChart, PieChart, PieSlice};
pub use entry::{LogEntry, LogField, LogsPayload, RawLogEntry, UNKNOWN};
