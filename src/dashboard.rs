//! Dashboard view model
//!
//! Holds the two servers' log arrays, the load state machine and the server
//! selector, and turns them into the ordered list of cards the dashboard
//! renders. Nothing here touches the network; loading is driven by the UI
//! or the native client.

use chrono::Duration;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::logs::{
    average_response_time, bar_chart, count_by, line_chart, peak_requests_10min, pie_chart,
    BarChart, CategoryCounts, LineChart, LogEntry, LogField, PieChart, PEAK_WINDOW_MINUTES,
};

/// Which servers the dashboard shows
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ServerFilter {
    #[default]
    All,
    Server1,
    Server2,
}

impl ServerFilter {
    pub const ALL: [ServerFilter; 3] = [ServerFilter::All, ServerFilter::Server1, ServerFilter::Server2];

    /// Value used in the selector and on the command line
    pub fn as_str(self) -> &'static str {
        match self {
            ServerFilter::All => "all",
            ServerFilter::Server1 => "server1",
            ServerFilter::Server2 => "server2",
        }
    }

    /// Human-readable option text
    pub fn label(self) -> &'static str {
        match self {
            ServerFilter::All => "Todos",
            ServerFilter::Server1 => "Servidor 1",
            ServerFilter::Server2 => "Servidor 2",
        }
    }
}

impl fmt::Display for ServerFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ServerFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" | "todos" => Ok(ServerFilter::All),
            "server1" | "servidor1" | "1" => Ok(ServerFilter::Server1),
            "server2" | "servidor2" | "2" => Ok(ServerFilter::Server2),
            other => Err(format!("Unknown server filter: {}. Use: all, server1, server2", other)),
        }
    }
}

/// Log arrays for both backends
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ServerLogs {
    pub server1: Vec<LogEntry>,
    pub server2: Vec<LogEntry>,
}

impl ServerLogs {
    pub fn new(server1: Vec<LogEntry>, server2: Vec<LogEntry>) -> Self {
        Self { server1, server2 }
    }
}

/// Load state of the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DashboardPhase {
    #[default]
    Idle,
    Loading,
    Ready,
}

/// Dashboard state: `Idle -> Loading -> Ready`, then `Ready -> Ready` on
/// filter changes. There is exactly one fetch per dashboard.
#[derive(Debug, Clone, Default)]
pub struct Dashboard {
    phase: DashboardPhase,
    filter: ServerFilter,
    logs: ServerLogs,
}

impl Dashboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> DashboardPhase {
        self.phase
    }

    pub fn filter(&self) -> ServerFilter {
        self.filter
    }

    pub fn logs(&self) -> &ServerLogs {
        &self.logs
    }

    /// Enter `Loading`. Returns false if a fetch already started, in which
    /// case the caller must not fetch again.
    pub fn begin_loading(&mut self) -> bool {
        if self.phase != DashboardPhase::Idle {
            return false;
        }
        self.phase = DashboardPhase::Loading;
        true
    }

    /// Store the fetched logs and enter `Ready`
    pub fn finish_loading(&mut self, logs: ServerLogs) {
        tracing::debug!(
            server1 = logs.server1.len(),
            server2 = logs.server2.len(),
            "Dashboard logs loaded"
        );
        self.logs = logs;
        self.phase = DashboardPhase::Ready;
    }

    /// Change the server selector. Pure recomputation, never a refetch.
    pub fn select(&mut self, filter: ServerFilter) {
        self.filter = filter;
    }

    /// Cards for the current logs and filter
    pub fn view(&self) -> DashboardView {
        DashboardView::build(&self.logs, self.filter)
    }
}

/// One line of a statistics card, e.g. `Servidor 1: 15 ms`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatLine {
    pub label: Option<String>,
    pub value: u64,
    pub unit: String,
}

impl StatLine {
    fn new(label: Option<&str>, value: u64, unit: &str) -> Self {
        Self {
            label: label.map(str::to_string),
            value,
            unit: unit.to_string(),
        }
    }
}

impl fmt::Display for StatLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.label {
            Some(label) => write!(f, "{}: {} {}", label, self.value, self.unit),
            None => write!(f, "{} {}", self.value, self.unit),
        }
    }
}

/// What a card renders
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum CardBody {
    Bar(BarChart),
    Pie(PieChart),
    Line(LineChart),
    Stats { lines: Vec<StatLine> },
}

/// A titled dashboard card
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Card {
    pub title: String,
    pub body: CardBody,
}

impl Card {
    fn new(title: &str, body: CardBody) -> Self {
        Self {
            title: title.to_string(),
            body,
        }
    }
}

/// Per-server aggregates, computed once per view
struct ServerSummary {
    levels: CategoryCounts,
    methods: CategoryCounts,
    statuses: CategoryCounts,
    average_ms: u64,
    peak: usize,
}

impl ServerSummary {
    fn of(entries: &[LogEntry]) -> Self {
        Self {
            levels: count_by(entries, LogField::Level),
            methods: count_by(entries, LogField::Method),
            statuses: count_by(entries, LogField::StatusCode),
            average_ms: average_response_time(entries),
            peak: peak_requests_10min(entries),
        }
    }
}

/// Ordered cards for one render of the dashboard
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub filter: ServerFilter,
    pub cards: Vec<Card>,
}

impl DashboardView {
    pub fn build(logs: &ServerLogs, filter: ServerFilter) -> Self {
        let s1 = ServerSummary::of(&logs.server1);
        let s2 = ServerSummary::of(&logs.server2);
        let none = CategoryCounts::new();

        let cards = match filter {
            ServerFilter::Server1 => vec![
                Card::new("📊 Logs Servidor 1 - Niveles", CardBody::Bar(bar_chart(&s1.levels, &none))),
                Card::new("🔁 Métodos HTTP", CardBody::Bar(bar_chart(&s1.methods, &none))),
                Card::new("📦 Status Codes", CardBody::Bar(bar_chart(&s1.statuses, &none))),
                Card::new("🧠 Distribución de Niveles", CardBody::Pie(pie_chart(&s1.levels))),
                Card::new(
                    "⏱️ Tiempo Promedio de Respuesta",
                    CardBody::Stats { lines: vec![StatLine::new(None, s1.average_ms, "ms")] },
                ),
            ],
            ServerFilter::Server2 => vec![
                Card::new("📊 Logs Servidor 2 - Niveles", CardBody::Bar(bar_chart(&none, &s2.levels))),
                Card::new("🔁 Métodos HTTP", CardBody::Bar(bar_chart(&none, &s2.methods))),
                Card::new("📦 Status Codes", CardBody::Bar(bar_chart(&none, &s2.statuses))),
                Card::new("🧠 Distribución de Niveles", CardBody::Pie(pie_chart(&s2.levels))),
                Card::new(
                    "⏱️ Tiempo Promedio de Respuesta",
                    CardBody::Stats { lines: vec![StatLine::new(None, s2.average_ms, "ms")] },
                ),
            ],
            ServerFilter::All => vec![
                Card::new(
                    "📊 Comparativa de Logs por Nivel",
                    CardBody::Bar(bar_chart(&s1.levels, &s2.levels)),
                ),
                Card::new("🔁 Métodos HTTP", CardBody::Bar(bar_chart(&s1.methods, &s2.methods))),
                Card::new("📦 Status Codes", CardBody::Bar(bar_chart(&s1.statuses, &s2.statuses))),
                Card::new("🧠 Distribución de Niveles (Servidor 1)", CardBody::Pie(pie_chart(&s1.levels))),
                Card::new("🧠 Distribución de Niveles (Servidor 2)", CardBody::Pie(pie_chart(&s2.levels))),
                Card::new(
                    "🚀 Máx. peticiones en 10 min (S1 y S2)",
                    CardBody::Stats {
                        lines: vec![
                            StatLine::new(Some("Servidor 1"), s1.peak as u64, "peticiones"),
                            StatLine::new(Some("Servidor 2"), s2.peak as u64, "peticiones"),
                        ],
                    },
                ),
                Card::new(
                    "⏱️ Tiempo Promedio de Respuesta",
                    CardBody::Stats {
                        lines: vec![
                            StatLine::new(Some("Servidor 1"), s1.average_ms, "ms"),
                            StatLine::new(Some("Servidor 2"), s2.average_ms, "ms"),
                        ],
                    },
                ),
                Card::new(
                    "📈 Peticiones cada 10 min",
                    CardBody::Line(line_chart(
                        &logs.server1,
                        &logs.server2,
                        Duration::minutes(PEAK_WINDOW_MINUTES),
                    )),
                ),
            ],
        };

        Self { filter, cards }
    }

    pub fn card(&self, title: &str) -> Option<&Card> {
        self.cards.iter().find(|c| c.title == title)
    }
}
