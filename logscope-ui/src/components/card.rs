//! Dashboard Card Component

use leptos::*;
use logscope::dashboard::{Card, CardBody};

use super::chart::{BarChartCanvas, LineChartCanvas, PieChartCanvas};

/// One titled card of the logs dashboard
#[component]
pub fn DashboardCard(card: Card) -> impl IntoView {
    let body = match card.body {
        CardBody::Bar(chart) => view! { <BarChartCanvas chart=chart /> }.into_view(),
        CardBody::Pie(chart) => view! { <PieChartCanvas chart=chart /> }.into_view(),
        CardBody::Line(chart) => view! { <LineChartCanvas chart=chart /> }.into_view(),
        CardBody::Stats { lines } => view! {
            <div class="space-y-2 py-4">
                {lines.into_iter().map(|line| view! {
                    <p class="text-2xl font-semibold">{line.to_string()}</p>
                }).collect_view()}
            </div>
        }
        .into_view(),
    };

    view! {
        <section class="bg-gray-800 rounded-xl p-6">
            <h2 class="text-lg font-semibold mb-4">{card.title}</h2>
            {body}
        </section>
    }
}
