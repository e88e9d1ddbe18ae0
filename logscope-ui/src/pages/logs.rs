//! Logs Page
//!
//! Fetches both servers' request logs once, then renders the dashboard cards
//! for the selected server. Switching servers never refetches.

use leptos::*;
use leptos_router::*;
use logscope::dashboard::{Dashboard, DashboardPhase, ServerFilter};

use crate::api;
use crate::components::{CardSkeleton, DashboardCard, Loading};

/// Logs dashboard page component
#[component]
pub fn Logs() -> impl IntoView {
    let dashboard = create_rw_signal(Dashboard::new());

    // Fetch both log arrays on mount
    create_effect(move |_| {
        let mut started = false;
        dashboard.update(|d| started = d.begin_loading());
        if !started {
            return;
        }

        spawn_local(async move {
            let logs = api::fetch_dashboard_logs().await;
            dashboard.update(|d| d.finish_loading(logs));
        });
    });

    let on_select = move |ev: ev::Event| {
        match event_target_value(&ev).parse::<ServerFilter>() {
            Ok(filter) => dashboard.update(|d| d.select(filter)),
            Err(e) => web_sys::console::error_1(&e.into()),
        }
    };

    view! {
        <div class="space-y-8">
            <div class="flex items-center justify-between">
                <div>
                    <h1 class="text-3xl font-bold">"📊 Dashboard de Logs"</h1>
                    <A href="/home" class="text-sm text-primary-400 hover:underline">"← Inicio"</A>
                </div>

                <select
                    on:change=on_select
                    prop:value=move || dashboard.with(|d| d.filter().as_str())
                    class="bg-gray-700 rounded-lg px-4 py-2 border border-gray-600"
                >
                    {ServerFilter::ALL.into_iter().map(|filter| view! {
                        <option value=filter.as_str()>{filter.label()}</option>
                    }).collect_view()}
                </select>
            </div>

            {move || match dashboard.with(|d| d.phase()) {
                DashboardPhase::Ready => view! {
                    <div class="grid md:grid-cols-2 gap-8">
                        {dashboard.with(|d| d.view()).cards.into_iter().map(|card| view! {
                            <DashboardCard card=card />
                        }).collect_view()}
                    </div>
                }
                .into_view(),
                _ => view! {
                    <Loading message="Cargando logs..." />
                    <div class="grid md:grid-cols-2 gap-8">
                        <CardSkeleton />
                        <CardSkeleton />
                    </div>
                }
                .into_view(),
            }}
        </div>
    }
}
