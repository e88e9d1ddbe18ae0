//! Loading Component

use leptos::*;

/// Full-width loading spinner with a caption
#[component]
pub fn Loading(#[prop(default = "Cargando...")] message: &'static str) -> impl IntoView {
    view! {
        <div class="flex flex-col items-center justify-center py-12 space-y-4">
            <div class="loading-spinner w-8 h-8" />
            <p class="text-gray-400">{message}</p>
        </div>
    }
}

/// Skeleton loader for chart cards
#[component]
pub fn CardSkeleton() -> impl IntoView {
    view! {
        <div class="bg-gray-800 rounded-xl p-6 animate-pulse">
            <div class="h-6 bg-gray-700 rounded w-1/3 mb-4" />
            <div class="h-64 bg-gray-700 rounded" />
        </div>
    }
}
