//! App Root Component
//!
//! Main application component with routing, the session guard and global
//! providers.

use leptos::*;
use leptos_router::*;
use logscope::guard::{resolve, Access, Route as AppRoute};

use crate::components::Toast;
use crate::pages::{Home, Login, Logs, Register};
use crate::state::global::{provide_global_state, GlobalState};
use crate::state::session::LocalStorageSession;

/// Root application component
#[component]
pub fn App() -> impl IntoView {
    // Provide global state to all components
    provide_global_state();

    view! {
        <Router>
            <div class="min-h-screen bg-gray-900 text-white flex flex-col">
                <Header />

                <main class="flex-1 container mx-auto px-4 py-8">
                    <Routes>
                        <Route path="/login" view=Login />
                        <Route path="/register" view=Register />
                        <Route
                            path="/home"
                            view=|| view! { <Protected route=AppRoute::Home><Home /></Protected> }
                        />
                        <Route
                            path="/logs"
                            view=|| view! { <Protected route=AppRoute::Logs><Logs /></Protected> }
                        />
                        <Route path="/*any" view=|| view! { <Redirect path=AppRoute::Login.path() /> } />
                    </Routes>
                </main>

                // Toast notifications
                <Toast />
            </div>
        </Router>
    }
}

/// Renders `children` only with a stored session, otherwise redirects
#[component]
fn Protected(route: AppRoute, children: ChildrenFn) -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");

    move || {
        // Re-evaluate on login and logout
        let _ = state.authenticated.get();

        match resolve(route, &LocalStorageSession) {
            Access::Render(_) => children().into_view(),
            Access::Redirect(to) => view! { <Redirect path=to.path() /> }.into_view(),
        }
    }
}

/// Brand header
#[component]
fn Header() -> impl IntoView {
    view! {
        <nav class="bg-gray-800 border-b border-gray-700">
            <div class="container mx-auto px-4 flex items-center h-16 space-x-3">
                <span class="text-2xl">"📊"</span>
                <span class="text-xl font-bold text-white">"Logscope"</span>
            </div>
        </nav>
    }
}
