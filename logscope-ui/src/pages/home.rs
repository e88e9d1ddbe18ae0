//! Home Page
//!
//! Landing page after login: session identity, backend 1 server info,
//! logout and a link to the logs dashboard.

use leptos::*;
use leptos_router::*;
use logscope::api::ServerInfo;

use crate::api;
use crate::components::Loading;
use crate::state::global::GlobalState;

/// Home page component
#[component]
pub fn Home() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");
    let info = create_rw_signal(None::<ServerInfo>);
    let navigate = use_navigate();

    create_effect(move |_| {
        spawn_local(async move {
            match api::server_info().await {
                Ok(result) => info.set(Some(result)),
                Err(e) => {
                    web_sys::console::error_1(&format!("Failed to fetch server info: {}", e).into());
                    info.set(Some(ServerInfo::default()));
                }
            }
        });
    });

    let on_logout = move |_| {
        let route = state.sign_out();
        state.show_success("Sesión cerrada");
        navigate(route.path(), Default::default());
    };

    view! {
        <div class="space-y-8">
            <div class="flex items-center justify-between">
                <div>
                    <h1 class="text-3xl font-bold">"🏠 Inicio"</h1>
                    <p class="text-gray-400 mt-1">
                        {move || {
                            let claims = state.claims().unwrap_or_default();
                            let email = claims.email.unwrap_or_default();
                            if claims.is_expired(chrono::Utc::now()) {
                                format!("{} (sesión expirada)", email)
                            } else {
                                email
                            }
                        }}
                    </p>
                </div>

                <button
                    on:click=on_logout
                    class="px-4 py-2 bg-red-600 hover:bg-red-700 rounded-lg font-medium transition-colors"
                >
                    "Cerrar sesión"
                </button>
            </div>

            {move || match info.get() {
                None => view! { <Loading message="Cargando información..." /> }.into_view(),
                Some(info) => match info.details() {
                    Some((version, mensaje)) => view! {
                        <section class="bg-gray-800 rounded-xl p-6">
                            <h2 class="text-xl font-semibold mb-4">"Servidor"</h2>
                            <dl class="grid grid-cols-2 gap-2 text-sm">
                                <dt class="text-gray-400">"Versión de Node"</dt>
                                <dd>{version.to_string()}</dd>
                                <dt class="text-gray-400">"Mensaje"</dt>
                                <dd>{mensaje.to_string()}</dd>
                            </dl>
                        </section>
                    }
                    .into_view(),
                    None => ().into_view(),
                },
            }}

            <A
                href="/logs"
                class="inline-block px-6 py-3 bg-primary-600 hover:bg-primary-700 rounded-lg font-medium transition-colors"
            >
                "📊 Ver logs"
            </A>
        </div>
    }
}
