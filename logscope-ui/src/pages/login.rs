//! Login Page
//!
//! Email, password and MFA code. On success the token is stored and the
//! page moves to home after a short pause.

use leptos::*;
use leptos_router::*;
use logscope::api::LOGIN_FALLBACK;
use logscope::auth;
use logscope::forms::{Field, FormAction, FormKind, FormState};

use crate::api;
use crate::components::{FormFeedback, FormField, SubmitButton};
use crate::state::global::GlobalState;

/// Login page component
#[component]
pub fn Login() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");
    let form = create_rw_signal(FormState::new(FormKind::Login));
    let navigate = use_navigate();

    let on_submit = move |ev: ev::SubmitEvent| {
        ev.prevent_default();

        let request = match form.with_untracked(auth::login_request) {
            Ok(request) => request,
            Err(e) => {
                form.update(|f| f.apply(FormAction::Fail(e.message)));
                return;
            }
        };
        form.update(|f| f.apply(FormAction::Submit));

        let navigate = navigate.clone();
        spawn_local(async move {
            let response = match api::login(&request).await {
                Ok(response) => response,
                Err(e) => {
                    web_sys::console::error_1(&format!("Login failed: {}", e).into());
                    form.update(|f| f.apply(FormAction::Fail(e.user_message(LOGIN_FALLBACK))));
                    return;
                }
            };

            match state.sign_in(&response) {
                Ok(outcome) => {
                    form.update(|f| f.apply(FormAction::Succeed(outcome.message.clone())));
                    let path = outcome.redirect_to.path();
                    gloo_timers::callback::Timeout::new(outcome.delay.as_millis() as u32, move || {
                        navigate(path, Default::default());
                    })
                    .forget();
                }
                Err(e) => {
                    form.update(|f| f.apply(FormAction::Fail(e.to_string())));
                }
            }
        });
    };

    view! {
        <div class="max-w-md mx-auto space-y-6">
            <div>
                <h1 class="text-3xl font-bold">"🔐 Iniciar sesión"</h1>
                <p class="text-gray-400 mt-1">"Introduce tus credenciales y el código MFA"</p>
            </div>

            <form on:submit=on_submit class="bg-gray-800 rounded-xl p-6 space-y-4">
                <FormField field=Field::Email form=form />
                <FormField field=Field::Password form=form />
                <FormField field=Field::MfaCode form=form />
                <FormFeedback form=form />
                <SubmitButton form=form label="Entrar" />
            </form>

            <p class="text-sm text-gray-400">
                "¿No tienes cuenta? "
                <A href="/register" class="text-primary-400 hover:underline">"Regístrate"</A>
            </p>
        </div>
    }
}
