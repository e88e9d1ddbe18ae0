//! Registration Page
//!
//! Creates an account. When the backend returns an MFA enrollment value the
//! form gives way to its QR code, raw text and a link back to login.

use leptos::*;
use leptos_router::*;
use logscope::api::REGISTER_FALLBACK;
use logscope::auth::{self, Enrollment};
use logscope::forms::{Field, FormAction, FormKind, FormState};
use logscope::guard::Route as AppRoute;
use logscope::mfa::EnrollmentCode;

use crate::api;
use crate::components::{FormFeedback, FormField, SubmitButton};

/// Registration page component
#[component]
pub fn Register() -> impl IntoView {
    let form = create_rw_signal(FormState::new(FormKind::Register));
    let enrollment = create_rw_signal(None::<Enrollment>);
    let navigate = use_navigate();

    let on_submit = move |ev: ev::SubmitEvent| {
        ev.prevent_default();

        let request = match form.with_untracked(auth::register_request) {
            Ok(request) => request,
            Err(e) => {
                form.update(|f| f.apply(FormAction::Fail(e.message)));
                return;
            }
        };
        form.update(|f| f.apply(FormAction::Submit));
        enrollment.set(None);

        spawn_local(async move {
            match api::register(&request).await {
                Ok(response) => {
                    let result = auth::complete_registration(response);
                    form.update(|f| f.apply(FormAction::Succeed(result.message.clone())));
                    enrollment.set(Some(result));
                }
                Err(e) => {
                    web_sys::console::error_1(&format!("Registration failed: {}", e).into());
                    form.update(|f| f.apply(FormAction::Fail(e.user_message(REGISTER_FALLBACK))));
                }
            }
        });
    };

    view! {
        <div class="max-w-md mx-auto space-y-6">
            <div>
                <h1 class="text-3xl font-bold">"📝 Registro"</h1>
                <p class="text-gray-400 mt-1">"Crea tu cuenta y configura MFA"</p>
            </div>

            {move || match enrollment.get().and_then(|e| e.provisioning) {
                Some(value) => {
                    let navigate = navigate.clone();
                    view! {
                        <MfaSetup value=value />
                        <button
                            on:click=move |_| navigate(AppRoute::Login.path(), Default::default())
                            class="w-full px-4 py-2 bg-primary-600 hover:bg-primary-700 rounded-lg font-medium transition-colors"
                        >
                            "Ir al Login"
                        </button>
                    }
                    .into_view()
                }
                None => view! {
                    <form on:submit=on_submit class="bg-gray-800 rounded-xl p-6 space-y-4">
                        <FormField field=Field::Email form=form />
                        <FormField field=Field::Username form=form />
                        <FormField field=Field::Password form=form />
                        <FormField field=Field::ConfirmPassword form=form />
                        <FormFeedback form=form />
                        <SubmitButton form=form label="Registrarse" />
                    </form>
                }
                .into_view(),
            }}

            <p class="text-sm text-gray-400">
                "¿Ya tienes cuenta? "
                <A href="/login" class="text-primary-400 hover:underline">"Inicia sesión"</A>
            </p>
        </div>
    }
}

/// QR code and raw provisioning value
#[component]
fn MfaSetup(value: String) -> impl IntoView {
    let qr = match EnrollmentCode::new(&value) {
        Ok(code) => view! { <div class="bg-white p-2 rounded-lg inline-block" inner_html=code.to_svg() /> }
            .into_view(),
        Err(e) => {
            web_sys::console::error_1(&format!("Cannot render MFA code: {}", e).into());
            ().into_view()
        }
    };

    view! {
        <section class="bg-gray-800 rounded-xl p-6 space-y-4 text-center">
            <h2 class="text-lg font-semibold">"Escanea este código con tu app de autenticación"</h2>
            {qr}
            <p class="text-xs text-gray-400 break-all font-mono">{value}</p>
        </section>
    }
}
