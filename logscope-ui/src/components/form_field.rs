//! Form Components
//!
//! Inputs and inline feedback bound to a shared `FormState` signal.

use leptos::*;
use logscope::forms::{Field, FormAction, FormState};

/// Text input for one form field
#[component]
pub fn FormField(field: Field, form: RwSignal<FormState>) -> impl IntoView {
    view! {
        <input
            type=field.input_type()
            name=field.name()
            placeholder=field.placeholder()
            prop:value=move || form.with(|f| f.value(field).to_string())
            on:input=move |ev| {
                form.update(|f| f.apply(FormAction::Edit(field, event_target_value(&ev))))
            }
            class="w-full bg-gray-700 rounded-lg px-4 py-3
                   border border-gray-600 focus:border-primary-500 focus:outline-none"
        />
    }
}

/// Inline error or success message under a form
#[component]
pub fn FormFeedback(form: RwSignal<FormState>) -> impl IntoView {
    view! {
        {move || form.with(|f| f.error.clone()).map(|error| view! {
            <p class="text-red-400 text-sm">{error}</p>
        })}
        {move || form.with(|f| f.message.clone()).map(|message| view! {
            <p class="text-green-400 text-sm">{message}</p>
        })}
    }
}

/// Submit button, disabled while a request is in flight
#[component]
pub fn SubmitButton(form: RwSignal<FormState>, label: &'static str) -> impl IntoView {
    let submitting = move || form.with(|f| f.submitting);

    view! {
        <button
            type="submit"
            disabled=submitting
            class="w-full px-4 py-3 bg-primary-600 hover:bg-primary-700 disabled:bg-gray-700
                   rounded-lg font-medium transition-colors"
        >
            {move || if submitting() { "Enviando..." } else { label }}
        </button>
    }
}
