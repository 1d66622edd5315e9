use dioxus::prelude::*;
use dioxus_router::use_navigator;

use rollcall_core::model::{LoginDraft, LoginValidation};
use services::AuthError;

use crate::context::AppContext;
use crate::routes::Route;

#[derive(Clone, Debug, PartialEq)]
enum SubmitState {
    Idle,
    Submitting,
    Failed(String),
}

#[component]
pub fn LoginView() -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();
    let mut email = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut field_errors = use_signal(LoginValidation::default);
    let mut submit_state = use_signal(|| SubmitState::Idle);

    // Skip the form when a session is already active.
    let auth_for_check = ctx.auth();
    use_effect(move || {
        let auth = auth_for_check.clone();
        spawn(async move {
            if let Ok(Some(_)) = auth.current_session().await {
                navigator.replace(Route::Dashboard {});
            }
        });
    });

    let auth = ctx.auth();
    let on_submit = move |evt: FormEvent| {
        evt.prevent_default();
        if submit_state() == SubmitState::Submitting {
            return;
        }
        let auth = auth.clone();
        let draft = LoginDraft::new(email(), password());
        submit_state.set(SubmitState::Submitting);
        spawn(async move {
            match auth.sign_in(draft).await {
                Ok(_) => {
                    field_errors.set(LoginValidation::default());
                    submit_state.set(SubmitState::Idle);
                    navigator.replace(Route::Dashboard {});
                }
                Err(AuthError::Validation(errors)) => {
                    field_errors.set(errors);
                    submit_state.set(SubmitState::Idle);
                }
                Err(err) => {
                    field_errors.set(LoginValidation::default());
                    submit_state.set(SubmitState::Failed(err.to_string()));
                }
            }
        });
    };

    let errors = field_errors();
    let submitting = submit_state() == SubmitState::Submitting;

    rsx! {
        div { class: "login-page",
            form { class: "login-card", onsubmit: on_submit,
                h2 { "Staff Login" }
                p { class: "login-sub", "Sign in to take attendance" }

                label { r#for: "email", "Email" }
                input {
                    id: "email",
                    r#type: "email",
                    placeholder: "you@college.edu",
                    value: "{email}",
                    oninput: move |evt| email.set(evt.value()),
                }
                if let Some(err) = errors.email {
                    p { class: "field-error", "{err}" }
                }

                label { r#for: "password", "Password" }
                input {
                    id: "password",
                    r#type: "password",
                    value: "{password}",
                    oninput: move |evt| password.set(evt.value()),
                }
                if let Some(err) = errors.password {
                    p { class: "field-error", "{err}" }
                }

                if let SubmitState::Failed(message) = submit_state() {
                    p { class: "form-error", "{message}" }
                }

                button {
                    class: "primary",
                    r#type: "submit",
                    disabled: submitting,
                    if submitting { "Signing in..." } else { "Sign In" }
                }
            }
        }
    }
}
