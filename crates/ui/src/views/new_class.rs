use dioxus::prelude::*;
use dioxus_router::{Link, use_navigator};

use rollcall_core::model::{NewClassDraft, Program, ProgramId};
use services::ClassServiceError;

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::{ViewError, ViewState, view_state_from_resource};

#[derive(Clone, Debug, PartialEq)]
enum SaveState {
    Idle,
    Saving,
    Invalid(String),
    Failed(ViewError),
}

#[component]
pub fn NewClassView() -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();
    let classes = ctx.classes();
    let mut draft = use_signal(NewClassDraft::default);
    let mut save_state = use_signal(|| SaveState::Idle);

    let programs = use_resource(move || {
        let classes = classes.clone();
        async move { classes.list_programs().await.map_err(ViewError::from) }
    });
    let programs_state = view_state_from_resource(&programs);

    let auth = ctx.auth();
    let class_service = ctx.classes();
    let on_submit = move |evt: FormEvent| {
        evt.prevent_default();
        if save_state() == SaveState::Saving {
            return;
        }
        let auth = auth.clone();
        let classes = class_service.clone();
        let form = draft();
        save_state.set(SaveState::Saving);
        spawn(async move {
            let staff = match auth.current_staff().await {
                Ok(staff) => staff,
                Err(err) => {
                    let err = ViewError::from(err);
                    if err == ViewError::NotSignedIn {
                        navigator.replace(Route::Login {});
                    }
                    save_state.set(SaveState::Failed(err));
                    return;
                }
            };
            match classes.create_class(&staff, form).await {
                Ok(class) => {
                    save_state.set(SaveState::Idle);
                    navigator.replace(Route::ClassDetail {
                        class_id: class.id.to_string(),
                    });
                }
                Err(ClassServiceError::Class(invalid)) => {
                    save_state.set(SaveState::Invalid(invalid.to_string()));
                }
                Err(err) => save_state.set(SaveState::Failed(ViewError::from(err))),
            }
        });
    };

    let saving = save_state() == SaveState::Saving;

    rsx! {
        div { class: "page new-class",
            Link { class: "back", to: Route::Classes {}, "← Classes" }
            h2 { "New Class" }

            form { class: "class-form", onsubmit: on_submit,
                label { r#for: "program", "Program" }
                match programs_state {
                    ViewState::Ready(list) => rsx! {
                        ProgramSelect {
                            programs: list,
                            selected: draft.read().program_id.clone(),
                            on_change: move |id| draft.write().program_id = id,
                        }
                    },
                    ViewState::Error(err) => rsx! {
                        p { class: "form-error", "{err.message()}" }
                    },
                    _ => rsx! {
                        p { "Loading programs..." }
                    },
                }

                label { r#for: "year", "Year" }
                input {
                    id: "year",
                    r#type: "number",
                    min: "1",
                    value: "{draft.read().year}",
                    oninput: move |evt| draft.write().year = evt.value(),
                }

                label { r#for: "section", "Section" }
                input {
                    id: "section",
                    placeholder: "A",
                    value: "{draft.read().section}",
                    oninput: move |evt| draft.write().section = evt.value(),
                }

                label { r#for: "academic-year", "Academic Year" }
                input {
                    id: "academic-year",
                    placeholder: "2023-24",
                    value: "{draft.read().academic_year}",
                    oninput: move |evt| draft.write().academic_year = evt.value(),
                }

                label { r#for: "subject", "Subject" }
                input {
                    id: "subject",
                    value: "{draft.read().subject}",
                    oninput: move |evt| draft.write().subject = evt.value(),
                }

                label { r#for: "room", "Room (optional)" }
                input {
                    id: "room",
                    value: "{draft.read().room_number}",
                    oninput: move |evt| draft.write().room_number = evt.value(),
                }

                label { r#for: "capacity", "Capacity (optional)" }
                input {
                    id: "capacity",
                    r#type: "number",
                    min: "1",
                    value: "{draft.read().capacity}",
                    oninput: move |evt| draft.write().capacity = evt.value(),
                }

                match save_state() {
                    SaveState::Invalid(message) => rsx! {
                        p { class: "form-error", "{message}" }
                    },
                    SaveState::Failed(err) => rsx! {
                        p { class: "form-error", "{err.message()}" }
                    },
                    _ => rsx! {},
                }

                button {
                    class: "primary",
                    r#type: "submit",
                    disabled: saving,
                    if saving { "Creating..." } else { "Create Class" }
                }
            }
        }
    }
}

#[component]
fn ProgramSelect(
    programs: Vec<Program>,
    selected: Option<ProgramId>,
    on_change: EventHandler<Option<ProgramId>>,
) -> Element {
    let current = selected.map(|id| id.to_string()).unwrap_or_default();
    rsx! {
        select {
            id: "program",
            value: "{current}",
            onchange: move |evt| {
                let value = evt.value();
                on_change.call((!value.is_empty()).then(|| ProgramId::new(value)));
            },
            option { value: "", "Select a program" }
            for program in programs {
                option {
                    key: "{program.id}",
                    value: "{program.id}",
                    selected: program.id.to_string() == current,
                    "{program.name}"
                }
            }
        }
    }
}
