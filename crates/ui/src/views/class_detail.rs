use dioxus::prelude::*;
use dioxus_router::Link;

use rollcall_core::model::{ClassId, StudentId};
use services::{AuthService, ClassService};

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::{ViewError, ViewState, use_login_redirect, view_state_from_resource};
use crate::vm::{StudentRowVm, class_facts, map_student_rows};

#[derive(Clone, Debug, PartialEq)]
struct DetailData {
    name: String,
    facts: Vec<(&'static str, String)>,
    students: Vec<StudentRowVm>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum MembershipState {
    Idle,
    Saving,
    Error(ViewError),
}

/// Signed-in check first, so a lapsed session reaches the login redirect.
async fn load_detail(
    auth: &AuthService,
    classes: &ClassService,
    class_id: &ClassId,
) -> Result<DetailData, ViewError> {
    auth.current_staff().await.map_err(ViewError::from)?;
    let detail = classes
        .class_detail(class_id)
        .await
        .map_err(ViewError::from)?;
    Ok(DetailData {
        name: detail.class.display_name(),
        facts: class_facts(&detail.class),
        students: map_student_rows(&detail.students),
    })
}

#[component]
pub fn ClassDetailView(class_id: String) -> Element {
    let ctx = use_context::<AppContext>();
    let auth = ctx.auth();
    let classes = ctx.classes();
    let classes_for_available = ctx.classes();
    let class_key = ClassId::new(class_id);
    let class_key_for_available = class_key.clone();
    let class_key_for_actions = class_key.clone();
    let mut show_picker = use_signal(|| false);
    let mut picker_query = use_signal(String::new);
    let mut membership = use_signal(|| MembershipState::Idle);

    let mut detail = use_resource(move || {
        let auth = auth.clone();
        let classes = classes.clone();
        let class_id = class_key.clone();
        async move { load_detail(&auth, &classes, &class_id).await }
    });

    let mut available = use_resource(move || {
        let classes = classes_for_available.clone();
        let class_id = class_key_for_available.clone();
        let open = show_picker();
        async move {
            if !open {
                return Ok::<_, ViewError>(Vec::new());
            }
            classes
                .available_students(&class_id)
                .await
                .map_err(ViewError::from)
        }
    });

    use_login_redirect(detail);
    let detail_state = view_state_from_resource(&detail);
    let available_state = view_state_from_resource(&available);

    let class_service = ctx.classes();
    let change_membership = use_callback(move |(student_id, add): (StudentId, bool)| {
        let classes = class_service.clone();
        let class_id = class_key_for_actions.clone();
        membership.set(MembershipState::Saving);
        spawn(async move {
            let result = if add {
                classes.add_student(&class_id, &student_id).await
            } else {
                classes.remove_student(&class_id, &student_id).await
            };
            match result {
                Ok(()) => {
                    membership.set(MembershipState::Idle);
                    detail.restart();
                    available.restart();
                }
                Err(err) => membership.set(MembershipState::Error(ViewError::from(err))),
            }
        });
    });

    rsx! {
        div { class: "page class-detail",
            Link { class: "back", to: Route::Classes {}, "← Classes" }

            match detail_state {
                ViewState::Idle => rsx! {
                    p { "Idle" }
                },
                ViewState::Loading => rsx! {
                    p { "Loading..." }
                },
                ViewState::Ready(data) => rsx! {
                    h2 { "{data.name}" }
                    dl { class: "class-facts",
                        for (label, value) in data.facts {
                            dt { "{label}" }
                            dd { "{value}" }
                        }
                    }

                    header { class: "section-header",
                        h3 { "Students ({data.students.len()})" }
                        button {
                            r#type: "button",
                            onclick: move |_| show_picker.set(!show_picker()),
                            if show_picker() { "Done" } else { "Add Students" }
                        }
                    }
                    if let MembershipState::Error(err) = membership() {
                        p { class: "form-error", "{err.message()}" }
                    }

                    if data.students.is_empty() {
                        p { class: "empty", "No students enrolled yet." }
                    } else {
                        ul { class: "student-list",
                            for student in data.students {
                                StudentRow {
                                    key: "{student.id}",
                                    student: student.clone(),
                                    action_label: "Remove",
                                    busy: membership() == MembershipState::Saving,
                                    on_action: move |id| change_membership.call((id, false)),
                                }
                            }
                        }
                    }
                },
                ViewState::Error(err) => rsx! {
                    p { "{err.message()}" }
                },
            }

            if show_picker() {
                section { class: "student-picker",
                    input {
                        class: "search",
                        r#type: "search",
                        placeholder: "Search by name, email or roll number",
                        value: "{picker_query}",
                        oninput: move |evt| picker_query.set(evt.value()),
                    }
                    match available_state {
                        ViewState::Ready(students) => {
                            let rows = map_student_rows(&ClassService::filter_students(
                                &students,
                                &picker_query(),
                            ));
                            rsx! {
                                if rows.is_empty() {
                                    p { class: "empty", "No students available." }
                                }
                                ul { class: "student-list",
                                    for student in rows {
                                        StudentRow {
                                            key: "{student.id}",
                                            student: student.clone(),
                                            action_label: "Add",
                                            busy: membership() == MembershipState::Saving,
                                            on_action: move |id| change_membership.call((id, true)),
                                        }
                                    }
                                }
                            }
                        }
                        ViewState::Error(err) => rsx! {
                            p { "{err.message()}" }
                        },
                        _ => rsx! {
                            p { "Loading..." }
                        },
                    }
                }
            }
        }
    }
}

#[component]
fn StudentRow(
    student: StudentRowVm,
    action_label: &'static str,
    busy: bool,
    on_action: EventHandler<StudentId>,
) -> Element {
    let id = student.id.clone();
    rsx! {
        li { class: "student-row",
            div { class: "student-row__text",
                span { class: "student-row__name", "{student.name}" }
                if !student.detail.is_empty() {
                    span { class: "student-row__detail", "{student.detail}" }
                }
            }
            button {
                r#type: "button",
                disabled: busy,
                onclick: move |_| on_action.call(id.clone()),
                "{action_label}"
            }
        }
    }
}
