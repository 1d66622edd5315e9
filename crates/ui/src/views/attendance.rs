use dioxus::prelude::*;

use rollcall_core::model::{AttendanceRoster, ClassAssignment, StudentId};

use crate::context::AppContext;
use crate::views::{ViewError, ViewState, use_login_redirect, view_state_from_resource};
use crate::vm::{
    RosterRowVm, date_input_value, map_class_options, map_roster_header, map_roster_rows,
    parse_date_input,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum SubmitState {
    Idle,
    Submitting,
    Submitted(usize),
    Failed(ViewError),
}

impl SubmitState {
    /// A sheet in flight or already saved cannot be submitted again unchanged.
    fn locks_submit(self) -> bool {
        matches!(self, SubmitState::Submitting | SubmitState::Submitted(_))
    }
}

/// `initial_class` preselects an entry of the staff member's class list.
#[component]
pub fn AttendanceView(#[props(default)] initial_class: Option<usize>) -> Element {
    let ctx = use_context::<AppContext>();
    let auth = ctx.auth();
    let attendance = ctx.attendance();
    let today = ctx.clock().today();
    let mut selected = use_signal(|| initial_class);
    let mut date = use_signal(|| today);
    let mut roster = use_signal(AttendanceRoster::new);
    let mut submit_state = use_signal(|| SubmitState::Idle);

    let assignments = use_resource(move || {
        let auth = auth.clone();
        let attendance = attendance.clone();
        async move {
            let staff = auth.current_staff().await.map_err(ViewError::from)?;
            attendance
                .teaching_classes(&staff)
                .await
                .map_err(ViewError::from)
        }
    });
    use_login_redirect(assignments);
    let assignments_state = view_state_from_resource(&assignments);

    let roster_service = ctx.attendance();
    let roster_load = use_resource(move || {
        let attendance = roster_service.clone();
        let index = selected();
        // A new date starts a fresh sheet.
        let _date = date();
        let assignment = index.and_then(|index| selected_assignment(&assignments, index));
        async move {
            let mut fresh = AttendanceRoster::new();
            let Some(assignment) = assignment else {
                roster.set(fresh);
                return Ok::<_, ViewError>(0);
            };
            let count = attendance
                .load_roster(&assignment.class.id, &mut fresh)
                .await
                .map_err(ViewError::from)?;
            roster.set(fresh);
            submit_state.set(SubmitState::Idle);
            Ok(count)
        }
    });
    let roster_state = view_state_from_resource(&roster_load);

    let submit_service = ctx.attendance();
    let on_submit = move |_| {
        if submit_state().locks_submit() {
            return;
        }
        let assignment = selected().and_then(|index| selected_assignment(&assignments, index));
        let Some(assignment) = assignment else {
            return;
        };
        let attendance = submit_service.clone();
        let sheet = roster();
        let day = date();
        submit_state.set(SubmitState::Submitting);
        spawn(async move {
            let result = attendance
                .submit(&assignment.class.id, &assignment.subject, day, &sheet)
                .await;
            match result {
                Ok(written) => submit_state.set(SubmitState::Submitted(written)),
                Err(err) => submit_state.set(SubmitState::Failed(ViewError::from(err))),
            }
        });
    };

    // Any edit after a save opens the sheet for another submit.
    let mut reopen = move || {
        if matches!(submit_state(), SubmitState::Submitted(_)) {
            submit_state.set(SubmitState::Idle);
        }
    };
    let toggle = move |student_id: StudentId| {
        roster.write().toggle(&student_id);
        reopen();
    };

    let header = map_roster_header(&roster.read());
    let rows = map_roster_rows(&roster.read());
    let date_value = date_input_value(date());
    let has_class = selected().is_some();
    let submitting = submit_state() == SubmitState::Submitting;
    let locked = submit_state().locks_submit();

    rsx! {
        div { class: "page attendance",
            h2 { "Take Attendance" }

            section { class: "attendance-controls",
                match assignments_state {
                    ViewState::Ready(list) => rsx! {
                        ClassPicker {
                            assignments: list,
                            selected: selected(),
                            on_change: move |index| selected.set(index),
                        }
                    },
                    ViewState::Error(err) => rsx! {
                        p { class: "form-error", "{err.message()}" }
                    },
                    _ => rsx! {
                        p { "Loading..." }
                    },
                }
                input {
                    r#type: "date",
                    value: "{date_value}",
                    onchange: move |evt| {
                        if let Some(day) = parse_date_input(&evt.value()) {
                            date.set(day);
                        }
                    },
                }
            }

            if has_class {
                match roster_state {
                    ViewState::Ready(_) => rsx! {
                        header { class: "roster-header",
                            span { class: "roster-header__present", "Present: {header.present}" }
                            span { class: "roster-header__absent", "Absent: {header.absent}" }
                            span { class: "roster-header__pct", "{header.percentage}%" }
                        }
                        div { class: "roster-actions",
                            button {
                                r#type: "button",
                                onclick: move |_| {
                                    roster.write().mark_all(true);
                                    reopen();
                                },
                                "Mark All Present"
                            }
                            button {
                                r#type: "button",
                                onclick: move |_| {
                                    roster.write().mark_all(false);
                                    reopen();
                                },
                                "Mark All Absent"
                            }
                        }
                        if rows.is_empty() {
                            p { class: "empty", "No students enrolled in this class." }
                        } else {
                            ul { class: "roster",
                                for row in rows {
                                    RosterRow {
                                        key: "{row.id}",
                                        row: row.clone(),
                                        on_toggle: toggle,
                                    }
                                }
                            }
                        }
                        SubmitFeedback { state: submit_state() }
                        button {
                            class: "primary",
                            r#type: "button",
                            disabled: locked,
                            onclick: on_submit,
                            if submitting { "Submitting..." } else { "Submit Attendance" }
                        }
                    },
                    ViewState::Error(err) => rsx! {
                        p { "{err.message()}" }
                    },
                    _ => rsx! {
                        p { "Loading..." }
                    },
                }
            } else {
                p { class: "empty", "Select a class to load its students." }
            }
        }
    }
}

fn selected_assignment(
    assignments: &Resource<Result<Vec<ClassAssignment>, ViewError>>,
    index: usize,
) -> Option<ClassAssignment> {
    match assignments.value().read().as_ref() {
        Some(Ok(list)) => list.get(index).cloned(),
        _ => None,
    }
}

#[component]
fn ClassPicker(
    assignments: Vec<ClassAssignment>,
    selected: Option<usize>,
    on_change: EventHandler<Option<usize>>,
) -> Element {
    if assignments.is_empty() {
        return rsx! {
            p { class: "empty", "No classes assigned yet." }
        };
    }
    let options = map_class_options(&assignments);
    let current = selected.map(|index| index.to_string()).unwrap_or_default();
    rsx! {
        select {
            class: "class-picker",
            value: "{current}",
            onchange: move |evt| on_change.call(evt.value().parse::<usize>().ok()),
            option { value: "", "Select a class" }
            for option in options {
                option {
                    key: "{option.value}",
                    value: "{option.value}",
                    selected: option.value == current,
                    "{option.label}"
                }
            }
        }
    }
}

#[component]
fn RosterRow(row: RosterRowVm, on_toggle: EventHandler<StudentId>) -> Element {
    let id = row.id.clone();
    let status_class = if row.present {
        "status status--present"
    } else {
        "status status--absent"
    };
    rsx! {
        li { class: "roster-row",
            span { class: "avatar", "{row.initial}" }
            div { class: "roster-row__text",
                span { class: "roster-row__name", "{row.name}" }
                span { class: "roster-row__roll", "{row.roll_number}" }
            }
            label { class: "{status_class}",
                input {
                    r#type: "checkbox",
                    checked: row.present,
                    onchange: move |_| on_toggle.call(id.clone()),
                }
                "{row.status_label()}"
            }
        }
    }
}

#[component]
fn SubmitFeedback(state: SubmitState) -> Element {
    match state {
        SubmitState::Submitted(count) => rsx! {
            p { class: "form-success", "Attendance saved for {count} students." }
        },
        SubmitState::Failed(err) => rsx! {
            p { class: "form-error", "{err.message()}" }
        },
        SubmitState::Idle | SubmitState::Submitting => rsx! {},
    }
}
