use dioxus::prelude::*;
use dioxus_router::Link;

use services::{ClassCard, ClassService};

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::{ViewError, ViewState, use_login_redirect, view_state_from_resource};
use crate::vm::{ClassCardVm, map_class_cards};

#[component]
pub fn ClassesView() -> Element {
    let ctx = use_context::<AppContext>();
    let auth = ctx.auth();
    let classes = ctx.classes();
    let mut query = use_signal(String::new);

    let mut resource = use_resource(move || {
        let auth = auth.clone();
        let classes = classes.clone();
        async move {
            let staff = auth.current_staff().await.map_err(ViewError::from)?;
            let cards = classes
                .list_classes(&staff)
                .await
                .map_err(ViewError::from)?;
            Ok::<_, ViewError>(cards)
        }
    });

    use_login_redirect(resource);
    let state = view_state_from_resource(&resource);

    rsx! {
        div { class: "page classes",
            header { class: "page-header",
                h2 { "My Classes" }
                Link { class: "primary", to: Route::NewClass {}, "New Class" }
            }
            input {
                class: "search",
                r#type: "search",
                placeholder: "Search by class or subject",
                value: "{query}",
                oninput: move |evt| query.set(evt.value()),
            }

            match state {
                ViewState::Idle => rsx! {
                    p { "Idle" }
                },
                ViewState::Loading => rsx! {
                    p { "Loading..." }
                },
                ViewState::Ready(cards) => rsx! {
                    ClassGrid { cards: visible_cards(&cards, &query()) }
                },
                ViewState::Error(err) => rsx! {
                    p { "{err.message()}" }
                    button {
                        r#type: "button",
                        onclick: move |_| resource.restart(),
                        "Retry"
                    }
                },
            }
        }
    }
}

fn visible_cards(cards: &[ClassCard], query: &str) -> Vec<ClassCardVm> {
    map_class_cards(&ClassService::filter_classes(cards, query))
}

#[component]
fn ClassGrid(cards: Vec<ClassCardVm>) -> Element {
    if cards.is_empty() {
        return rsx! {
            p { class: "empty", "No classes found." }
        };
    }
    rsx! {
        ul { class: "class-grid",
            for card in cards {
                li { class: "class-card", key: "{card.id}",
                    Link { to: Route::ClassDetail { class_id: card.id.to_string() },
                        h3 { "{card.name}" }
                        p { class: "class-card__subject", "{card.subject}" }
                        p { class: "class-card__count", "{card.students_label}" }
                    }
                }
            }
        }
    }
}
