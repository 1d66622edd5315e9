use dioxus::prelude::*;
use dioxus_router::{Link, Outlet, Routable, use_navigator};

use crate::context::{AppContext, NavPanel};
use crate::views::{
    AttendanceView, ClassDetailView, ClassesView, DashboardView, LoginView, NewClassView,
};

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[route("/login", LoginView)] Login {},
    #[layout(Layout)]
        #[route("/", DashboardView)] Dashboard {},
        #[route("/classes", ClassesView)] Classes {},
        #[route("/classes/new", NewClassView)] NewClass {},
        #[route("/classes/:class_id", ClassDetailView)] ClassDetail { class_id: String },
        #[route("/attendance", AttendanceView)] Attendance {},
}

#[component]
fn Layout() -> Element {
    let open = use_signal(|| false);
    let nav = use_context_provider(|| NavPanel::new(open));

    rsx! {
        div { class: if nav.is_open() { "app app--nav-open" } else { "app" },
            Sidebar {}
            if nav.is_open() {
                div {
                    class: "nav-scrim",
                    onclick: move |_| {
                        let mut nav = nav;
                        nav.close();
                    },
                }
            }
            main { class: "content",
                TopBar {}
                Outlet::<Route> {}
            }
        }
    }
}

#[component]
fn TopBar() -> Element {
    let mut nav = use_context::<NavPanel>();
    rsx! {
        header { class: "topbar",
            button {
                class: "topbar__menu",
                r#type: "button",
                aria_label: "Open navigation",
                onclick: move |_| nav.toggle(),
                "☰"
            }
            span { class: "topbar__title", "Rollcall" }
        }
    }
}

#[component]
fn Sidebar() -> Element {
    let ctx = use_context::<AppContext>();
    let mut nav = use_context::<NavPanel>();
    let navigator = use_navigator();

    let sign_out = move |_| {
        let auth = ctx.auth();
        nav.close();
        spawn(async move {
            if let Err(err) = auth.sign_out().await {
                tracing::warn!(error = %err, "sign out failed");
            }
            navigator.replace(Route::Login {});
        });
    };

    rsx! {
        nav { class: if nav.is_open() { "sidebar sidebar--open" } else { "sidebar" },
            h1 { "Rollcall" }
            ul { onclick: move |_| nav.close(),
                li { Link { to: Route::Dashboard {}, "Dashboard" } }
                li { Link { to: Route::Classes {}, "Classes" } }
                li { Link { to: Route::Attendance {}, "Take Attendance" } }
            }
            button { class: "sidebar__signout", r#type: "button", onclick: sign_out, "Sign out" }
        }
    }
}
