use std::sync::Arc;

use dioxus::core::NoOpMutations;
use dioxus::prelude::*;
use dioxus_router::{Routable, Router};
use rollcall_core::model::LoginDraft;
use rollcall_core::time::fixed_clock;
use services::AppServices;
use storage::demo::{DEMO_EMAIL, DEMO_PASSWORD, demo_storage};
use storage::repository::Storage;

use crate::context::{UiApp, build_app_context};
use crate::views::{
    AttendanceView, ClassDetailView, ClassesView, DashboardView, LoginView, NewClassView,
};

#[derive(Clone, PartialEq, Eq)]
pub enum ViewKind {
    Login,
    Dashboard,
    Classes,
    NewClass,
    ClassDetail(String),
    Attendance,
    AttendanceFor(usize),
}

#[derive(Props, Clone)]
struct ViewHarnessProps {
    app: Arc<AppServices>,
    view: ViewKind,
}

impl PartialEq for ViewHarnessProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

#[component]
fn ViewRouterHarness(props: ViewHarnessProps) -> Element {
    let app: Arc<dyn UiApp> = props.app.clone();
    use_context_provider(|| build_app_context(&app));
    use_context_provider(|| props.view.clone());
    rsx! { Router::<TestRoute> {} }
}

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum TestRoute {
    #[route("/")]
    Root {},
}

#[component]
fn Root() -> Element {
    let view = use_context::<ViewKind>();
    match view {
        ViewKind::Login => rsx! { LoginView {} },
        ViewKind::Dashboard => rsx! { DashboardView {} },
        ViewKind::Classes => rsx! { ClassesView {} },
        ViewKind::NewClass => rsx! { NewClassView {} },
        ViewKind::ClassDetail(class_id) => rsx! { ClassDetailView { class_id } },
        ViewKind::Attendance => rsx! { AttendanceView {} },
        ViewKind::AttendanceFor(index) => rsx! { AttendanceView { initial_class: index } },
    }
}

pub struct ViewHarness {
    pub dom: VirtualDom,
}

impl ViewHarness {
    pub fn rebuild(&mut self) {
        self.dom.rebuild_in_place();
        drive_dom(&mut self.dom);
    }

    pub async fn drive_async(&mut self) {
        let _ = tokio::time::timeout(
            std::time::Duration::from_millis(50),
            self.dom.wait_for_work(),
        )
        .await;
        self.dom.render_immediate(&mut NoOpMutations);
        self.dom.process_events();
    }

    /// Rebuild, then poll until chained resources have resolved.
    pub async fn settle(&mut self) {
        self.rebuild();
        for _ in 0..4 {
            self.drive_async().await;
        }
    }

    pub fn render(&self) -> String {
        dioxus_ssr::render(&self.dom)
    }
}

pub fn drive_dom(dom: &mut VirtualDom) {
    dom.process_events();
    dom.render_immediate(&mut NoOpMutations);
    dom.process_events();
}

/// Seeded in-memory storage pinned to the fixed test clock.
pub async fn demo_test_storage() -> Storage {
    demo_storage(fixed_clock().today())
        .await
        .expect("seed demo storage")
}

pub async fn services_for(storage: &Storage, signed_in: bool) -> AppServices {
    let services = AppServices::new(storage, fixed_clock());
    if signed_in {
        services
            .auth()
            .sign_in(LoginDraft::new(DEMO_EMAIL, DEMO_PASSWORD))
            .await
            .expect("demo sign in");
    }
    services
}

pub fn mount(services: AppServices, view: ViewKind) -> ViewHarness {
    let dom = VirtualDom::new_with_props(
        ViewRouterHarness,
        ViewHarnessProps {
            app: Arc::new(services),
            view,
        },
    );
    ViewHarness { dom }
}

pub async fn setup_view_harness(view: ViewKind, signed_in: bool) -> ViewHarness {
    let storage = demo_test_storage().await;
    mount(services_for(&storage, signed_in).await, view)
}
