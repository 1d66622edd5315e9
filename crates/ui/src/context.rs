use std::sync::Arc;

use dioxus::prelude::*;
use services::{AppServices, AttendanceService, AuthService, ClassService, Clock, DashboardService};

pub trait UiApp: Send + Sync {
    fn clock(&self) -> Clock;

    fn auth(&self) -> Arc<AuthService>;
    fn dashboard(&self) -> Arc<DashboardService>;
    fn classes(&self) -> Arc<ClassService>;
    fn attendance(&self) -> Arc<AttendanceService>;
}

impl UiApp for AppServices {
    fn clock(&self) -> Clock {
        AppServices::clock(self)
    }

    fn auth(&self) -> Arc<AuthService> {
        AppServices::auth(self)
    }

    fn dashboard(&self) -> Arc<DashboardService> {
        AppServices::dashboard(self)
    }

    fn classes(&self) -> Arc<ClassService> {
        AppServices::classes(self)
    }

    fn attendance(&self) -> Arc<AttendanceService> {
        AppServices::attendance(self)
    }
}

#[derive(Clone)]
pub struct AppContext {
    clock: Clock,
    auth: Arc<AuthService>,
    dashboard: Arc<DashboardService>,
    classes: Arc<ClassService>,
    attendance: Arc<AttendanceService>,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        Self {
            clock: app.clock(),
            auth: app.auth(),
            dashboard: app.dashboard(),
            classes: app.classes(),
            attendance: app.attendance(),
        }
    }

    #[must_use]
    pub fn clock(&self) -> Clock {
        self.clock
    }

    #[must_use]
    pub fn auth(&self) -> Arc<AuthService> {
        Arc::clone(&self.auth)
    }

    #[must_use]
    pub fn dashboard(&self) -> Arc<DashboardService> {
        Arc::clone(&self.dashboard)
    }

    #[must_use]
    pub fn classes(&self) -> Arc<ClassService> {
        Arc::clone(&self.classes)
    }

    #[must_use]
    pub fn attendance(&self) -> Arc<AttendanceService> {
        Arc::clone(&self.attendance)
    }
}

// This context is provided by the application composition root (e.g. `crates/app`).

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}

/// Open/closed state of the navigation drawer.
///
/// Provided by the layout; any screen below it may open or close the drawer.
#[derive(Clone, Copy, PartialEq)]
pub struct NavPanel {
    open: Signal<bool>,
}

impl NavPanel {
    #[must_use]
    pub fn new(open: Signal<bool>) -> Self {
        Self { open }
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        (self.open)()
    }

    pub fn open(&mut self) {
        self.open.set(true);
    }

    pub fn close(&mut self) {
        self.open.set(false);
    }

    pub fn toggle(&mut self) {
        let next = !(self.open)();
        self.open.set(next);
    }
}
