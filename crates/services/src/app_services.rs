use std::sync::Arc;

use storage::demo;
use storage::repository::Storage;
use storage::supabase::SupabaseConfig;

use crate::Clock;
use crate::attendance_service::AttendanceService;
use crate::auth_service::AuthService;
use crate::class_service::ClassService;
use crate::dashboard_service::DashboardService;
use crate::error::AppServicesError;

/// Assembles app-facing services over one storage backend.
#[derive(Clone)]
pub struct AppServices {
    clock: Clock,
    auth: Arc<AuthService>,
    dashboard: Arc<DashboardService>,
    classes: Arc<ClassService>,
    attendance: Arc<AttendanceService>,
}

impl AppServices {
    #[must_use]
    pub fn new(storage: &Storage, clock: Clock) -> Self {
        let auth = Arc::new(AuthService::new(
            Arc::clone(&storage.auth),
            Arc::clone(&storage.staff),
        ));
        let dashboard = Arc::new(DashboardService::new(
            clock,
            Arc::clone(&storage.staff),
            Arc::clone(&storage.students),
            Arc::clone(&storage.attendance),
        ));
        let classes = Arc::new(ClassService::new(
            Arc::clone(&storage.staff),
            Arc::clone(&storage.classes),
            Arc::clone(&storage.students),
        ));
        let attendance = Arc::new(AttendanceService::new(
            Arc::clone(&storage.staff),
            Arc::clone(&storage.students),
            Arc::clone(&storage.attendance),
        ));

        Self {
            clock,
            auth,
            dashboard,
            classes,
            attendance,
        }
    }

    /// Build services against a hosted Supabase project.
    #[must_use]
    pub fn supabase(config: SupabaseConfig, clock: Clock) -> Self {
        tracing::info!(url = %config.url, "using Supabase backend");
        Self::new(&Storage::supabase(config), clock)
    }

    /// Build services over the seeded in-memory backend.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError::Storage` if seeding fails.
    pub async fn demo(clock: Clock) -> Result<Self, AppServicesError> {
        let storage = demo::demo_storage(clock.today()).await?;
        tracing::info!(email = demo::DEMO_EMAIL, "using in-memory demo backend");
        Ok(Self::new(&storage, clock))
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
