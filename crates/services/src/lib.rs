#![forbid(unsafe_code)]

pub mod app_services;
pub mod attendance_service;
pub mod auth_service;
pub mod class_service;
pub mod dashboard_service;
pub mod error;

pub use rollcall_core::Clock;
pub use storage::repository::StorageError;

pub use app_services::AppServices;
pub use attendance_service::AttendanceService;
pub use auth_service::AuthService;
pub use class_service::{ClassCard, ClassDetail, ClassService};
pub use dashboard_service::{DashboardService, RecentClass};
pub use error::{AppServicesError, AttendanceError, AuthError, ClassServiceError, DashboardError};
