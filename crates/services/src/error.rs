//! Shared error types for the services crate.

use thiserror::Error;

use rollcall_core::model::{ClassError, LoginValidation};
use storage::repository::StorageError;
use storage::supabase::SupabaseConfigError;

/// Errors emitted by `AuthService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AuthError {
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("{0}")]
    Rejected(String),
    #[error(transparent)]
    Validation(#[from] LoginValidation),
    #[error("not signed in")]
    NotSignedIn,
    #[error("no staff profile is linked to this account")]
    StaffProfileMissing,
    #[error(transparent)]
    Storage(StorageError),
}

impl From<StorageError> for AuthError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Unauthorized(message) if message.to_lowercase().contains("invalid") => {
                Self::InvalidCredentials
            }
            StorageError::Unauthorized(message) => Self::Rejected(message),
            other => Self::Storage(other),
        }
    }
}

/// Errors emitted by `DashboardService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DashboardError {
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `ClassService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ClassServiceError {
    #[error(transparent)]
    Class(#[from] ClassError),
    #[error("class not found")]
    NotFound,
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `AttendanceService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AttendanceError {
    #[error("no students to record attendance for")]
    EmptyRoster,
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Config(#[from] SupabaseConfigError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}
