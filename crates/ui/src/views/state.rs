use dioxus::prelude::*;
use dioxus_router::use_navigator;
use services::{AttendanceError, AuthError, ClassServiceError, DashboardError, StorageError};

use crate::routes::Route;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewError {
    Unknown,
    NotSignedIn,
    NotFound,
    EmptyRoster,
    AlreadyRecorded,
}

impl ViewError {
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            ViewError::Unknown => "Something went wrong. Please try again.",
            ViewError::NotSignedIn => "Please sign in to continue.",
            ViewError::NotFound => "That class could not be found.",
            ViewError::EmptyRoster => "There are no students to submit.",
            ViewError::AlreadyRecorded => {
                "Attendance for this class and date was already submitted."
            }
        }
    }
}

impl From<AuthError> for ViewError {
    fn from(err: AuthError) -> Self {
        tracing::debug!(error = %err, "auth error reached the view");
        match err {
            AuthError::NotSignedIn | AuthError::StaffProfileMissing => ViewError::NotSignedIn,
            _ => ViewError::Unknown,
        }
    }
}

/// A backend rejection of the session token means the user must sign in again.
fn from_storage(err: &StorageError) -> ViewError {
    match err {
        StorageError::Unauthorized(_) => ViewError::NotSignedIn,
        _ => ViewError::Unknown,
    }
}

impl From<DashboardError> for ViewError {
    fn from(err: DashboardError) -> Self {
        tracing::warn!(error = %err, "dashboard load failed");
        match &err {
            DashboardError::Storage(storage) => from_storage(storage),
            _ => ViewError::Unknown,
        }
    }
}

impl From<ClassServiceError> for ViewError {
    fn from(err: ClassServiceError) -> Self {
        tracing::warn!(error = %err, "class request failed");
        match err {
            ClassServiceError::NotFound => ViewError::NotFound,
            ClassServiceError::Storage(storage) => from_storage(&storage),
            _ => ViewError::Unknown,
        }
    }
}

impl From<AttendanceError> for ViewError {
    fn from(err: AttendanceError) -> Self {
        tracing::warn!(error = %err, "attendance request failed");
        match err {
            AttendanceError::EmptyRoster => ViewError::EmptyRoster,
            AttendanceError::Storage(StorageError::Conflict) => ViewError::AlreadyRecorded,
            AttendanceError::Storage(storage) => from_storage(&storage),
            _ => ViewError::Unknown,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ViewState<T> {
    Idle,
    Loading,
    Ready(T),
    Error(ViewError),
}

#[must_use]
pub fn view_state_from_resource<T: Clone>(
    resource: &Resource<Result<T, ViewError>>,
) -> ViewState<T> {
    match resource.state().cloned() {
        UseResourceState::Pending => ViewState::Loading,
        UseResourceState::Ready => match resource.value().read().as_ref() {
            Some(Ok(data)) => ViewState::Ready(data.clone()),
            Some(Err(err)) => ViewState::Error(*err),
            None => ViewState::Error(ViewError::Unknown),
        },
        UseResourceState::Paused | UseResourceState::Stopped => ViewState::Idle,
    }
}

/// Send the user back to the login screen once `resource` fails with `NotSignedIn`.
pub fn use_login_redirect<T: 'static>(resource: Resource<Result<T, ViewError>>) {
    let navigator = use_navigator();
    use_effect(move || {
        let signed_out = matches!(
            resource.value().read().as_ref(),
            Some(Err(ViewError::NotSignedIn))
        );
        if signed_out {
            navigator.replace(Route::Login {});
        }
    });
}
