mod attendance;
mod class_detail;
mod classes;
mod dashboard;
mod login;
mod new_class;
mod state;

#[cfg(test)]
mod test_harness;
#[cfg(test)]
mod view_smoke;

pub use attendance::AttendanceView;
pub use class_detail::ClassDetailView;
pub use classes::ClassesView;
pub use dashboard::DashboardView;
pub use login::LoginView;
pub use new_class::NewClassView;
pub use state::{ViewError, ViewState, use_login_redirect, view_state_from_resource};
