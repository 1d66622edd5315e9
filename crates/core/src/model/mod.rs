mod attendance;
mod class;
mod ids;
mod login;
mod roster;
mod staff;
mod student;

pub use ids::{ClassId, ParseIdError, ProgramId, StaffId, StudentId, UserId};

pub use attendance::{
    AttendanceBand, AttendanceRecord, AttendanceStatus, StatusTally, percentage,
};
pub use class::{ClassAssignment, ClassError, ClassInfo, NewClass, NewClassDraft, Program};
pub use login::{Credentials, EmailError, LoginDraft, LoginValidation, PasswordError};
pub use roster::{AttendanceRoster, RosterState, RosterStats};
pub use staff::StaffProfile;
pub use student::{Student, StudentProfile};
