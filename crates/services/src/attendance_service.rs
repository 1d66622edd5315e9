use std::sync::Arc;

use chrono::NaiveDate;
use rollcall_core::model::{
    AttendanceRoster, ClassAssignment, ClassId, StaffProfile, StudentProfile,
};
use storage::repository::{AttendanceRepository, StaffRepository, StudentRepository};

use crate::error::AttendanceError;

/// Feeds rosters from enrollments and writes submitted attendance.
#[derive(Clone)]
pub struct AttendanceService {
    staff: Arc<dyn StaffRepository>,
    students: Arc<dyn StudentRepository>,
    attendance: Arc<dyn AttendanceRepository>,
}

impl AttendanceService {
    #[must_use]
    pub fn new(
        staff: Arc<dyn StaffRepository>,
        students: Arc<dyn StudentRepository>,
        attendance: Arc<dyn AttendanceRepository>,
    ) -> Self {
        Self {
            staff,
            students,
            attendance,
        }
    }

    /// # Errors
    ///
    /// Returns `AttendanceError::Storage` if repository access fails.
    pub async fn teaching_classes(
        &self,
        staff: &StaffProfile,
    ) -> Result<Vec<ClassAssignment>, AttendanceError> {
        Ok(self.staff.list_assignments(&staff.id, None).await?)
    }

    /// Replace `roster` with the class's enrolled students, all marked present.
    ///
    /// Returns the number of entries loaded. On error the roster is left untouched.
    ///
    /// # Errors
    ///
    /// Returns `AttendanceError::Storage` if repository access fails.
    pub async fn load_roster(
        &self,
        class_id: &ClassId,
        roster: &mut AttendanceRoster,
    ) -> Result<usize, AttendanceError> {
        let enrolled = self.students.list_enrolled(class_id).await?;
        roster.load(enrolled.iter().map(StudentProfile::to_roster_entry));
        tracing::debug!(%class_id, students = roster.len(), "roster loaded");
        Ok(roster.len())
    }

    /// Write one attendance row per roster entry.
    ///
    /// # Errors
    ///
    /// Returns `AttendanceError::EmptyRoster` without touching storage if there is nothing
    /// to submit.
    /// Returns `AttendanceError::Storage` if the write fails.
    pub async fn submit(
        &self,
        class_id: &ClassId,
        subject: &str,
        date: NaiveDate,
        roster: &AttendanceRoster,
    ) -> Result<usize, AttendanceError> {
        if roster.is_empty() {
            return Err(AttendanceError::EmptyRoster);
        }
        let records = roster.to_submission(class_id, subject, date);
        self.attendance.insert_records(&records).await?;
        let stats = roster.stats();
        tracing::info!(
            %class_id,
            subject,
            %date,
            present = stats.present_count,
            absent = stats.absent_count,
            "attendance submitted"
        );
        Ok(records.len())
    }
}
