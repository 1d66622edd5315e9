use std::sync::Arc;

use chrono::NaiveDate;
use rollcall_core::model::{
    AttendanceBand, ClassAssignment, ClassId, StaffProfile, StatusTally, percentage,
};
use storage::repository::{AttendanceRepository, StaffRepository, StudentRepository};

use crate::Clock;
use crate::error::DashboardError;

/// Number of classes shown in the dashboard's recent list.
pub const RECENT_CLASS_LIMIT: u32 = 4;
/// How far back a recorded session still counts as recent.
pub const RECENT_WINDOW_DAYS: u64 = 7;

/// One row of the dashboard's recent-classes list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecentClass {
    pub assignment: ClassAssignment,
    pub present: u32,
    pub total: u32,
    pub date: NaiveDate,
}

impl RecentClass {
    #[must_use]
    pub fn percentage(&self) -> u32 {
        percentage(self.present, self.total)
    }

    #[must_use]
    pub fn band(&self) -> AttendanceBand {
        AttendanceBand::from_percentage(self.percentage())
    }
}

/// Read-only summaries for the signed-in staff member's home screen.
#[derive(Clone)]
pub struct DashboardService {
    clock: Clock,
    staff: Arc<dyn StaffRepository>,
    students: Arc<dyn StudentRepository>,
    attendance: Arc<dyn AttendanceRepository>,
}

impl DashboardService {
    #[must_use]
    pub fn new(
        clock: Clock,
        staff: Arc<dyn StaffRepository>,
        students: Arc<dyn StudentRepository>,
        attendance: Arc<dyn AttendanceRepository>,
    ) -> Self {
        Self {
            clock,
            staff,
            students,
            attendance,
        }
    }

    /// Today's Present/Absent/Leave counts across every class the staff member teaches.
    ///
    /// # Errors
    ///
    /// Returns `DashboardError::Storage` if repository access fails.
    pub async fn today_stats(&self, staff: &StaffProfile) -> Result<StatusTally, DashboardError> {
        let assignments = self.staff.list_assignments(&staff.id, None).await?;
        let mut class_ids: Vec<ClassId> = assignments.into_iter().map(|a| a.class.id).collect();
        class_ids.sort();
        class_ids.dedup();
        if class_ids.is_empty() {
            return Ok(StatusTally::default());
        }

        let statuses = self
            .attendance
            .statuses_on(&class_ids, self.clock.today())
            .await?;
        Ok(StatusTally::from_statuses(&statuses))
    }

    /// Up to four assignments with their latest session in the past week.
    ///
    /// Classes without a recent session report the enrolled count as the
    /// total, zero present, and today's date.
    ///
    /// # Errors
    ///
    /// Returns `DashboardError::Storage` if repository access fails.
    pub async fn recent_classes(
        &self,
        staff: &StaffProfile,
    ) -> Result<Vec<RecentClass>, DashboardError> {
        let assignments = self
            .staff
            .list_assignments(&staff.id, Some(RECENT_CLASS_LIMIT))
            .await?;
        let since = self.clock.days_ago(RECENT_WINDOW_DAYS);

        let mut recent = Vec::with_capacity(assignments.len());
        for assignment in assignments {
            let class_id = &assignment.class.id;
            let latest = self
                .attendance
                .latest_session_date(class_id, &assignment.subject, since)
                .await?;

            let entry = match latest {
                Some(date) => {
                    let statuses = self
                        .attendance
                        .statuses_for_session(class_id, &assignment.subject, date)
                        .await?;
                    let tally = StatusTally::from_statuses(&statuses);
                    RecentClass {
                        assignment,
                        present: tally.present,
                        total: tally.total,
                        date,
                    }
                }
                None => {
                    let total = self.students.count_enrolled(class_id).await?;
                    RecentClass {
                        assignment,
                        present: 0,
                        total,
                        date: self.clock.today(),
                    }
                }
            };
            recent.push(entry);
        }
        Ok(recent)
    }
}
