use rollcall_core::model::{AttendanceRoster, StudentId};

/// One student row on the attendance screen.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RosterRowVm {
    pub id: StudentId,
    pub name: String,
    pub roll_number: String,
    pub initial: String,
    pub present: bool,
}

impl RosterRowVm {
    #[must_use]
    pub fn status_label(&self) -> &'static str {
        if self.present { "Present" } else { "Absent" }
    }
}

/// Counts shown above the roster.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RosterHeaderVm {
    pub present: u32,
    pub absent: u32,
    pub percentage: u32,
}

#[must_use]
pub fn map_roster_rows(roster: &AttendanceRoster) -> Vec<RosterRowVm> {
    roster
        .students()
        .iter()
        .map(|student| RosterRowVm {
            id: student.id().clone(),
            name: student.display_name().to_string(),
            roll_number: student.roll_number().to_string(),
            initial: student.initial(),
            present: student.is_present(),
        })
        .collect()
}

#[must_use]
pub fn map_roster_header(roster: &AttendanceRoster) -> RosterHeaderVm {
    let stats = roster.stats();
    RosterHeaderVm {
        present: stats.present_count,
        absent: stats.absent_count,
        percentage: stats.present_percentage,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rollcall_core::model::Student;

    #[test]
    fn rows_follow_roster_flags() {
        let mut roster = AttendanceRoster::new();
        roster.load([
            Student::new(StudentId::new("1"), "asha", "R1"),
            Student::new(StudentId::new("2"), "Ben", "R2"),
        ]);
        let _ = roster.toggle(&StudentId::new("2"));

        let rows = map_roster_rows(&roster);
        assert_eq!(rows[0].initial, "A");
        assert_eq!(rows[0].status_label(), "Present");
        assert_eq!(rows[1].status_label(), "Absent");

        let header = map_roster_header(&roster);
        assert_eq!((header.present, header.absent, header.percentage), (1, 1, 50));
    }

    #[test]
    fn empty_roster_has_zero_header() {
        assert_eq!(
            map_roster_header(&AttendanceRoster::new()),
            RosterHeaderVm::default()
        );
    }
}
