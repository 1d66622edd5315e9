use std::collections::HashSet;

use chrono::NaiveDate;

use crate::model::attendance::{AttendanceRecord, AttendanceStatus, percentage};
use crate::model::ids::{ClassId, StudentId};
use crate::model::student::Student;

/// Whether a roster has been populated yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RosterState {
    Empty,
    Loaded,
}

/// Aggregate counts derived from a roster.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RosterStats {
    pub present_count: u32,
    pub absent_count: u32,
    pub present_percentage: u32,
}

/// In-memory attendance sheet for one class and date.
///
/// Counts are never stored; `stats` recomputes them from the entries, so they
/// cannot drift from the flags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttendanceRoster {
    entries: Option<Vec<Student>>,
}

impl AttendanceRoster {
    #[must_use]
    pub fn new() -> Self {
        Self { entries: None }
    }

    #[must_use]
    pub fn state(&self) -> RosterState {
        match self.entries {
            Some(_) => RosterState::Loaded,
            None => RosterState::Empty,
        }
    }

    /// Replace the roster wholesale.
    ///
    /// Entries keep their source order. If an id repeats, the first
    /// occurrence wins and later ones are dropped.
    pub fn load(&mut self, students: impl IntoIterator<Item = Student>) {
        let mut seen = HashSet::new();
        let entries = students
            .into_iter()
            .filter(|student| seen.insert(student.id().clone()))
            .collect();
        self.entries = Some(entries);
    }

    /// Flip the presence flag of one student.
    ///
    /// Returns the new flag, or `None` when no entry has that id.
    pub fn toggle(&mut self, student_id: &StudentId) -> Option<bool> {
        let entry = self
            .entries
            .as_mut()?
            .iter_mut()
            .find(|student| student.id() == student_id)?;
        let present = !entry.is_present();
        entry.set_present(present);
        Some(present)
    }

    /// Set every entry's presence flag.
    pub fn mark_all(&mut self, present: bool) {
        if let Some(entries) = self.entries.as_mut() {
            for student in entries {
                student.set_present(present);
            }
        }
    }

    #[must_use]
    pub fn stats(&self) -> RosterStats {
        let len = u32::try_from(self.len()).unwrap_or(u32::MAX);
        let present_count = u32::try_from(
            self.students()
                .iter()
                .filter(|student| student.is_present())
                .count(),
        )
        .unwrap_or(u32::MAX);

        RosterStats {
            present_count,
            absent_count: len - present_count,
            present_percentage: percentage(present_count, len),
        }
    }

    /// Map the current entries to submission rows, one per student.
    #[must_use]
    pub fn to_submission(
        &self,
        class_id: &ClassId,
        subject: &str,
        date: NaiveDate,
    ) -> Vec<AttendanceRecord> {
        self.students()
            .iter()
            .map(|student| AttendanceRecord {
                class_id: class_id.clone(),
                student_id: student.id().clone(),
                subject: subject.to_owned(),
                date,
                status: AttendanceStatus::from_present(student.is_present()),
            })
            .collect()
    }

    #[must_use]
    pub fn students(&self) -> &[Student] {
        self.entries.as_deref().unwrap_or(&[])
    }

    #[must_use]
    pub fn get(&self, student_id: &StudentId) -> Option<&Student> {
        self.students().iter().find(|student| student.id() == student_id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.students().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.students().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn student(id: &str) -> Student {
        Student::new(StudentId::new(id), format!("Student {id}"), format!("R-{id}"))
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 4, 14).unwrap()
    }

    #[test]
    fn empty_roster_has_zero_stats() {
        let mut roster = AttendanceRoster::new();
        assert_eq!(roster.state(), RosterState::Empty);
        assert_eq!(roster.stats(), RosterStats::default());

        roster.load(Vec::new());
        assert_eq!(roster.state(), RosterState::Loaded);
        assert_eq!(
            roster.stats(),
            RosterStats {
                present_count: 0,
                absent_count: 0,
                present_percentage: 0,
            }
        );
    }

    #[test]
    fn load_defaults_everyone_present() {
        let mut roster = AttendanceRoster::new();
        roster.load(vec![student("a"), student("b")]);
        assert_eq!(roster.stats().present_count, 2);
        assert_eq!(roster.stats().present_percentage, 100);
    }

    #[test]
    fn load_keeps_explicit_presence() {
        let mut roster = AttendanceRoster::new();
        roster.load(vec![student("a"), student("b").with_presence(false)]);
        assert_eq!(roster.stats().present_count, 1);
    }

    #[test]
    fn load_replaces_previous_roster() {
        let mut roster = AttendanceRoster::new();
        roster.load(vec![student("a"), student("b")]);
        roster.toggle(&StudentId::new("a"));

        roster.load(vec![student("c")]);
        assert_eq!(roster.len(), 1);
        assert!(roster.get(&StudentId::new("a")).is_none());
        assert_eq!(roster.stats().present_count, 1);
    }

    #[test]
    fn load_drops_repeated_ids() {
        let mut roster = AttendanceRoster::new();
        roster.load(vec![
            student("a"),
            student("b"),
            Student::new(StudentId::new("a"), "Duplicate", "R-x").with_presence(false),
        ]);
        assert_eq!(roster.len(), 2);
        let first = roster.get(&StudentId::new("a")).unwrap();
        assert_eq!(first.display_name(), "Student a");
        assert!(first.is_present());
    }

    #[test]
    fn toggle_flips_only_the_target() {
        let mut roster = AttendanceRoster::new();
        roster.load(vec![student("a"), student("b")]);

        assert_eq!(roster.toggle(&StudentId::new("a")), Some(false));
        assert!(!roster.get(&StudentId::new("a")).unwrap().is_present());
        assert!(roster.get(&StudentId::new("b")).unwrap().is_present());
        assert_eq!(
            roster.stats(),
            RosterStats {
                present_count: 1,
                absent_count: 1,
                present_percentage: 50,
            }
        );

        let order: Vec<&str> = roster.students().iter().map(|s| s.id().as_str()).collect();
        assert_eq!(order, vec!["a", "b"]);
    }

    #[test]
    fn toggle_unknown_id_is_a_no_op() {
        let mut roster = AttendanceRoster::new();
        assert_eq!(roster.toggle(&StudentId::new("a")), None);

        roster.load(vec![student("a"), student("b")]);
        roster.toggle(&StudentId::new("b"));
        let before = roster.clone();
        assert_eq!(roster.toggle(&StudentId::new("zzz")), None);
        assert_eq!(roster, before);
        assert_eq!(roster.stats(), before.stats());
    }

    #[test]
    fn mark_all_sets_every_flag() {
        let mut roster = AttendanceRoster::new();
        roster.load(vec![student("a"), student("b"), student("c")]);

        roster.mark_all(false);
        assert_eq!(roster.stats().present_count, 0);
        assert_eq!(roster.stats().present_percentage, 0);

        roster.mark_all(true);
        assert_eq!(roster.stats().present_count, 3);
        assert_eq!(roster.stats().present_percentage, 100);
    }

    #[test]
    fn counts_always_complement() {
        let mut roster = AttendanceRoster::new();
        roster.load((0..7).map(|i| student(&i.to_string())));
        let ids: Vec<StudentId> = roster.students().iter().map(|s| s.id().clone()).collect();

        for step in 0..40_usize {
            match step % 5 {
                0 => roster.mark_all(step % 2 == 0),
                _ => {
                    roster.toggle(&ids[(step * 3) % ids.len()]);
                }
            }
            let stats = roster.stats();
            assert_eq!(
                stats.present_count + stats.absent_count,
                u32::try_from(roster.len()).unwrap()
            );
        }
    }

    #[test]
    fn submission_has_one_record_per_entry() {
        let mut roster = AttendanceRoster::new();
        roster.load(vec![student("a"), student("b"), student("c")]);
        roster.toggle(&StudentId::new("b"));

        let class_id = ClassId::new("class-1");
        let records = roster.to_submission(&class_id, "Maths", date());

        assert_eq!(records.len(), 3);
        for (record, entry) in records.iter().zip(roster.students()) {
            assert_eq!(&record.student_id, entry.id());
            assert_eq!(record.class_id, class_id);
            assert_eq!(record.subject, "Maths");
            assert_eq!(record.date, date());
            assert_eq!(
                record.status == AttendanceStatus::Present,
                entry.is_present()
            );
        }
        assert_eq!(records[1].status, AttendanceStatus::Absent);
    }

    #[test]
    fn submission_does_not_mutate_roster() {
        let mut roster = AttendanceRoster::new();
        roster.load(vec![student("a")]);
        let before = roster.clone();
        let _ = roster.to_submission(&ClassId::new("c"), "Physics", date());
        assert_eq!(roster, before);
    }
}
