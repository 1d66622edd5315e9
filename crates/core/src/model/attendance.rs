use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::model::ids::{ClassId, StudentId};

//
// ─── STATUS ───────────────────────────────────────────────────────────────────
//

/// Attendance status as stored by the backend.
///
/// Rosters only produce `Present` and `Absent`. `Leave` may exist in rows
/// written by other clients and is only ever counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttendanceStatus {
    Present,
    Absent,
    Leave,
}

impl AttendanceStatus {
    #[must_use]
    pub fn from_present(present: bool) -> Self {
        if present { Self::Present } else { Self::Absent }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            AttendanceStatus::Present => "Present",
            AttendanceStatus::Absent => "Absent",
            AttendanceStatus::Leave => "Leave",
        }
    }
}

//
// ─── RECORD ───────────────────────────────────────────────────────────────────
//

/// One row of an attendance submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    pub class_id: ClassId,
    pub student_id: StudentId,
    pub subject: String,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
}

//
// ─── AGGREGATES ───────────────────────────────────────────────────────────────
//

/// `round(part / total * 100)`, with halves rounded up and `0` for an empty total.
#[must_use]
pub fn percentage(part: u32, total: u32) -> u32 {
    if total == 0 {
        return 0;
    }
    let part = u64::from(part.min(total));
    let total = u64::from(total);
    let rounded = (part * 200 + total) / (total * 2);
    // part <= total, so the result is at most 100
    u32::try_from(rounded).unwrap_or(100)
}

/// Coarse rating used to colour attendance figures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttendanceBand {
    Good,
    Fair,
    Poor,
}

impl AttendanceBand {
    #[must_use]
    pub fn from_percentage(percentage: u32) -> Self {
        match percentage {
            90.. => Self::Good,
            75.. => Self::Fair,
            _ => Self::Poor,
        }
    }

    #[must_use]
    pub fn css_class(self) -> &'static str {
        match self {
            AttendanceBand::Good => "band-good",
            AttendanceBand::Fair => "band-fair",
            AttendanceBand::Poor => "band-poor",
        }
    }
}

/// Per-status counts over a set of attendance rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusTally {
    pub present: u32,
    pub absent: u32,
    pub leave: u32,
    pub total: u32,
}

impl StatusTally {
    #[must_use]
    pub fn from_statuses(statuses: &[AttendanceStatus]) -> Self {
        statuses.iter().fold(Self::default(), |mut tally, status| {
            match status {
                AttendanceStatus::Present => tally.present = tally.present.saturating_add(1),
                AttendanceStatus::Absent => tally.absent = tally.absent.saturating_add(1),
                AttendanceStatus::Leave => tally.leave = tally.leave.saturating_add(1),
            }
            tally.total = tally.total.saturating_add(1);
            tally
        })
    }

    #[must_use]
    pub fn present_percentage(&self) -> u32 {
        percentage(self.present, self.total)
    }

    #[must_use]
    pub fn absent_percentage(&self) -> u32 {
        percentage(self.absent, self.total)
    }

    #[must_use]
    pub fn leave_percentage(&self) -> u32 {
        percentage(self.leave, self.total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentage_handles_empty_total() {
        assert_eq!(percentage(0, 0), 0);
        assert_eq!(percentage(3, 0), 0);
    }

    #[test]
    fn percentage_rounds_half_up() {
        assert_eq!(percentage(1, 2), 50);
        assert_eq!(percentage(1, 3), 33);
        assert_eq!(percentage(2, 3), 67);
        assert_eq!(percentage(1, 8), 13);
        assert_eq!(percentage(7, 7), 100);
    }

    #[test]
    fn bands_split_at_ninety_and_seventy_five() {
        assert_eq!(AttendanceBand::from_percentage(100), AttendanceBand::Good);
        assert_eq!(AttendanceBand::from_percentage(90), AttendanceBand::Good);
        assert_eq!(AttendanceBand::from_percentage(89), AttendanceBand::Fair);
        assert_eq!(AttendanceBand::from_percentage(75), AttendanceBand::Fair);
        assert_eq!(AttendanceBand::from_percentage(74), AttendanceBand::Poor);
    }

    #[test]
    fn tally_counts_each_status() {
        let tally = StatusTally::from_statuses(&[
            AttendanceStatus::Present,
            AttendanceStatus::Present,
            AttendanceStatus::Absent,
            AttendanceStatus::Leave,
        ]);
        assert_eq!(tally.present, 2);
        assert_eq!(tally.absent, 1);
        assert_eq!(tally.leave, 1);
        assert_eq!(tally.total, 4);
        assert_eq!(tally.present_percentage(), 50);
        assert_eq!(tally.leave_percentage(), 25);
    }

    #[test]
    fn status_uses_backend_spelling() {
        let json = serde_json::to_string(&AttendanceStatus::Present).unwrap();
        assert_eq!(json, "\"Present\"");
        let parsed: AttendanceStatus = serde_json::from_str("\"Leave\"").unwrap();
        assert_eq!(parsed, AttendanceStatus::Leave);
    }
}
