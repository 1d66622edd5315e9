use rollcall_core::model::{ClassId, StatusTally};
use services::RecentClass;

use super::time_fmt::format_date;

/// Today's counts as shown in the dashboard stat cards.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TodayStatsVm {
    pub present: u32,
    pub absent: u32,
    pub leave: u32,
    pub total: u32,
    pub present_pct: u32,
    pub absent_pct: u32,
    pub leave_pct: u32,
}

#[must_use]
pub fn map_today_stats(tally: &StatusTally) -> TodayStatsVm {
    TodayStatsVm {
        present: tally.present,
        absent: tally.absent,
        leave: tally.leave,
        total: tally.total,
        present_pct: tally.present_percentage(),
        absent_pct: tally.absent_percentage(),
        leave_pct: tally.leave_percentage(),
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecentClassVm {
    pub class_id: ClassId,
    pub name: String,
    pub subject: String,
    pub date_str: String,
    pub present: u32,
    pub total: u32,
    pub percentage: u32,
    pub band_class: &'static str,
}

/// Program label for dashboard rows whose class has no program.
pub const UNKNOWN_PROGRAM: &str = "Unknown";

#[must_use]
pub fn map_recent_classes(items: &[RecentClass]) -> Vec<RecentClassVm> {
    items
        .iter()
        .map(|item| RecentClassVm {
            class_id: item.assignment.class.id.clone(),
            name: item.assignment.class.display_name_or(UNKNOWN_PROGRAM),
            subject: item.assignment.subject.clone(),
            date_str: format_date(item.date),
            present: item.present,
            total: item.total,
            percentage: item.percentage(),
            band_class: item.band().css_class(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rollcall_core::model::{ClassAssignment, ClassInfo};

    #[test]
    fn recent_class_carries_band_class() {
        let item = RecentClass {
            assignment: ClassAssignment {
                class: ClassInfo {
                    id: ClassId::new("c1"),
                    program_name: None,
                    year: 3,
                    section: "C".into(),
                    academic_year: None,
                    room_number: None,
                    capacity: None,
                },
                subject: "Chemistry".into(),
            },
            present: 19,
            total: 20,
            date: NaiveDate::from_ymd_opt(2024, 2, 5).unwrap(),
        };
        let vm = &map_recent_classes(&[item])[0];
        assert_eq!(vm.name, "Unknown 3-C");
        assert_eq!(vm.percentage, 95);
        assert_eq!(vm.band_class, "band-good");
        assert_eq!(vm.date_str, "Feb 5, 2024");
    }
}
