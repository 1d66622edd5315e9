mod class_vm;
mod dashboard_vm;
mod roster_vm;
mod time_fmt;

pub use class_vm::{
    ClassCardVm, ClassOptionVm, StudentRowVm, class_facts, map_class_cards, map_class_options,
    map_student_rows,
};
pub use dashboard_vm::{RecentClassVm, TodayStatsVm, map_recent_classes, map_today_stats};
pub use roster_vm::{RosterHeaderVm, RosterRowVm, map_roster_header, map_roster_rows};
pub use time_fmt::{date_input_value, format_date, parse_date_input};
