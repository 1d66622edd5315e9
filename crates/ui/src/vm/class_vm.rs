use rollcall_core::model::{ClassAssignment, ClassId, ClassInfo, StudentId, StudentProfile};
use services::ClassCard;

/// UI-ready class card for the classes list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClassCardVm {
    pub id: ClassId,
    pub name: String,
    pub subject: String,
    pub students_label: String,
}

#[must_use]
pub fn map_class_cards(cards: &[ClassCard]) -> Vec<ClassCardVm> {
    cards
        .iter()
        .map(|card| ClassCardVm {
            id: card.class.id.clone(),
            name: card.name(),
            subject: card.subject.clone(),
            students_label: students_label(card.student_count),
        })
        .collect()
}

fn students_label(count: u32) -> String {
    match count {
        1 => "1 student".to_string(),
        n => format!("{n} students"),
    }
}

/// Label/value pairs for the class detail header.
#[must_use]
pub fn class_facts(class: &ClassInfo) -> Vec<(&'static str, String)> {
    let or_dash = |value: Option<&str>| value.unwrap_or("-").to_string();
    vec![
        ("Program", or_dash(class.program_name.as_deref())),
        ("Year", class.year.to_string()),
        ("Section", class.section.clone()),
        ("Academic year", or_dash(class.academic_year.as_deref())),
        ("Room", or_dash(class.room_number.as_deref())),
        (
            "Capacity",
            class
                .capacity
                .map_or_else(|| "-".to_string(), |c| c.to_string()),
        ),
    ]
}

/// One entry of the class picker on the attendance screen.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClassOptionVm {
    pub value: String,
    pub label: String,
}

/// Options keyed by their index in `assignments`.
#[must_use]
pub fn map_class_options(assignments: &[ClassAssignment]) -> Vec<ClassOptionVm> {
    assignments
        .iter()
        .enumerate()
        .map(|(index, assignment)| ClassOptionVm {
            value: index.to_string(),
            label: format!(
                "{} · {}",
                assignment.class.display_name(),
                assignment.subject
            ),
        })
        .collect()
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StudentRowVm {
    pub id: StudentId,
    pub name: String,
    pub detail: String,
}

#[must_use]
pub fn map_student_rows(students: &[StudentProfile]) -> Vec<StudentRowVm> {
    students
        .iter()
        .map(|student| {
            let detail = match (student.roll_number.is_empty(), student.email.is_empty()) {
                (false, false) => format!("{} · {}", student.roll_number, student.email),
                (false, true) => student.roll_number.clone(),
                (true, false) => student.email.clone(),
                (true, true) => String::new(),
            };
            StudentRowVm {
                id: student.id.clone(),
                name: student.name.clone(),
                detail,
            }
        })
        .collect()
}
