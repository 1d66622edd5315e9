use thiserror::Error;

use crate::model::ids::{ClassId, ProgramId};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ClassError {
    #[error("program is required")]
    MissingProgram,

    #[error("year is required")]
    MissingYear,

    #[error("year must be a positive whole number")]
    InvalidYear,

    #[error("section is required")]
    MissingSection,

    #[error("academic year is required")]
    MissingAcademicYear,

    #[error("subject is required")]
    MissingSubject,

    #[error("capacity must be a positive whole number")]
    InvalidCapacity,
}

/// An academic program (e.g. "BCA").
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program {
    pub id: ProgramId,
    pub name: String,
}

/// A class cohort as stored by the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassInfo {
    pub id: ClassId,
    pub program_name: Option<String>,
    pub year: u32,
    pub section: String,
    pub academic_year: Option<String>,
    pub room_number: Option<String>,
    pub capacity: Option<u32>,
}

impl ClassInfo {
    /// `"{program} {year}-{section}"`, using `fallback` when the program is unknown.
    #[must_use]
    pub fn display_name_or(&self, fallback: &str) -> String {
        let program = self.program_name.as_deref().unwrap_or(fallback);
        format!("{program} {}-{}", self.year, self.section)
    }

    #[must_use]
    pub fn display_name(&self) -> String {
        self.display_name_or("N/A")
    }
}

/// A subject taught by one staff member in one class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassAssignment {
    pub class: ClassInfo,
    pub subject: String,
}

/// Raw form input for creating a class.
#[derive(Debug, Clone, Default)]
pub struct NewClassDraft {
    pub program_id: Option<ProgramId>,
    pub year: String,
    pub section: String,
    pub academic_year: String,
    pub room_number: String,
    pub capacity: String,
    pub subject: String,
}

/// Validated class creation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewClass {
    pub program_id: ProgramId,
    pub year: u32,
    pub section: String,
    pub academic_year: String,
    pub room_number: Option<String>,
    pub capacity: Option<u32>,
    pub subject: String,
}

impl NewClassDraft {
    /// Validate and normalize the draft.
    ///
    /// # Errors
    ///
    /// Returns `ClassError` for the first missing or malformed field.
    pub fn validate(self) -> Result<NewClass, ClassError> {
        let program_id = self.program_id.ok_or(ClassError::MissingProgram)?;

        let year = self.year.trim();
        if year.is_empty() {
            return Err(ClassError::MissingYear);
        }
        let year = year
            .parse::<u32>()
            .ok()
            .filter(|value| *value > 0)
            .ok_or(ClassError::InvalidYear)?;

        let section = required(self.section).ok_or(ClassError::MissingSection)?;
        let academic_year =
            required(self.academic_year).ok_or(ClassError::MissingAcademicYear)?;
        let subject = required(self.subject).ok_or(ClassError::MissingSubject)?;

        let capacity = match required(self.capacity) {
            Some(raw) => Some(
                raw.parse::<u32>()
                    .ok()
                    .filter(|value| *value > 0)
                    .ok_or(ClassError::InvalidCapacity)?,
            ),
            None => None,
        };

        Ok(NewClass {
            program_id,
            year,
            section,
            academic_year,
            room_number: required(self.room_number),
            capacity,
            subject,
        })
    }
}

fn required(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> NewClassDraft {
        NewClassDraft {
            program_id: Some(ProgramId::new("p1")),
            year: "2".into(),
            section: " A ".into(),
            academic_year: "2025".into(),
            room_number: String::new(),
            capacity: "40".into(),
            subject: "Data Structures".into(),
        }
    }

    #[test]
    fn validate_normalizes_fields() {
        let class = draft().validate().unwrap();
        assert_eq!(class.year, 2);
        assert_eq!(class.section, "A");
        assert_eq!(class.room_number, None);
        assert_eq!(class.capacity, Some(40));
    }

    #[test]
    fn validate_requires_program_and_subject() {
        let mut missing_program = draft();
        missing_program.program_id = None;
        assert_eq!(missing_program.validate(), Err(ClassError::MissingProgram));

        let mut missing_subject = draft();
        missing_subject.subject = "  ".into();
        assert_eq!(missing_subject.validate(), Err(ClassError::MissingSubject));
    }

    #[test]
    fn validate_rejects_non_numeric_year_and_capacity() {
        let mut bad_year = draft();
        bad_year.year = "two".into();
        assert_eq!(bad_year.validate(), Err(ClassError::InvalidYear));

        let mut bad_capacity = draft();
        bad_capacity.capacity = "0".into();
        assert_eq!(bad_capacity.validate(), Err(ClassError::InvalidCapacity));
    }

    #[test]
    fn display_name_uses_program_year_section() {
        let info = ClassInfo {
            id: ClassId::new("c1"),
            program_name: Some("BCA".into()),
            year: 2,
            section: "A".into(),
            academic_year: None,
            room_number: None,
            capacity: None,
        };
        assert_eq!(info.display_name(), "BCA 2-A");

        let orphan = ClassInfo {
            program_name: None,
            ..info
        };
        assert_eq!(orphan.display_name(), "N/A 2-A");
        assert_eq!(orphan.display_name_or("Unknown"), "Unknown 2-A");
    }
}
