use crate::model::ids::StudentId;

/// One entry of an attendance roster.
///
/// Every field is set at construction; `present` starts out `true` unless the
/// source says otherwise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Student {
    id: StudentId,
    display_name: String,
    roll_number: String,
    present: bool,
}

impl Student {
    /// Creates a roster entry marked present.
    #[must_use]
    pub fn new(
        id: StudentId,
        display_name: impl Into<String>,
        roll_number: impl Into<String>,
    ) -> Self {
        Self {
            id,
            display_name: display_name.into(),
            roll_number: roll_number.into(),
            present: true,
        }
    }

    /// Overrides the default presence with a value supplied by the source.
    #[must_use]
    pub fn with_presence(mut self, present: bool) -> Self {
        self.present = present;
        self
    }

    #[must_use]
    pub fn id(&self) -> &StudentId {
        &self.id
    }

    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    #[must_use]
    pub fn roll_number(&self) -> &str {
        &self.roll_number
    }

    #[must_use]
    pub fn is_present(&self) -> bool {
        self.present
    }

    /// First character of the display name, uppercased.
    ///
    /// Leading whitespace is skipped so a padded name still shows a letter.
    /// Empty for an empty or blank name.
    #[must_use]
    pub fn initial(&self) -> String {
        self.display_name
            .trim_start()
            .chars()
            .next()
            .map(|c| c.to_uppercase().collect())
            .unwrap_or_default()
    }

    pub(crate) fn set_present(&mut self, present: bool) {
        self.present = present;
    }
}

/// A student as stored by the backend, independent of any roster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentProfile {
    pub id: StudentId,
    pub name: String,
    pub email: String,
    pub roll_number: String,
}

impl StudentProfile {
    #[must_use]
    pub fn new(
        id: StudentId,
        name: impl Into<String>,
        email: impl Into<String>,
        roll_number: impl Into<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            email: email.into(),
            roll_number: roll_number.into(),
        }
    }

    /// Build a fresh roster entry (present) for this student.
    #[must_use]
    pub fn to_roster_entry(&self) -> Student {
        Student::new(self.id.clone(), self.name.clone(), self.roll_number.clone())
    }

    /// Case-insensitive match on name, email or roll number.
    ///
    /// `query` is expected to be lowercased already; an empty query matches.
    #[must_use]
    pub fn matches_query(&self, query: &str) -> bool {
        if query.is_empty() {
            return true;
        }
        self.name.to_lowercase().contains(query)
            || self.email.to_lowercase().contains(query)
            || self.roll_number.to_lowercase().contains(query)
    }
}
