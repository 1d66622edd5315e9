use std::collections::HashSet;
use std::sync::Arc;

use rollcall_core::model::{
    ClassId, ClassInfo, NewClassDraft, Program, StaffProfile, StudentId, StudentProfile,
};
use storage::repository::{
    ClassRepository, NewAssignmentRecord, StaffRepository, StudentRepository,
};

use crate::error::ClassServiceError;

/// Role recorded on the `class_staff` row of a class's creator.
pub const CREATOR_ROLE: &str = "Instructor";
/// Upper bound on students offered when adding to a class.
pub const AVAILABLE_STUDENT_LIMIT: usize = 100;

/// A class as listed on the classes screen.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClassCard {
    pub class: ClassInfo,
    pub subject: String,
    pub student_count: u32,
}

impl ClassCard {
    #[must_use]
    pub fn name(&self) -> String {
        self.class.display_name()
    }
}

/// A class with its enrolled students.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClassDetail {
    pub class: ClassInfo,
    pub students: Vec<StudentProfile>,
}

/// Class management: listing, creation, and student membership.
#[derive(Clone)]
pub struct ClassService {
    staff: Arc<dyn StaffRepository>,
    classes: Arc<dyn ClassRepository>,
    students: Arc<dyn StudentRepository>,
}

impl ClassService {
    #[must_use]
    pub fn new(
        staff: Arc<dyn StaffRepository>,
        classes: Arc<dyn ClassRepository>,
        students: Arc<dyn StudentRepository>,
    ) -> Self {
        Self {
            staff,
            classes,
            students,
        }
    }

    /// The staff member's classes with their enrolled counts.
    ///
    /// # Errors
    ///
    /// Returns `ClassServiceError::Storage` if repository access fails.
    pub async fn list_classes(
        &self,
        staff: &StaffProfile,
    ) -> Result<Vec<ClassCard>, ClassServiceError> {
        let assignments = self.staff.list_assignments(&staff.id, None).await?;
        let mut cards = Vec::with_capacity(assignments.len());
        for assignment in assignments {
            let student_count = self.students.count_enrolled(&assignment.class.id).await?;
            cards.push(ClassCard {
                class: assignment.class,
                subject: assignment.subject,
                student_count,
            });
        }
        Ok(cards)
    }

    /// Cards whose name or subject contains `query`, ignoring case.
    #[must_use]
    pub fn filter_classes(cards: &[ClassCard], query: &str) -> Vec<ClassCard> {
        let query = query.trim().to_lowercase();
        cards
            .iter()
            .filter(|card| {
                query.is_empty()
                    || card.name().to_lowercase().contains(&query)
                    || card.subject.to_lowercase().contains(&query)
            })
            .cloned()
            .collect()
    }

    /// # Errors
    ///
    /// Returns `ClassServiceError::Storage` if repository access fails.
    pub async fn list_programs(&self) -> Result<Vec<Program>, ClassServiceError> {
        Ok(self.classes.list_programs().await?)
    }

    /// Validate and create a class, then assign the staff member to it.
    ///
    /// The class is deleted again if the assignment cannot be written.
    ///
    /// # Errors
    ///
    /// Returns `ClassServiceError::Class` for validation failures.
    /// Returns `ClassServiceError::Storage` if either write fails.
    pub async fn create_class(
        &self,
        staff: &StaffProfile,
        draft: NewClassDraft,
    ) -> Result<ClassInfo, ClassServiceError> {
        let new_class = draft.validate()?;
        let class = self.classes.insert_class(&new_class).await?;

        let record = NewAssignmentRecord {
            class_id: class.id.clone(),
            staff_id: staff.id.clone(),
            subject: new_class.subject.clone(),
            role: CREATOR_ROLE.to_string(),
        };
        if let Err(err) = self.staff.insert_assignment(&record).await {
            tracing::warn!(class_id = %class.id, error = %err, "assignment failed, removing class");
            if let Err(cleanup) = self.classes.delete_class(&class.id).await {
                tracing::error!(class_id = %class.id, error = %cleanup, "class rollback failed");
            }
            return Err(err.into());
        }

        tracing::info!(class_id = %class.id, subject = %new_class.subject, "class created");
        Ok(class)
    }

    /// # Errors
    ///
    /// Returns `ClassServiceError::NotFound` if the class does not exist.
    /// Returns `ClassServiceError::Storage` if repository access fails.
    pub async fn class_detail(&self, class_id: &ClassId) -> Result<ClassDetail, ClassServiceError> {
        let class = self
            .classes
            .get_class(class_id)
            .await?
            .ok_or(ClassServiceError::NotFound)?;
        let students = self.students.list_enrolled(class_id).await?;
        Ok(ClassDetail { class, students })
    }

    /// Students not yet in the class, sorted by name.
    ///
    /// # Errors
    ///
    /// Returns `ClassServiceError::Storage` if repository access fails.
    pub async fn available_students(
        &self,
        class_id: &ClassId,
    ) -> Result<Vec<StudentProfile>, ClassServiceError> {
        let enrolled: HashSet<StudentId> = self
            .students
            .list_enrolled(class_id)
            .await?
            .into_iter()
            .map(|student| student.id)
            .collect();
        let fetch = u32::try_from(AVAILABLE_STUDENT_LIMIT + enrolled.len()).unwrap_or(u32::MAX);

        let mut available: Vec<StudentProfile> = self
            .students
            .list_students(fetch)
            .await?
            .into_iter()
            .filter(|student| !enrolled.contains(&student.id))
            .collect();
        available.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        available.truncate(AVAILABLE_STUDENT_LIMIT);
        Ok(available)
    }

    #[must_use]
    pub fn filter_students(students: &[StudentProfile], query: &str) -> Vec<StudentProfile> {
        let query = query.trim().to_lowercase();
        students
            .iter()
            .filter(|student| student.matches_query(&query))
            .cloned()
            .collect()
    }

    /// # Errors
    ///
    /// Returns `ClassServiceError::Storage` if the student is already enrolled
    /// or the write fails.
    pub async fn add_student(
        &self,
        class_id: &ClassId,
        student_id: &StudentId,
    ) -> Result<(), ClassServiceError> {
        self.students.enroll(class_id, student_id).await?;
        tracing::debug!(%class_id, %student_id, "student enrolled");
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `ClassServiceError::Storage` if the write fails.
    pub async fn remove_student(
        &self,
        class_id: &ClassId,
        student_id: &StudentId,
    ) -> Result<(), ClassServiceError> {
        self.students.unenroll(class_id, student_id).await?;
        tracing::debug!(%class_id, %student_id, "student removed");
        Ok(())
    }
}
