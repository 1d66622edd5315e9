use async_trait::async_trait;
use rollcall_core::model::{ClassId, StudentId, StudentProfile};

use super::SupabaseBackend;
use super::mapping::{EnrollmentInsert, EnrollmentRow, StudentRow, eq};
use crate::repository::{StorageError, StudentRepository};

const STUDENT_COLUMNS: &str = "id,name,email,roll_number";

#[async_trait]
impl StudentRepository for SupabaseBackend {
    async fn list_enrolled(&self, class_id: &ClassId) -> Result<Vec<StudentProfile>, StorageError> {
        let rows: Vec<EnrollmentRow> = self
            .select(
                "class_students",
                &[
                    (
                        "select",
                        format!("student:students!inner({STUDENT_COLUMNS})"),
                    ),
                    ("class_id", eq(class_id)),
                ],
            )
            .await?;
        Ok(rows
            .into_iter()
            .map(|row| StudentProfile::from(row.student))
            .collect())
    }

    async fn count_enrolled(&self, class_id: &ClassId) -> Result<u32, StorageError> {
        self.count(
            "class_students",
            &[
                ("select", "student_id".to_string()),
                ("class_id", eq(class_id)),
            ],
        )
        .await
    }

    async fn list_students(&self, limit: u32) -> Result<Vec<StudentProfile>, StorageError> {
        let rows: Vec<StudentRow> = self
            .select(
                "students",
                &[
                    ("select", STUDENT_COLUMNS.to_string()),
                    ("order", "name.asc".to_string()),
                    ("limit", limit.to_string()),
                ],
            )
            .await?;
        Ok(rows.into_iter().map(StudentProfile::from).collect())
    }

    async fn enroll(&self, class_id: &ClassId, student_id: &StudentId) -> Result<(), StorageError> {
        let body = EnrollmentInsert {
            class_id,
            student_id,
        };
        self.insert("class_students", &body, &[], "return=minimal")
            .await?;
        Ok(())
    }

    async fn unenroll(
        &self,
        class_id: &ClassId,
        student_id: &StudentId,
    ) -> Result<(), StorageError> {
        self.delete(
            "class_students",
            &[("class_id", eq(class_id)), ("student_id", eq(student_id))],
        )
        .await
    }
}
