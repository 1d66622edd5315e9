use async_trait::async_trait;
use rollcall_core::model::{ClassAssignment, StaffId, StaffProfile, UserId};

use super::SupabaseBackend;
use super::mapping::{AssignmentInsert, AssignmentRow, CLASS_COLUMNS, StaffRow, eq};
use crate::repository::{NewAssignmentRecord, StaffRepository, StorageError};

#[async_trait]
impl StaffRepository for SupabaseBackend {
    async fn find_staff_by_user(
        &self,
        user_id: &UserId,
    ) -> Result<Option<StaffProfile>, StorageError> {
        let rows: Vec<StaffRow> = self
            .select(
                "staff",
                &[
                    ("select", "id,user_id,name".to_string()),
                    ("user_id", eq(user_id)),
                    ("limit", "1".to_string()),
                ],
            )
            .await?;
        Ok(rows.into_iter().next().map(StaffProfile::from))
    }

    async fn list_assignments(
        &self,
        staff_id: &StaffId,
        limit: Option<u32>,
    ) -> Result<Vec<ClassAssignment>, StorageError> {
        let mut query = vec![
            ("select", format!("subject,class:classes!inner({CLASS_COLUMNS})")),
            ("staff_id", eq(staff_id)),
        ];
        if let Some(limit) = limit {
            query.push(("limit", limit.to_string()));
        }
        let rows: Vec<AssignmentRow> = self.select("class_staff", &query).await?;
        Ok(rows.into_iter().map(ClassAssignment::from).collect())
    }

    async fn insert_assignment(&self, record: &NewAssignmentRecord) -> Result<(), StorageError> {
        let body = AssignmentInsert {
            class_id: &record.class_id,
            staff_id: &record.staff_id,
            subject: &record.subject,
            role: &record.role,
        };
        self.insert("class_staff", &body, &[], "return=minimal")
            .await?;
        Ok(())
    }
}
