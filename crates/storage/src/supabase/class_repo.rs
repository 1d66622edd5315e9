use async_trait::async_trait;
use rollcall_core::model::{ClassId, ClassInfo, NewClass, Program};

use super::mapping::{CLASS_COLUMNS, ClassRow, NewClassRow, ProgramRow, eq};
use super::{SupabaseBackend, decode};
use crate::repository::{ClassRepository, StorageError};

#[async_trait]
impl ClassRepository for SupabaseBackend {
    async fn get_class(&self, id: &ClassId) -> Result<Option<ClassInfo>, StorageError> {
        let rows: Vec<ClassRow> = self
            .select(
                "classes",
                &[("select", CLASS_COLUMNS.to_string()), ("id", eq(id))],
            )
            .await?;
        Ok(rows.into_iter().next().map(ClassInfo::from))
    }

    async fn insert_class(&self, class: &NewClass) -> Result<ClassInfo, StorageError> {
        let response = self
            .insert(
                "classes",
                &[NewClassRow::from(class)],
                &[("select", CLASS_COLUMNS.to_string())],
                "return=representation",
            )
            .await?;
        let rows: Vec<ClassRow> = response.json().await.map_err(decode)?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| StorageError::Serialization("insert returned no rows".into()))?;
        tracing::info!(class_id = %row.id, "class created");
        Ok(row.into())
    }

    async fn delete_class(&self, id: &ClassId) -> Result<(), StorageError> {
        self.delete("classes", &[("id", eq(id))]).await
    }

    async fn list_programs(&self) -> Result<Vec<Program>, StorageError> {
        let rows: Vec<ProgramRow> = self
            .select(
                "programs",
                &[
                    ("select", "id,name".to_string()),
                    ("order", "name.asc".to_string()),
                ],
            )
            .await?;
        Ok(rows.into_iter().map(Program::from).collect())
    }
}
