use async_trait::async_trait;
use chrono::NaiveDate;
use rollcall_core::model::{AttendanceRecord, AttendanceStatus, ClassId};

use super::SupabaseBackend;
use super::mapping::{DateRow, StatusRow, eq, in_list};
use crate::repository::{AttendanceRepository, StorageError};

#[async_trait]
impl AttendanceRepository for SupabaseBackend {
    async fn insert_records(&self, records: &[AttendanceRecord]) -> Result<(), StorageError> {
        if records.is_empty() {
            return Ok(());
        }
        self.insert("attendance", records, &[], "return=minimal")
            .await?;
        tracing::info!(rows = records.len(), "attendance written");
        Ok(())
    }

    async fn statuses_on(
        &self,
        class_ids: &[ClassId],
        date: NaiveDate,
    ) -> Result<Vec<AttendanceStatus>, StorageError> {
        if class_ids.is_empty() {
            return Ok(Vec::new());
        }
        let rows: Vec<StatusRow> = self
            .select(
                "attendance",
                &[
                    ("select", "status".to_string()),
                    ("class_id", in_list(class_ids.iter().map(ClassId::as_str))),
                    ("date", eq(date)),
                ],
            )
            .await?;
        Ok(rows.into_iter().map(|row| row.status).collect())
    }

    async fn latest_session_date(
        &self,
        class_id: &ClassId,
        subject: &str,
        since: NaiveDate,
    ) -> Result<Option<NaiveDate>, StorageError> {
        let rows: Vec<DateRow> = self
            .select(
                "attendance",
                &[
                    ("select", "date".to_string()),
                    ("class_id", eq(class_id)),
                    ("subject", eq(subject)),
                    ("date", format!("gte.{since}")),
                    ("order", "date.desc".to_string()),
                    ("limit", "1".to_string()),
                ],
            )
            .await?;
        Ok(rows.into_iter().next().map(|row| row.date))
    }

    async fn statuses_for_session(
        &self,
        class_id: &ClassId,
        subject: &str,
        date: NaiveDate,
    ) -> Result<Vec<AttendanceStatus>, StorageError> {
        let rows: Vec<StatusRow> = self
            .select(
                "attendance",
                &[
                    ("select", "status".to_string()),
                    ("class_id", eq(class_id)),
                    ("subject", eq(subject)),
                    ("date", eq(date)),
                ],
            )
            .await?;
        Ok(rows.into_iter().map(|row| row.status).collect())
    }
}
