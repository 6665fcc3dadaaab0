//! Collaborator capabilities the attendance and board services call into.
//!
//! Services receive these as `Arc<dyn ...>` so tests can swap in the
//! in-memory doubles from [`memory`].

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;

use crate::model::settings::AttendanceSettings;
use crate::model::shift::{ShiftConfig, ShiftRecord, ShiftType};
use crate::model::task::{Column, Task};

#[cfg(test)]
pub mod memory;
pub mod mysql;

#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn find_record(
        &self,
        user_id: u64,
        date: NaiveDate,
        shift_type: ShiftType,
    ) -> Result<Option<ShiftRecord>>;

    async fn find_by_id(&self, id: u64) -> Result<Option<ShiftRecord>>;

    /// Inserts or updates by `(user_id, date, shift_type)` and returns the
    /// stored record with its id.
    async fn upsert_record(&self, record: &ShiftRecord) -> Result<ShiftRecord>;

    /// Latest records first.
    async fn list_records(&self, user_id: u64, limit: u32) -> Result<Vec<ShiftRecord>>;

    async fn list_records_for_date(&self, user_id: u64, date: NaiveDate)
    -> Result<Vec<ShiftRecord>>;
}

#[async_trait]
pub trait TeamDirectory: Send + Sync {
    async fn attendance_settings(&self, team_id: u64) -> Result<Option<AttendanceSettings>>;

    async fn shift_configs(&self, team_id: u64) -> Result<Vec<ShiftConfig>>;
}

#[async_trait]
pub trait BoardStore: Send + Sync {
    /// Ordered by position.
    async fn columns(&self, team_id: u64) -> Result<Vec<Column>>;

    async fn find_column(&self, id: u64) -> Result<Option<Column>>;

    async fn insert_column(&self, column: &Column) -> Result<Column>;

    async fn update_column(&self, column: &Column) -> Result<()>;

    async fn delete_column(&self, id: u64) -> Result<()>;

    /// Newest first.
    async fn tasks(&self, team_id: u64) -> Result<Vec<Task>>;

    async fn column_has_tasks(&self, column_id: u64) -> Result<bool>;

    async fn find_task(&self, id: u64) -> Result<Option<Task>>;

    async fn insert_task(&self, task: &Task) -> Result<Task>;

    async fn update_task(&self, task: &Task) -> Result<()>;

    async fn delete_task(&self, id: u64) -> Result<()>;
}
