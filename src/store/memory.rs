use std::collections::HashMap;
use std::sync::Mutex;

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use chrono::NaiveDate;

use super::{BoardStore, RecordStore, TeamDirectory};
use crate::model::settings::AttendanceSettings;
use crate::model::shift::{ShiftConfig, ShiftRecord, ShiftType};
use crate::model::task::{Column, Task};

#[derive(Default)]
pub struct MemoryRecordStore {
    records: Mutex<Vec<ShiftRecord>>,
}

impl MemoryRecordStore {
    pub fn with_records(records: Vec<ShiftRecord>) -> Self {
        Self {
            records: Mutex::new(records),
        }
    }

    pub fn snapshot(&self) -> Vec<ShiftRecord> {
        self.records.lock().unwrap().clone()
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn find_record(
        &self,
        user_id: u64,
        date: NaiveDate,
        shift_type: ShiftType,
    ) -> Result<Option<ShiftRecord>> {
        let records = self.records.lock().unwrap();
        Ok(records
            .iter()
            .find(|r| r.natural_key() == (user_id, date, shift_type))
            .cloned())
    }

    async fn find_by_id(&self, id: u64) -> Result<Option<ShiftRecord>> {
        let records = self.records.lock().unwrap();
        Ok(records.iter().find(|r| r.id == id).cloned())
    }

    async fn upsert_record(&self, record: &ShiftRecord) -> Result<ShiftRecord> {
        let mut records = self.records.lock().unwrap();
        let key = record.natural_key();

        if let Some(existing) = records.iter_mut().find(|r| r.natural_key() == key) {
            let id = existing.id;
            *existing = ShiftRecord {
                id,
                ..record.clone()
            };
            return Ok(existing.clone());
        }

        let id = records.iter().map(|r| r.id).max().unwrap_or(0) + 1;
        let stored = ShiftRecord {
            id,
            ..record.clone()
        };
        records.push(stored.clone());
        Ok(stored)
    }

    async fn list_records(&self, user_id: u64, limit: u32) -> Result<Vec<ShiftRecord>> {
        let mut mine: Vec<_> = self
            .records
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect();
        mine.sort_by(|a, b| b.date.cmp(&a.date));
        mine.truncate(limit as usize);
        Ok(mine)
    }

    async fn list_records_for_date(
        &self,
        user_id: u64,
        date: NaiveDate,
    ) -> Result<Vec<ShiftRecord>> {
        let records = self.records.lock().unwrap();
        Ok(records
            .iter()
            .filter(|r| r.user_id == user_id && r.date == date)
            .cloned()
            .collect())
    }
}

/// A store whose every call fails, for error-path tests.
pub struct FailingRecordStore;

#[async_trait]
impl RecordStore for FailingRecordStore {
    async fn find_record(&self, _: u64, _: NaiveDate, _: ShiftType) -> Result<Option<ShiftRecord>> {
        Err(anyhow!("connection refused"))
    }

    async fn find_by_id(&self, _: u64) -> Result<Option<ShiftRecord>> {
        Err(anyhow!("connection refused"))
    }

    async fn upsert_record(&self, _: &ShiftRecord) -> Result<ShiftRecord> {
        Err(anyhow!("connection refused"))
    }

    async fn list_records(&self, _: u64, _: u32) -> Result<Vec<ShiftRecord>> {
        Err(anyhow!("connection refused"))
    }

    async fn list_records_for_date(&self, _: u64, _: NaiveDate) -> Result<Vec<ShiftRecord>> {
        Err(anyhow!("connection refused"))
    }
}

#[derive(Default)]
pub struct MemoryTeamDirectory {
    pub settings: HashMap<u64, AttendanceSettings>,
    pub shifts: HashMap<u64, Vec<ShiftConfig>>,
}

#[async_trait]
impl TeamDirectory for MemoryTeamDirectory {
    async fn attendance_settings(&self, team_id: u64) -> Result<Option<AttendanceSettings>> {
        Ok(self.settings.get(&team_id).cloned())
    }

    async fn shift_configs(&self, team_id: u64) -> Result<Vec<ShiftConfig>> {
        Ok(self.shifts.get(&team_id).cloned().unwrap_or_default())
    }
}

#[derive(Default)]
pub struct MemoryBoardStore {
    columns: Mutex<Vec<Column>>,
    tasks: Mutex<Vec<Task>>,
}

impl MemoryBoardStore {
    pub fn task_count(&self) -> usize {
        self.tasks.lock().unwrap().len()
    }
}

#[async_trait]
impl BoardStore for MemoryBoardStore {
    async fn columns(&self, team_id: u64) -> Result<Vec<Column>> {
        let mut columns: Vec<_> = self
            .columns
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.team_id == team_id)
            .cloned()
            .collect();
        columns.sort_by_key(|c| c.position);
        Ok(columns)
    }

    async fn find_column(&self, id: u64) -> Result<Option<Column>> {
        Ok(self.columns.lock().unwrap().iter().find(|c| c.id == id).cloned())
    }

    async fn insert_column(&self, column: &Column) -> Result<Column> {
        let mut columns = self.columns.lock().unwrap();
        let id = columns.iter().map(|c| c.id).max().unwrap_or(0) + 1;
        let stored = Column {
            id,
            ..column.clone()
        };
        columns.push(stored.clone());
        Ok(stored)
    }

    async fn update_column(&self, column: &Column) -> Result<()> {
        let mut columns = self.columns.lock().unwrap();
        if let Some(existing) = columns.iter_mut().find(|c| c.id == column.id) {
            *existing = column.clone();
        }
        Ok(())
    }

    async fn delete_column(&self, id: u64) -> Result<()> {
        self.columns.lock().unwrap().retain(|c| c.id != id);
        Ok(())
    }

    async fn tasks(&self, team_id: u64) -> Result<Vec<Task>> {
        let mut tasks: Vec<_> = self
            .tasks
            .lock()
            .unwrap()
            .iter()
            .filter(|t| t.team_id == team_id)
            .cloned()
            .collect();
        tasks.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(tasks)
    }

    async fn column_has_tasks(&self, column_id: u64) -> Result<bool> {
        Ok(self.tasks.lock().unwrap().iter().any(|t| t.column_id == column_id))
    }

    async fn find_task(&self, id: u64) -> Result<Option<Task>> {
        Ok(self.tasks.lock().unwrap().iter().find(|t| t.id == id).cloned())
    }

    async fn insert_task(&self, task: &Task) -> Result<Task> {
        let mut tasks = self.tasks.lock().unwrap();
        let id = tasks.iter().map(|t| t.id).max().unwrap_or(0) + 1;
        let stored = Task {
            id,
            ..task.clone()
        };
        tasks.push(stored.clone());
        Ok(stored)
    }

    async fn update_task(&self, task: &Task) -> Result<()> {
        let mut tasks = self.tasks.lock().unwrap();
        if let Some(existing) = tasks.iter_mut().find(|t| t.id == task.id) {
            *existing = task.clone();
        }
        Ok(())
    }

    async fn delete_task(&self, id: u64) -> Result<()> {
        self.tasks.lock().unwrap().retain(|t| t.id != id);
        Ok(())
    }
}
