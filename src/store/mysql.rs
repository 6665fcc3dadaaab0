use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use sqlx::{FromRow, MySqlPool};

use super::{BoardStore, RecordStore, TeamDirectory};
use crate::attendance::geofence::GeoPoint;
use crate::model::settings::AttendanceSettings;
use crate::model::shift::{ShiftConfig, ShiftRecord, ShiftStatus, ShiftType};
use crate::model::task::{Column, ColumnColor, Priority, Task};

/* =========================
Shift attendance records
========================= */

const RECORD_COLUMNS: &str = r#"
    id, user_id, shift_type, date, check_in, check_out,
    status, location, location_out, notes
"#;

#[derive(FromRow)]
struct ShiftRecordRow {
    id: u64,
    user_id: u64,
    shift_type: String,
    date: NaiveDate,
    check_in: Option<DateTime<Utc>>,
    check_out: Option<DateTime<Utc>>,
    status: String,
    location: Option<String>,
    location_out: Option<String>,
    notes: Option<String>,
}

impl TryFrom<ShiftRecordRow> for ShiftRecord {
    type Error = anyhow::Error;

    fn try_from(row: ShiftRecordRow) -> Result<Self> {
        let shift_type = row
            .shift_type
            .parse::<ShiftType>()
            .map_err(|_| anyhow!("record {} has unknown shift type {:?}", row.id, row.shift_type))?;

        Ok(ShiftRecord {
            id: row.id,
            user_id: row.user_id,
            shift_type,
            date: row.date,
            check_in: row.check_in,
            check_out: row.check_out,
            status: ShiftStatus::from_stored(&row.status),
            location: row.location,
            location_out: row.location_out,
            notes: row.notes,
        })
    }
}

fn into_records(rows: Vec<ShiftRecordRow>) -> Result<Vec<ShiftRecord>> {
    rows.into_iter().map(ShiftRecord::try_from).collect()
}

#[derive(Clone)]
pub struct MySqlRecordStore {
    pool: MySqlPool,
}

impl MySqlRecordStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RecordStore for MySqlRecordStore {
    async fn find_record(
        &self,
        user_id: u64,
        date: NaiveDate,
        shift_type: ShiftType,
    ) -> Result<Option<ShiftRecord>> {
        let sql = format!(
            "SELECT {RECORD_COLUMNS} FROM shift_attendance \
             WHERE user_id = ? AND date = ? AND shift_type = ? LIMIT 1"
        );
        let row = sqlx::query_as::<_, ShiftRecordRow>(&sql)
            .bind(user_id)
            .bind(date)
            .bind(shift_type.to_string())
            .fetch_optional(&self.pool)
            .await
            .context("failed to look up shift record")?;

        row.map(ShiftRecord::try_from).transpose()
    }

    async fn find_by_id(&self, id: u64) -> Result<Option<ShiftRecord>> {
        let sql = format!("SELECT {RECORD_COLUMNS} FROM shift_attendance WHERE id = ?");
        let row = sqlx::query_as::<_, ShiftRecordRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .with_context(|| format!("failed to load shift record {id}"))?;

        row.map(ShiftRecord::try_from).transpose()
    }

    async fn upsert_record(&self, record: &ShiftRecord) -> Result<ShiftRecord> {
        // (user_id, date, shift_type) carries a unique index
        sqlx::query(
            r#"
            INSERT INTO shift_attendance
                (user_id, shift_type, date, check_in, check_out, status, location, location_out, notes)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON DUPLICATE KEY UPDATE
                check_in = VALUES(check_in),
                check_out = VALUES(check_out),
                status = VALUES(status),
                location = VALUES(location),
                location_out = VALUES(location_out),
                notes = VALUES(notes)
            "#,
        )
        .bind(record.user_id)
        .bind(record.shift_type.to_string())
        .bind(record.date)
        .bind(record.check_in)
        .bind(record.check_out)
        .bind(record.status.as_str())
        .bind(record.location.as_deref())
        .bind(record.location_out.as_deref())
        .bind(record.notes.as_deref())
        .execute(&self.pool)
        .await
        .context("failed to upsert shift record")?;

        let (user_id, date, shift_type) = record.natural_key();
        self.find_record(user_id, date, shift_type)
            .await?
            .ok_or_else(|| anyhow!("shift record vanished after upsert"))
    }

    async fn list_records(&self, user_id: u64, limit: u32) -> Result<Vec<ShiftRecord>> {
        let sql = format!(
            "SELECT {RECORD_COLUMNS} FROM shift_attendance \
             WHERE user_id = ? ORDER BY date DESC LIMIT ?"
        );
        let rows = sqlx::query_as::<_, ShiftRecordRow>(&sql)
            .bind(user_id)
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .context("failed to list shift records")?;

        into_records(rows)
    }

    async fn list_records_for_date(
        &self,
        user_id: u64,
        date: NaiveDate,
    ) -> Result<Vec<ShiftRecord>> {
        let sql = format!(
            "SELECT {RECORD_COLUMNS} FROM shift_attendance \
             WHERE user_id = ? AND date = ? ORDER BY shift_type"
        );
        let rows = sqlx::query_as::<_, ShiftRecordRow>(&sql)
            .bind(user_id)
            .bind(date)
            .fetch_all(&self.pool)
            .await
            .context("failed to list shift records for date")?;

        into_records(rows)
    }
}

/* =========================
Team settings and shift schedule
========================= */

#[derive(FromRow)]
struct SettingsRow {
    office_latitude: Option<f64>,
    office_longitude: Option<f64>,
    check_in_radius_meters: f64,
}

#[derive(FromRow)]
struct ShiftConfigRow {
    shift_type: String,
    start_time: Option<NaiveTime>,
    end_time: Option<NaiveTime>,
    required: bool,
}

#[derive(Clone)]
pub struct MySqlTeamDirectory {
    pool: MySqlPool,
}

impl MySqlTeamDirectory {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TeamDirectory for MySqlTeamDirectory {
    async fn attendance_settings(&self, team_id: u64) -> Result<Option<AttendanceSettings>> {
        let row = sqlx::query_as::<_, SettingsRow>(
            r#"
            SELECT office_latitude, office_longitude, check_in_radius_meters
            FROM attendance_settings
            WHERE team_id = ?
            "#,
        )
        .bind(team_id)
        .fetch_optional(&self.pool)
        .await
        .context("failed to load attendance settings")?;

        Ok(row.map(|row| {
            let office = match (row.office_latitude, row.office_longitude) {
                (Some(lat), Some(lon)) => {
                    let point = GeoPoint::new(lat, lon);
                    if point.is_none() {
                        tracing::warn!(team_id, lat, lon, "Ignoring invalid office coordinates");
                    }
                    point
                }
                _ => None,
            };
            AttendanceSettings {
                office,
                radius_meters: row.check_in_radius_meters,
            }
        }))
    }

    async fn shift_configs(&self, team_id: u64) -> Result<Vec<ShiftConfig>> {
        let rows = sqlx::query_as::<_, ShiftConfigRow>(
            r#"
            SELECT shift_type, start_time, end_time, required
            FROM shift_configurations
            WHERE team_id = ?
            ORDER BY start_time
            "#,
        )
        .bind(team_id)
        .fetch_all(&self.pool)
        .await
        .context("failed to load shift configurations")?;

        let configs = rows
            .into_iter()
            .filter_map(|row| match row.shift_type.parse::<ShiftType>() {
                Ok(shift_type) => Some(ShiftConfig {
                    shift_type,
                    start_time: row.start_time.unwrap_or(NaiveTime::MIN),
                    end_time: row.end_time.unwrap_or(NaiveTime::MIN),
                    required: row.required,
                }),
                Err(_) => {
                    tracing::warn!(team_id, shift_type = %row.shift_type, "Skipping unknown shift type");
                    None
                }
            })
            .collect();

        Ok(configs)
    }
}

/* =========================
Kanban board
========================= */

#[derive(FromRow)]
struct ColumnRow {
    id: u64,
    team_id: u64,
    name: String,
    position: u32,
    color: String,
}

impl From<ColumnRow> for Column {
    fn from(row: ColumnRow) -> Self {
        Column {
            id: row.id,
            team_id: row.team_id,
            name: row.name,
            position: row.position,
            color: ColumnColor::from_stored(&row.color),
        }
    }
}

const TASK_COLUMNS: &str = r#"
    id, title, description, priority, deadline, assignee_id, creator_id,
    team_id, status, column_id, created_at, updated_at, completed_at
"#;

#[derive(FromRow)]
struct TaskRow {
    id: u64,
    title: String,
    description: Option<String>,
    priority: String,
    deadline: Option<NaiveDate>,
    assignee_id: Option<u64>,
    creator_id: u64,
    team_id: u64,
    status: String,
    column_id: u64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
}

impl From<TaskRow> for Task {
    fn from(row: TaskRow) -> Self {
        Task {
            id: row.id,
            title: row.title,
            description: row.description,
            priority: Priority::from_stored(&row.priority),
            deadline: row.deadline,
            assignee_id: row.assignee_id,
            creator_id: row.creator_id,
            team_id: row.team_id,
            status: row.status,
            column_id: row.column_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
            completed_at: row.completed_at,
        }
    }
}

#[derive(Clone)]
pub struct MySqlBoardStore {
    pool: MySqlPool,
}

impl MySqlBoardStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BoardStore for MySqlBoardStore {
    async fn columns(&self, team_id: u64) -> Result<Vec<Column>> {
        let rows = sqlx::query_as::<_, ColumnRow>(
            "SELECT id, team_id, name, position, color FROM task_columns \
             WHERE team_id = ? ORDER BY position ASC",
        )
        .bind(team_id)
        .fetch_all(&self.pool)
        .await
        .context("failed to list columns")?;

        Ok(rows.into_iter().map(Column::from).collect())
    }

    async fn find_column(&self, id: u64) -> Result<Option<Column>> {
        let row = sqlx::query_as::<_, ColumnRow>(
            "SELECT id, team_id, name, position, color FROM task_columns WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .with_context(|| format!("failed to load column {id}"))?;

        Ok(row.map(Column::from))
    }

    async fn insert_column(&self, column: &Column) -> Result<Column> {
        let result = sqlx::query(
            "INSERT INTO task_columns (team_id, name, position, color) VALUES (?, ?, ?, ?)",
        )
        .bind(column.team_id)
        .bind(&column.name)
        .bind(column.position)
        .bind(column.color.as_ref())
        .execute(&self.pool)
        .await
        .context("failed to insert column")?;

        Ok(Column {
            id: result.last_insert_id(),
            ..column.clone()
        })
    }

    async fn update_column(&self, column: &Column) -> Result<()> {
        sqlx::query("UPDATE task_columns SET name = ?, position = ?, color = ? WHERE id = ?")
            .bind(&column.name)
            .bind(column.position)
            .bind(column.color.as_ref())
            .bind(column.id)
            .execute(&self.pool)
            .await
            .with_context(|| format!("failed to update column {}", column.id))?;
        Ok(())
    }

    async fn delete_column(&self, id: u64) -> Result<()> {
        sqlx::query("DELETE FROM task_columns WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .with_context(|| format!("failed to delete column {id}"))?;
        Ok(())
    }

    async fn tasks(&self, team_id: u64) -> Result<Vec<Task>> {
        let sql = format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE team_id = ? ORDER BY created_at DESC"
        );
        let rows = sqlx::query_as::<_, TaskRow>(&sql)
            .bind(team_id)
            .fetch_all(&self.pool)
            .await
            .context("failed to list tasks")?;

        Ok(rows.into_iter().map(Task::from).collect())
    }

    async fn column_has_tasks(&self, column_id: u64) -> Result<bool> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM tasks WHERE column_id = ? LIMIT 1)")
            .bind(column_id)
            .fetch_one(&self.pool)
            .await
            .context("failed to check column tasks")
    }

    async fn find_task(&self, id: u64) -> Result<Option<Task>> {
        let sql = format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?");
        let row = sqlx::query_as::<_, TaskRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .with_context(|| format!("failed to load task {id}"))?;

        Ok(row.map(Task::from))
    }

    async fn insert_task(&self, task: &Task) -> Result<Task> {
        let result = sqlx::query(
            r#"
            INSERT INTO tasks
                (title, description, priority, deadline, assignee_id, creator_id,
                 team_id, status, column_id, created_at, updated_at, completed_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&task.title)
        .bind(task.description.as_deref())
        .bind(task.priority.as_ref())
        .bind(task.deadline)
        .bind(task.assignee_id)
        .bind(task.creator_id)
        .bind(task.team_id)
        .bind(&task.status)
        .bind(task.column_id)
        .bind(task.created_at)
        .bind(task.updated_at)
        .bind(task.completed_at)
        .execute(&self.pool)
        .await
        .context("failed to insert task")?;

        Ok(Task {
            id: result.last_insert_id(),
            ..task.clone()
        })
    }

    async fn update_task(&self, task: &Task) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE tasks
            SET title = ?, description = ?, priority = ?, deadline = ?, assignee_id = ?,
                status = ?, column_id = ?, updated_at = ?, completed_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&task.title)
        .bind(task.description.as_deref())
        .bind(task.priority.as_ref())
        .bind(task.deadline)
        .bind(task.assignee_id)
        .bind(&task.status)
        .bind(task.column_id)
        .bind(task.updated_at)
        .bind(task.completed_at)
        .bind(task.id)
        .execute(&self.pool)
        .await
        .with_context(|| format!("failed to update task {}", task.id))?;
        Ok(())
    }

    async fn delete_task(&self, id: u64) -> Result<()> {
        sqlx::query("DELETE FROM tasks WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .with_context(|| format!("failed to delete task {id}"))?;
        Ok(())
    }
}
