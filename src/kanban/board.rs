use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::{IntoParams, ToSchema};

use crate::error::BoardError;
use crate::model::role::Role;
use crate::model::task::{Column, ColumnColor, Priority, Task};
use crate::store::BoardStore;

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct BoardColumn {
    pub column: Column,
    pub tasks: Vec<Task>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
pub struct Board {
    pub columns: Vec<BoardColumn>,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams, ToSchema)]
pub struct TaskFilter {
    /// Case-insensitive match on title or description
    #[schema(example = "roster")]
    pub search: Option<String>,

    /// Assignee id, or `all`
    #[schema(example = "all")]
    pub assignee: Option<String>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct NewTask {
    #[schema(example = 3)]
    pub column_id: u64,

    #[schema(example = "Prepare monthly roster")]
    pub title: String,

    pub description: Option<String>,

    #[serde(default)]
    pub priority: Priority,

    #[schema(example = "2026-02-01", value_type = Option<String>, format = "date")]
    pub deadline: Option<NaiveDate>,

    pub assignee_id: Option<u64>,
}

/// Edits to an existing task. Absent fields stay as they are; an empty
/// description clears it.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct TaskUpdate {
    #[schema(example = "Prepare monthly roster", nullable = true)]
    pub title: Option<String>,

    #[schema(nullable = true)]
    pub description: Option<String>,

    #[schema(example = "high", nullable = true)]
    pub priority: Option<Priority>,

    #[schema(example = "2026-02-01", value_type = Option<String>, format = "date")]
    pub deadline: Option<NaiveDate>,

    #[schema(nullable = true)]
    pub assignee_id: Option<u64>,
}

fn clean_title(title: &str) -> Result<String, BoardError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(BoardError::EmptyTaskTitle);
    }
    Ok(title.to_string())
}

fn clean_name(name: &str) -> Result<String, BoardError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(BoardError::EmptyColumnName);
    }
    Ok(name.to_string())
}

/// Keeps tasks matching the search text and assignee. An empty search or an
/// assignee of `all` does not filter.
pub fn filter_tasks(tasks: Vec<Task>, filter: &TaskFilter) -> Vec<Task> {
    let needle = filter
        .search
        .as_deref()
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty());
    let assignee = filter
        .assignee
        .as_deref()
        .filter(|a| *a != "all")
        .map(|a| a.parse::<u64>().ok());

    tasks
        .into_iter()
        .filter(|task| {
            let text_ok = needle.as_ref().is_none_or(|needle| {
                task.title.to_lowercase().contains(needle)
                    || task
                        .description
                        .as_deref()
                        .is_some_and(|d| d.to_lowercase().contains(needle))
            });
            // an unparseable assignee matches nobody
            let assignee_ok = match assignee {
                None => true,
                Some(wanted) => wanted.is_some() && task.assignee_id == wanted,
            };
            text_ok && assignee_ok
        })
        .collect()
}

/// Places each task under its column. Tasks pointing at unknown columns are
/// dropped.
pub fn group_tasks(columns: Vec<Column>, tasks: Vec<Task>) -> Board {
    let mut board = Board {
        columns: columns
            .into_iter()
            .map(|column| BoardColumn {
                column,
                tasks: Vec::new(),
            })
            .collect(),
    };

    for task in tasks {
        if let Some(slot) = board
            .columns
            .iter_mut()
            .find(|c| c.column.id == task.column_id)
        {
            slot.tasks.push(task);
        }
    }
    board
}

#[derive(Clone)]
pub struct BoardService {
    store: Arc<dyn BoardStore>,
}

impl BoardService {
    pub fn new(store: Arc<dyn BoardStore>) -> Self {
        Self { store }
    }

    async fn team_column(&self, team_id: u64, column_id: u64) -> Result<Column, BoardError> {
        self.store
            .find_column(column_id)
            .await?
            .filter(|c| c.team_id == team_id)
            .ok_or(BoardError::ColumnNotFound(column_id))
    }

    async fn team_task(&self, team_id: u64, task_id: u64) -> Result<Task, BoardError> {
        self.store
            .find_task(task_id)
            .await?
            .filter(|t| t.team_id == team_id)
            .ok_or(BoardError::TaskNotFound(task_id))
    }

    pub async fn board(&self, team_id: u64, filter: &TaskFilter) -> Result<Board, BoardError> {
        let columns = self.store.columns(team_id).await?;
        let tasks = filter_tasks(self.store.tasks(team_id).await?, filter);
        Ok(group_tasks(columns, tasks))
    }

    /// New columns go to the end of the board.
    pub async fn create_column(
        &self,
        team_id: u64,
        name: &str,
        color: Option<ColumnColor>,
    ) -> Result<Column, BoardError> {
        let name = clean_name(name)?;
        let position = self.store.columns(team_id).await?.len() as u32;

        let column = self
            .store
            .insert_column(&Column {
                id: 0,
                team_id,
                name,
                position,
                color: color.unwrap_or_default(),
            })
            .await?;
        info!(team_id, column_id = column.id, "Column created");
        Ok(column)
    }

    pub async fn update_column(
        &self,
        team_id: u64,
        column_id: u64,
        name: Option<&str>,
        color: Option<ColumnColor>,
    ) -> Result<Column, BoardError> {
        let mut column = self.team_column(team_id, column_id).await?;
        if let Some(name) = name {
            column.name = clean_name(name)?;
        }
        if let Some(color) = color {
            column.color = color;
        }
        self.store.update_column(&column).await?;
        Ok(column)
    }

    pub async fn delete_column(
        &self,
        role: Role,
        team_id: u64,
        column_id: u64,
    ) -> Result<(), BoardError> {
        if !role.can_manage_board() {
            return Err(BoardError::Forbidden);
        }
        self.team_column(team_id, column_id).await?;
        if self.store.column_has_tasks(column_id).await? {
            return Err(BoardError::ColumnNotEmpty);
        }
        self.store.delete_column(column_id).await?;
        info!(team_id, column_id, "Column deleted");
        Ok(())
    }

    pub async fn create_task(
        &self,
        team_id: u64,
        creator_id: u64,
        new_task: NewTask,
        now: DateTime<Utc>,
    ) -> Result<Task, BoardError> {
        let title = clean_title(&new_task.title)?;
        let column = self.team_column(team_id, new_task.column_id).await?;

        let task = self
            .store
            .insert_task(&Task {
                id: 0,
                title,
                description: new_task.description.filter(|d| !d.trim().is_empty()),
                priority: new_task.priority,
                deadline: new_task.deadline,
                assignee_id: new_task.assignee_id,
                creator_id,
                team_id,
                status: column.name,
                column_id: column.id,
                created_at: now,
                updated_at: now,
                completed_at: None,
            })
            .await?;
        info!(team_id, task_id = task.id, column_id = task.column_id, "Task created");
        Ok(task)
    }

    pub async fn update_task(
        &self,
        team_id: u64,
        task_id: u64,
        update: TaskUpdate,
        now: DateTime<Utc>,
    ) -> Result<Task, BoardError> {
        let mut task = self.team_task(team_id, task_id).await?;
        if let Some(title) = update.title {
            task.title = clean_title(&title)?;
        }
        if let Some(description) = update.description {
            task.description = Some(description).filter(|d| !d.trim().is_empty());
        }
        if let Some(priority) = update.priority {
            task.priority = priority;
        }
        if let Some(deadline) = update.deadline {
            task.deadline = Some(deadline);
        }
        if let Some(assignee_id) = update.assignee_id {
            task.assignee_id = Some(assignee_id);
        }
        task.updated_at = now;

        self.store.update_task(&task).await?;
        info!(team_id, task_id, "Task updated");
        Ok(task)
    }

    /// The task's status follows the name of the column it lands in.
    pub async fn move_task(
        &self,
        team_id: u64,
        task_id: u64,
        column_id: u64,
        now: DateTime<Utc>,
    ) -> Result<Task, BoardError> {
        let column = self.team_column(team_id, column_id).await?;
        let task = Task {
            column_id: column.id,
            status: column.name,
            updated_at: now,
            ..self.team_task(team_id, task_id).await?
        };
        self.store.update_task(&task).await?;
        Ok(task)
    }

    pub async fn delete_task(&self, team_id: u64, task_id: u64) -> Result<(), BoardError> {
        self.team_task(team_id, task_id).await?;
        self.store.delete_task(task_id).await?;
        info!(team_id, task_id, "Task deleted");
        Ok(())
    }
}
