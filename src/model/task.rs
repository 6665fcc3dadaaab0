use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, EnumString};
use utoipa::ToSchema;

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema, EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema, EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ColumnColor {
    #[default]
    Gray,
    Red,
    Orange,
    Yellow,
    Green,
    Blue,
    Purple,
    Pink,
}

impl Priority {
    /// Unknown stored priorities read as the default.
    pub fn from_stored(value: &str) -> Self {
        value.parse().unwrap_or_else(|_| {
            tracing::warn!(priority = value, "Unrecognized task priority, using default");
            Priority::default()
        })
    }
}

impl ColumnColor {
    /// Unknown stored colors read as the default.
    pub fn from_stored(value: &str) -> Self {
        value.parse().unwrap_or_else(|_| {
            tracing::warn!(color = value, "Unrecognized column color, using default");
            ColumnColor::default()
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Column {
    #[schema(example = 3)]
    pub id: u64,

    #[schema(example = 12)]
    pub team_id: u64,

    #[schema(example = "In progress")]
    pub name: String,

    #[schema(example = 1)]
    pub position: u32,

    #[schema(example = "blue")]
    pub color: ColumnColor,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Task {
    #[schema(example = 41)]
    pub id: u64,

    #[schema(example = "Prepare monthly roster")]
    pub title: String,

    #[schema(nullable = true)]
    pub description: Option<String>,

    #[schema(example = "high")]
    pub priority: Priority,

    #[schema(example = "2026-02-01", value_type = Option<String>, format = "date")]
    pub deadline: Option<NaiveDate>,

    #[schema(example = 1000, nullable = true)]
    pub assignee_id: Option<u64>,

    #[schema(example = 1001)]
    pub creator_id: u64,

    #[schema(example = 12)]
    pub team_id: u64,

    /// Name of the column the task was last placed in
    #[schema(example = "In progress")]
    pub status: String,

    #[schema(example = 3)]
    pub column_id: u64,

    #[schema(example = "2026-01-01T00:00:00Z", value_type = String, format = "date-time")]
    pub created_at: DateTime<Utc>,

    #[schema(example = "2026-01-01T00:00:00Z", value_type = String, format = "date-time")]
    pub updated_at: DateTime<Utc>,

    #[schema(value_type = Option<String>, format = "date-time")]
    pub completed_at: Option<DateTime<Utc>>,
}
