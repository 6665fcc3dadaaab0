use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use utoipa::ToSchema;

use crate::error::AttendanceError;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
    Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ShiftType {
    Morning,
    Afternoon,
    Overtime,
}

/// Persisted state of a single shift record.
///
/// `Unrecognized` is never produced by this service; it only shows up when a
/// stored value matches none of the known states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ShiftStatus {
    Pending,
    CheckedIn,
    Completed,
    Absent,
    #[serde(other)]
    #[strum(disabled)]
    Unrecognized,
}

impl ShiftStatus {
    pub fn as_str(&self) -> &str {
        match self {
            ShiftStatus::Pending => "pending",
            ShiftStatus::CheckedIn => "checked_in",
            ShiftStatus::Completed => "completed",
            ShiftStatus::Absent => "absent",
            ShiftStatus::Unrecognized => "unrecognized",
        }
    }

    /// Maps a stored status column onto the enum, falling back to
    /// `Unrecognized` instead of guessing.
    pub fn from_stored(value: &str) -> Self {
        value.parse().unwrap_or_else(|_| {
            tracing::warn!(status = value, "Unrecognized shift status in record");
            ShiftStatus::Unrecognized
        })
    }
}

impl std::fmt::Display for ShiftStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A team's schedule for one kind of shift.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ShiftConfig {
    #[schema(example = "morning")]
    pub shift_type: ShiftType,

    #[schema(example = "08:00:00", value_type = String)]
    pub start_time: NaiveTime,

    #[schema(example = "12:00:00", value_type = String)]
    pub end_time: NaiveTime,

    #[schema(example = true)]
    pub required: bool,
}

// Oldest and newest dates a record may carry.
const EARLIEST_RECORD_DATE: (i32, u32, u32) = (2000, 1, 1);
const LATEST_RECORD_DATE: (i32, u32, u32) = (2100, 12, 31);

/// Whether `date` lies in the range records and reports may refer to.
pub fn is_record_date(date: NaiveDate) -> bool {
    let (y, m, d) = EARLIEST_RECORD_DATE;
    let earliest = NaiveDate::from_ymd_opt(y, m, d);
    let (y, m, d) = LATEST_RECORD_DATE;
    let latest = NaiveDate::from_ymd_opt(y, m, d);

    earliest.is_none_or(|e| date >= e) && latest.is_none_or(|l| date <= l)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ShiftRecord {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = 1000)]
    pub user_id: u64,

    #[schema(example = "morning")]
    pub shift_type: ShiftType,

    #[schema(example = "2026-01-05", value_type = String, format = "date")]
    pub date: NaiveDate,

    #[schema(example = "2026-01-05T08:01:00Z", value_type = Option<String>, format = "date-time")]
    pub check_in: Option<DateTime<Utc>>,

    #[schema(example = "2026-01-05T12:03:00Z", value_type = Option<String>, format = "date-time")]
    pub check_out: Option<DateTime<Utc>>,

    #[schema(example = "completed")]
    pub status: ShiftStatus,

    #[schema(example = "10.7769, 106.7009", nullable = true)]
    pub location: Option<String>,

    #[schema(example = "10.7769, 106.7009", nullable = true)]
    pub location_out: Option<String>,

    #[schema(nullable = true)]
    pub notes: Option<String>,
}

impl ShiftRecord {
    /// A fresh record for the natural key `(user_id, date, shift_type)`.
    /// The store assigns the id on first upsert.
    pub fn new(user_id: u64, date: NaiveDate, shift_type: ShiftType) -> Self {
        Self {
            id: 0,
            user_id,
            shift_type,
            date,
            check_in: None,
            check_out: None,
            status: ShiftStatus::Pending,
            location: None,
            location_out: None,
            notes: None,
        }
    }

    pub fn natural_key(&self) -> (u64, NaiveDate, ShiftType) {
        (self.user_id, self.date, self.shift_type)
    }

    pub fn validate(&self) -> Result<(), AttendanceError> {
        if !is_record_date(self.date) {
            return Err(AttendanceError::InvalidRecord(format!(
                "record date {} is out of range",
                self.date
            )));
        }

        match (self.check_in, self.check_out) {
            (None, Some(_)) => Err(AttendanceError::InvalidRecord(
                "check-out recorded without a check-in".to_string(),
            )),
            (Some(check_in), Some(check_out)) if check_out < check_in => {
                Err(AttendanceError::InvalidRecord(
                    "check-out cannot be earlier than check-in".to_string(),
                ))
            }
            _ => Ok(()),
        }
    }
}
