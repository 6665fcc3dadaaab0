use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AttendanceError {
    #[error("Location unavailable. Enable location services to check in or out")]
    LocationUnavailable,

    #[error("You are too far from the office. The allowed distance is {radius_meters}m")]
    OutOfRange { radius_meters: f64 },

    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    #[error("Attendance record {0} not found")]
    RecordNotFound(u64),

    #[error("Record does not belong to the current user")]
    Forbidden,

    #[error("Record store failure: {0}")]
    Store(#[from] anyhow::Error),
}

impl ResponseError for AttendanceError {
    fn status_code(&self) -> StatusCode {
        match self {
            AttendanceError::LocationUnavailable
            | AttendanceError::OutOfRange { .. }
            | AttendanceError::InvalidRecord(_) => StatusCode::BAD_REQUEST,
            AttendanceError::RecordNotFound(_) => StatusCode::NOT_FOUND,
            AttendanceError::Forbidden => StatusCode::FORBIDDEN,
            AttendanceError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            AttendanceError::Store(e) => {
                tracing::error!(error = %e, "Attendance store failure");
                json!({ "message": "Internal Server Error" })
            }
            AttendanceError::OutOfRange { radius_meters } => json!({
                "message": self.to_string(),
                "radius_meters": radius_meters,
            }),
            _ => json!({ "message": self.to_string() }),
        };
        HttpResponse::build(self.status_code()).json(body)
    }
}

#[derive(Debug, Error)]
pub enum BoardError {
    #[error("Column name must not be empty")]
    EmptyColumnName,

    #[error("Task title must not be empty")]
    EmptyTaskTitle,

    #[error("Column {0} not found")]
    ColumnNotFound(u64),

    #[error("Task {0} not found")]
    TaskNotFound(u64),

    #[error("Cannot delete a column that still holds tasks")]
    ColumnNotEmpty,

    #[error("Only admins, HR or team leaders may do this")]
    Forbidden,

    #[error("You are not a member of any team")]
    NoTeam,

    #[error("Board store failure: {0}")]
    Store(#[from] anyhow::Error),
}

impl ResponseError for BoardError {
    fn status_code(&self) -> StatusCode {
        match self {
            BoardError::EmptyColumnName | BoardError::EmptyTaskTitle | BoardError::ColumnNotEmpty => {
                StatusCode::BAD_REQUEST
            }
            BoardError::ColumnNotFound(_) | BoardError::TaskNotFound(_) => StatusCode::NOT_FOUND,
            BoardError::Forbidden | BoardError::NoTeam => StatusCode::FORBIDDEN,
            BoardError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            BoardError::Store(e) => {
                tracing::error!(error = %e, "Board store failure");
                "Internal Server Error".to_string()
            }
            other => other.to_string(),
        };
        HttpResponse::build(self.status_code()).json(json!({ "message": message }))
    }
}
