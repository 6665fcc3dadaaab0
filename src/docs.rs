use crate::api::attendance::{CheckInRequest, CheckOutRequest, HistoryQuery, StatsQuery};
use crate::api::board::{CreateColumn, MoveTask, UpdateColumn};
use crate::attendance::aggregate::{DailyStatus, HistoryPeriod, MonthlyStats};
use crate::attendance::geofence::GeoPoint;
use crate::attendance::service::ShiftCard;
use crate::kanban::board::{Board, BoardColumn, NewTask, TaskFilter, TaskUpdate};
use crate::model::settings::AttendanceSettings;
use crate::model::shift::{ShiftConfig, ShiftRecord, ShiftStatus, ShiftType};
use crate::model::task::{Column, ColumnColor, Priority, Task};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Shift Attendance API",
        version = "0.1.0",
        description = r#"
## Shift Attendance & Team Board

Tracks employee shift attendance and hosts a per-team Kanban board.

### 🔹 Key Features
- **Shift Attendance**
  - Check in and out of morning, afternoon and overtime shifts
  - Optional geofence around the team office
  - Today's shifts, monthly day counters and attendance history
- **Team Board**
  - Ordered columns, prioritised tasks, search and assignee filters

### 🔐 Security
Every endpoint requires a **JWT Bearer** access token.
Accounts without a role are treated as guests and cannot check in.
Only **Admin**, **HR** or **Leader** may delete board columns.

---
Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::api::attendance::check_in,
        crate::api::attendance::check_out,
        crate::api::attendance::today,
        crate::api::attendance::stats,
        crate::api::attendance::history,
        crate::api::attendance::daily,

        crate::api::board::get_board,
        crate::api::board::create_column,
        crate::api::board::update_column,
        crate::api::board::delete_column,
        crate::api::board::create_task,
        crate::api::board::update_task,
        crate::api::board::move_task,
        crate::api::board::delete_task
    ),
    components(
        schemas(
            CheckInRequest,
            CheckOutRequest,
            StatsQuery,
            HistoryQuery,
            HistoryPeriod,
            MonthlyStats,
            DailyStatus,
            ShiftCard,
            ShiftConfig,
            ShiftRecord,
            ShiftStatus,
            ShiftType,
            GeoPoint,
            AttendanceSettings,
            Board,
            BoardColumn,
            TaskFilter,
            NewTask,
            TaskUpdate,
            CreateColumn,
            UpdateColumn,
            MoveTask,
            Column,
            ColumnColor,
            Priority,
            Task
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Attendance", description = "Shift check-in/out and reporting APIs"),
        (name = "Board", description = "Team Kanban board APIs"),
    )
)]
pub struct ApiDoc;

pub struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}
