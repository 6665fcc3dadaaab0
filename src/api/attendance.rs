use crate::attendance::aggregate::HistoryPeriod;
use crate::attendance::geofence::LocationFix;
use crate::attendance::service::AttendanceService;
use crate::auth::auth::AuthUser;
use crate::model::shift::ShiftType;
use actix_web::{HttpResponse, Responder, web};
use chrono::{Local, NaiveDate, Utc};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

#[derive(Deserialize, ToSchema)]
pub struct CheckInRequest {
    #[schema(example = "morning")]
    pub shift_type: ShiftType,

    /// `"lat, lon"`, or omitted / a sentinel when the device could not locate itself
    #[schema(example = "10.7769, 106.7009", nullable = true)]
    pub location: Option<String>,
}

#[derive(Deserialize, ToSchema)]
pub struct CheckOutRequest {
    #[schema(example = 1)]
    pub record_id: u64,

    #[schema(example = "10.7769, 106.7009", nullable = true)]
    pub location: Option<String>,
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct StatsQuery {
    /// Any date inside the month to report on; defaults to today
    #[schema(example = "2026-01-01", value_type = Option<String>, format = "date")]
    pub month: Option<NaiveDate>,

    /// Another employee to report on (HR/Admin only)
    #[schema(example = 1000)]
    pub user_id: Option<u64>,
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct HistoryQuery {
    #[schema(example = "week")]
    pub period: Option<HistoryPeriod>,

    /// Date the period is anchored on; defaults to today
    #[schema(example = "2026-01-05", value_type = Option<String>, format = "date")]
    pub date: Option<NaiveDate>,

    /// Another employee to report on (HR/Admin only)
    #[schema(example = 1000)]
    pub user_id: Option<u64>,
}

/// Whose records a report covers. Looking at someone else needs HR or Admin.
fn subject(auth: &AuthUser, requested: Option<u64>) -> actix_web::Result<u64> {
    match requested {
        Some(user_id) if user_id != auth.user_id => {
            auth.require_hr_or_admin()?;
            Ok(user_id)
        }
        _ => Ok(auth.user_id),
    }
}

/// Check-in endpoint
#[utoipa::path(
    post,
    path = "/api/attendance/check-in",
    request_body = CheckInRequest,
    responses(
        (status = 200, description = "Checked in successfully", body = Object, example = json!({
            "message": "Checked in successfully",
            "record": {"id": 1, "status": "checked_in"}
        })),
        (status = 400, description = "Location unavailable, out of range or already checked in", body = Object, example = json!({
            "message": "You are too far from the office. The allowed distance is 100m",
            "radius_meters": 100.0
        })),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn check_in(
    auth: AuthUser,
    service: web::Data<AttendanceService>,
    payload: web::Json<CheckInRequest>,
) -> actix_web::Result<impl Responder> {
    auth.require_staff()?;

    let fix = LocationFix::from(payload.location.as_deref());
    let now = Local::now();

    let record = service
        .check_in(
            auth.user_id,
            auth.team_id,
            payload.shift_type,
            &fix,
            now.date_naive(),
            now.with_timezone(&Utc),
        )
        .await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Checked in successfully",
        "record": record
    })))
}

/// Check-out endpoint
#[utoipa::path(
    put,
    path = "/api/attendance/check-out",
    request_body = CheckOutRequest,
    responses(
        (status = 200, description = "Checked out successfully", body = Object, example = json!({
            "message": "Checked out successfully",
            "record": {"id": 1, "status": "completed"}
        })),
        (status = 400, description = "Location rejected or no active check-in", body = Object, example = json!({
            "message": "Invalid record: already checked out"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Record belongs to another user"),
        (status = 404, description = "Record not found"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn check_out(
    auth: AuthUser,
    service: web::Data<AttendanceService>,
    payload: web::Json<CheckOutRequest>,
) -> actix_web::Result<impl Responder> {
    auth.require_staff()?;

    let fix = LocationFix::from(payload.location.as_deref());

    let record = service
        .check_out(auth.user_id, auth.team_id, payload.record_id, &fix, Utc::now())
        .await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Checked out successfully",
        "record": record
    })))
}

/// Today's shifts with their display status
#[utoipa::path(
    get,
    path = "/api/attendance/today",
    responses(
        (status = 200, description = "Configured shifts for today", body = [ShiftCard]),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn today(
    auth: AuthUser,
    service: web::Data<AttendanceService>,
) -> actix_web::Result<impl Responder> {
    let now = Local::now().naive_local();
    let cards = service
        .today(auth.user_id, auth.team_id, now.date(), now)
        .await?;
    Ok(HttpResponse::Ok().json(cards))
}

/// Monthly attendance counters, one per calendar day
#[utoipa::path(
    get,
    path = "/api/attendance/stats",
    params(StatsQuery),
    responses(
        (status = 200, description = "Day counts for the month", body = MonthlyStats),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "HR/Admin only for other users"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn stats(
    auth: AuthUser,
    service: web::Data<AttendanceService>,
    query: web::Query<StatsQuery>,
) -> actix_web::Result<impl Responder> {
    let user_id = subject(&auth, query.user_id)?;
    let reference = query.month.unwrap_or_else(|| Local::now().date_naive());
    let stats = service.monthly_stats(user_id, reference).await?;
    Ok(HttpResponse::Ok().json(stats))
}

/// Recent shift records for a period
#[utoipa::path(
    get,
    path = "/api/attendance/history",
    params(HistoryQuery),
    responses(
        (status = 200, description = "Records in the period, newest first", body = [ShiftRecord]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "HR/Admin only for other users"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn history(
    auth: AuthUser,
    service: web::Data<AttendanceService>,
    query: web::Query<HistoryQuery>,
) -> actix_web::Result<impl Responder> {
    let user_id = subject(&auth, query.user_id)?;
    let reference = query.date.unwrap_or_else(|| Local::now().date_naive());
    let records = service
        .history(user_id, query.period.unwrap_or_default(), reference)
        .await?;
    Ok(HttpResponse::Ok().json(records))
}

/// One combined status per day that has records
#[utoipa::path(
    get,
    path = "/api/attendance/daily",
    params(HistoryQuery),
    responses(
        (status = 200, description = "Status per date", body = Object, example = json!({
            "2026-01-05": "completed",
            "2026-01-06": "pending"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "HR/Admin only for other users"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn daily(
    auth: AuthUser,
    service: web::Data<AttendanceService>,
    query: web::Query<HistoryQuery>,
) -> actix_web::Result<impl Responder> {
    let user_id = subject(&auth, query.user_id)?;
    let reference = query.date.unwrap_or_else(|| Local::now().date_naive());
    let days = service
        .daily_statuses(user_id, query.period.unwrap_or_default(), reference)
        .await?;
    Ok(HttpResponse::Ok().json(days))
}
