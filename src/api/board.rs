use crate::auth::auth::AuthUser;
use crate::error::BoardError;
use crate::kanban::board::{BoardService, NewTask, TaskFilter, TaskUpdate};
use crate::model::task::ColumnColor;
use actix_web::{HttpResponse, Responder, web};
use chrono::Utc;
use serde::Deserialize;
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
pub struct CreateColumn {
    #[schema(example = "In review")]
    pub name: String,

    #[schema(example = "purple", nullable = true)]
    pub color: Option<ColumnColor>,
}

#[derive(Deserialize, ToSchema)]
pub struct UpdateColumn {
    #[schema(example = "Done", nullable = true)]
    pub name: Option<String>,

    #[schema(example = "green", nullable = true)]
    pub color: Option<ColumnColor>,
}

#[derive(Deserialize, ToSchema)]
pub struct MoveTask {
    #[schema(example = 4)]
    pub column_id: u64,
}

fn team_of(auth: &AuthUser) -> actix_web::Result<u64> {
    auth.require_staff()?;
    Ok(auth.team_id.ok_or(BoardError::NoTeam)?)
}

/// Columns with their tasks, optionally filtered
#[utoipa::path(
    get,
    path = "/api/board",
    params(TaskFilter),
    responses(
        (status = 200, description = "The team board", body = Board),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not a team member")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Board"
)]
pub async fn get_board(
    auth: AuthUser,
    service: web::Data<BoardService>,
    filter: web::Query<TaskFilter>,
) -> actix_web::Result<impl Responder> {
    let team_id = team_of(&auth)?;
    let board = service.board(team_id, &filter).await?;
    Ok(HttpResponse::Ok().json(board))
}

#[utoipa::path(
    post,
    path = "/api/board/columns",
    request_body = CreateColumn,
    responses(
        (status = 201, description = "Column created", body = Column),
        (status = 400, description = "Empty column name"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not a team member")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Board"
)]
pub async fn create_column(
    auth: AuthUser,
    service: web::Data<BoardService>,
    payload: web::Json<CreateColumn>,
) -> actix_web::Result<impl Responder> {
    let team_id = team_of(&auth)?;
    let column = service
        .create_column(team_id, &payload.name, payload.color)
        .await?;
    Ok(HttpResponse::Created().json(column))
}

#[utoipa::path(
    put,
    path = "/api/board/columns/{id}",
    request_body = UpdateColumn,
    params(
        ("id" = u64, Path, description = "Column id")
    ),
    responses(
        (status = 200, description = "Column updated", body = Column),
        (status = 404, description = "Column not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Board"
)]
pub async fn update_column(
    auth: AuthUser,
    service: web::Data<BoardService>,
    path: web::Path<u64>,
    payload: web::Json<UpdateColumn>,
) -> actix_web::Result<impl Responder> {
    let team_id = team_of(&auth)?;
    let column = service
        .update_column(team_id, path.into_inner(), payload.name.as_deref(), payload.color)
        .await?;
    Ok(HttpResponse::Ok().json(column))
}

#[utoipa::path(
    delete,
    path = "/api/board/columns/{id}",
    params(
        ("id" = u64, Path, description = "Column id")
    ),
    responses(
        (status = 200, description = "Column deleted", body = Object, example = json!({
            "message": "Column deleted"
        })),
        (status = 400, description = "Column still holds tasks"),
        (status = 403, description = "Only admins, HR or team leaders"),
        (status = 404, description = "Column not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Board"
)]
pub async fn delete_column(
    auth: AuthUser,
    service: web::Data<BoardService>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let team_id = team_of(&auth)?;
    service
        .delete_column(auth.role, team_id, path.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "message": "Column deleted" })))
}

#[utoipa::path(
    post,
    path = "/api/board/tasks",
    request_body = NewTask,
    responses(
        (status = 201, description = "Task created", body = Task),
        (status = 400, description = "Empty title"),
        (status = 404, description = "Column not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Board"
)]
pub async fn create_task(
    auth: AuthUser,
    service: web::Data<BoardService>,
    payload: web::Json<NewTask>,
) -> actix_web::Result<impl Responder> {
    let team_id = team_of(&auth)?;
    let task = service
        .create_task(team_id, auth.user_id, payload.into_inner(), Utc::now())
        .await?;
    Ok(HttpResponse::Created().json(task))
}

/// Edit a task's title, description, priority, deadline or assignee
#[utoipa::path(
    put,
    path = "/api/board/tasks/{id}",
    request_body = TaskUpdate,
    params(
        ("id" = u64, Path, description = "Task id")
    ),
    responses(
        (status = 200, description = "Task updated", body = Task),
        (status = 400, description = "Empty title"),
        (status = 404, description = "Task not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Board"
)]
pub async fn update_task(
    auth: AuthUser,
    service: web::Data<BoardService>,
    path: web::Path<u64>,
    payload: web::Json<TaskUpdate>,
) -> actix_web::Result<impl Responder> {
    let team_id = team_of(&auth)?;
    let task = service
        .update_task(team_id, path.into_inner(), payload.into_inner(), Utc::now())
        .await?;
    Ok(HttpResponse::Ok().json(task))
}

#[utoipa::path(
    put,
    path = "/api/board/tasks/{id}/move",
    request_body = MoveTask,
    params(
        ("id" = u64, Path, description = "Task id")
    ),
    responses(
        (status = 200, description = "Task moved", body = Task),
        (status = 404, description = "Task or column not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Board"
)]
pub async fn move_task(
    auth: AuthUser,
    service: web::Data<BoardService>,
    path: web::Path<u64>,
    payload: web::Json<MoveTask>,
) -> actix_web::Result<impl Responder> {
    let team_id = team_of(&auth)?;
    let task = service
        .move_task(team_id, path.into_inner(), payload.column_id, Utc::now())
        .await?;
    Ok(HttpResponse::Ok().json(task))
}

#[utoipa::path(
    delete,
    path = "/api/board/tasks/{id}",
    params(
        ("id" = u64, Path, description = "Task id")
    ),
    responses(
        (status = 200, description = "Task deleted", body = Object, example = json!({
            "message": "Task deleted"
        })),
        (status = 404, description = "Task not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Board"
)]
pub async fn delete_task(
    auth: AuthUser,
    service: web::Data<BoardService>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let team_id = team_of(&auth)?;
    service.delete_task(team_id, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "message": "Task deleted" })))
}
