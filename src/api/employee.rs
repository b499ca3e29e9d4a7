use actix_web::{HttpResponse, Responder, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::actor::Actor;
use crate::engine::directory;
use crate::engine::error::EngineError;
use crate::engine::visibility::{Scope, visible};
use crate::model::timesheet::Timesheet;
use crate::model::user::{Role, User};
use crate::store::AppState;

#[derive(Deserialize, ToSchema)]
pub struct EmployeePayload {
    #[schema(example = "John Doe")]
    pub name: String,
    pub role: Role,
    /// Who this employee reports to; must already exist and hold the
    /// Manager or HR role.
    #[schema(value_type = Option<String>, format = "uuid", nullable = true)]
    pub manager_id: Option<Uuid>,
    #[schema(example = "https://ui-avatars.com/api/?name=John+Doe", nullable = true)]
    pub avatar: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct EmployeeResponse {
    #[schema(value_type = String, format = "uuid")]
    pub id: Uuid,
    pub name: String,
    pub role: Role,
    pub avatar: String,
    #[schema(value_type = Option<String>, format = "uuid", nullable = true)]
    pub manager_id: Option<Uuid>,
    /// Display name of the reporting manager, when resolvable.
    #[schema(example = "Bob Manager", nullable = true)]
    pub reports_to: Option<String>,
}

impl EmployeeResponse {
    fn from_user(user: &User, users: &[User]) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            role: user.role,
            avatar: user.avatar.clone(),
            manager_id: user.manager_id,
            reports_to: directory::manager_of(users, user.id).map(|m| m.name.clone()),
        }
    }
}

fn default_avatar(name: &str) -> String {
    format!(
        "https://ui-avatars.com/api/?name={}",
        name.trim().replace(' ', "+")
    )
}

/* =========================
List directory (HR)
========================= */
#[utoipa::path(
    get,
    path = "/api/employees",
    responses(
        (status = 200, description = "All directory entries with resolved reporting lines", body = [EmployeeResponse]),
        (status = 403, description = "HR only")
    ),
    security(("actor_id" = [])),
    tag = "Employee"
)]
pub async fn list_employees(
    actor: Actor,
    state: web::Data<AppState>,
) -> actix_web::Result<impl Responder> {
    actor.require_hr()?;

    let users = state.users()?;
    let entries: Vec<EmployeeResponse> = users
        .iter()
        .map(|u| EmployeeResponse::from_user(u, &users))
        .collect();
    Ok(HttpResponse::Ok().json(entries))
}

/* =========================
Add employee (HR)
========================= */
#[utoipa::path(
    post,
    path = "/api/employees",
    request_body = EmployeePayload,
    responses(
        (status = 200, description = "Employee added to the directory", body = EmployeeResponse),
        (status = 400, description = "Blank name or bad manager reference"),
        (status = 403, description = "HR only")
    ),
    security(("actor_id" = [])),
    tag = "Employee"
)]
pub async fn create_employee(
    actor: Actor,
    state: web::Data<AppState>,
    payload: web::Json<EmployeePayload>,
) -> actix_web::Result<impl Responder> {
    actor.require_hr()?;

    let payload = payload.into_inner();
    let user = User {
        id: Uuid::new_v4(),
        avatar: payload
            .avatar
            .unwrap_or_else(|| default_avatar(&payload.name)),
        name: payload.name,
        role: payload.role,
        manager_id: payload.manager_id,
    };

    let users = state.users()?;
    let next = directory::upsert(&users, user.clone())?;
    state.replace_users(next.clone())?;

    info!(user_id = %user.id, name = %user.name, "Employee added");
    Ok(HttpResponse::Ok().json(EmployeeResponse::from_user(&user, &next)))
}

/* =========================
Get employee (HR)
========================= */
#[utoipa::path(
    get,
    path = "/api/employees/{id}",
    params(("id" = String, Path, description = "Employee ID")),
    responses(
        (status = 200, description = "Directory entry", body = EmployeeResponse),
        (status = 403, description = "HR only"),
        (status = 404, description = "Employee not found")
    ),
    security(("actor_id" = [])),
    tag = "Employee"
)]
pub async fn get_employee(
    actor: Actor,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> actix_web::Result<impl Responder> {
    actor.require_hr()?;

    let users = state.users()?;
    let user =
        directory::find(&users, path.into_inner()).ok_or(EngineError::NotFound("employee"))?;
    Ok(HttpResponse::Ok().json(EmployeeResponse::from_user(user, &users)))
}

/* =========================
Update employee (HR)
========================= */
#[utoipa::path(
    put,
    path = "/api/employees/{id}",
    params(("id" = String, Path, description = "Employee ID")),
    request_body = EmployeePayload,
    responses(
        (status = 200, description = "Directory entry updated", body = EmployeeResponse),
        (status = 400, description = "Blank name or bad manager reference"),
        (status = 403, description = "HR only"),
        (status = 404, description = "Employee not found")
    ),
    security(("actor_id" = [])),
    tag = "Employee"
)]
pub async fn update_employee(
    actor: Actor,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    payload: web::Json<EmployeePayload>,
) -> actix_web::Result<impl Responder> {
    actor.require_hr()?;

    let id = path.into_inner();
    let payload = payload.into_inner();

    let users = state.users()?;
    let existing = directory::find(&users, id).ok_or(EngineError::NotFound("employee"))?;

    let user = User {
        id,
        avatar: payload.avatar.unwrap_or_else(|| existing.avatar.clone()),
        name: payload.name,
        role: payload.role,
        manager_id: payload.manager_id,
    };

    let next = directory::upsert(&users, user.clone())?;
    state.replace_users(next.clone())?;

    info!(user_id = %id, "Employee updated");
    Ok(HttpResponse::Ok().json(EmployeeResponse::from_user(&user, &next)))
}

/* =========================
Remove employee (HR)
========================= */
#[utoipa::path(
    delete,
    path = "/api/employees/{id}",
    params(("id" = String, Path, description = "Employee ID")),
    responses(
        (status = 200, description = "Removed; historical timesheets are kept", body = Object, example = json!({
            "message": "Successfully removed"
        })),
        (status = 403, description = "HR only"),
        (status = 404, description = "Employee not found")
    ),
    security(("actor_id" = [])),
    tag = "Employee"
)]
pub async fn delete_employee(
    actor: Actor,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> actix_web::Result<impl Responder> {
    actor.require_hr()?;

    let id = path.into_inner();
    let users = state.users()?;
    if directory::find(&users, id).is_none() {
        return Err(EngineError::NotFound("employee").into());
    }

    // no cascade: timesheets keep the orphaned employee id and name, and
    // dangling manager references on former reports stay as they are
    state.replace_users(directory::remove(&users, id))?;

    info!(user_id = %id, "Employee removed");
    Ok(HttpResponse::Ok().json(json!({ "message": "Successfully removed" })))
}

/* =========================
Employee timesheets (HR)
========================= */
#[utoipa::path(
    get,
    path = "/api/employees/{id}/timesheets",
    params(("id" = String, Path, description = "Employee ID")),
    responses(
        (status = 200, description = "Every timesheet of the employee, any status", body = [Timesheet]),
        (status = 403, description = "HR only"),
        (status = 404, description = "Employee not found")
    ),
    security(("actor_id" = [])),
    tag = "Employee"
)]
pub async fn employee_timesheets(
    actor: Actor,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> actix_web::Result<impl Responder> {
    actor.require_hr()?;

    let id = path.into_inner();
    let users = state.users()?;
    if directory::find(&users, id).is_none() {
        return Err(EngineError::NotFound("employee").into());
    }

    let sheets = state.timesheets()?;
    Ok(HttpResponse::Ok().json(visible(&sheets, &actor.0, Scope::DirectoryDetail(id))))
}
