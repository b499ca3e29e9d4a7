use actix_web::{HttpResponse, Responder, web};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::actor::Actor;
use crate::drafting::DraftingService;
use crate::engine::error::EngineError;
use crate::engine::reconcile::{parse_period, reconcile};
use crate::engine::visibility::{Scope, can_view, visible};
use crate::engine::workflow::{self, DraftInput};
use crate::model::timesheet::{EntryType, Timesheet, TimesheetEntry};
use crate::store::AppState;

#[derive(Deserialize, Serialize, ToSchema)]
pub struct EntryInput {
    /// Absent for rows newly added in the editor; the server assigns the id.
    #[schema(value_type = Option<String>, format = "uuid", nullable = true)]
    pub id: Option<Uuid>,
    #[schema(example = "2026-01-05", format = "date", value_type = String)]
    pub date: NaiveDate,
    pub entry_type: EntryType,
    #[schema(example = 8.0)]
    pub hours: f64,
}

impl EntryInput {
    fn into_entry(self) -> TimesheetEntry {
        TimesheetEntry {
            id: self.id.unwrap_or_else(Uuid::new_v4),
            date: self.date,
            entry_type: self.entry_type,
            hours: self.hours,
        }
    }
}

#[derive(Deserialize, ToSchema)]
pub struct TimesheetDraftRequest {
    /// Period bounds travel as plain strings so a blank or malformed date
    /// surfaces as an invalid-range error rather than a decode failure.
    #[serde(default)]
    #[schema(example = "2026-01-05", format = "date")]
    pub period_start: String,
    #[serde(default)]
    #[schema(example = "2026-01-11", format = "date")]
    pub period_end: String,
    #[serde(default)]
    pub entries: Vec<EntryInput>,
    /// `true` submits for approval; `false` saves as a draft.
    #[serde(default)]
    pub submit: bool,
}

impl TimesheetDraftRequest {
    fn into_draft_input(self) -> Result<DraftInput, EngineError> {
        let (period_start, period_end) = parse_period(&self.period_start, &self.period_end)?;
        Ok(DraftInput {
            period_start,
            period_end,
            entries: self.entries.into_iter().map(EntryInput::into_entry).collect(),
            submit: self.submit,
        })
    }
}

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ScopeParam {
    Personal,
    Team,
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct TimesheetListQuery {
    #[schema(example = "personal")]
    /// Visibility scope: `personal` (default) or `team`
    pub scope: Option<ScopeParam>,
}

#[derive(Deserialize, ToSchema)]
pub struct RejectRequest {
    #[schema(example = "Incorrect hours entered for Friday")]
    pub reason: String,
}

/* =========================
List timesheets
========================= */
#[utoipa::path(
    get,
    path = "/api/timesheets",
    params(TimesheetListQuery),
    responses(
        (status = 200, description = "Timesheets visible to the actor in the requested scope", body = [Timesheet]),
        (status = 401, description = "Unknown actor")
    ),
    security(("actor_id" = [])),
    tag = "Timesheet"
)]
pub async fn list_timesheets(
    actor: Actor,
    state: web::Data<AppState>,
    query: web::Query<TimesheetListQuery>,
) -> actix_web::Result<impl Responder> {
    let scope = match query.into_inner().scope {
        Some(ScopeParam::Team) => Scope::Team,
        _ => Scope::Personal,
    };

    let sheets = state.timesheets()?;
    Ok(HttpResponse::Ok().json(visible(&sheets, &actor.0, scope)))
}

/* =========================
Create timesheet
========================= */
#[utoipa::path(
    post,
    path = "/api/timesheets",
    request_body = TimesheetDraftRequest,
    responses(
        (status = 200, description = "Timesheet created for the acting user", body = Timesheet),
        (status = 400, description = "Invalid period range"),
        (status = 401, description = "Unknown actor")
    ),
    security(("actor_id" = [])),
    tag = "Timesheet"
)]
pub async fn create_timesheet(
    actor: Actor,
    state: web::Data<AppState>,
    payload: web::Json<TimesheetDraftRequest>,
) -> actix_web::Result<impl Responder> {
    let input = payload.into_inner().into_draft_input()?;
    let created = workflow::create(&actor.0, input);

    let mut sheets = state.timesheets()?;
    sheets.push(created.clone());
    state.replace_timesheets(sheets)?;

    info!(timesheet_id = %created.id, employee = %created.employee_name, status = %created.status, "Timesheet created");
    Ok(HttpResponse::Ok().json(created))
}

/* =========================
Get one timesheet
========================= */
#[utoipa::path(
    get,
    path = "/api/timesheets/{id}",
    params(("id" = String, Path, description = "Timesheet ID")),
    responses(
        (status = 200, description = "Timesheet found", body = Timesheet),
        (status = 403, description = "Not visible to the actor"),
        (status = 404, description = "Timesheet not found")
    ),
    security(("actor_id" = [])),
    tag = "Timesheet"
)]
pub async fn get_timesheet(
    actor: Actor,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> actix_web::Result<impl Responder> {
    let id = path.into_inner();
    let sheets = state.timesheets()?;
    let sheet = sheets
        .iter()
        .find(|t| t.id == id)
        .ok_or(EngineError::NotFound("timesheet"))?;

    if !can_view(sheet, &actor.0) {
        return Err(actix_web::error::ErrorForbidden("Not visible to you").into());
    }
    Ok(HttpResponse::Ok().json(sheet))
}

/* =========================
Save / submit (owner)
========================= */
#[utoipa::path(
    put,
    path = "/api/timesheets/{id}",
    params(("id" = String, Path, description = "Timesheet ID")),
    request_body = TimesheetDraftRequest,
    responses(
        (status = 200, description = "Timesheet saved", body = Timesheet),
        (status = 400, description = "Invalid period range"),
        (status = 403, description = "Actor is not the owner"),
        (status = 404, description = "Timesheet not found"),
        (status = 409, description = "Timesheet is not editable in its current status")
    ),
    security(("actor_id" = [])),
    tag = "Timesheet"
)]
pub async fn save_timesheet(
    actor: Actor,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    payload: web::Json<TimesheetDraftRequest>,
) -> actix_web::Result<impl Responder> {
    let id = path.into_inner();
    let input = payload.into_inner().into_draft_input()?;

    let sheets = state.timesheets()?;
    let current = sheets
        .iter()
        .find(|t| t.id == id)
        .ok_or(EngineError::NotFound("timesheet"))?;

    let updated = workflow::save(current, &actor.0, input)?;
    state.replace_timesheets(replace(&sheets, &updated))?;

    info!(timesheet_id = %id, status = %updated.status, "Timesheet saved");
    Ok(HttpResponse::Ok().json(updated))
}

/* =========================
Approve (Manager/HR)
========================= */
#[utoipa::path(
    put,
    path = "/api/timesheets/{id}/approve",
    params(("id" = String, Path, description = "Timesheet ID")),
    responses(
        (status = 200, description = "Timesheet advanced along the approval chain", body = Timesheet),
        (status = 403, description = "Self-approval or insufficient role"),
        (status = 404, description = "Timesheet not found"),
        (status = 409, description = "Not approvable from its current status")
    ),
    security(("actor_id" = [])),
    tag = "Timesheet"
)]
pub async fn approve_timesheet(
    actor: Actor,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> actix_web::Result<impl Responder> {
    let id = path.into_inner();

    let sheets = state.timesheets()?;
    let current = sheets
        .iter()
        .find(|t| t.id == id)
        .ok_or(EngineError::NotFound("timesheet"))?;

    let updated = workflow::approve(current, &actor.0)?;
    state.replace_timesheets(replace(&sheets, &updated))?;

    info!(timesheet_id = %id, approver = %actor.0.name, status = %updated.status, "Timesheet approved");
    Ok(HttpResponse::Ok().json(updated))
}

/* =========================
Reject (Manager/HR)
========================= */
#[utoipa::path(
    put,
    path = "/api/timesheets/{id}/reject",
    params(("id" = String, Path, description = "Timesheet ID")),
    request_body = RejectRequest,
    responses(
        (status = 200, description = "Timesheet rejected back to the employee", body = Timesheet),
        (status = 400, description = "Missing rejection reason"),
        (status = 403, description = "Self-rejection or insufficient role"),
        (status = 404, description = "Timesheet not found"),
        (status = 409, description = "Not rejectable from its current status")
    ),
    security(("actor_id" = [])),
    tag = "Timesheet"
)]
pub async fn reject_timesheet(
    actor: Actor,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    payload: web::Json<RejectRequest>,
) -> actix_web::Result<impl Responder> {
    let id = path.into_inner();

    let sheets = state.timesheets()?;
    let current = sheets
        .iter()
        .find(|t| t.id == id)
        .ok_or(EngineError::NotFound("timesheet"))?;

    let updated = workflow::reject(current, &actor.0, &payload.reason)?;
    state.replace_timesheets(replace(&sheets, &updated))?;

    info!(timesheet_id = %id, reviewer = %actor.0.name, "Timesheet rejected");
    Ok(HttpResponse::Ok().json(updated))
}

/* =========================
Preview entries for a range
========================= */
/// The editor calls this whenever the period changes: same reconciliation the
/// server applies on create, without persisting anything.
#[utoipa::path(
    post,
    path = "/api/timesheets/preview",
    request_body = TimesheetDraftRequest,
    responses(
        (status = 200, description = "Entries covering the range, existing data preserved", body = [TimesheetEntry]),
        (status = 400, description = "Invalid period range")
    ),
    security(("actor_id" = [])),
    tag = "Timesheet"
)]
pub async fn preview_entries(
    _actor: Actor,
    payload: web::Json<TimesheetDraftRequest>,
) -> actix_web::Result<impl Responder> {
    let input = payload.into_inner().into_draft_input()?;
    let entries = reconcile(input.period_start, input.period_end, &input.entries);
    Ok(HttpResponse::Ok().json(entries))
}

/* =========================
AI audit (Manager/HR)
========================= */
#[utoipa::path(
    post,
    path = "/api/timesheets/{id}/audit",
    params(("id" = String, Path, description = "Timesheet ID")),
    responses(
        (status = 200, description = "Best-effort analysis text", body = Object, example = json!({
            "analysis": "**Summary**: 40 regular hours..."
        })),
        (status = 403, description = "Reviewers only"),
        (status = 404, description = "Timesheet not found")
    ),
    security(("actor_id" = [])),
    tag = "Timesheet"
)]
pub async fn audit_timesheet(
    actor: Actor,
    state: web::Data<AppState>,
    drafting: web::Data<DraftingService>,
    path: web::Path<Uuid>,
) -> actix_web::Result<impl Responder> {
    actor.require_reviewer()?;

    let id = path.into_inner();
    let sheets = state.timesheets()?;
    let sheet = sheets
        .iter()
        .find(|t| t.id == id)
        .ok_or(EngineError::NotFound("timesheet"))?;

    let analysis = drafting.audit(sheet).await;
    Ok(HttpResponse::Ok().json(json!({ "analysis": analysis })))
}

/* =========================
AI rejection draft (Manager/HR)
========================= */
#[utoipa::path(
    post,
    path = "/api/timesheets/{id}/rejection-draft",
    params(("id" = String, Path, description = "Timesheet ID")),
    request_body = RejectRequest,
    responses(
        (status = 200, description = "Polished rejection text; the raw reason on any failure", body = Object, example = json!({
            "reason": "Please revise the hours logged for Friday."
        })),
        (status = 403, description = "Reviewers only"),
        (status = 404, description = "Timesheet not found")
    ),
    security(("actor_id" = [])),
    tag = "Timesheet"
)]
pub async fn draft_rejection_comment(
    actor: Actor,
    state: web::Data<AppState>,
    drafting: web::Data<DraftingService>,
    path: web::Path<Uuid>,
    payload: web::Json<RejectRequest>,
) -> actix_web::Result<impl Responder> {
    actor.require_reviewer()?;

    let id = path.into_inner();
    let sheets = state.timesheets()?;
    let sheet = sheets
        .iter()
        .find(|t| t.id == id)
        .ok_or(EngineError::NotFound("timesheet"))?;

    let reason = drafting.draft_rejection(sheet, &payload.reason).await;
    Ok(HttpResponse::Ok().json(json!({ "reason": reason })))
}

/// Next snapshot with `updated` swapped in by id.
fn replace(sheets: &[Timesheet], updated: &Timesheet) -> Vec<Timesheet> {
    sheets
        .iter()
        .map(|t| {
            if t.id == updated.id {
                updated.clone()
            } else {
                t.clone()
            }
        })
        .collect()
}
