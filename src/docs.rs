use crate::api::employee::{EmployeePayload, EmployeeResponse};
use crate::api::timesheet::{
    EntryInput, RejectRequest, ScopeParam, TimesheetDraftRequest, TimesheetListQuery,
};
use crate::model::timesheet::{EntryType, Timesheet, TimesheetEntry, TimesheetStatus};
use crate::model::user::{Role, User};
use utoipa::Modify;
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{OpenApi, openapi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "ChronoFlow API",
        version = "1.0.0",
        description = r#"
## ChronoFlow Timesheet System

This API powers **ChronoFlow**, a work-time tracking system with a
multi-stage approval workflow.

### 🔹 Key Features
- **Timesheets**
  - Create, edit and submit timesheets; daily entries are reconciled
    against the period so every calendar day in range is covered
- **Approvals**
  - Managers approve or reject submitted sheets, HR gives final approval;
    rejected sheets return to the employee with a reason
- **Employee Directory**
  - HR manages employees and their reporting lines
- **Reports**
  - Per-employee CSV export, one row per timesheet entry
- **AI Assist**
  - Best-effort timesheet audit and rejection-comment polishing

### 🔐 Acting user
Every endpoint identifies the acting user via the **X-Actor-Id** header
(a directory user id). Which timesheets are visible, and which actions are
allowed, depend on that user's role.

### 📦 Response Format
- JSON-based RESTful responses; CSV for report downloads

---
Built with **Rust**, **Actix Web**, and **Utoipa**.
"#,
    ),
    paths(
        crate::api::timesheet::list_timesheets,
        crate::api::timesheet::create_timesheet,
        crate::api::timesheet::get_timesheet,
        crate::api::timesheet::save_timesheet,
        crate::api::timesheet::approve_timesheet,
        crate::api::timesheet::reject_timesheet,
        crate::api::timesheet::preview_entries,
        crate::api::timesheet::audit_timesheet,
        crate::api::timesheet::draft_rejection_comment,

        crate::api::employee::list_employees,
        crate::api::employee::create_employee,
        crate::api::employee::get_employee,
        crate::api::employee::update_employee,
        crate::api::employee::delete_employee,
        crate::api::employee::employee_timesheets,

        crate::api::export::download_report
    ),
    components(
        schemas(
            Role,
            User,
            EntryType,
            TimesheetStatus,
            TimesheetEntry,
            Timesheet,
            EntryInput,
            TimesheetDraftRequest,
            TimesheetListQuery,
            ScopeParam,
            RejectRequest,
            EmployeePayload,
            EmployeeResponse
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Timesheet", description = "Timesheet lifecycle APIs"),
        (name = "Employee", description = "Employee directory and report APIs"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "actor_id",
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new("X-Actor-Id"))),
            );
        }
    }
}
