use actix_web::{HttpResponse, Responder, error::ErrorInternalServerError, web};
use tracing::error;
use uuid::Uuid;

use crate::actor::Actor;
use crate::engine::directory;
use crate::engine::error::EngineError;
use crate::engine::visibility::{Scope, visible};
use crate::model::timesheet::Timesheet;
use crate::store::AppState;

const HEADER: [&str; 8] = [
    "Employee Name",
    "Period Start",
    "Period End",
    "Status",
    "Date",
    "Type",
    "Hours",
    "Rejection/Notes",
];

/// Flattens timesheets into CSV: one row per (timesheet, entry); a sheet with
/// no entries still contributes one row with blank date/type and hours "0".
/// The csv writer quotes and escapes fields as needed.
pub fn write_report(employee_name: &str, timesheets: &[Timesheet]) -> anyhow::Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(HEADER)?;

    for sheet in timesheets {
        let period_start = sheet.period_start.to_string();
        let period_end = sheet.period_end.to_string();
        let status = sheet.status.to_string();
        let reason = sheet.rejection_reason.clone().unwrap_or_default();

        if sheet.entries.is_empty() {
            writer.write_record([
                employee_name,
                &period_start,
                &period_end,
                &status,
                "",
                "",
                "0",
                &reason,
            ])?;
        } else {
            for entry in &sheet.entries {
                writer.write_record([
                    employee_name,
                    &period_start,
                    &period_end,
                    &status,
                    &entry.date.to_string(),
                    &entry.entry_type.to_string(),
                    &entry.hours.to_string(),
                    &reason,
                ])?;
            }
        }
    }

    Ok(writer.into_inner()?)
}

/* =========================
Download report (HR)
========================= */
#[utoipa::path(
    get,
    path = "/api/employees/{id}/export",
    params(("id" = String, Path, description = "Employee ID")),
    responses(
        (status = 200, description = "CSV report, one row per timesheet entry", content_type = "text/csv"),
        (status = 403, description = "HR only"),
        (status = 404, description = "Employee not found")
    ),
    security(("actor_id" = [])),
    tag = "Employee"
)]
pub async fn download_report(
    actor: Actor,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> actix_web::Result<impl Responder> {
    actor.require_hr()?;

    let id = path.into_inner();
    let users = state.users()?;
    let employee = directory::find(&users, id).ok_or(EngineError::NotFound("employee"))?;

    let sheets = state.timesheets()?;
    let own = visible(&sheets, &actor.0, Scope::DirectoryDetail(id));

    let body = write_report(&employee.name, &own).map_err(|e| {
        error!(error = %e, employee_id = %id, "Failed to build CSV report");
        ErrorInternalServerError("Failed to build report")
    })?;

    let file_name = format!("{}_Timesheet_Report.csv", employee.name.replace(' ', "_"));
    Ok(HttpResponse::Ok()
        .content_type("text/csv; charset=utf-8")
        .insert_header((
            "Content-Disposition",
            format!("attachment; filename=\"{file_name}\""),
        ))
        .body(body))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::timesheet::{EntryType, TimesheetEntry, TimesheetStatus};
    use chrono::NaiveDate;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, d).unwrap()
    }

    fn sheet(status: TimesheetStatus, entries: Vec<TimesheetEntry>, reason: Option<&str>) -> Timesheet {
        Timesheet {
            id: Uuid::new_v4(),
            employee_id: Uuid::new_v4(),
            employee_name: "Alice Employee".to_string(),
            period_start: date(5),
            period_end: date(11),
            status,
            entries,
            rejection_reason: reason.map(str::to_string),
        }
    }

    fn entry(d: u32, entry_type: EntryType, hours: f64) -> TimesheetEntry {
        TimesheetEntry {
            id: Uuid::new_v4(),
            date: date(d),
            entry_type,
            hours,
        }
    }

    fn lines(bytes: Vec<u8>) -> Vec<String> {
        String::from_utf8(bytes)
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn one_row_per_entry_plus_header() {
        let sheets = vec![sheet(
            TimesheetStatus::Submitted,
            vec![
                entry(5, EntryType::Regular, 8.0),
                entry(6, EntryType::Regular, 8.0),
                entry(7, EntryType::Leave, 8.0),
            ],
            None,
        )];

        let rows = lines(write_report("Alice Employee", &sheets).unwrap());
        assert_eq!(rows.len(), 4);
        assert!(rows[0].starts_with("Employee Name,"));
        assert_eq!(
            rows[1],
            "Alice Employee,2026-01-05,2026-01-11,Submitted,2026-01-05,Regular,8,"
        );
    }

    #[test]
    fn empty_timesheet_still_emits_one_row() {
        let sheets = vec![sheet(TimesheetStatus::Draft, Vec::new(), None)];

        let rows = lines(write_report("Alice Employee", &sheets).unwrap());
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1], "Alice Employee,2026-01-05,2026-01-11,Draft,,,0,");
    }

    #[test]
    fn fields_with_delimiters_and_quotes_are_escaped() {
        let sheets = vec![sheet(
            TimesheetStatus::Rejected,
            vec![entry(5, EntryType::Regular, 8.0)],
            Some(r#"hours wrong, manager said "redo it""#),
        )];

        let rows = lines(write_report("Alice Employee", &sheets).unwrap());
        assert!(
            rows[1].ends_with(r#""hours wrong, manager said ""redo it""""#),
            "got: {}",
            rows[1]
        );
    }

    #[test]
    fn entry_type_labels_use_display_wording() {
        let sheets = vec![sheet(
            TimesheetStatus::Draft,
            vec![entry(5, EntryType::ShiftAllowance, 2.5)],
            None,
        )];

        let rows = lines(write_report("Alice Employee", &sheets).unwrap());
        assert!(rows[1].contains("Shift Allowance (>6pm)"), "got: {}", rows[1]);
        assert!(rows[1].contains("2.5"));
    }
}
