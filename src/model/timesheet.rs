use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum_macros::Display;
use utoipa::ToSchema;
use uuid::Uuid;

/// Classification of a single day's record. Display labels match what the
/// dashboard and CSV report print.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, Display, ToSchema)]
pub enum EntryType {
    Regular,
    Saturday,
    Sunday,
    #[strum(serialize = "Public Holiday")]
    PublicHoliday,
    Leave,
    #[strum(serialize = "Shift Allowance (>6pm)")]
    ShiftAllowance,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, Display, ToSchema)]
pub enum TimesheetStatus {
    Draft,
    Submitted,
    #[strum(serialize = "Manager Approved")]
    ManagerApproved,
    #[strum(serialize = "HR Approved")]
    HrApproved,
    Rejected,
}

/// One calendar-day record of worked/leave hours. Owned exclusively by its
/// parent timesheet; a date may legitimately hold more than one entry
/// (e.g. Regular + ShiftAllowance on the same day).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TimesheetEntry {
    #[schema(value_type = String, format = "uuid")]
    pub id: Uuid,

    #[schema(example = "2026-01-05", value_type = String, format = "date")]
    pub date: NaiveDate,

    pub entry_type: EntryType,

    /// Non-negative; conventionally 0-24 in 0.5 steps, not hard-enforced.
    #[schema(example = 8.0)]
    pub hours: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Timesheet {
    #[schema(value_type = String, format = "uuid")]
    pub id: Uuid,

    #[schema(value_type = String, format = "uuid")]
    pub employee_id: Uuid,

    /// Denormalized display name; survives removal of the employee from the
    /// directory.
    #[schema(example = "Alice Employee")]
    pub employee_name: String,

    #[schema(example = "2026-01-05", value_type = String, format = "date")]
    pub period_start: NaiveDate,

    /// Inclusive end of the period.
    #[schema(example = "2026-01-11", value_type = String, format = "date")]
    pub period_end: NaiveDate,

    pub status: TimesheetStatus,

    pub entries: Vec<TimesheetEntry>,

    /// Present iff the sheet is Rejected, except that a save back to Draft
    /// keeps it so the employee can still see what to fix.
    #[schema(example = "Incorrect hours entered for Friday", nullable = true)]
    pub rejection_reason: Option<String>,
}

impl Timesheet {
    pub fn total_hours(&self) -> f64 {
        self.entries.iter().map(|e| e.hours).sum()
    }

    /// Editable states: the owner may still change dates and entries.
    pub fn is_editable(&self) -> bool {
        matches!(
            self.status,
            TimesheetStatus::Draft | TimesheetStatus::Rejected
        )
    }
}
