use uuid::Uuid;

use crate::model::timesheet::{Timesheet, TimesheetStatus};
use crate::model::user::{Role, User};

/// A named visibility mode selecting which timesheets an actor may see.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Everything the actor owns, regardless of status.
    Personal,
    /// What the actor's role reviews, organization-wide by status (not
    /// scoped to direct reports).
    Team,
    /// Every sheet of one employee. Gating who may ask for this scope is the
    /// caller's job; the filter itself is permissive.
    DirectoryDetail(Uuid),
}

/// Computes the subset of `timesheets` the actor may see under `scope`.
/// Pure; recomputed from the full snapshot on every call.
pub fn visible(timesheets: &[Timesheet], actor: &User, scope: Scope) -> Vec<Timesheet> {
    timesheets
        .iter()
        .filter(|t| is_visible(t, actor, scope))
        .cloned()
        .collect()
}

fn is_visible(timesheet: &Timesheet, actor: &User, scope: Scope) -> bool {
    match scope {
        Scope::Personal => timesheet.employee_id == actor.id,
        Scope::Team => {
            if timesheet.employee_id == actor.id {
                return false;
            }
            match actor.role {
                // managers track what awaits them plus what they already
                // decided on
                Role::Manager => matches!(
                    timesheet.status,
                    TimesheetStatus::Submitted
                        | TimesheetStatus::ManagerApproved
                        | TimesheetStatus::Rejected
                ),
                Role::Hr => matches!(
                    timesheet.status,
                    TimesheetStatus::ManagerApproved | TimesheetStatus::HrApproved
                ),
                // team view is not exposed to plain employees
                Role::Employee => false,
            }
        }
        Scope::DirectoryDetail(employee_id) => timesheet.employee_id == employee_id,
    }
}

/// Whether the actor may open a single sheet at all: their own, anything in
/// their team view, or (for HR) anything via the directory.
pub fn can_view(timesheet: &Timesheet, actor: &User) -> bool {
    timesheet.employee_id == actor.id
        || actor.role == Role::Hr
        || is_visible(timesheet, actor, Scope::Team)
}
