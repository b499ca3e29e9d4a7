use chrono::NaiveDate;
use uuid::Uuid;

use crate::engine::error::EngineError;
use crate::engine::reconcile::reconcile;
use crate::model::timesheet::{Timesheet, TimesheetEntry, TimesheetStatus};
use crate::model::user::{Role, User};

/// The owner-editable parts of a timesheet, as they arrive from the editor.
#[derive(Debug, Clone)]
pub struct DraftInput {
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub entries: Vec<TimesheetEntry>,
    /// `true` submits for approval, `false` saves as draft.
    pub submit: bool,
}

/// Creates a fresh timesheet for `owner`. Entries are reconciled against the
/// period so the sheet always covers its range; the sheet may be submitted
/// immediately or kept as a draft.
pub fn create(owner: &User, input: DraftInput) -> Timesheet {
    let entries = reconcile(input.period_start, input.period_end, &input.entries);
    Timesheet {
        id: Uuid::new_v4(),
        employee_id: owner.id,
        employee_name: owner.name.clone(),
        period_start: input.period_start,
        period_end: input.period_end,
        status: if input.submit {
            TimesheetStatus::Submitted
        } else {
            TimesheetStatus::Draft
        },
        entries,
        rejection_reason: None,
    }
}

/// Applies an owner edit to an existing sheet: save-as-draft or submit.
///
/// Only the owner may edit, and only from Draft or Rejected. Submitting clears
/// the rejection reason; saving back to Draft keeps it, so an employee fixing
/// a rejected sheet can still see what was wrong.
pub fn save(current: &Timesheet, actor: &User, input: DraftInput) -> Result<Timesheet, EngineError> {
    if current.employee_id != actor.id {
        return Err(EngineError::ForbiddenTransition(
            "only the owner may edit a timesheet",
        ));
    }
    if !current.is_editable() {
        return Err(EngineError::InvalidStateTransition(
            "only Draft or Rejected timesheets can be edited",
        ));
    }

    let mut next = current.clone();
    next.period_start = input.period_start;
    next.period_end = input.period_end;
    next.entries = input.entries;
    if input.submit {
        next.status = TimesheetStatus::Submitted;
        next.rejection_reason = None;
    } else {
        next.status = TimesheetStatus::Draft;
        // reason is only ever Some on a Rejected sheet; keep it across the
        // save so it stays visible while the employee reworks the entries
        next.rejection_reason = current.rejection_reason.clone();
    }
    Ok(next)
}

/// Self-review is forbidden regardless of role, and plain employees never
/// review anyone.
fn guard_reviewer(current: &Timesheet, actor: &User) -> Result<(), EngineError> {
    if current.employee_id == actor.id {
        return Err(EngineError::ForbiddenTransition(
            "you cannot approve or reject your own timesheet",
        ));
    }
    if actor.role == Role::Employee {
        return Err(EngineError::ForbiddenTransition(
            "employees cannot approve or reject timesheets",
        ));
    }
    Ok(())
}

fn review_target(current: &Timesheet, actor: &User) -> Result<(), EngineError> {
    match (actor.role, current.status) {
        (Role::Manager, TimesheetStatus::Submitted) => Ok(()),
        (Role::Hr, TimesheetStatus::ManagerApproved) => Ok(()),
        (Role::Manager, _) => Err(EngineError::InvalidStateTransition(
            "managers act on Submitted timesheets only",
        )),
        (Role::Hr, _) => Err(EngineError::InvalidStateTransition(
            "HR acts on Manager Approved timesheets only",
        )),
        // guard_reviewer has already ruled employees out
        (Role::Employee, _) => Err(EngineError::ForbiddenTransition(
            "employees cannot approve or reject timesheets",
        )),
    }
}

/// Advances a sheet one step along the approval chain:
/// Submitted → ManagerApproved (by a Manager), ManagerApproved → HrApproved
/// (by HR, terminal).
pub fn approve(current: &Timesheet, actor: &User) -> Result<Timesheet, EngineError> {
    guard_reviewer(current, actor)?;
    review_target(current, actor)?;

    let mut next = current.clone();
    next.status = match actor.role {
        Role::Manager => TimesheetStatus::ManagerApproved,
        Role::Hr => TimesheetStatus::HrApproved,
        Role::Employee => unreachable!("guarded above"),
    };
    Ok(next)
}

/// Rejects a sheet back to the editable Rejected state, recording the reason.
/// A blank (or whitespace-only) reason is refused.
pub fn reject(current: &Timesheet, actor: &User, reason: &str) -> Result<Timesheet, EngineError> {
    guard_reviewer(current, actor)?;
    review_target(current, actor)?;

    let reason = reason.trim();
    if reason.is_empty() {
        return Err(EngineError::MissingReason);
    }

    let mut next = current.clone();
    next.status = TimesheetStatus::Rejected;
    next.rejection_reason = Some(reason.to_string());
    Ok(next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::timesheet::EntryType;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, d).unwrap()
    }

    fn user(name: &str, role: Role) -> User {
        User {
            id: Uuid::new_v4(),
            name: name.to_string(),
            role,
            avatar: String::new(),
            manager_id: None,
        }
    }

    fn sheet(owner: &User, status: TimesheetStatus) -> Timesheet {
        Timesheet {
            id: Uuid::new_v4(),
            employee_id: owner.id,
            employee_name: owner.name.clone(),
            period_start: date(5),
            period_end: date(11),
            status,
            entries: Vec::new(),
            rejection_reason: if status == TimesheetStatus::Rejected {
                Some("fix Friday".to_string())
            } else {
                None
            },
        }
    }

    fn draft_input(submit: bool) -> DraftInput {
        DraftInput {
            period_start: date(5),
            period_end: date(11),
            entries: Vec::new(),
            submit,
        }
    }

    #[test]
    fn create_reconciles_entries_over_the_period() {
        let alice = user("Alice", Role::Employee);
        let created = create(&alice, draft_input(false));

        assert_eq!(created.status, TimesheetStatus::Draft);
        assert_eq!(created.employee_id, alice.id);
        assert_eq!(created.employee_name, "Alice");
        assert_eq!(created.entries.len(), 7);
        assert!(created.rejection_reason.is_none());
    }

    #[test]
    fn create_may_submit_directly() {
        let alice = user("Alice", Role::Employee);
        let created = create(&alice, draft_input(true));
        assert_eq!(created.status, TimesheetStatus::Submitted);
    }

    #[test]
    fn save_is_owner_only() {
        let alice = user("Alice", Role::Employee);
        let bob = user("Bob", Role::Manager);
        let current = sheet(&alice, TimesheetStatus::Draft);

        let err = save(&current, &bob, draft_input(false)).unwrap_err();
        assert!(matches!(err, EngineError::ForbiddenTransition(_)));
    }

    #[test]
    fn save_requires_an_editable_state() {
        let alice = user("Alice", Role::Employee);
        for status in [
            TimesheetStatus::Submitted,
            TimesheetStatus::ManagerApproved,
            TimesheetStatus::HrApproved,
        ] {
            let current = sheet(&alice, status);
            let err = save(&current, &alice, draft_input(false)).unwrap_err();
            assert!(
                matches!(err, EngineError::InvalidStateTransition(_)),
                "save must be rejected from {status:?}"
            );
        }
    }

    #[test]
    fn draft_save_of_a_rejected_sheet_keeps_the_reason() {
        let alice = user("Alice", Role::Employee);
        let current = sheet(&alice, TimesheetStatus::Rejected);

        let saved = save(&current, &alice, draft_input(false)).unwrap();
        assert_eq!(saved.status, TimesheetStatus::Draft);
        assert_eq!(saved.rejection_reason.as_deref(), Some("fix Friday"));
    }

    #[test]
    fn submit_clears_the_rejection_reason() {
        let alice = user("Alice", Role::Employee);
        let current = sheet(&alice, TimesheetStatus::Rejected);

        let submitted = save(&current, &alice, draft_input(true)).unwrap();
        assert_eq!(submitted.status, TimesheetStatus::Submitted);
        assert!(submitted.rejection_reason.is_none());
    }

    #[test]
    fn save_replaces_period_and_entries() {
        let alice = user("Alice", Role::Employee);
        let current = sheet(&alice, TimesheetStatus::Draft);
        let input = DraftInput {
            period_start: date(6),
            period_end: date(8),
            entries: vec![TimesheetEntry {
                id: Uuid::new_v4(),
                date: date(6),
                entry_type: EntryType::Leave,
                hours: 8.0,
            }],
            submit: false,
        };

        let saved = save(&current, &alice, input).unwrap();
        assert_eq!(saved.period_start, date(6));
        assert_eq!(saved.period_end, date(8));
        assert_eq!(saved.entries.len(), 1);
        assert_eq!(saved.id, current.id, "identity is stable across edits");
    }

    #[test]
    fn manager_approves_submitted_sheets() {
        let alice = user("Alice", Role::Employee);
        let bob = user("Bob", Role::Manager);
        let current = sheet(&alice, TimesheetStatus::Submitted);

        let approved = approve(&current, &bob).unwrap();
        assert_eq!(approved.status, TimesheetStatus::ManagerApproved);
    }

    #[test]
    fn hr_gives_final_approval() {
        let alice = user("Alice", Role::Employee);
        let carol = user("Carol", Role::Hr);
        let current = sheet(&alice, TimesheetStatus::ManagerApproved);

        let approved = approve(&current, &carol).unwrap();
        assert_eq!(approved.status, TimesheetStatus::HrApproved);
    }

    #[test]
    fn self_review_is_forbidden_regardless_of_role() {
        for role in [Role::Employee, Role::Manager, Role::Hr] {
            let owner = user("Owner", role);
            let current = sheet(&owner, TimesheetStatus::Submitted);

            assert_eq!(
                approve(&current, &owner).unwrap_err(),
                EngineError::ForbiddenTransition(
                    "you cannot approve or reject your own timesheet"
                ),
                "approve as {role:?}"
            );
            assert!(
                matches!(
                    reject(&current, &owner, "late"),
                    Err(EngineError::ForbiddenTransition(_))
                ),
                "reject as {role:?}"
            );
        }
    }

    #[test]
    fn only_the_tabled_state_role_pairs_succeed() {
        let alice = user("Alice", Role::Employee);
        let statuses = [
            TimesheetStatus::Draft,
            TimesheetStatus::Submitted,
            TimesheetStatus::ManagerApproved,
            TimesheetStatus::HrApproved,
            TimesheetStatus::Rejected,
        ];

        for role in [Role::Employee, Role::Manager, Role::Hr] {
            let actor = user("Reviewer", role);
            for status in statuses {
                let current = sheet(&alice, status);
                let allowed = matches!(
                    (role, status),
                    (Role::Manager, TimesheetStatus::Submitted)
                        | (Role::Hr, TimesheetStatus::ManagerApproved)
                );

                let approve_result = approve(&current, &actor);
                let reject_result = reject(&current, &actor, "needs work");
                if allowed {
                    assert!(approve_result.is_ok(), "{role:?} from {status:?}");
                    assert!(reject_result.is_ok(), "{role:?} from {status:?}");
                } else {
                    let expected_forbidden = role == Role::Employee;
                    for result in [approve_result, reject_result] {
                        match result.unwrap_err() {
                            EngineError::ForbiddenTransition(_) => {
                                assert!(expected_forbidden, "{role:?} from {status:?}")
                            }
                            EngineError::InvalidStateTransition(_) => {
                                assert!(!expected_forbidden, "{role:?} from {status:?}")
                            }
                            other => panic!("unexpected error {other:?}"),
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn hr_approval_is_terminal() {
        let alice = user("Alice", Role::Employee);
        let final_sheet = sheet(&alice, TimesheetStatus::HrApproved);

        let bob = user("Bob", Role::Manager);
        let carol = user("Carol", Role::Hr);
        assert!(approve(&final_sheet, &bob).is_err());
        assert!(approve(&final_sheet, &carol).is_err());
        assert!(save(&final_sheet, &alice, draft_input(false)).is_err());
    }

    #[test]
    fn reject_requires_a_non_empty_reason() {
        let alice = user("Alice", Role::Employee);
        let bob = user("Bob", Role::Manager);
        let current = sheet(&alice, TimesheetStatus::Submitted);

        assert_eq!(reject(&current, &bob, "").unwrap_err(), EngineError::MissingReason);
        // whitespace-only counts as empty
        assert_eq!(reject(&current, &bob, "  ").unwrap_err(), EngineError::MissingReason);
    }

    #[test]
    fn reject_stores_the_trimmed_reason() {
        let alice = user("Alice", Role::Employee);
        let bob = user("Bob", Role::Manager);
        let current = sheet(&alice, TimesheetStatus::Submitted);

        let rejected = reject(&current, &bob, " hours look wrong ").unwrap();
        assert_eq!(rejected.status, TimesheetStatus::Rejected);
        assert_eq!(rejected.rejection_reason.as_deref(), Some("hours look wrong"));
    }
}
