use std::sync::RwLock;

use actix_web::error::ErrorInternalServerError;
use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::model::timesheet::{EntryType, Timesheet, TimesheetEntry, TimesheetStatus};
use crate::model::user::{Role, User};

/// Process-resident state. Handlers read a snapshot, run the pure engine on
/// it, and replace the collection wholesale; the lock only serializes that
/// swap. There is no concurrent-edit protection beyond it.
pub struct AppState {
    users: RwLock<Vec<User>>,
    timesheets: RwLock<Vec<Timesheet>>,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            users: RwLock::new(Vec::new()),
            timesheets: RwLock::new(Vec::new()),
        }
    }

    /// Demo fixture: Alice reports to Bob, Bob reports to Carol, plus a
    /// submitted sheet, an empty upcoming draft and a draft of Bob's own.
    pub fn seeded() -> Self {
        let alice_id = Uuid::new_v4();
        let bob_id = Uuid::new_v4();
        let carol_id = Uuid::new_v4();

        let avatar = |name: &str| {
            format!(
                "https://ui-avatars.com/api/?name={}",
                name.replace(' ', "+")
            )
        };

        let users = vec![
            User {
                id: alice_id,
                name: "Alice Employee".to_string(),
                role: Role::Employee,
                avatar: avatar("Alice Employee"),
                manager_id: Some(bob_id),
            },
            User {
                id: bob_id,
                name: "Bob Manager".to_string(),
                role: Role::Manager,
                avatar: avatar("Bob Manager"),
                manager_id: Some(carol_id),
            },
            User {
                id: carol_id,
                name: "Carol HR".to_string(),
                role: Role::Hr,
                avatar: avatar("Carol HR"),
                manager_id: None,
            },
        ];

        let today = Utc::now().date_naive();
        let last_week = today - Duration::days(7);
        let entry = |offset: i64, entry_type: EntryType, hours: f64| TimesheetEntry {
            id: Uuid::new_v4(),
            date: last_week + Duration::days(offset),
            entry_type,
            hours,
        };

        let timesheets = vec![
            Timesheet {
                id: Uuid::new_v4(),
                employee_id: alice_id,
                employee_name: "Alice Employee".to_string(),
                period_start: last_week,
                period_end: today,
                status: TimesheetStatus::Submitted,
                entries: vec![
                    entry(0, EntryType::Regular, 8.0),
                    entry(1, EntryType::Regular, 8.0),
                    entry(2, EntryType::Leave, 8.0),
                ],
                rejection_reason: None,
            },
            Timesheet {
                id: Uuid::new_v4(),
                employee_id: alice_id,
                employee_name: "Alice Employee".to_string(),
                period_start: today + Duration::days(1),
                period_end: today + Duration::days(7),
                status: TimesheetStatus::Draft,
                entries: Vec::new(),
                rejection_reason: None,
            },
            Timesheet {
                id: Uuid::new_v4(),
                employee_id: bob_id,
                employee_name: "Bob Manager".to_string(),
                period_start: last_week,
                period_end: today,
                status: TimesheetStatus::Draft,
                entries: vec![entry(0, EntryType::Regular, 8.0)],
                rejection_reason: None,
            },
        ];

        Self {
            users: RwLock::new(users),
            timesheets: RwLock::new(timesheets),
        }
    }

    pub fn users(&self) -> actix_web::Result<Vec<User>> {
        Ok(self
            .users
            .read()
            .map_err(|_| ErrorInternalServerError("user store poisoned"))?
            .clone())
    }

    pub fn timesheets(&self) -> actix_web::Result<Vec<Timesheet>> {
        Ok(self
            .timesheets
            .read()
            .map_err(|_| ErrorInternalServerError("timesheet store poisoned"))?
            .clone())
    }

    pub fn replace_users(&self, next: Vec<User>) -> actix_web::Result<()> {
        *self
            .users
            .write()
            .map_err(|_| ErrorInternalServerError("user store poisoned"))? = next;
        Ok(())
    }

    pub fn replace_timesheets(&self, next: Vec<Timesheet>) -> actix_web::Result<()> {
        *self
            .timesheets
            .write()
            .map_err(|_| ErrorInternalServerError("timesheet store poisoned"))? = next;
        Ok(())
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
