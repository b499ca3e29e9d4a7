use uuid::Uuid;

use crate::engine::error::EngineError;
use crate::model::user::User;

/// Validates a user about to be added or updated against the current set.
///
/// Enforced: non-blank name, and `manager_id` (when set) must reference an
/// existing user holding the Manager or HR role, and must not be the user
/// themselves. Cycles deeper than self-reference are not detected.
pub fn validate(users: &[User], candidate: &User) -> Result<(), EngineError> {
    if candidate.name.trim().is_empty() {
        return Err(EngineError::InvalidUser("name must not be empty".to_string()));
    }
    if let Some(manager_id) = candidate.manager_id {
        if manager_id == candidate.id {
            return Err(EngineError::InvalidUser(
                "a user cannot report to themselves".to_string(),
            ));
        }
        match users.iter().find(|u| u.id == manager_id) {
            None => {
                return Err(EngineError::InvalidUser(format!(
                    "manager {manager_id} does not exist"
                )));
            }
            Some(manager) if !manager.role.can_manage() => {
                return Err(EngineError::InvalidUser(
                    "manager must hold the Manager or HR role".to_string(),
                ));
            }
            Some(_) => {}
        }
    }
    Ok(())
}

/// Adds or replaces a user, returning the next snapshot of the set.
pub fn upsert(users: &[User], user: User) -> Result<Vec<User>, EngineError> {
    validate(users, &user)?;

    let mut next: Vec<User> = users.to_vec();
    match next.iter_mut().find(|u| u.id == user.id) {
        Some(slot) => *slot = user,
        None => next.push(user),
    }
    Ok(next)
}

/// Removes a user from the set. Their historical timesheets are untouched
/// (the denormalized name on each sheet survives orphaning) and dangling
/// `manager_id` references on former reports are left as-is.
pub fn remove(users: &[User], user_id: Uuid) -> Vec<User> {
    users.iter().filter(|u| u.id != user_id).cloned().collect()
}

pub fn find(users: &[User], user_id: Uuid) -> Option<&User> {
    users.iter().find(|u| u.id == user_id)
}

/// Resolves the reporting edge for a user, if any.
pub fn manager_of(users: &[User], user_id: Uuid) -> Option<&User> {
    let manager_id = find(users, user_id)?.manager_id?;
    find(users, manager_id)
}
