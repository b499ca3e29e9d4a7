use serde::{Deserialize, Serialize};
use strum_macros::Display;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, Display, ToSchema)]
pub enum Role {
    Employee,
    Manager,
    #[serde(rename = "HR")]
    #[strum(serialize = "HR")]
    Hr,
}

impl Role {
    /// Roles that may appear as someone's reporting manager.
    pub fn can_manage(&self) -> bool {
        matches!(self, Role::Manager | Role::Hr)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[schema(
    example = json!({
        "id": "0b9c8d7e-1f2a-4b3c-8d4e-5f6a7b8c9d0e",
        "name": "Alice Employee",
        "role": "Employee",
        "avatar": "https://ui-avatars.com/api/?name=Alice+Employee",
        "manager_id": "1c2d3e4f-5a6b-4c7d-8e9f-0a1b2c3d4e5f"
    })
)]
pub struct User {
    #[schema(value_type = String, format = "uuid")]
    pub id: Uuid,

    #[schema(example = "Alice Employee")]
    pub name: String,

    pub role: Role,

    #[schema(example = "https://ui-avatars.com/api/?name=Alice+Employee")]
    pub avatar: String,

    /// Weak reference into the user set: who this user reports to.
    #[schema(value_type = Option<String>, format = "uuid", nullable = true)]
    pub manager_id: Option<Uuid>,
}
