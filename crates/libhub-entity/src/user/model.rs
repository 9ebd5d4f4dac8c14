//! User entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::role::UserRole;

/// An identity known to the library. Owned by the external auth service;
/// LibHub only reads it.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique user identifier.
    pub id: Uuid,
    /// Full name.
    pub name: String,
    /// Role.
    pub role: UserRole,
    /// College roll number, present for students.
    pub roll_number: Option<String>,
    /// Academic branch, e.g. "CSE".
    pub branch: Option<String>,
    /// Email address.
    pub email: Option<String>,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Check if this user is a student.
    pub fn is_student(&self) -> bool {
        self.role.is_student()
    }
}
