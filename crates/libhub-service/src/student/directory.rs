//! Student directory backed by the user store.

use std::sync::Arc;

use libhub_core::error::AppError;
use libhub_database::store::UserStore;
use libhub_entity::user::User;

/// Read-only view of students.
#[derive(Debug, Clone)]
pub struct StudentDirectory {
    users: Arc<dyn UserStore>,
}

impl StudentDirectory {
    /// Creates a new student directory.
    pub fn new(users: Arc<dyn UserStore>) -> Self {
        Self { users }
    }

    /// Find a student by roll number, ignoring case.
    pub async fn find_by_roll_number(&self, roll_number: &str) -> Result<User, AppError> {
        let roll_number = roll_number.trim();
        if roll_number.is_empty() {
            return Err(AppError::validation("Roll number is required"));
        }
        self.users
            .find_by_roll_number(roll_number)
            .await?
            .filter(User::is_student)
            .ok_or_else(|| AppError::not_found("Student not found"))
    }
}
