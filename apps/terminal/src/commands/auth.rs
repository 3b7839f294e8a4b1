//! # Auth Commands
//!
//! Login and logout against the demo staff directory. A logged-in user's
//! name is stamped on the orders they take.

use lomi_core::{StaffDirectory, User, UserRole};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::ApiError;
use crate::state::SessionState;

/// Accounts available on a fresh install.
pub fn demo_directory() -> StaffDirectory {
    let account = |id: &str, name: &str, email: &str, role| User {
        id: id.to_string(),
        name: name.to_string(),
        email: email.to_string(),
        role,
    };

    StaffDirectory::new()
        .with_account(
            account("1", "Carlos Admin", "admin@lomiteria.com", UserRole::Owner),
            "admin123",
        )
        .with_account(
            account("2", "María Cajera", "cajero@lomiteria.com", UserRole::Cashier),
            "cajero123",
        )
        .with_account(
            account("3", "José Cocina", "cocina@lomiteria.com", UserRole::Kitchen),
            "cocina123",
        )
        .with_account(
            account("4", "Ana Delivery", "delivery@lomiteria.com", UserRole::Delivery),
            "delivery123",
        )
}

/// Staff row shown by `staff`. Never carries the password.
#[derive(Debug, Clone, Serialize)]
pub struct StaffMember {
    pub name: String,
    pub email: String,
    pub role: UserRole,
}

impl From<&User> for StaffMember {
    fn from(user: &User) -> Self {
        StaffMember {
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
        }
    }
}

pub fn list_staff(staff: &StaffDirectory) -> Vec<StaffMember> {
    debug!("list_staff command");
    staff.users().map(StaffMember::from).collect()
}

pub fn login(
    staff: &StaffDirectory,
    session: &SessionState,
    email: &str,
    password: &str,
) -> Result<User, ApiError> {
    debug!(email, "login command");

    let user = staff.authenticate(email, password).ok_or_else(|| {
        warn!(email, "Failed login");
        ApiError::validation("Invalid email or password")
    })?;

    info!(user_id = %user.id, name = %user.name, role = ?user.role, "User logged in");
    session.with_session_mut(|s| s.user = Some(user.clone()));
    Ok(user)
}

/// Returns the user that was logged in, if any.
pub fn logout(session: &SessionState) -> Option<User> {
    debug!("logout command");

    let user = session.with_session_mut(|s| s.user.take());
    if let Some(user) = &user {
        info!(user_id = %user.id, "User logged out");
    }
    user
}
