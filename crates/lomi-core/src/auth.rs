//! # Staff Directory
//!
//! Static email/password lookup used by the login screen.
//!
//! This is a demo credential table, not an authentication system: passwords
//! are compared in plain text and nothing is rate limited.

use crate::types::User;

/// In-memory table of staff accounts.
#[derive(Debug, Clone, Default)]
pub struct StaffDirectory {
    accounts: Vec<(User, String)>,
}

impl StaffDirectory {
    pub fn new() -> Self {
        StaffDirectory::default()
    }

    /// Adds an account. Emails are matched case-insensitively.
    pub fn with_account(mut self, user: User, password: &str) -> Self {
        self.accounts.push((user, password.to_string()));
        self
    }

    /// Returns the user whose email and password match.
    pub fn authenticate(&self, email: &str, password: &str) -> Option<User> {
        let email = email.trim().to_lowercase();
        self.accounts
            .iter()
            .find(|(user, pw)| user.email.to_lowercase() == email && pw == password)
            .map(|(user, _)| user.clone())
    }

    pub fn users(&self) -> impl Iterator<Item = &User> {
        self.accounts.iter().map(|(user, _)| user)
    }
}
