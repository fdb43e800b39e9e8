//! The authenticated identity for the lifetime of one run.

use crate::policy::Role;

/// Authenticated username plus the role assigned when the session was created.
///
/// Passed by reference into every task and statistics operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    username: String,
    role: Role,
}

impl Session {
    pub fn new(username: impl Into<String>) -> Self {
        let username = username.into();
        let role = Role::for_username(&username);
        Self { username, role }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Administrator
    }
}
