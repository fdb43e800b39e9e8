//! Access policy: which operations a role may perform.
//!
//! Two roles only. The administrator is the user named `admin`; everyone else is
//! a standard user. Statistics are the only restricted operation. Viewing the
//! full task list, and editing any task reached through it, is open to every
//! authenticated user.

use crate::domain::{ADMIN_USERNAME, Session};
use crate::error::{Result, TaskTrackError};

/// Role attached to a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Administrator,
    Standard,
}

impl Role {
    /// Case-sensitive: only `admin` exactly is the administrator
    pub fn for_username(username: &str) -> Self {
        if username == ADMIN_USERNAME {
            Role::Administrator
        } else {
            Role::Standard
        }
    }
}

/// Operations exposed to the command layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    AddTask,
    RegisterUser,
    ViewAll,
    ViewMine,
    CompleteTask,
    EditTask,
    Statistics,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::AddTask => "add task",
            Operation::RegisterUser => "register user",
            Operation::ViewAll => "view all tasks",
            Operation::ViewMine => "view my tasks",
            Operation::CompleteTask => "complete task",
            Operation::EditTask => "edit task",
            Operation::Statistics => "statistics",
        }
    }
}

pub fn is_permitted(role: Role, operation: Operation) -> bool {
    match operation {
        Operation::Statistics => role == Role::Administrator,
        _ => true,
    }
}

/// Fail with `PermissionDenied` unless the session may perform `operation`.
pub fn authorize(session: &Session, operation: Operation) -> Result<()> {
    if is_permitted(session.role(), operation) {
        Ok(())
    } else {
        log::warn!("User '{}' denied {}", session.username(), operation.as_str());
        Err(TaskTrackError::PermissionDenied(format!(
            "{} is available to admin only",
            operation.as_str()
        )))
    }
}
