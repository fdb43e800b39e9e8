//! Task record and related types

use chrono::NaiveDate;
use serde::Serialize;

/// A single task as stored in the tasks file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskRecord {
    /// Username the task is assigned to
    pub owner: String,

    pub title: String,

    pub description: String,

    /// Date the task was added. Not checked against `due_date`.
    pub assigned_date: NaiveDate,

    pub due_date: NaiveDate,

    pub completed: bool,
}

/// Lifecycle state of a task. `Complete` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    Incomplete,
    Complete,
}

impl TaskStatus {
    /// Returns true if no further transition is allowed
    pub fn is_terminal(&self) -> bool {
        matches!(self, TaskStatus::Complete)
    }
}

impl TaskRecord {
    /// Create a fresh, incomplete task assigned today
    pub fn new(new_task: NewTask, assigned_date: NaiveDate) -> Self {
        Self {
            owner: new_task.owner,
            title: new_task.title,
            description: new_task.description,
            assigned_date,
            due_date: new_task.due_date,
            completed: false,
        }
    }

    pub fn status(&self) -> TaskStatus {
        if self.completed {
            TaskStatus::Complete
        } else {
            TaskStatus::Incomplete
        }
    }

    /// Not completed and due strictly before `today`
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        !self.status().is_terminal() && self.due_date < today
    }

    pub fn is_owned_by(&self, username: &str) -> bool {
        self.owner == username
    }
}

/// User-supplied fields for a task about to be added
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub owner: String,
    pub title: String,
    pub description: String,
    pub due_date: NaiveDate,
}

/// The fields an incomplete task may have changed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskEdit {
    /// Reassign to another username (existence is not checked)
    Owner(String),
    /// Move the due date (not checked against the assigned date)
    DueDate(NaiveDate),
}

/// A task paired with its position in the full task file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedTask {
    pub index: usize,
    pub record: TaskRecord,
}
