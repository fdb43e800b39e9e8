//! Task storage backed by the tasks file.
//!
//! Loading is strict: the first line that does not decode aborts the load, since
//! every mutation addresses tasks by their position in the full file. Mutations
//! follow a load / mutate / rewrite cycle and always write back the complete set.

use std::path::Path;

use chrono::NaiveDate;

use crate::codec::{LineRecord, validate_field};
use crate::domain::{IndexedTask, NewTask, Session, TaskEdit, TaskRecord};
use crate::error::{Result, TaskTrackError};
use crate::policy::{Operation, authorize};
use crate::store::LineFile;

/// Tasks file wrapper.
#[derive(Debug, Clone)]
pub struct TaskStore {
    file: LineFile,
}

impl TaskStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            file: LineFile::new(path),
        }
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Create an empty tasks file if it is missing.
    pub fn bootstrap(&self) -> Result<bool> {
        self.file.ensure_exists("")
    }

    /// Every task in file order.
    pub fn load_all(&self) -> Result<Vec<TaskRecord>> {
        let records = self
            .file
            .read_lines()?
            .iter()
            .map(|line| line.text().and_then(TaskRecord::decode).map_err(|e| e.at_line(line.number)))
            .collect::<Result<Vec<_>>>()?;
        log::debug!("Loaded {} tasks from {}", records.len(), self.path().display());
        Ok(records)
    }

    /// Append a single task line.
    pub fn append(&self, record: &TaskRecord) -> Result<()> {
        self.file.append_line(&record.encode())?;
        log::info!("Appended task '{}' for '{}'", record.title, record.owner);
        Ok(())
    }

    /// Overwrite the file with the full set, in order.
    pub fn rewrite_all(&self, records: &[TaskRecord]) -> Result<()> {
        self.file.rewrite(records.iter().map(|r| r.encode()))?;
        log::info!("Rewrote {} tasks to {}", records.len(), self.path().display());
        Ok(())
    }

    //=== Session operations ===

    /// Add a new incomplete task assigned on `today`.
    pub fn add(&self, session: &Session, new_task: NewTask, today: NaiveDate) -> Result<TaskRecord> {
        authorize(session, Operation::AddTask)?;
        let owner = new_task.owner.trim();
        if owner.is_empty() {
            return Err(TaskTrackError::Validation("assignee username cannot be empty".to_string()));
        }
        validate_field("assignee", owner)?;
        validate_field("title", &new_task.title)?;
        validate_field("description", &new_task.description)?;

        let record = TaskRecord::new(
            NewTask {
                owner: owner.to_string(),
                ..new_task
            },
            today,
        );
        self.append(&record)?;
        Ok(record)
    }

    pub fn view_all(&self, session: &Session) -> Result<Vec<TaskRecord>> {
        authorize(session, Operation::ViewAll)?;
        self.load_all()
    }

    /// Tasks owned by the session's user, with their positions in the full file.
    pub fn view_mine(&self, session: &Session) -> Result<Vec<IndexedTask>> {
        authorize(session, Operation::ViewMine)?;
        Ok(find_mine(session.username(), &self.load_all()?))
    }

    /// Mark the task at `index` complete and persist the full set.
    pub fn complete(&self, session: &Session, index: usize) -> Result<TaskRecord> {
        authorize(session, Operation::CompleteTask)?;
        let mut records = self.load_all()?;
        if mark_complete(index, &mut records)? {
            self.rewrite_all(&records)?;
        }
        Ok(records[index].clone())
    }

    /// Apply `edit` to the task at `index` and persist the full set.
    pub fn update(&self, session: &Session, index: usize, edit: TaskEdit) -> Result<TaskRecord> {
        authorize(session, Operation::EditTask)?;
        let mut records = self.load_all()?;
        edit_task(index, &mut records, edit)?;
        self.rewrite_all(&records)?;
        Ok(records[index].clone())
    }
}

/// Set `completed` on `records[index]`. Returns false if it was already complete.
pub fn mark_complete(index: usize, records: &mut [TaskRecord]) -> Result<bool> {
    let record = records.get_mut(index).ok_or(TaskTrackError::TaskNotFound(index))?;
    if record.status().is_terminal() {
        return Ok(false);
    }
    record.completed = true;
    Ok(true)
}

/// Change the owner or due date of an incomplete task.
///
/// A completed task is refused before the new value is looked at.
pub fn edit_task(index: usize, records: &mut [TaskRecord], edit: TaskEdit) -> Result<()> {
    let record = records.get_mut(index).ok_or(TaskTrackError::TaskNotFound(index))?;
    if record.status().is_terminal() {
        return Err(TaskTrackError::ImmutableRecord(index));
    }
    match edit {
        TaskEdit::Owner(owner) => {
            if owner.is_empty() {
                return Err(TaskTrackError::Validation("assignee username cannot be empty".to_string()));
            }
            validate_field("assignee", &owner)?;
            record.owner = owner;
        }
        TaskEdit::DueDate(due_date) => record.due_date = due_date,
    }
    Ok(())
}

/// Tasks whose owner is exactly `username`, keeping file order and positions.
pub fn find_mine(username: &str, records: &[TaskRecord]) -> Vec<IndexedTask> {
    records
        .iter()
        .enumerate()
        .filter(|(_, r)| r.is_owned_by(username))
        .map(|(index, r)| IndexedTask {
            index,
            record: r.clone(),
        })
        .collect()
}
