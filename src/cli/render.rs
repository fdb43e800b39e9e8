//! Text rendering of tasks for the terminal.

use chrono::NaiveDate;
use tasktrack::codec::encode_flag;
use tasktrack::domain::TaskRecord;

/// Display format for dates in listings
pub const DISPLAY_DATE_FORMAT: &str = "%d-%m-%Y";

pub const RULE: &str = "--------------------------------------------------";

pub fn display_date(date: NaiveDate) -> String {
    date.format(DISPLAY_DATE_FORMAT).to_string()
}

/// Full block used by the "all tasks" listing.
pub fn task_block(number: usize, task: &TaskRecord) -> String {
    format!(
        "Task {}:\nAssigned to: {}\nTitle: {}\nDescription: {}\nDate Assigned: {}\nDue Date: {}\nCompleted: {}\n",
        number,
        task.owner,
        task.title,
        task.description,
        display_date(task.assigned_date),
        display_date(task.due_date),
        encode_flag(task.completed),
    )
}

/// Compact entry used when listing the session's own tasks.
pub fn my_task_entry(number: usize, task: &TaskRecord) -> String {
    format!(
        "{}. Title: {}\n   Description: {}\n   Date Assigned: {}\n   Due Date: {}\n   Completed: {}\n",
        number,
        task.title,
        task.description,
        display_date(task.assigned_date),
        display_date(task.due_date),
        encode_flag(task.completed),
    )
}
