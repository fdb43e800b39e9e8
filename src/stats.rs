//! Aggregate task statistics for the administrator report.

use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::{Session, TaskRecord};
use crate::error::Result;
use crate::policy::{Operation, authorize};
use crate::store::{TaskStore, UserStore};

/// Counts derived from the full task set
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Statistics {
    pub num_users: usize,
    pub num_tasks: usize,
    pub completed: usize,
    pub incomplete: usize,
    /// Incomplete and due strictly before the reference date
    pub overdue: usize,
    pub percent_incomplete: f64,
    pub percent_overdue: f64,
}

impl Statistics {
    /// Pure computation. Percentages are 0 when there are no tasks.
    pub fn compute(tasks: &[TaskRecord], num_users: usize, today: NaiveDate) -> Self {
        let num_tasks = tasks.len();
        let completed = tasks.iter().filter(|t| t.completed).count();
        let overdue = tasks.iter().filter(|t| t.is_overdue(today)).count();
        let incomplete = num_tasks - completed;

        Self {
            num_users,
            num_tasks,
            completed,
            incomplete,
            overdue,
            percent_incomplete: percent(incomplete, num_tasks),
            percent_overdue: percent(overdue, num_tasks),
        }
    }

    /// Load both files and compute the report. Administrator only.
    pub fn generate(session: &Session, users: &UserStore, tasks: &TaskStore, today: NaiveDate) -> Result<Self> {
        authorize(session, Operation::Statistics)?;
        let num_users = users.count()?;
        let records = tasks.load_all()?;
        Ok(Self::compute(&records, num_users, today))
    }
}

fn percent(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64 * 100.0
    }
}

impl fmt::Display for Statistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "-----------------------------------")?;
        writeln!(f, "Number of users: {}", self.num_users)?;
        writeln!(f, "Total tasks: {}", self.num_tasks)?;
        writeln!(f, "Completed tasks: {}", self.completed)?;
        writeln!(f, "Incomplete tasks: {}", self.incomplete)?;
        writeln!(f, "Overdue tasks: {}", self.overdue)?;
        writeln!(f, "Percentage incomplete: {:.2}%", self.percent_incomplete)?;
        writeln!(f, "Percentage overdue: {:.2}%", self.percent_overdue)?;
        write!(f, "-----------------------------------")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TaskTrackError;
    use tempfile::TempDir;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn task(due: NaiveDate, completed: bool) -> TaskRecord {
        TaskRecord {
            owner: "alice".to_string(),
            title: "t".to_string(),
            description: "d".to_string(),
            assigned_date: date(2024, 1, 1),
            due_date: due,
            completed,
        }
    }

    #[test]
    fn test_zero_tasks_reports_zero_percent() {
        let stats = Statistics::compute(&[], 1, date(2024, 2, 1));
        assert_eq!(stats.num_tasks, 0);
        assert_eq!(stats.percent_incomplete, 0.0);
        assert_eq!(stats.percent_overdue, 0.0);
    }

    #[test]
    fn test_single_overdue_task() {
        let stats = Statistics::compute(&[task(date(2024, 1, 10), false)], 1, date(2024, 2, 1));
        assert_eq!(stats.overdue, 1);
        assert_eq!(stats.incomplete, 1);
        assert_eq!(stats.percent_overdue, 100.0);
    }

    #[test]
    fn test_due_today_is_not_overdue() {
        let stats = Statistics::compute(&[task(date(2024, 2, 1), false)], 1, date(2024, 2, 1));
        assert_eq!(stats.overdue, 0);
    }

    #[test]
    fn test_mixed_counts() {
        let today = date(2024, 2, 1);
        let tasks = vec![
            task(date(2024, 1, 10), true),
            task(date(2024, 1, 10), false),
            task(date(2024, 3, 1), false),
            task(date(2024, 3, 1), true),
        ];
        let stats = Statistics::compute(&tasks, 3, today);
        assert_eq!(stats.num_users, 3);
        assert_eq!(stats.num_tasks, 4);
        assert_eq!(stats.completed, 2);
        assert_eq!(stats.incomplete, 2);
        assert_eq!(stats.overdue, 1);
        assert_eq!(stats.percent_incomplete, 50.0);
        assert_eq!(stats.percent_overdue, 25.0);
    }

    #[test]
    fn test_display_report() {
        let tasks = vec![
            task(date(2024, 1, 10), false),
            task(date(2024, 3, 1), true),
            task(date(2024, 3, 1), true),
        ];
        let stats = Statistics::compute(&tasks, 2, date(2024, 2, 1));
        let report = stats.to_string();
        assert!(report.contains("Number of users: 2"));
        assert!(report.contains("Percentage incomplete: 33.33%"));
        assert!(report.contains("Percentage overdue: 33.33%"));
    }

    #[test]
    fn test_generate_requires_admin() {
        let temp_dir = TempDir::new().unwrap();
        let users = UserStore::new(temp_dir.path().join("user.txt"));
        let tasks = TaskStore::new(temp_dir.path().join("tasks.txt"));
        users.bootstrap("password").unwrap();
        tasks.bootstrap().unwrap();

        let err = Statistics::generate(&Session::new("alice"), &users, &tasks, date(2024, 2, 1)).unwrap_err();
        assert!(matches!(err, TaskTrackError::PermissionDenied(_)));

        let stats = Statistics::generate(&Session::new("admin"), &users, &tasks, date(2024, 2, 1)).unwrap();
        assert_eq!(stats.num_users, 1);
        assert_eq!(stats.num_tasks, 0);
    }
}
