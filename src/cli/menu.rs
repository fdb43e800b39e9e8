//! Interactive login and main menu.
//!
//! Library errors are shown to the user and the menu carries on; only a failure
//! to read input ends the session early.

use chrono::NaiveDate;
use colored::*;
use eyre::Result;
use std::io::{BufRead, Write};

use tasktrack::codec::parse_date;
use tasktrack::domain::{NewTask, Session, TaskEdit};
use tasktrack::error::TaskTrackError;
use tasktrack::policy::{Operation, authorize};
use tasktrack::stats::Statistics;
use tasktrack::store::Workspace;

use super::prompt::Prompt;
use super::render::{RULE, my_task_entry, task_block};

const MAIN_MENU: &str = "\nMAIN MENU\n\
1. View all tasks\n\
2. Add a new task\n\
3. Register a new user\n\
4. View my tasks\n\
5. Display statistics\n\
6. Exit";

pub struct Menu<'a, R, W> {
    workspace: &'a Workspace,
    prompt: Prompt<R, W>,
    today: NaiveDate,
}

impl<'a, R: BufRead, W: Write> Menu<'a, R, W> {
    pub fn new(workspace: &'a Workspace, prompt: Prompt<R, W>, today: NaiveDate) -> Self {
        Self {
            workspace,
            prompt,
            today,
        }
    }

    #[cfg(test)]
    pub fn into_prompt(self) -> Prompt<R, W> {
        self.prompt
    }

    /// Ask for credentials until a login succeeds.
    pub fn login(&mut self) -> Result<Session> {
        loop {
            self.prompt.say("LOGIN")?;
            let username = self.prompt.ask("Username: ")?;
            let password = self.prompt.ask("Password: ")?;

            match self.workspace.users.login(&username, &password) {
                Ok(session) => {
                    self.prompt.say("Login Successful!".green().to_string())?;
                    return Ok(session);
                }
                Err(TaskTrackError::Authentication(reason)) => {
                    self.prompt.say(capitalize(&reason.to_string()).red().to_string())?;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Main menu loop, until the user picks Exit.
    pub fn run(&mut self, session: &Session) -> Result<()> {
        loop {
            self.prompt.say(MAIN_MENU)?;
            let choice = self.prompt.ask("Enter your choice: ")?;

            let outcome = match choice.as_str() {
                "1" => self.view_all(session),
                "2" => self.add_task(session),
                "3" => self.register_user(session),
                "4" => self.view_mine(session),
                "5" => self.statistics(session),
                "6" => {
                    self.prompt.say("Exiting...")?;
                    return Ok(());
                }
                _ => {
                    self.prompt.say("Invalid choice. Please try again.")?;
                    Ok(())
                }
            };

            if let Err(e) = outcome {
                match e.downcast_ref::<TaskTrackError>() {
                    Some(err) => {
                        log::warn!("Menu action failed: {}", err);
                        self.prompt.say(err.to_string().red().to_string())?;
                    }
                    None => return Err(e),
                }
            }
        }
    }

    fn view_all(&mut self, session: &Session) -> Result<()> {
        let tasks = self.workspace.tasks.view_all(session)?;
        if tasks.is_empty() {
            self.prompt.say("There are no tasks to display.")?;
            return Ok(());
        }

        self.prompt.say("All tasks:\n".bold().to_string())?;
        for (index, task) in tasks.iter().enumerate() {
            self.prompt.say(task_block(index + 1, task))?;
            self.prompt.say(RULE)?;
        }
        Ok(())
    }

    fn add_task(&mut self, session: &Session) -> Result<()> {
        let title = self.prompt.ask("Enter task title: ")?;
        let description = self.prompt.ask("Enter task description: ")?;
        let owner = self.prompt.ask("Enter the username of the person this task is assigned to: ")?;
        let due = self.prompt.ask("Enter due date (YYYY-MM-DD): ")?;

        let Ok(due_date) = parse_date(&due) else {
            self.prompt.say("Invalid date format. Please use YYYY-MM-DD.")?;
            return Ok(());
        };

        let new_task = NewTask {
            owner,
            title,
            description,
            due_date,
        };
        self.workspace.tasks.add(session, new_task, self.today)?;
        self.prompt.say("Task added successfully.".green().to_string())?;
        Ok(())
    }

    fn register_user(&mut self, session: &Session) -> Result<()> {
        authorize(session, Operation::RegisterUser)?;
        let username = self.prompt.ask("Enter new username: ")?;
        let password = self.prompt.ask("Enter new password: ")?;
        let confirm = self.prompt.ask("Re-enter your password for verification: ")?;

        self.workspace.users.register(&username, &password, &confirm)?;
        self.prompt.say("User registered successfully.".green().to_string())?;
        Ok(())
    }

    fn view_mine(&mut self, session: &Session) -> Result<()> {
        let mine = self.workspace.tasks.view_mine(session)?;
        if mine.is_empty() {
            self.prompt.say(format!("No tasks found for user {}.", session.username()))?;
            return Ok(());
        }

        self.prompt.say(format!("Tasks assigned to {}:", session.username()))?;
        for (i, task) in mine.iter().enumerate() {
            self.prompt.say(my_task_entry(i + 1, &task.record))?;
        }

        let selection = self
            .prompt
            .ask("Select a task number to edit or mark as complete, or '-1' to return to the main menu: ")?;
        if selection == "-1" {
            return Ok(());
        }
        let Some(selected) = selection
            .parse::<usize>()
            .ok()
            .filter(|n| (1..=mine.len()).contains(n))
            .map(|n| &mine[n - 1])
        else {
            self.prompt.say("Invalid task number.")?;
            return Ok(());
        };

        self.prompt.say("Do you want to:\n1. Mark this task as complete\n2. Edit this task")?;
        match self.prompt.ask("Enter your choice (1 or 2): ")?.as_str() {
            "1" => {
                self.workspace.tasks.complete(session, selected.index)?;
                self.prompt.say("Task marked as complete.".green().to_string())?;
            }
            "2" => self.edit_task(session, selected.index)?,
            _ => self.prompt.say("Invalid choice.")?,
        }
        Ok(())
    }

    fn edit_task(&mut self, session: &Session, index: usize) -> Result<()> {
        self.prompt.say("Edit task:\n1. Assignee username\n2. Due date")?;
        let edit = match self.prompt.ask("Enter your choice (1 or 2): ")?.as_str() {
            "1" => TaskEdit::Owner(self.prompt.ask("Enter new username: ")?),
            "2" => {
                let due = self.prompt.ask("Enter new due date (YYYY-MM-DD): ")?;
                match parse_date(&due) {
                    Ok(date) => TaskEdit::DueDate(date),
                    Err(_) => {
                        self.prompt.say("Invalid date format. Please use YYYY-MM-DD.")?;
                        return Ok(());
                    }
                }
            }
            _ => {
                self.prompt.say("Invalid choice.")?;
                return Ok(());
            }
        };

        self.workspace.tasks.update(session, index, edit)?;
        self.prompt.say("Task updated successfully.".green().to_string())?;
        Ok(())
    }

    fn statistics(&mut self, session: &Session) -> Result<()> {
        let stats = Statistics::generate(session, &self.workspace.users, &self.workspace.tasks, self.today)?;
        self.prompt.say(stats.to_string())?;
        Ok(())
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => format!("{}{}", first.to_ascii_uppercase(), chars.as_str()),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Cursor;
    use tempfile::TempDir;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 2, 1).unwrap()
    }

    fn create_workspace() -> (Workspace, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let workspace = Workspace::open(temp_dir.path(), "user.txt", "tasks.txt", "password").unwrap();
        (workspace, temp_dir)
    }

    /// Log in and drive the menu with `script`, returning everything printed.
    fn run_session(workspace: &Workspace, script: &str) -> String {
        let prompt = Prompt::new(Cursor::new(script.to_string()), Vec::new());
        let mut menu = Menu::new(workspace, prompt, today());
        let session = menu.login().unwrap();
        menu.run(&session).unwrap();
        String::from_utf8(menu.into_prompt().into_output()).unwrap()
    }

    #[test]
    fn test_login_retries_until_success() {
        let (workspace, _temp) = create_workspace();
        let output = run_session(&workspace, "ghost\nx\nadmin\nwrong\nadmin\npassword\n6\n");
        assert!(output.contains("User does not exist"));
        assert!(output.contains("Wrong password"));
        assert!(output.contains("Login Successful!"));
        assert!(output.contains("Exiting..."));
    }

    #[test]
    fn test_login_fails_when_input_ends() {
        let (workspace, _temp) = create_workspace();
        let prompt = Prompt::new(Cursor::new("ghost\nx\n".to_string()), Vec::new());
        let mut menu = Menu::new(&workspace, prompt, today());
        assert!(menu.login().is_err());
    }

    #[test]
    fn test_add_and_view_all() {
        let (workspace, _temp) = create_workspace();
        let output = run_session(
            &workspace,
            "admin\npassword\n2\nBuy milk\n2 liters\nalice\n2024-01-10\n1\n6\n",
        );
        assert!(output.contains("Task added successfully."));
        assert!(output.contains("Assigned to: alice"));
        assert!(output.contains("Date Assigned: 01-02-2024"));
        assert!(output.contains("Due Date: 10-01-2024"));
        assert_eq!(
            fs::read_to_string(workspace.tasks.path()).unwrap(),
            "alice;Buy milk;2 liters;2024-02-01;2024-01-10;No\n"
        );
    }

    #[test]
    fn test_add_with_bad_date_writes_nothing() {
        let (workspace, _temp) = create_workspace();
        let output = run_session(&workspace, "admin\npassword\n2\nt\nd\nalice\n10/01/2024\n6\n");
        assert!(output.contains("Invalid date format"));
        assert_eq!(fs::read_to_string(workspace.tasks.path()).unwrap(), "");
    }

    #[test]
    fn test_register_and_duplicate() {
        let (workspace, _temp) = create_workspace();
        let output = run_session(&workspace, "admin\npassword\n3\nbob\npw1\npw1\n3\nbob\npw2\npw2\n6\n");
        assert!(output.contains("User registered successfully."));
        assert!(output.contains("Username already exists: bob"));
        assert_eq!(fs::read_to_string(workspace.users.path()).unwrap(), "admin;password\nbob;pw1\n");
    }

    #[test]
    fn test_statistics_denied_for_standard_user() {
        let (workspace, _temp) = create_workspace();
        workspace.users.register("bob", "pw", "pw").unwrap();
        let output = run_session(&workspace, "bob\npw\n5\n6\n");
        assert!(output.contains("Access denied"));
        assert!(!output.contains("Number of users"));
    }

    #[test]
    fn test_statistics_for_admin() {
        let (workspace, _temp) = create_workspace();
        fs::write(workspace.tasks.path(), "alice;Buy milk;2 liters;2024-01-01;2024-01-10;No\n").unwrap();
        let output = run_session(&workspace, "admin\npassword\n5\n6\n");
        assert!(output.contains("Overdue tasks: 1"));
        assert!(output.contains("Percentage overdue: 100.00%"));
    }

    #[test]
    fn test_view_mine_complete_uses_full_index() {
        let (workspace, _temp) = create_workspace();
        workspace.users.register("alice", "pw", "pw").unwrap();
        fs::write(
            workspace.tasks.path(),
            "bob;one;d;2024-01-01;2024-01-10;No\nalice;two;d;2024-01-01;2024-01-10;No\n",
        )
        .unwrap();

        let output = run_session(&workspace, "alice\npw\n4\n1\n1\n6\n");
        assert!(output.contains("1. Title: two"));
        assert_eq!(
            fs::read_to_string(workspace.tasks.path()).unwrap(),
            "bob;one;d;2024-01-01;2024-01-10;No\nalice;two;d;2024-01-01;2024-01-10;Yes\n"
        );
    }

    #[test]
    fn test_edit_completed_task_is_refused() {
        let (workspace, _temp) = create_workspace();
        workspace.users.register("alice", "pw", "pw").unwrap();
        fs::write(workspace.tasks.path(), "alice;done;d;2024-01-01;2024-01-10;Yes\n").unwrap();

        let output = run_session(&workspace, "alice\npw\n4\n1\n2\n1\ncarol\n6\n");
        assert!(output.contains("cannot be edited"));
        assert_eq!(
            fs::read_to_string(workspace.tasks.path()).unwrap(),
            "alice;done;d;2024-01-01;2024-01-10;Yes\n"
        );
    }

    #[test]
    fn test_edit_due_date() {
        let (workspace, _temp) = create_workspace();
        workspace.users.register("alice", "pw", "pw").unwrap();
        fs::write(workspace.tasks.path(), "alice;t;d;2024-01-01;2024-01-10;No\n").unwrap();

        let output = run_session(&workspace, "alice\npw\n4\n1\n2\n2\n2024-03-03\n6\n");
        assert!(output.contains("Task updated successfully."));
        assert_eq!(
            fs::read_to_string(workspace.tasks.path()).unwrap(),
            "alice;t;d;2024-01-01;2024-03-03;No\n"
        );
    }

    #[test]
    fn test_malformed_task_file_is_reported() {
        let (workspace, _temp) = create_workspace();
        fs::write(workspace.tasks.path(), "alice;broken\n").unwrap();
        let output = run_session(&workspace, "admin\npassword\n1\n6\n");
        assert!(output.contains("Malformed record at line 1"));
    }

    #[test]
    fn test_invalid_menu_choice() {
        let (workspace, _temp) = create_workspace();
        let output = run_session(&workspace, "admin\npassword\n9\n6\n");
        assert!(output.contains("Invalid choice. Please try again."));
    }
}
