//! CLI command definitions using clap.
//!
//! Defines the main CLI structure and subcommands:
//! - (none): interactive login and menu
//! - init: create the data files
//! - register/add/list/complete/edit/stats: one-shot operations

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use tasktrack::codec::parse_date;

/// tasktrack - flat-file task tracker
#[derive(Parser, Debug)]
#[command(name = "tasktrack")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Optional config file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Username to log in as (prompted for if omitted)
    #[arg(short, long, global = true)]
    pub user: Option<String>,

    /// Password (prompted for if omitted)
    #[arg(short, long, global = true)]
    pub password: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Check if verbose mode is enabled
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }
}

/// Main subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create the users and tasks files if they do not exist
    Init,

    #[command(flatten)]
    Session(SessionCommand),
}

/// Subcommands that run as a logged-in user
#[derive(Subcommand, Debug)]
pub enum SessionCommand {
    /// Register a new user (password is prompted for twice)
    Register {
        /// Username to register
        username: String,
    },

    /// Add a task
    Add {
        /// Username the task is assigned to
        #[arg(long)]
        to: String,

        /// Task title
        #[arg(long)]
        title: String,

        /// Task description
        #[arg(short, long, default_value = "")]
        description: String,

        /// Due date (YYYY-MM-DD)
        #[arg(long, value_parser = parse_due_date)]
        due: NaiveDate,
    },

    /// List tasks
    List {
        /// Only tasks assigned to the logged-in user
        #[arg(short, long)]
        mine: bool,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Mark a task as complete
    Complete {
        /// Task number as shown by `list`
        #[arg(value_parser = parse_task_number)]
        number: usize,
    },

    /// Change the assignee or due date of an incomplete task
    Edit {
        /// Task number as shown by `list`
        #[arg(value_parser = parse_task_number)]
        number: usize,

        /// New assignee username
        #[arg(long, conflicts_with = "due", required_unless_present = "due")]
        owner: Option<String>,

        /// New due date (YYYY-MM-DD)
        #[arg(long, value_parser = parse_due_date)]
        due: Option<NaiveDate>,
    },

    /// Show task statistics (admin only)
    Stats {
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

fn parse_due_date(value: &str) -> Result<NaiveDate, String> {
    parse_date(value.trim()).map_err(|_| "Invalid date format. Please use YYYY-MM-DD.".to_string())
}

/// Task numbers are 1-based.
fn parse_task_number(value: &str) -> Result<usize, String> {
    match value.trim().parse::<usize>() {
        Ok(0) | Err(_) => Err(format!("'{}' is not a task number (1 or higher)", value)),
        Ok(n) => Ok(n),
    }
}
