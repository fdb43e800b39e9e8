//! Flat-file persistence for tasktrack.
//!
//! Two files, both one record per line:
//! - **users file**: `username;password`, append-only
//! - **tasks file**: `owner;title;description;assigned;due;Yes|No`, rewritten whole
//!   after every in-place change
//!
//! # Example
//!
//! ```ignore
//! use tasktrack::store::Workspace;
//!
//! let workspace = Workspace::open(".", "user.txt", "tasks.txt", "password")?;
//! let session = workspace.users.login("admin", "password")?;
//! let mine = workspace.tasks.view_mine(&session)?;
//! ```

mod line_file;
mod task_store;
mod user_store;

use std::path::{Path, PathBuf};

pub use line_file::{LineFile, RawLine};
pub use task_store::{TaskStore, edit_task, find_mine, mark_complete};
pub use user_store::UserStore;

use crate::error::Result;

/// Both stores, rooted in one directory.
#[derive(Debug, Clone)]
pub struct Workspace {
    pub dir: PathBuf,
    pub users: UserStore,
    pub tasks: TaskStore,
}

impl Workspace {
    /// Create the directory and both files if missing.
    ///
    /// The users file is seeded with the admin account, the tasks file starts empty.
    pub fn open(dir: impl AsRef<Path>, users_file: &str, tasks_file: &str, admin_password: &str) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&dir)?;

        let users = UserStore::new(dir.join(users_file));
        let tasks = TaskStore::new(dir.join(tasks_file));
        users.bootstrap(admin_password)?;
        tasks.bootstrap()?;

        log::debug!("Opened workspace at {}", dir.display());
        Ok(Self { dir, users, tasks })
    }
}
