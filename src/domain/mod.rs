//! Domain types for tasktrack
//!
//! This module contains all core domain types:
//! - TaskRecord: one line of the tasks file
//! - UserRecord: one line of the users file
//! - Session: the authenticated identity and its role

pub mod session;
pub mod task;
pub mod user;

pub use session::Session;
pub use task::{IndexedTask, NewTask, TaskEdit, TaskRecord, TaskStatus};
pub use user::{ADMIN_USERNAME, UserRecord};
