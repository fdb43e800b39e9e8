//! tasktrack - a flat-file task tracker
//!
//! Users and tasks live in two `;`-delimited text files. A logged-in session can add
//! tasks, list every task or only its own, complete or edit incomplete tasks, and
//! (as `admin`) read aggregate statistics.

pub mod clock;
pub mod codec;
pub mod domain;
pub mod error;
pub mod policy;
pub mod stats;
pub mod store;

pub use error::{Result, TaskTrackError};
