//! Line codec for the two flat files.
//!
//! Task lines: `owner;title;description;YYYY-MM-DD;YYYY-MM-DD;Yes|No`
//! User lines: `username;password`, trailing extra fields ignored
//!
//! Values containing the delimiter or a line break cannot be represented; every
//! write path runs its input through [`validate_field`] first.

use chrono::NaiveDate;

use crate::domain::{TaskRecord, UserRecord};
use crate::error::{Result, TaskTrackError};

pub const DELIMITER: char = ';';

/// Storage date format
pub const DATE_FORMAT: &str = "%Y-%m-%d";

const COMPLETED_YES: &str = "Yes";
const COMPLETED_NO: &str = "No";

/// A record that lives on a single delimited line.
pub trait LineRecord: Sized {
    /// Fields a line carries
    const FIELD_COUNT: usize;

    fn encode(&self) -> String;

    fn decode(line: &str) -> Result<Self>;
}

impl LineRecord for TaskRecord {
    const FIELD_COUNT: usize = 6;

    fn encode(&self) -> String {
        format!(
            "{owner}{d}{title}{d}{description}{d}{assigned}{d}{due}{d}{flag}",
            owner = self.owner,
            title = self.title,
            description = self.description,
            assigned = format_date(self.assigned_date),
            due = format_date(self.due_date),
            flag = encode_flag(self.completed),
            d = DELIMITER,
        )
    }

    fn decode(line: &str) -> Result<Self> {
        let fields = split_exact(line, Self::FIELD_COUNT)?;
        Ok(Self {
            owner: fields[0].to_string(),
            title: fields[1].to_string(),
            description: fields[2].to_string(),
            assigned_date: parse_date(fields[3])?,
            due_date: parse_date(fields[4])?,
            completed: decode_flag(fields[5]),
        })
    }
}

impl LineRecord for UserRecord {
    const FIELD_COUNT: usize = 2;

    fn encode(&self) -> String {
        format!("{}{}{}", self.username, DELIMITER, self.password)
    }

    fn decode(line: &str) -> Result<Self> {
        let fields: Vec<&str> = line.split(DELIMITER).collect();
        if fields.len() < Self::FIELD_COUNT {
            return Err(TaskTrackError::malformed(format!(
                "expected at least {} fields, found {}",
                Self::FIELD_COUNT,
                fields.len()
            )));
        }
        if fields[0].is_empty() {
            return Err(TaskTrackError::malformed("empty username"));
        }
        Ok(Self::new(fields[0], fields[1]))
    }
}

fn split_exact(line: &str, expected: usize) -> Result<Vec<&str>> {
    let fields: Vec<&str> = line.split(DELIMITER).collect();
    if fields.len() != expected {
        return Err(TaskTrackError::malformed(format!(
            "expected {} fields, found {}",
            expected,
            fields.len()
        )));
    }
    Ok(fields)
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Parse a `YYYY-MM-DD` calendar date.
pub fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map_err(|e| TaskTrackError::malformed(format!("invalid date '{}': {}", value, e)))
}

pub fn encode_flag(completed: bool) -> &'static str {
    if completed { COMPLETED_YES } else { COMPLETED_NO }
}

/// Only the literal `Yes` counts as completed.
pub fn decode_flag(token: &str) -> bool {
    token == COMPLETED_YES
}

/// Reject values the line format cannot carry.
pub fn validate_field(name: &str, value: &str) -> Result<()> {
    if value.contains(DELIMITER) {
        return Err(TaskTrackError::Validation(format!(
            "{} cannot contain '{}'",
            name, DELIMITER
        )));
    }
    if value.contains(['\n', '\r']) {
        return Err(TaskTrackError::Validation(format!("{} cannot contain line breaks", name)));
    }
    Ok(())
}
