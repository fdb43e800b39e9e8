//! Date helpers

use chrono::{Local, NaiveDate};

/// Current local calendar date, no time-of-day component
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}
