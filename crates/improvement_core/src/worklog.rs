//! Work-log day strings (`YYYY-MM-DD`).

use chrono::{Local, NaiveDate};

const WORKLOG_FORMAT: &str = "%Y-%m-%d";

/// Returns the current local day as `YYYY-MM-DD`.
pub fn today_str() -> String {
    day_str(Local::now().date_naive())
}

pub fn day_str(date: NaiveDate) -> String {
    date.format(WORKLOG_FORMAT).to_string()
}

/// Whether `value` is a real calendar day in `YYYY-MM-DD` form.
pub fn is_valid_day(value: &str) -> bool {
    value.len() == 10 && NaiveDate::parse_from_str(value, WORKLOG_FORMAT).is_ok()
}
