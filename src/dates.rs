use chrono::{Local, NaiveDate};
use thiserror::Error;

const DAY_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DateError {
    #[error("invalid date '{input}': expected YYYY-MM-DD")]
    InvalidDate { input: String },
}

/// Parses a calendar day in strict `YYYY-MM-DD` form.
///
/// chrono accepts unpadded fields such as `2024-1-5`, which would not sort
/// correctly as strings, so the length is checked as well.
pub fn parse_day(input: &str) -> Result<NaiveDate, DateError> {
    let trimmed = input.trim();
    if trimmed.len() != 10 {
        return Err(DateError::InvalidDate {
            input: input.to_string(),
        });
    }

    NaiveDate::parse_from_str(trimmed, DAY_FORMAT).map_err(|_| DateError::InvalidDate {
        input: input.to_string(),
    })
}

pub fn day_key(date: NaiveDate) -> String {
    date.format(DAY_FORMAT).to_string()
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}
