//! Date/time parsing for values coming back from text-protocol drivers.

use crate::error::{DbError, DbResult};
use crate::value::Value;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};

/// Parse a date/time string.
///
/// Accepted forms, tried in order: an all-digit unix timestamp,
/// `YYYY-MM-DD HH:MM:SS`, and `YYYY-MM-DD` (midnight). Anything else is an
/// `InvalidInput` error.
pub fn parse_date_time(input: &str) -> DbResult<NaiveDateTime> {
    let trimmed = input.trim();
    if !trimmed.is_empty() && trimmed.chars().all(|c| c.is_ascii_digit()) {
        if let Some(parsed) = trimmed
            .parse::<i64>()
            .ok()
            .and_then(|ts| DateTime::from_timestamp(ts, 0))
        {
            return Ok(parsed.naive_utc());
        }
    }
    if let Ok(parsed) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S") {
        return Ok(parsed);
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(date.and_time(NaiveTime::MIN));
    }
    Err(DbError::invalid_input(format!(
        "'{input}' is not a recognized date/time value"
    )))
}

impl Value {
    /// Interpret the value as a date/time. `Null` maps to `None`, integers
    /// are unix timestamps, text goes through [`parse_date_time`].
    pub fn to_date_time(&self) -> DbResult<Option<NaiveDateTime>> {
        match self {
            Value::Null => Ok(None),
            Value::Int(ts) => match DateTime::from_timestamp(*ts, 0) {
                Some(dt) => Ok(Some(dt.naive_utc())),
                None => Err(DbError::invalid_input(format!(
                    "{ts} is out of range for a unix timestamp"
                ))),
            },
            Value::Text(s) => parse_date_time(s).map(Some),
            other => Err(DbError::invalid_input(format!(
                "cannot interpret {other:?} as a date/time"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_timestamps_dates_and_datetimes() {
        let dt = parse_date_time("0").unwrap();
        assert_eq!(dt.to_string(), "1970-01-01 00:00:00");

        let dt = parse_date_time("2024-03-01 12:30:45").unwrap();
        assert_eq!(dt.to_string(), "2024-03-01 12:30:45");

        let dt = parse_date_time("2024-03-01").unwrap();
        assert_eq!(dt.to_string(), "2024-03-01 00:00:00");
    }

    #[test]
    fn rejects_everything_else() {
        assert!(parse_date_time("yesterday").is_err());
        assert!(parse_date_time("2024/03/01").is_err());
        assert!(parse_date_time("").is_err());
    }

    #[test]
    fn value_bridging() {
        assert_eq!(Value::Null.to_date_time().unwrap(), None);
        let dt = Value::Int(86_400).to_date_time().unwrap().unwrap();
        assert_eq!(dt.to_string(), "1970-01-02 00:00:00");
        assert!(Value::Bool(true).to_date_time().is_err());
    }
}
