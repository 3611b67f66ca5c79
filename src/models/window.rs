use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%d.%m.%Y"];

/// Parses a user supplied date in either `YYYY-MM-DD` or `dd.mm.yyyy` form.
pub fn parse_date(input: &str) -> Result<NaiveDate> {
    let input = input.trim();
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(input, format).ok())
        .ok_or_else(|| Error::InvalidDate(input.to_string()))
}

/// Optional analysis window. Either bound may be absent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateWindow {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateWindow {
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Result<Self> {
        if let (Some(start), Some(end)) = (start, end) {
            if start > end {
                return Err(Error::InvalidDateWindow {
                    start: start.to_string(),
                    end: end.to_string(),
                });
            }
        }
        Ok(Self { start, end })
    }

    pub fn parse(start: Option<&str>, end: Option<&str>) -> Result<Self> {
        let start = start.map(parse_date).transpose()?;
        let end = end.map(parse_date).transpose()?;
        Self::new(start, end)
    }

    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    /// Search qualifier restricting creation date, `None` when unbounded.
    pub fn created_qualifier(&self) -> Option<String> {
        let range = match (self.start, self.end) {
            (Some(start), Some(end)) => format!("{}..{}", iso(start), iso(end)),
            (Some(start), None) => format!("{}..*", iso(start)),
            (None, Some(end)) => format!("*..{}", iso(end)),
            (None, None) => return None,
        };
        Some(format!("created:{}", range))
    }

    /// Whether a contributor stats week (unix timestamp of its start) falls
    /// inside the window. With no bounds every week with a positive
    /// timestamp counts.
    pub fn contains_week(&self, week: i64) -> bool {
        match (self.start_timestamp(), self.end_timestamp()) {
            (Some(start), Some(end)) => start <= week && week < end,
            (Some(start), None) => week >= start,
            (None, Some(end)) => week <= end,
            (None, None) => week > 0,
        }
    }

    fn start_timestamp(&self) -> Option<i64> {
        self.start.map(midnight_timestamp)
    }

    fn end_timestamp(&self) -> Option<i64> {
        self.end.map(midnight_timestamp)
    }
}

fn iso(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn midnight_timestamp(date: NaiveDate) -> i64 {
    date.and_time(NaiveTime::MIN).and_utc().timestamp()
}
