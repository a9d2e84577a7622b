use crate::clause::{DATE_DISPLAY_FORMAT, Value};
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeDelta};

/// Indexed date form; fixed width so lexical order is chronological.
pub const INDEX_DATE_FORMAT: &str = "%Y%m%d%H%M%S";

///
/// DateRange
///
/// Inclusive span of instants implied by a date literal's precision.
/// A month-only literal covers the whole month; a full timestamp covers a
/// single second.
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct DateRange {
    pub lower: NaiveDateTime,
    pub upper: NaiveDateTime,
}

impl DateRange {
    #[must_use]
    pub const fn new(lower: NaiveDateTime, upper: NaiveDateTime) -> Self {
        Self { lower, upper }
    }

    #[must_use]
    pub const fn instant(at: NaiveDateTime) -> Self {
        Self {
            lower: at,
            upper: at,
        }
    }

    /// Smallest range covering both `self` and `other`.
    #[must_use]
    pub fn span(self, other: Self) -> Self {
        Self {
            lower: self.lower.min(other.lower),
            upper: self.upper.max(other.upper),
        }
    }

    #[must_use]
    pub fn contains(&self, at: NaiveDateTime) -> bool {
        self.lower <= at && at <= self.upper
    }
}

///
/// DateSupport
///
/// Converts between caller-facing date literals, indexed date strings and
/// display strings.
///

pub trait DateSupport: Send + Sync {
    /// Range implied by `value`; `None` when it is not a date.
    fn range_of(&self, value: &Value) -> Option<DateRange>;

    /// Sortable indexed form of `date`.
    fn index_value(&self, date: NaiveDateTime) -> String;

    /// Parse an indexed form back into an instant.
    fn parse_index_value(&self, indexed: &str) -> Option<NaiveDateTime>;

    fn display_value(&self, date: NaiveDateTime) -> String;
}

///
/// DefaultDateSupport
///
/// Accepts `yyyy`, `yyyy-MM`, `yyyy-MM-dd`, `yyyy-MM-dd HH:mm` and
/// `yyyy-MM-dd HH:mm:ss` (with `/` or `-` separators), epoch milliseconds
/// for numbers, and exact `Value::Date` instants.
///

#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultDateSupport;

impl DateSupport for DefaultDateSupport {
    fn range_of(&self, value: &Value) -> Option<DateRange> {
        match value {
            Value::Date(date) => Some(DateRange::instant(*date)),
            Value::Number(millis) => {
                DateTime::from_timestamp_millis(*millis).map(|dt| DateRange::instant(dt.naive_utc()))
            }
            Value::Text(text) => parse_range(text),
        }
    }

    fn index_value(&self, date: NaiveDateTime) -> String {
        date.format(INDEX_DATE_FORMAT).to_string()
    }

    fn parse_index_value(&self, indexed: &str) -> Option<NaiveDateTime> {
        NaiveDateTime::parse_from_str(indexed, INDEX_DATE_FORMAT).ok()
    }

    fn display_value(&self, date: NaiveDateTime) -> String {
        date.format(DATE_DISPLAY_FORMAT).to_string()
    }
}

fn parse_range(text: &str) -> Option<DateRange> {
    let text = text.trim().replace('/', "-");
    let (date_part, time_part) = match text.split_once([' ', 'T']) {
        Some((date, time)) => (date, Some(time.trim())),
        None => (text.as_str(), None),
    };
    let parts: Vec<&str> = date_part.split('-').collect();

    match (parts.as_slice(), time_part) {
        ([year], None) => {
            let year: i32 = year.parse().ok()?;
            let start = NaiveDate::from_ymd_opt(year, 1, 1)?;
            let next = NaiveDate::from_ymd_opt(year.checked_add(1)?, 1, 1)?;
            day_span(start, next)
        }
        ([year, month], None) => {
            let year: i32 = year.parse().ok()?;
            let month: u32 = month.parse().ok()?;
            let start = NaiveDate::from_ymd_opt(year, month, 1)?;
            let next = if month == 12 {
                NaiveDate::from_ymd_opt(year.checked_add(1)?, 1, 1)?
            } else {
                NaiveDate::from_ymd_opt(year, month + 1, 1)?
            };
            day_span(start, next)
        }
        ([year, month, day], None) => {
            let date = ymd(year, month, day)?;
            day_span(date, date.succ_opt()?)
        }
        ([year, month, day], Some(time)) => {
            let date = ymd(year, month, day)?;
            let clock: Vec<&str> = time.split(':').collect();
            match clock.as_slice() {
                [hour, minute] => {
                    let lower = date.and_hms_opt(hour.parse().ok()?, minute.parse().ok()?, 0)?;
                    Some(DateRange::new(lower, lower + TimeDelta::seconds(59)))
                }
                [hour, minute, second] => {
                    let at = date.and_hms_opt(
                        hour.parse().ok()?,
                        minute.parse().ok()?,
                        second.parse().ok()?,
                    )?;
                    Some(DateRange::instant(at))
                }
                _ => None,
            }
        }
        _ => None,
    }
}

fn ymd(year: &str, month: &str, day: &str) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, day.parse().ok()?)
}

// Whole days from `start` up to (not including) `next`.
fn day_span(start: NaiveDate, next: NaiveDate) -> Option<DateRange> {
    let lower = start.and_hms_opt(0, 0, 0)?;
    let upper = next.and_hms_opt(0, 0, 0)? - TimeDelta::seconds(1);

    Some(DateRange::new(lower, upper))
}
