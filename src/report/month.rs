//! Calendar months given as `YYYY-MM`.

use time::{Date, Month};

/// A calendar month, used as the half-open date range `[first_day, next_month)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportMonth {
    first_day: Date,
}

impl ReportMonth {
    /// Parse a strict `YYYY-MM` string with a month between 01 and 12.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        let bytes = text.as_bytes();

        let has_month_shape = bytes.len() == 7
            && bytes.iter().enumerate().all(|(i, byte)| match i {
                4 => *byte == b'-',
                _ => byte.is_ascii_digit(),
            });

        if !has_month_shape {
            return None;
        }

        let year: i32 = text[..4].parse().ok()?;
        let month: u8 = text[5..].parse().ok()?;
        let month = Month::try_from(month).ok()?;

        Date::from_calendar_date(year, month, 1)
            .ok()
            .map(|first_day| Self { first_day })
    }

    /// The first day of the month, inclusive.
    pub fn first_day(self) -> Date {
        self.first_day
    }

    /// The first day of the following month, exclusive.
    pub fn next_month_first_day(self) -> Date {
        let (year, month) = match self.first_day.month() {
            Month::December => (self.first_day.year() + 1, Month::January),
            month => (self.first_day.year(), month.next()),
        };

        // Only fails after December 9999.
        Date::from_calendar_date(year, month, 1).unwrap_or(Date::MAX)
    }
}
