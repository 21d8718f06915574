//! Date range and day iteration.

use chrono::{Days, NaiveDate};

use crate::DateRangeError;

/// An inclusive range of calendar dates, used for backfills.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    /// Start date (inclusive).
    pub start: NaiveDate,
    /// End date (inclusive).
    pub end: NaiveDate,
}

impl DateRange {
    /// Creates a new date range, validating that start <= end.
    ///
    /// # Errors
    ///
    /// Returns an error if start > end.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, DateRangeError> {
        if start > end {
            return Err(DateRangeError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Creates a date range for a single day.
    #[must_use]
    pub const fn single_day(date: NaiveDate) -> Self {
        Self {
            start: date,
            end: date,
        }
    }

    /// Creates the range of the `days` most recent days ending at `end`.
    ///
    /// # Errors
    ///
    /// Returns an error if `days` is zero or reaches before the earliest
    /// representable date.
    pub fn last_n_days(end: NaiveDate, days: u32) -> Result<Self, DateRangeError> {
        if days == 0 {
            return Err(DateRangeError::Empty);
        }
        let start = end
            .checked_sub_days(Days::new(u64::from(days - 1)))
            .ok_or(DateRangeError::OutOfBounds { end, days })?;
        Ok(Self { start, end })
    }

    /// Checks that the range ends no later than `latest`.
    ///
    /// # Errors
    ///
    /// Returns [`DateRangeError::InFuture`] if `end` is after `latest`.
    pub fn ensure_ends_by(&self, latest: NaiveDate) -> Result<(), DateRangeError> {
        if self.end > latest {
            return Err(DateRangeError::InFuture {
                end: self.end,
                latest,
            });
        }
        Ok(())
    }

    /// Returns an iterator over all days in the range, oldest first.
    pub fn days(&self) -> DayIterator {
        DayIterator {
            current: self.start,
            end: self.end,
        }
    }

    /// Returns the total number of days in the range.
    #[must_use]
    pub fn total_days(&self) -> usize {
        ((self.end - self.start).num_days() + 1) as usize
    }

    /// Returns true if the range contains the given date.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

impl std::fmt::Display for DateRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} to {}", self.start, self.end)
    }
}

/// Iterator over all days in a date range.
#[derive(Debug, Clone)]
pub struct DayIterator {
    current: NaiveDate,
    end: NaiveDate,
}

impl Iterator for DayIterator {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current > self.end {
            return None;
        }

        let result = self.current;
        self.current = self.current.succ_opt()?;
        Some(result)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.current > self.end {
            return (0, Some(0));
        }
        let days = (self.end - self.current).num_days() as usize + 1;
        (days, Some(days))
    }
}

impl ExactSizeIterator for DayIterator {}
