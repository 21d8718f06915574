//! Dated value series from structured sources.

use chrono::NaiveDate;

/// A date-ordered series of daily values for one external series.
///
/// Points are kept sorted by date with at most one value per date; when the
/// input repeats a date, the later value wins.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DailySeries {
    points: Vec<(NaiveDate, f64)>,
}

impl DailySeries {
    /// Builds a series from unordered points, dropping non-finite values.
    #[must_use]
    pub fn from_points(points: impl IntoIterator<Item = (NaiveDate, f64)>) -> Self {
        let mut points: Vec<_> = points
            .into_iter()
            .filter(|(_, value)| value.is_finite())
            .collect();

        // Stable sort keeps input order among equal dates, so the last one wins below.
        points.sort_by_key(|(date, _)| *date);

        let mut deduped: Vec<(NaiveDate, f64)> = Vec::with_capacity(points.len());
        for (date, value) in points {
            match deduped.last_mut() {
                Some(last) if last.0 == date => last.1 = value,
                _ => deduped.push((date, value)),
            }
        }

        Self { points: deduped }
    }

    /// Returns the most recent point.
    #[must_use]
    pub fn latest(&self) -> Option<(NaiveDate, f64)> {
        self.points.last().copied()
    }

    /// Returns the most recent point dated on or before `date`.
    ///
    /// Series such as DGS10 skip weekends and holidays and MORTGAGE30US is
    /// weekly, so the value for a given day is the last one published.
    #[must_use]
    pub fn on_or_before(&self, date: NaiveDate) -> Option<(NaiveDate, f64)> {
        let idx = self.points.partition_point(|(d, _)| *d <= date);
        idx.checked_sub(1).map(|i| self.points[i])
    }

    /// Returns the number of points.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns true if the series has no points.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Returns the points, oldest first.
    #[must_use]
    pub fn points(&self) -> &[(NaiveDate, f64)] {
        &self.points
    }
}
