//! Calendar months, the unit archive-based sources are paged by.

use std::fmt;

use chrono::{Datelike, Local};

use crate::error::HarvestError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    // Field order matters: the derived Ord compares year first.
    year: i32,
    month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Result<Self, HarvestError> {
        if !(1..=12).contains(&month) {
            return Err(HarvestError::InvalidDateRange(format!(
                "month must be between 1 and 12, got {month}"
            )));
        }
        Ok(Self { year, month })
    }

    /// For compile-time constants whose month is known to be valid.
    pub(crate) const fn known(year: i32, month: u32) -> Self {
        Self { year, month }
    }

    /// The month containing today's local date.
    pub fn current() -> Self {
        let today = Local::now().date_naive();
        Self {
            year: today.year(),
            month: today.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// The month before this one.
    pub fn previous(&self) -> Self {
        if self.month == 1 {
            Self {
                year: self.year - 1,
                month: 12,
            }
        } else {
            Self {
                year: self.year,
                month: self.month - 1,
            }
        }
    }

    /// Months from `newest` back to `oldest`, both inclusive. Empty when
    /// `oldest` is after `newest`.
    pub fn months_back(newest: Self, oldest: Self) -> impl Iterator<Item = YearMonth> {
        std::iter::successors(Some(newest), |m| Some(m.previous()))
            .take_while(move |m| *m >= oldest)
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{:02}", self.year, self.month)
    }
}

/// An inclusive range of months requested by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub from: YearMonth,
    pub to: YearMonth,
}

impl DateRange {
    pub fn new(from_year: i32, from_month: u32, to_year: i32, to_month: u32) -> Result<Self, HarvestError> {
        Ok(Self {
            from: YearMonth::new(from_year, from_month)?,
            to: YearMonth::new(to_year, to_month)?,
        })
    }

    /// Check the range against what a source can serve.
    ///
    /// The start must lie between `oldest` and `today`; an end past `today`
    /// is clamped to `today`. Returns the effective range.
    pub fn resolve(&self, oldest: YearMonth, today: YearMonth) -> Result<DateRange, HarvestError> {
        if self.from > today {
            return Err(HarvestError::InvalidDateRange(format!(
                "cannot start date range in the future: {}",
                self.from
            )));
        }
        if self.from < oldest {
            return Err(HarvestError::InvalidDateRange(format!(
                "date range starts too early: {} (oldest is {})",
                self.from, oldest
            )));
        }

        let to = self.to.min(today);
        if self.from > to {
            return Err(HarvestError::InvalidDateRange(format!(
                "date range is empty: {} to {}",
                self.from, to
            )));
        }

        Ok(DateRange { from: self.from, to })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ym(year: i32, month: u32) -> YearMonth {
        YearMonth::new(year, month).unwrap()
    }

    #[test]
    fn test_invalid_month() {
        assert!(matches!(
            YearMonth::new(2020, 13),
            Err(HarvestError::InvalidDateRange(_))
        ));
        assert!(YearMonth::new(2020, 0).is_err());
    }

    #[test]
    fn test_previous_wraps_year() {
        assert_eq!(ym(2020, 1).previous(), ym(2019, 12));
        assert_eq!(ym(2020, 6).previous(), ym(2020, 5));
    }

    #[test]
    fn test_months_back() {
        let months: Vec<_> = YearMonth::months_back(ym(2020, 2), ym(2019, 11)).collect();
        assert_eq!(months, vec![ym(2020, 2), ym(2020, 1), ym(2019, 12), ym(2019, 11)]);
        assert_eq!(YearMonth::months_back(ym(2019, 1), ym(2020, 1)).count(), 0);
    }

    #[test]
    fn test_display() {
        assert_eq!(ym(2009, 5).to_string(), "2009-05");
    }

    #[test]
    fn test_resolve_rejects_early_start() {
        let range = DateRange::new(2009, 4, 2010, 1).unwrap();
        let err = range.resolve(ym(2009, 5), ym(2024, 3)).unwrap_err();
        assert!(err.to_string().contains("too early"));
    }

    #[test]
    fn test_resolve_rejects_future_start() {
        let range = DateRange::new(2024, 4, 2024, 6).unwrap();
        let err = range.resolve(ym(2009, 5), ym(2024, 3)).unwrap_err();
        assert!(err.to_string().contains("future"));
    }

    #[test]
    fn test_resolve_clamps_future_end() {
        let range = DateRange::new(2024, 1, 2030, 12).unwrap();
        let resolved = range.resolve(ym(2009, 5), ym(2024, 3)).unwrap();
        assert_eq!(resolved.from, ym(2024, 1));
        assert_eq!(resolved.to, ym(2024, 3));
    }

    #[test]
    fn test_resolve_rejects_empty_range() {
        let range = DateRange::new(2020, 5, 2020, 4).unwrap();
        let err = range.resolve(ym(2009, 5), ym(2024, 3)).unwrap_err();
        assert!(err.to_string().contains("empty"));
    }
}
