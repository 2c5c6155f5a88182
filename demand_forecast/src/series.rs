//! Calendar months and month-indexed series

use crate::error::{DemandError, Result};
use chrono::{Datelike, NaiveDate};
use serde::{Serialize, Serializer};
use std::fmt;

/// A calendar month, ordered by year then month
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    /// Create a month; `month` is 1-based
    pub fn new(year: i32, month: u32) -> Result<Self> {
        if !(1..=12).contains(&month) {
            return Err(DemandError::ParseError(format!(
                "Month must be between 1 and 12, got {}",
                month
            )));
        }
        Ok(Self { year, month })
    }

    /// Month containing the given date
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// The following calendar month
    pub fn succ(&self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    /// The `count` months immediately after `self`
    pub fn following(&self, count: usize) -> Vec<YearMonth> {
        let mut months = Vec::with_capacity(count);
        let mut current = *self;
        for _ in 0..count {
            current = current.succ();
            months.push(current);
        }
        months
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl Serialize for YearMonth {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Ordered month → value mapping
///
/// Months are strictly increasing and every value is finite. Months absent
/// from the source data stay absent; nothing is interpolated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlySeries {
    name: String,
    months: Vec<YearMonth>,
    values: Vec<f64>,
}

impl MonthlySeries {
    /// Build a series from (month, value) pairs already in ascending order
    pub fn new(name: impl Into<String>, points: Vec<(YearMonth, f64)>) -> Result<Self> {
        let name = name.into();
        for pair in points.windows(2) {
            if pair[0].0 >= pair[1].0 {
                return Err(DemandError::ParseError(format!(
                    "Series '{}' months must be strictly increasing ({} then {})",
                    name, pair[0].0, pair[1].0
                )));
            }
        }
        if let Some((month, value)) = points.iter().find(|(_, v)| !v.is_finite()) {
            return Err(DemandError::ParseError(format!(
                "Series '{}' has a non-finite value {} at {}",
                name, value, month
            )));
        }

        let (months, values): (Vec<YearMonth>, Vec<f64>) = points.into_iter().unzip();
        Ok(Self {
            name,
            months,
            values,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn months(&self) -> &[YearMonth] {
        &self.months
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn first_month(&self) -> Option<YearMonth> {
        self.months.first().copied()
    }

    pub fn last_month(&self) -> Option<YearMonth> {
        self.months.last().copied()
    }

    /// Iterate over (month, value) pairs in ascending month order
    pub fn iter(&self) -> impl Iterator<Item = (YearMonth, f64)> + '_ {
        self.months.iter().copied().zip(self.values.iter().copied())
    }

    /// Calendar months between the first and last entries with no value
    pub fn missing_months(&self) -> Vec<YearMonth> {
        let mut missing = Vec::new();
        for pair in self.months.windows(2) {
            let mut current = pair[0].succ();
            while current < pair[1] {
                missing.push(current);
                current = current.succ();
            }
        }
        missing
    }
}
