//! Monthly aggregation across products

use crate::data::{SalesRecord, SALES_COLUMN, UNITS_COLUMN};
use crate::error::{DemandError, Result};
use crate::series::{MonthlySeries, YearMonth};
use std::collections::BTreeMap;
use std::fmt;

/// Numeric column summed by the aggregator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Measure {
    /// `TotalSales`
    TotalSales,
    /// `TotalUnits`
    TotalUnits,
}

impl Measure {
    /// Input column the measure is read from
    pub fn column_name(&self) -> &'static str {
        match self {
            Measure::TotalSales => SALES_COLUMN,
            Measure::TotalUnits => UNITS_COLUMN,
        }
    }

    fn value(&self, record: &SalesRecord) -> f64 {
        match self {
            Measure::TotalSales => record.total_sales,
            Measure::TotalUnits => record.total_units,
        }
    }
}

impl fmt::Display for Measure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column_name())
    }
}

/// Sum `measure` over all products for each calendar month
///
/// Records are grouped by the month of their sales date; the day of month
/// is ignored. Months with no records do not appear in the result.
pub fn aggregate_monthly(records: &[SalesRecord], measure: Measure) -> Result<MonthlySeries> {
    if records.is_empty() {
        return Err(DemandError::ParseError(format!(
            "No rows to aggregate for {}",
            measure
        )));
    }

    let mut totals: BTreeMap<YearMonth, f64> = BTreeMap::new();
    for record in records {
        *totals
            .entry(YearMonth::from_date(record.sales_month))
            .or_insert(0.0) += measure.value(record);
    }

    let series = MonthlySeries::new(measure.column_name(), totals.into_iter().collect())?;

    let missing = series.missing_months();
    if !missing.is_empty() {
        tracing::warn!(
            "{} series has {} month(s) without data between {} and {}; gaps are not filled",
            measure,
            missing.len(),
            missing[0],
            missing[missing.len() - 1]
        );
    }

    if let (Some(first), Some(last)) = (series.first_month(), series.last_month()) {
        tracing::debug!(
            "Aggregated {} into {} months from {} to {}",
            measure,
            series.len(),
            first,
            last
        );
    }
    Ok(series)
}
