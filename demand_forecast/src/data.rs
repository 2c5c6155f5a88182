//! Sales table loading for demand forecasting

use crate::error::{DemandError, Result};
use chrono::{NaiveDate, NaiveDateTime};
use polars::prelude::*;
use serde::Serialize;
use std::fs::File;
use std::io::{Cursor, Read};
use std::path::Path;

/// Product name column
pub const PRODUCT_COLUMN: &str = "ProductName";
/// Sales month column
pub const MONTH_COLUMN: &str = "SalesMonth";
/// Total sales column
pub const SALES_COLUMN: &str = "TotalSales";
/// Total units column
pub const UNITS_COLUMN: &str = "TotalUnits";

/// Columns every input table must carry
pub const REQUIRED_COLUMNS: [&str; 4] = [PRODUCT_COLUMN, MONTH_COLUMN, SALES_COLUMN, UNITS_COLUMN];

const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d.%m.%Y"];
const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
];
const MONTH_FORMATS: [&str; 5] = ["%Y-%m", "%Y/%m", "%b %Y", "%B %Y", "%b-%Y"];

/// One row of the sales table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalesRecord {
    /// Product the sales belong to
    pub product_name: String,
    /// Month of the sales, as parsed from the input
    pub sales_month: NaiveDate,
    /// Total sales amount
    pub total_sales: f64,
    /// Total units sold
    pub total_units: f64,
}

/// Loaded sales rows, sorted by product then month
#[derive(Debug, Clone, Default)]
pub struct SalesData {
    records: Vec<SalesRecord>,
}

/// Data loader for sales tables
#[derive(Debug)]
pub struct DataLoader;

impl DataLoader {
    /// Load sales data from a CSV file
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<SalesData> {
        let file = File::open(path)?;
        Self::from_reader(file)
    }

    /// Load sales data from any CSV byte source
    pub fn from_reader<R: Read>(mut reader: R) -> Result<SalesData> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;

        let df = CsvReader::new(Cursor::new(bytes))
            .infer_schema(None)
            .has_header(true)
            .finish()
            .map_err(|e| DemandError::ParseError(format!("Cannot read sales CSV: {}", e)))?;

        Self::from_dataframe(df)
    }

    /// Create sales data from an existing DataFrame
    ///
    /// Extra columns are ignored. A table without data rows is rejected. Rows come back stably sorted by
    /// (product name, month).
    pub fn from_dataframe(df: DataFrame) -> Result<SalesData> {
        Self::check_required_columns(&df)?;
        if df.height() == 0 {
            return Err(DemandError::ParseError(
                "Sales table has a header but no data rows".to_string(),
            ));
        }

        let products = Self::text_column(&df, PRODUCT_COLUMN)?;
        let months = Self::text_column(&df, MONTH_COLUMN)?;
        let sales = Self::numeric_column(&df, SALES_COLUMN)?;
        let units = Self::numeric_column(&df, UNITS_COLUMN)?;

        let mut records = Vec::with_capacity(df.height());
        for row in 0..df.height() {
            let product_name = products[row].clone().ok_or_else(|| {
                DemandError::ParseError(format!("Row {}: {} is empty", row + 1, PRODUCT_COLUMN))
            })?;

            let month_text = months[row].as_deref().ok_or_else(|| {
                DemandError::ParseError(format!("Row {}: {} is empty", row + 1, MONTH_COLUMN))
            })?;
            let sales_month = parse_sales_month(month_text).ok_or_else(|| {
                DemandError::ParseError(format!(
                    "Row {}: cannot parse {} value '{}' as a date",
                    row + 1,
                    MONTH_COLUMN,
                    month_text
                ))
            })?;

            let total_sales = Self::required_number(sales[row], row, SALES_COLUMN)?;
            let total_units = Self::required_number(units[row], row, UNITS_COLUMN)?;

            records.push(SalesRecord {
                product_name,
                sales_month,
                total_sales,
                total_units,
            });
        }

        tracing::debug!("Loaded {} sales records", records.len());
        Ok(SalesData::from_records(records))
    }

    fn check_required_columns(df: &DataFrame) -> Result<()> {
        let present = df.get_column_names();
        let missing: Vec<&str> = REQUIRED_COLUMNS
            .iter()
            .copied()
            .filter(|required| !present.contains(required))
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(DemandError::ParseError(format!(
                "Missing required column(s): {}",
                missing.join(", ")
            )))
        }
    }

    fn text_column(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>> {
        let col = df.column(name)?.cast(&DataType::Utf8)?;
        let values = col
            .utf8()?
            .into_iter()
            .map(|v| v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty()))
            .collect();
        Ok(values)
    }

    fn numeric_column(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>> {
        let col = df.column(name)?.cast(&DataType::Float64)?;
        let values = col.f64()?.into_iter().collect();
        Ok(values)
    }

    fn required_number(value: Option<f64>, row: usize, column: &str) -> Result<f64> {
        match value {
            Some(v) if v.is_finite() => Ok(v),
            _ => Err(DemandError::ParseError(format!(
                "Row {}: {} is empty or not numeric",
                row + 1,
                column
            ))),
        }
    }
}

/// Parse a sales month cell into a date
///
/// Accepts full dates, date-times and month-only forms; month-only values
/// resolve to the first day of the month.
pub fn parse_sales_month(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(text, format) {
            return Some(date);
        }
    }

    for format in DATETIME_FORMATS {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(text, format) {
            return Some(datetime.date());
        }
    }

    for format in MONTH_FORMATS {
        let padded = format!("{} 01", text);
        let padded_format = format!("{} %d", format);
        if let Ok(date) = NaiveDate::parse_from_str(&padded, &padded_format) {
            return Some(date);
        }
    }

    None
}

impl SalesData {
    /// Create sales data from records, applying the loader's sort order
    pub fn from_records(mut records: Vec<SalesRecord>) -> Self {
        records.sort_by(|a, b| {
            a.product_name
                .cmp(&b.product_name)
                .then(a.sales_month.cmp(&b.sales_month))
        });
        Self { records }
    }

    /// Sorted records
    pub fn records(&self) -> &[SalesRecord] {
        &self.records
    }

    /// Number of rows loaded
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if no rows were loaded
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct product names, in sorted order
    pub fn products(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .records
            .iter()
            .map(|r| r.product_name.as_str())
            .collect();
        names.dedup();
        names
    }

    /// First `rows` records as a DataFrame for display
    pub fn preview(&self, rows: usize) -> Result<DataFrame> {
        let head = &self.records[..rows.min(self.records.len())];

        let products: Vec<&str> = head.iter().map(|r| r.product_name.as_str()).collect();
        let months: Vec<String> = head
            .iter()
            .map(|r| r.sales_month.format("%Y-%m-%d").to_string())
            .collect();
        let sales: Vec<f64> = head.iter().map(|r| r.total_sales).collect();
        let units: Vec<f64> = head.iter().map(|r| r.total_units).collect();

        let df = DataFrame::new(vec![
            Series::new(PRODUCT_COLUMN, products),
            Series::new(MONTH_COLUMN, months),
            Series::new(SALES_COLUMN, sales),
            Series::new(UNITS_COLUMN, units),
        ])?;

        Ok(df)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_sales_month_formats() {
        assert_eq!(parse_sales_month("2024-03-15"), Some(date(2024, 3, 15)));
        assert_eq!(parse_sales_month("2024/03/15"), Some(date(2024, 3, 15)));
        assert_eq!(parse_sales_month("03/15/2024"), Some(date(2024, 3, 15)));
        assert_eq!(parse_sales_month("2024-03-15 00:00:00"), Some(date(2024, 3, 15)));
        assert_eq!(parse_sales_month("2024-03"), Some(date(2024, 3, 1)));
        assert_eq!(parse_sales_month("Mar 2024"), Some(date(2024, 3, 1)));
        assert_eq!(parse_sales_month("March 2024"), Some(date(2024, 3, 1)));
    }

    #[test]
    fn test_parse_sales_month_rejects_garbage() {
        assert_eq!(parse_sales_month(""), None);
        assert_eq!(parse_sales_month("not a month"), None);
        assert_eq!(parse_sales_month("2024-13-01"), None);
    }

    #[test]
    fn test_from_records_sorts_stably() {
        let record = |name: &str, m: u32, sales: f64| SalesRecord {
            product_name: name.to_string(),
            sales_month: date(2024, m, 1),
            total_sales: sales,
            total_units: 1.0,
        };

        let data = SalesData::from_records(vec![
            record("B", 2, 1.0),
            record("A", 3, 2.0),
            record("A", 1, 3.0),
            record("A", 1, 4.0),
        ]);

        let order: Vec<(&str, f64)> = data
            .records()
            .iter()
            .map(|r| (r.product_name.as_str(), r.total_sales))
            .collect();
        assert_eq!(order, vec![("A", 3.0), ("A", 4.0), ("A", 2.0), ("B", 1.0)]);
        assert_eq!(data.products(), vec!["A", "B"]);
    }
}
