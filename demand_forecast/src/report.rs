//! Rendering and export of planning results

use crate::data::SalesData;
use crate::error::Result;
use crate::pipeline::PlanningReport;
use crate::planning::OrderPlanRow;
use crate::series::YearMonth;
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::Write;

/// Heading printed above the text report
pub const REPORT_TITLE: &str = "Sales & Inventory Forecasting";
/// Closing line of the text report
pub const READY_MESSAGE: &str = "Forecast & Order Plan Ready";

/// Column headers of the order plan table and CSV
pub const ORDER_PLAN_HEADERS: [&str; 3] = ["Month", "Predicted Units", "Order Quantity"];

/// One point of the sales chart: observed, forecast, or both
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    #[serde(rename = "Month")]
    pub month: YearMonth,
    #[serde(rename = "Actual")]
    pub actual: Option<f64>,
    #[serde(rename = "Forecast")]
    pub forecast: Option<f64>,
}

/// Actual and forecast sales overlaid on one month axis
pub fn chart_points(report: &PlanningReport) -> Vec<ChartPoint> {
    let mut points: BTreeMap<YearMonth, ChartPoint> = BTreeMap::new();

    for (month, value) in report.sales_actual.iter() {
        points.entry(month).or_insert_with(|| empty_point(month)).actual = Some(value);
    }
    for (month, value) in report.sales_forecast.iter() {
        points.entry(month).or_insert_with(|| empty_point(month)).forecast = Some(value);
    }

    points.into_values().collect()
}

fn empty_point(month: YearMonth) -> ChartPoint {
    ChartPoint {
        month,
        actual: None,
        forecast: None,
    }
}

/// Render the full report as plain text
pub fn render_text(report: &PlanningReport) -> Result<String> {
    let mut out = String::new();

    out.push_str(&format!("{}\n", REPORT_TITLE));
    out.push_str(&format!("{}\n\n", "=".repeat(REPORT_TITLE.len())));

    out.push_str(&format!(
        "Loaded {} rows covering {} product(s)\n",
        report.record_count, report.product_count
    ));
    let preview = SalesData::from_records(report.preview.clone()).preview(report.preview.len())?;
    out.push_str(&format!("{}\n\n", preview));

    out.push_str(&format!(
        "Monthly {} ({})\n",
        report.sales_actual.name(),
        report.sales_forecast.model_name()
    ));
    out.push_str(&format!("{:<8} {:>16} {:>16}\n", "Month", "Actual", "Forecast"));
    for point in chart_points(report) {
        out.push_str(&format!(
            "{:<8} {:>16} {:>16}\n",
            point.month.to_string(),
            format_optional(point.actual),
            format_optional(point.forecast)
        ));
    }
    out.push('\n');

    out.push_str(&format!(
        "Order plan (current stock {:.0}, safety ratio {:.2})\n",
        report.current_stock, report.safety_ratio
    ));
    out.push_str(&render_order_table(&report.order_plan));
    out.push('\n');

    out.push_str(READY_MESSAGE);
    out.push('\n');
    Ok(out)
}

/// Order plan as an aligned text table
pub fn render_order_table(rows: &[OrderPlanRow]) -> String {
    let [month, units, quantity] = ORDER_PLAN_HEADERS;
    let mut out = format!("{:<8} {:>16} {:>16}\n", month, units, quantity);
    for row in rows {
        out.push_str(&format!(
            "{:<8} {:>16.2} {:>16}\n",
            row.month.to_string(),
            row.predicted_units,
            row.order_quantity
        ));
    }
    out
}

fn format_optional(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.2}", v),
        None => "-".to_string(),
    }
}

/// Write the sales chart data as CSV (`Month,Actual,Forecast`)
///
/// Months without an observation or a forecast leave that field empty.
pub fn write_chart_csv<W: Write>(report: &PlanningReport, writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for point in chart_points(report) {
        csv_writer.serialize(point)?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Write the order plan as CSV
pub fn write_order_plan_csv<W: Write>(rows: &[OrderPlanRow], writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(ORDER_PLAN_HEADERS)?;
    for row in rows {
        csv_writer.write_record([
            row.month.to_string(),
            format!("{:.2}", row.predicted_units),
            row.order_quantity.to_string(),
        ])?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Write the whole report as pretty-printed JSON
pub fn write_json<W: Write>(report: &PlanningReport, writer: W) -> Result<()> {
    serde_json::to_writer_pretty(writer, report)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(year: i32, month: u32, units: f64, quantity: u64) -> OrderPlanRow {
        OrderPlanRow {
            month: YearMonth::new(year, month).unwrap(),
            predicted_units: units,
            order_quantity: quantity,
        }
    }

    #[test]
    fn test_order_table_layout() {
        let table = render_order_table(&[row(2024, 7, 1000.0, 750), row(2024, 8, 200.0, 0)]);
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("Month"));
        assert!(lines[0].contains("Predicted Units"));
        assert!(lines[0].ends_with("Order Quantity"));
        assert!(lines[1].starts_with("2024-07"));
        assert!(lines[1].contains("1000.00"));
        assert!(lines[1].ends_with("750"));
        assert!(lines[2].ends_with(" 0"));
    }

    #[test]
    fn test_order_plan_csv() {
        let mut buffer = Vec::new();
        write_order_plan_csv(&[row(2024, 12, 12.5, 3)], &mut buffer).unwrap();

        let text = String::from_utf8(buffer).unwrap();
        assert_eq!(
            text,
            "Month,Predicted Units,Order Quantity\n2024-12,12.50,3\n"
        );
    }
}
