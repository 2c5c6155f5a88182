use chrono::NaiveDate;
use demand_forecast::models::{FittedModel, ForecastModel, SarimaModel};
use demand_forecast::report::render_text;
use demand_forecast::{
    aggregate_monthly, DemandPlanner, Measure, PlannerConfig, SalesData, SalesRecord,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Demand Forecast: Basic Planning Example");
    println!("=======================================\n");

    // Create sample data
    println!("Creating sample data...");
    let data = create_sample_sales(2021, 36);
    println!(
        "Sample data created: {} rows for {} products\n",
        data.len(),
        data.products().len()
    );

    // Forecast one series directly through the model interface
    let config = PlannerConfig::default().with_interval_level(Some(0.95));
    let units = aggregate_monthly(data.records(), Measure::TotalUnits)?;
    let model = SarimaModel::new(config.model.clone())?;
    let fitted = model.fit(&units)?;
    let forecast = fitted.forecast_with_intervals(config.horizon, 0.95)?;

    println!("{} forecast for {}:", model.name(), units.name());
    if let Some(intervals) = forecast.intervals() {
        for ((month, value), (lower, upper)) in forecast.iter().zip(intervals) {
            println!("  {}: {:.0} ({:.0}, {:.0})", month, value, lower, upper);
        }
    }

    // Full pipeline with a fixed stock figure
    println!("\nRunning the planner with 45000 units in stock...\n");
    let planner = DemandPlanner::from_config(config)?;
    let report = planner.run(&data, 45_000.0)?;
    print!("{}", render_text(&report)?);

    Ok(())
}

// Monthly rows for two products with trend, yearly season and an irregular cycle
fn create_sample_sales(start_year: i32, months: usize) -> SalesData {
    let mut records = Vec::with_capacity(months * 2);

    for t in 0..months {
        let year = start_year + (t / 12) as i32;
        let month = (t % 12) as u32 + 1;
        let Some(sales_month) = NaiveDate::from_ymd_opt(year, month, 1) else {
            continue;
        };

        let season = (2.0 * std::f64::consts::PI * t as f64 / 12.0).sin();
        let irregular = ((t * 7 + 2) % 11) as f64 - 5.0;

        let syrup_units = 24_000.0 + 120.0 * t as f64 + 3_000.0 * season + 60.0 * irregular;
        let tablet_units = 18_000.0 + 60.0 * t as f64 - 1_500.0 * season + 35.0 * irregular;

        records.push(SalesRecord {
            product_name: "Cough Syrup".to_string(),
            sales_month,
            total_sales: syrup_units * 3.2,
            total_units: syrup_units,
        });
        records.push(SalesRecord {
            product_name: "Vitamin C".to_string(),
            sales_month,
            total_sales: tablet_units * 1.5,
            total_units: tablet_units,
        });
    }

    SalesData::from_records(records)
}
