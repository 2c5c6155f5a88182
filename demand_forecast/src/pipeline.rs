//! End-to-end planning run: load, aggregate, forecast, plan

use crate::aggregate::{aggregate_monthly, Measure};
use crate::config::PlannerConfig;
use crate::data::{DataLoader, SalesData, SalesRecord};
use crate::error::Result;
use crate::models::{FittedModel, ForecastModel, ForecastResult, SarimaModel};
use crate::planning::{OrderPlanRow, OrderPlanner};
use crate::series::MonthlySeries;
use serde::Serialize;
use std::path::Path;
use std::time::Instant;

/// Everything produced by one planning run
#[derive(Debug, Clone, Serialize)]
pub struct PlanningReport {
    /// First rows of the sorted input
    pub preview: Vec<SalesRecord>,
    /// Rows loaded
    pub record_count: usize,
    /// Distinct products in the input
    pub product_count: usize,
    /// Observed monthly sales
    pub sales_actual: MonthlySeries,
    /// Forecast monthly sales
    pub sales_forecast: ForecastResult,
    /// Observed monthly units
    pub units_actual: MonthlySeries,
    /// Forecast monthly units
    pub units_forecast: ForecastResult,
    /// Stock figure applied to every month
    pub current_stock: f64,
    /// Safety ratio applied to every month
    pub safety_ratio: f64,
    /// Recommended orders per forecast month
    pub order_plan: Vec<OrderPlanRow>,
}

/// Runs the planning pipeline with a swappable forecasting model
#[derive(Debug, Clone)]
pub struct DemandPlanner<M: ForecastModel> {
    model: M,
    config: PlannerConfig,
}

impl DemandPlanner<SarimaModel> {
    /// Planner using the seasonal ARIMA model described by `config`
    pub fn from_config(config: PlannerConfig) -> Result<Self> {
        let model = SarimaModel::new(config.model.clone())?;
        Self::new(model, config)
    }
}

impl<M: ForecastModel> DemandPlanner<M> {
    /// Create a planner from a model and configuration
    pub fn new(model: M, config: PlannerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { model, config })
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    /// Fit the model to one series and forecast the configured horizon
    pub fn forecast_series(&self, series: &MonthlySeries) -> Result<ForecastResult> {
        let fitted = self.model.fit(series)?;
        match self.config.interval_level {
            Some(level) => fitted.forecast_with_intervals(self.config.horizon, level),
            None => fitted.forecast(self.config.horizon),
        }
    }

    /// Load a CSV file and run the full pipeline
    pub fn run_csv<P: AsRef<Path>>(&self, path: P, current_stock: f64) -> Result<PlanningReport> {
        let path = path.as_ref();
        tracing::info!("Loading sales data from {}", path.display());
        let data = DataLoader::from_csv(path)?;
        self.run(&data, current_stock)
    }

    /// Run the pipeline on loaded sales data
    ///
    /// The stock figure is validated before any model is fitted.
    pub fn run(&self, data: &SalesData, current_stock: f64) -> Result<PlanningReport> {
        let start_time = Instant::now();
        let planner = OrderPlanner::new(current_stock, self.config.safety_ratio)?;

        tracing::info!(
            "Planning with {} for {} months over {} records",
            self.model.name(),
            self.config.horizon,
            data.len()
        );

        let sales_actual = aggregate_monthly(data.records(), Measure::TotalSales)?;
        let units_actual = aggregate_monthly(data.records(), Measure::TotalUnits)?;

        tracing::info!("Forecasting {}", sales_actual.name());
        let sales_forecast = self.forecast_series(&sales_actual)?;

        tracing::info!("Forecasting {}", units_actual.name());
        let units_forecast = self.forecast_series(&units_actual)?;

        let order_plan = planner.plan(&units_forecast);
        let preview_len = self.config.preview_rows.min(data.len());

        tracing::info!(
            "Order plan ready: {} months, {} units to order in total, took {:?}",
            order_plan.len(),
            order_plan.iter().map(|r| r.order_quantity).sum::<u64>(),
            start_time.elapsed()
        );

        Ok(PlanningReport {
            preview: data.records()[..preview_len].to_vec(),
            record_count: data.len(),
            product_count: data.products().len(),
            sales_actual,
            sales_forecast,
            units_actual,
            units_forecast,
            current_stock: planner.current_stock(),
            safety_ratio: planner.safety_ratio(),
            order_plan,
        })
    }
}
