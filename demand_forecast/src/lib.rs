//! # Demand Forecast
//!
//! Monthly demand planning for a product catalogue: sales history is loaded
//! from CSV, summed per calendar month, projected forward with a seasonal
//! ARIMA model and turned into purchase order quantities.
//!
//! ## Features
//!
//! - CSV loading with column and date validation (polars)
//! - Monthly aggregation of sales and units across all products
//! - Seasonal ARIMA forecasting, SARIMA(1,1,1)(1,1,1,12) by default
//! - Order planning with a safety stock ratio
//! - Text, CSV and JSON reports
//!
//! ## Order formula
//!
//! For every forecast month with predicted units `u`, current stock `s` and
//! safety ratio `r`:
//!
//! ```text
//! order = max(0, trunc(u + u * r - s))
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use demand_forecast::{DemandPlanner, PlannerConfig};
//!
//! let planner = DemandPlanner::from_config(PlannerConfig::default())?;
//! let report = planner.run_csv("sales.csv", 60_000.0)?;
//!
//! for row in &report.order_plan {
//!     println!("{} {:.0} {}", row.month, row.predicted_units, row.order_quantity);
//! }
//! # Ok::<(), demand_forecast::DemandError>(())
//! ```

pub mod aggregate;
pub mod config;
pub mod data;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod planning;
pub mod report;
pub mod series;

// Re-export commonly used types
pub use crate::aggregate::{aggregate_monthly, Measure};
pub use crate::config::{PlannerConfig, SarimaConfig};
pub use crate::data::{DataLoader, SalesData, SalesRecord};
pub use crate::error::{DemandError, Result};
pub use crate::models::{FittedModel, ForecastModel, ForecastResult, SarimaModel};
pub use crate::pipeline::{DemandPlanner, PlanningReport};
pub use crate::planning::{order_quantity, parse_stock, OrderPlanRow, OrderPlanner};
pub use crate::series::{MonthlySeries, YearMonth};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
