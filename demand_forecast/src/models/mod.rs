//! Forecasting models for monthly demand series

use crate::error::{DemandError, Result};
use crate::series::{MonthlySeries, YearMonth};
use serde::Serialize;
use std::fmt::Debug;

/// Point forecast for the months following a series
#[derive(Debug, Clone, Serialize)]
pub struct ForecastResult {
    /// Name of the forecast series
    series_name: String,
    /// Model that produced the forecast
    model_name: String,
    /// Forecast months, contiguous after the last observed month
    months: Vec<YearMonth>,
    /// Conditional mean predictions
    values: Vec<f64>,
    /// Lower and upper bounds (optional)
    intervals: Option<Vec<(f64, f64)>>,
    /// Confidence level of `intervals`
    interval_level: Option<f64>,
}

impl ForecastResult {
    /// Create a forecast for the months after `last_observed`
    pub fn new(
        series_name: impl Into<String>,
        model_name: impl Into<String>,
        last_observed: YearMonth,
        values: Vec<f64>,
    ) -> Result<Self> {
        let series_name = series_name.into();
        if let Some(idx) = values.iter().position(|v| !v.is_finite()) {
            return Err(DemandError::EstimationError(format!(
                "Forecast for '{}' is not finite at step {}",
                series_name,
                idx + 1
            )));
        }

        Ok(Self {
            months: last_observed.following(values.len()),
            series_name,
            model_name: model_name.into(),
            values,
            intervals: None,
            interval_level: None,
        })
    }

    /// Attach confidence intervals at `level`
    pub fn with_intervals(mut self, level: f64, intervals: Vec<(f64, f64)>) -> Result<Self> {
        if intervals.len() != self.values.len() {
            return Err(DemandError::EstimationError(format!(
                "Values length ({}) doesn't match intervals length ({})",
                self.values.len(),
                intervals.len()
            )));
        }

        self.intervals = Some(intervals);
        self.interval_level = Some(level);
        Ok(self)
    }

    pub fn series_name(&self) -> &str {
        &self.series_name
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    /// Number of months forecast
    pub fn horizon(&self) -> usize {
        self.values.len()
    }

    pub fn months(&self) -> &[YearMonth] {
        &self.months
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Get the confidence intervals, if available
    pub fn intervals(&self) -> Option<&[(f64, f64)]> {
        self.intervals.as_deref()
    }

    pub fn interval_level(&self) -> Option<f64> {
        self.interval_level
    }

    /// Iterate over (month, predicted value) pairs
    pub fn iter(&self) -> impl Iterator<Item = (YearMonth, f64)> + '_ {
        self.months.iter().copied().zip(self.values.iter().copied())
    }
}

/// Model fitted to one series, able to project it forward
pub trait FittedModel: Debug {
    /// Point forecast for the next `horizon` months
    fn forecast(&self, horizon: usize) -> Result<ForecastResult>;

    /// Point forecast with symmetric confidence intervals at `level`
    fn forecast_with_intervals(&self, horizon: usize, level: f64) -> Result<ForecastResult>;

    /// Name of the model
    fn name(&self) -> &str;
}

/// Estimation engine: fits a monthly series and yields a fitted model
///
/// Implementations are interchangeable; the pipeline only relies on this
/// interface.
pub trait ForecastModel: Debug + Clone {
    /// The type of fitted model produced
    type Fitted: FittedModel;

    /// Estimate the model on a monthly series
    fn fit(&self, series: &MonthlySeries) -> Result<Self::Fitted>;

    /// Get the name of the model
    fn name(&self) -> &str;
}

pub mod sarima;

pub use sarima::{FittedSarima, SarimaModel, SarimaParameters};
