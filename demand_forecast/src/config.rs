//! Planner and model configuration

use crate::error::{DemandError, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Default number of months forecast
pub const DEFAULT_HORIZON: usize = 7;
/// Default safety stock ratio applied on top of predicted demand
pub const DEFAULT_SAFETY_RATIO: f64 = 0.25;
/// Default current warehouse stock
pub const DEFAULT_CURRENT_STOCK: f64 = 60_000.0;
/// Default number of rows in the data preview
pub const DEFAULT_PREVIEW_ROWS: usize = 5;

/// Non-seasonal ARIMA order (p, d, q)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArimaOrder {
    /// Autoregressive order
    pub p: usize,
    /// Differencing order
    pub d: usize,
    /// Moving average order
    pub q: usize,
}

/// Seasonal ARIMA order (P, D, Q, s)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeasonalOrder {
    /// Seasonal autoregressive order
    pub p: usize,
    /// Seasonal differencing order
    pub d: usize,
    /// Seasonal moving average order
    pub q: usize,
    /// Season length in months
    pub period: usize,
}

/// Seasonal ARIMA configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SarimaConfig {
    /// Non-seasonal order
    pub order: ArimaOrder,

    /// Seasonal order
    pub seasonal_order: SeasonalOrder,

    /// Confine autoregressive coefficients to the stationary region
    pub enforce_stationarity: bool,

    /// Confine moving average coefficients to the invertible region
    pub enforce_invertibility: bool,

    /// Optimiser iteration budget
    pub max_iterations: usize,

    /// Optimiser convergence tolerance
    pub tolerance: f64,
}

impl Default for SarimaConfig {
    fn default() -> Self {
        Self {
            order: ArimaOrder { p: 1, d: 1, q: 1 },
            seasonal_order: SeasonalOrder {
                p: 1,
                d: 1,
                q: 1,
                period: 12,
            },
            enforce_stationarity: false,
            enforce_invertibility: false,
            max_iterations: 5000,
            tolerance: 1e-8,
        }
    }
}

impl SarimaConfig {
    /// Builder: non-seasonal order
    pub fn with_order(mut self, p: usize, d: usize, q: usize) -> Self {
        self.order = ArimaOrder { p, d, q };
        self
    }

    /// Builder: seasonal order
    pub fn with_seasonal_order(mut self, p: usize, d: usize, q: usize, period: usize) -> Self {
        self.seasonal_order = SeasonalOrder { p, d, q, period };
        self
    }

    /// Builder: stationarity constraint
    pub fn with_enforce_stationarity(mut self, enforce: bool) -> Self {
        self.enforce_stationarity = enforce;
        self
    }

    /// Builder: invertibility constraint
    pub fn with_enforce_invertibility(mut self, enforce: bool) -> Self {
        self.enforce_invertibility = enforce;
        self
    }

    /// Builder: optimiser iteration budget
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Whether the model has a seasonal component
    pub fn is_seasonal(&self) -> bool {
        let s = &self.seasonal_order;
        s.period > 1 && (s.p > 0 || s.d > 0 || s.q > 0)
    }

    /// Number of estimated ARMA coefficients
    pub fn parameter_count(&self) -> usize {
        let seasonal = if self.is_seasonal() {
            self.seasonal_order.p + self.seasonal_order.q
        } else {
            0
        };
        self.order.p + self.order.q + seasonal
    }

    /// Observations lost to differencing
    pub fn differencing_loss(&self) -> usize {
        let seasonal = if self.is_seasonal() {
            self.seasonal_order.d * self.seasonal_order.period
        } else {
            0
        };
        self.order.d + seasonal
    }

    /// Smallest series length the model accepts
    pub fn minimum_observations(&self) -> usize {
        let for_parameters = self.differencing_loss() + self.parameter_count() + 2;
        if self.is_seasonal() {
            for_parameters.max(2 * self.seasonal_order.period)
        } else {
            for_parameters
        }
    }

    /// Short model label, e.g. `SARIMA(1,1,1)(1,1,1,12)`
    pub fn label(&self) -> String {
        let o = &self.order;
        if self.is_seasonal() {
            let s = &self.seasonal_order;
            format!(
                "SARIMA({},{},{})({},{},{},{})",
                o.p, o.d, o.q, s.p, s.d, s.q, s.period
            )
        } else {
            format!("ARIMA({},{},{})", o.p, o.d, o.q)
        }
    }

    /// Check the configuration is usable
    pub fn validate(&self) -> Result<()> {
        if self.max_iterations == 0 {
            return Err(DemandError::ConfigError(
                "max_iterations must be greater than zero".to_string(),
            ));
        }
        if !(self.tolerance > 0.0 && self.tolerance.is_finite()) {
            return Err(DemandError::ConfigError(
                "tolerance must be a positive number".to_string(),
            ));
        }
        if self.seasonal_order.period == 1 {
            return Err(DemandError::ConfigError(
                "seasonal period must be 0 (none) or at least 2".to_string(),
            ));
        }
        Ok(())
    }
}

/// Demand planning configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Months to forecast beyond the last observed month
    pub horizon: usize,

    /// Safety stock as a share of predicted demand, in [0, 1]
    pub safety_ratio: f64,

    /// Stock level offered when the user gives none
    pub default_stock: f64,

    /// Rows shown in the data preview
    pub preview_rows: usize,

    /// Confidence level for forecast intervals; `None` disables them
    pub interval_level: Option<f64>,

    /// Model used for both the sales and the units series
    pub model: SarimaConfig,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            horizon: DEFAULT_HORIZON,
            safety_ratio: DEFAULT_SAFETY_RATIO,
            default_stock: DEFAULT_CURRENT_STOCK,
            preview_rows: DEFAULT_PREVIEW_ROWS,
            interval_level: None,
            model: SarimaConfig::default(),
        }
    }
}

impl PlannerConfig {
    /// Load a configuration from a JSON file; absent fields take defaults
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let config: PlannerConfig = serde_json::from_reader(BufReader::new(file))
            .map_err(|e| DemandError::ConfigError(format!("{}: {}", path.display(), e)))?;

        config.validate()?;
        tracing::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Builder: forecast horizon
    pub fn with_horizon(mut self, horizon: usize) -> Self {
        self.horizon = horizon;
        self
    }

    /// Builder: safety ratio
    pub fn with_safety_ratio(mut self, ratio: f64) -> Self {
        self.safety_ratio = ratio;
        self
    }

    /// Builder: default stock
    pub fn with_default_stock(mut self, stock: f64) -> Self {
        self.default_stock = stock;
        self
    }

    /// Builder: preview rows
    pub fn with_preview_rows(mut self, rows: usize) -> Self {
        self.preview_rows = rows;
        self
    }

    /// Builder: interval confidence level
    pub fn with_interval_level(mut self, level: Option<f64>) -> Self {
        self.interval_level = level;
        self
    }

    /// Builder: model configuration
    pub fn with_model(mut self, model: SarimaConfig) -> Self {
        self.model = model;
        self
    }

    /// Check every field is in range
    pub fn validate(&self) -> Result<()> {
        if self.horizon == 0 {
            return Err(DemandError::ConfigError(
                "horizon must be at least one month".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.safety_ratio) {
            return Err(DemandError::ConfigError(format!(
                "safety_ratio must be between 0 and 1, got {}",
                self.safety_ratio
            )));
        }
        if !(self.default_stock.is_finite() && self.default_stock >= 0.0) {
            return Err(DemandError::ConfigError(format!(
                "default_stock must be a non-negative number, got {}",
                self.default_stock
            )));
        }
        if let Some(level) = self.interval_level {
            if !(level > 0.0 && level < 1.0) {
                return Err(DemandError::ConfigError(format!(
                    "interval_level must be between 0 and 1, got {}",
                    level
                )));
            }
        }
        self.model.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let config = PlannerConfig::default();
        assert_eq!(config.horizon, 7);
        assert_eq!(config.safety_ratio, 0.25);
        assert_eq!(config.default_stock, 60_000.0);
        assert!(config.validate().is_ok());

        assert_eq!(config.model.label(), "SARIMA(1,1,1)(1,1,1,12)");
        assert_eq!(config.model.parameter_count(), 4);
        assert_eq!(config.model.differencing_loss(), 13);
        assert_eq!(config.model.minimum_observations(), 24);
    }

    #[test]
    fn test_non_seasonal_label() {
        let model = SarimaConfig::default().with_seasonal_order(0, 0, 0, 0);
        assert!(!model.is_seasonal());
        assert_eq!(model.label(), "ARIMA(1,1,1)");
        assert_eq!(model.minimum_observations(), 5);
    }

    #[test]
    fn test_validation() {
        assert!(PlannerConfig::default().with_horizon(0).validate().is_err());
        assert!(PlannerConfig::default()
            .with_safety_ratio(1.5)
            .validate()
            .is_err());
        assert!(PlannerConfig::default()
            .with_default_stock(-1.0)
            .validate()
            .is_err());
        assert!(PlannerConfig::default()
            .with_interval_level(Some(1.0))
            .validate()
            .is_err());
    }

    #[test]
    fn test_partial_json_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, r#"{{"horizon": 6, "model": {{"max_iterations": 800}}}}"#).unwrap();

        let config = PlannerConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.horizon, 6);
        assert_eq!(config.safety_ratio, 0.25);
        assert_eq!(config.model.max_iterations, 800);
        assert_eq!(config.model.order, ArimaOrder { p: 1, d: 1, q: 1 });
    }

    #[test]
    fn test_invalid_json_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{{ not json").unwrap();

        let result = PlannerConfig::from_json_file(file.path());
        assert!(matches!(result, Err(DemandError::ConfigError(_))));
    }
}
