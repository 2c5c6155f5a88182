//! Seasonal ARIMA model for monthly series
//!
//! The model is
//!
//! ```text
//! phi(B) Phi(B^s) (1 - B)^d (1 - B^s)^D y_t = theta(B) Theta(B^s) e_t
//! ```
//!
//! Coefficients are estimated by conditional sum of squares on the
//! differenced series (pre-sample values set to zero), which maximises the
//! conditional Gaussian likelihood. Forecasts are conditional means with
//! future shocks set to zero, integrated back to the original scale.

use crate::config::SarimaConfig;
use crate::error::{DemandError, Result};
use crate::models::{FittedModel, ForecastModel, ForecastResult};
use crate::series::{MonthlySeries, YearMonth};
use demand_math::polynomial::psi_weights;
use demand_math::{difference, integrate, LagPolynomial, NelderMead};
use serde::Serialize;
use statrs::distribution::{ContinuousCDF, Normal};

/// Bound on each coefficient when a constraint is enforced
const CONSTRAINED_BOUND: f64 = 0.999;

/// Seasonal ARIMA estimator
#[derive(Debug, Clone)]
pub struct SarimaModel {
    /// Name of the model
    name: String,
    /// Orders and estimation settings
    config: SarimaConfig,
}

/// Estimated ARMA coefficients
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SarimaParameters {
    /// Non-seasonal autoregressive coefficients
    pub ar: Vec<f64>,
    /// Seasonal autoregressive coefficients
    pub seasonal_ar: Vec<f64>,
    /// Non-seasonal moving average coefficients
    pub ma: Vec<f64>,
    /// Seasonal moving average coefficients
    pub seasonal_ma: Vec<f64>,
}

/// Seasonal ARIMA model fitted to one series
#[derive(Debug, Clone)]
pub struct FittedSarima {
    name: String,
    series_name: String,
    parameters: SarimaParameters,
    /// Innovation variance
    sigma2: f64,
    log_likelihood: f64,
    iterations: usize,
    last_month: YearMonth,
    /// Observed series
    history: Vec<f64>,
    /// Series after differencing
    differenced: Vec<f64>,
    /// In-sample innovations on the differenced scale
    residuals: Vec<f64>,
    ar_polynomial: LagPolynomial,
    ma_polynomial: LagPolynomial,
    differencing: LagPolynomial,
}

impl SarimaModel {
    /// Create a new seasonal ARIMA model
    pub fn new(config: SarimaConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            name: config.label(),
            config,
        })
    }

    /// Orders and estimation settings
    pub fn config(&self) -> &SarimaConfig {
        &self.config
    }

    fn split_parameters(&self, theta: &[f64]) -> SarimaParameters {
        let o = &self.config.order;
        let (sp, sq) = if self.config.is_seasonal() {
            (self.config.seasonal_order.p, self.config.seasonal_order.q)
        } else {
            (0, 0)
        };

        let (ar, rest) = theta.split_at(o.p);
        let (seasonal_ar, rest) = rest.split_at(sp);
        let (ma, seasonal_ma) = rest.split_at(o.q);
        debug_assert_eq!(seasonal_ma.len(), sq);

        SarimaParameters {
            ar: ar.to_vec(),
            seasonal_ar: seasonal_ar.to_vec(),
            ma: ma.to_vec(),
            seasonal_ma: seasonal_ma.to_vec(),
        }
    }

    fn polynomials(&self, params: &SarimaParameters) -> (LagPolynomial, LagPolynomial) {
        let period = self.config.seasonal_order.period;
        let ar = LagPolynomial::autoregressive(&params.ar, 1)
            .multiply(&LagPolynomial::autoregressive(&params.seasonal_ar, period));
        let ma = LagPolynomial::moving_average(&params.ma, 1)
            .multiply(&LagPolynomial::moving_average(&params.seasonal_ma, period));
        (ar, ma)
    }

    fn differencing_operator(&self) -> LagPolynomial {
        let mut operator = LagPolynomial::difference(1, self.config.order.d);
        if self.config.is_seasonal() {
            let s = &self.config.seasonal_order;
            operator = operator.multiply(&LagPolynomial::difference(s.period, s.d));
        }
        operator
    }

    fn bounds(&self) -> Option<Vec<(f64, f64)>> {
        if !self.config.enforce_stationarity && !self.config.enforce_invertibility {
            return None;
        }

        let open = (-f64::MAX, f64::MAX);
        let closed = (-CONSTRAINED_BOUND, CONSTRAINED_BOUND);
        let stationary = if self.config.enforce_stationarity {
            closed
        } else {
            open
        };
        let invertible = if self.config.enforce_invertibility {
            closed
        } else {
            open
        };

        let template = self.split_parameters(&vec![0.0; self.config.parameter_count()]);
        let mut bounds = Vec::with_capacity(self.config.parameter_count());
        bounds.extend(std::iter::repeat(stationary).take(template.ar.len() + template.seasonal_ar.len()));
        bounds.extend(std::iter::repeat(invertible).take(template.ma.len() + template.seasonal_ma.len()));
        Some(bounds)
    }
}

/// Innovations of `ar(B) w_t = ma(B) e_t` with zero pre-sample values
fn conditional_residuals(w: &[f64], ar: &LagPolynomial, ma: &LagPolynomial) -> Vec<f64> {
    let mut residuals: Vec<f64> = Vec::with_capacity(w.len());
    for t in 0..w.len() {
        let mut e = 0.0;
        for k in 0..=ar.degree().min(t) {
            e += ar.coefficient(k) * w[t - k];
        }
        for k in 1..=ma.degree().min(t) {
            e -= ma.coefficient(k) * residuals[t - k];
        }
        residuals.push(e);
    }
    residuals
}

fn mean_square(values: &[f64]) -> f64 {
    values.iter().map(|v| v * v).sum::<f64>() / values.len() as f64
}

impl ForecastModel for SarimaModel {
    type Fitted = FittedSarima;

    fn fit(&self, series: &MonthlySeries) -> Result<FittedSarima> {
        let required = self.config.minimum_observations();
        if series.len() < required {
            return Err(DemandError::EstimationError(format!(
                "{} needs at least {} monthly observations, series '{}' has {}",
                self.name,
                required,
                series.name(),
                series.len()
            )));
        }
        let last_month = series.last_month().ok_or_else(|| {
            DemandError::EstimationError(format!("Series '{}' is empty", series.name()))
        })?;

        let history = series.values().to_vec();
        let differencing = self.differencing_operator();
        let differenced = difference(&history, &differencing)?;

        // Estimation runs on the standardised series so tolerances are scale-free
        let scale = mean_square(&differenced).sqrt();
        let magnitude = history.iter().fold(1.0_f64, |acc, v| acc.max(v.abs()));
        if !(scale.is_finite() && scale > 1e-10 * magnitude) {
            return Err(DemandError::EstimationError(format!(
                "Series '{}' has no variation left after differencing; {} cannot be estimated",
                series.name(),
                self.name
            )));
        }
        let standardised: Vec<f64> = differenced.iter().map(|w| w / scale).collect();

        let objective = |theta: &[f64]| {
            let params = self.split_parameters(theta);
            let (ar, ma) = self.polynomials(&params);
            mean_square(&conditional_residuals(&standardised, &ar, &ma))
        };

        let start = vec![0.0; self.config.parameter_count()];
        let bounds = self.bounds();
        let minimum = if start.is_empty() {
            None
        } else {
            let optimizer = NelderMead::new()
                .with_max_iterations(self.config.max_iterations)
                .with_f_tolerance(self.config.tolerance)
                .with_x_tolerance(self.config.tolerance.sqrt());
            Some(optimizer.minimize(objective, &start, bounds.as_deref())?)
        };

        let (theta, iterations) = match minimum {
            Some(m) if !m.converged => {
                return Err(DemandError::EstimationError(format!(
                    "{} did not converge for series '{}' after {} iterations",
                    self.name,
                    series.name(),
                    m.iterations
                )));
            }
            Some(m) if !m.value.is_finite() => {
                return Err(DemandError::EstimationError(format!(
                    "{} likelihood is not finite for series '{}'",
                    self.name,
                    series.name()
                )));
            }
            Some(m) => (m.point, m.iterations),
            None => (start, 0),
        };

        let parameters = self.split_parameters(&theta);
        let (ar_polynomial, ma_polynomial) = self.polynomials(&parameters);
        let residuals = conditional_residuals(&differenced, &ar_polynomial, &ma_polynomial);

        let sigma2 = mean_square(&residuals);
        let n = residuals.len() as f64;
        let log_likelihood =
            -0.5 * n * ((2.0 * std::f64::consts::PI * sigma2).ln() + 1.0);
        if !(sigma2.is_finite() && log_likelihood.is_finite()) {
            return Err(DemandError::EstimationError(format!(
                "{} produced a degenerate fit for series '{}'",
                self.name,
                series.name()
            )));
        }

        tracing::debug!(
            "{} fitted '{}' in {} iterations: {:?}, sigma2 = {:.4}",
            self.name,
            series.name(),
            iterations,
            parameters,
            sigma2
        );

        Ok(FittedSarima {
            name: self.name.clone(),
            series_name: series.name().to_string(),
            parameters,
            sigma2,
            log_likelihood,
            iterations,
            last_month,
            history,
            differenced,
            residuals,
            ar_polynomial,
            ma_polynomial,
            differencing,
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl FittedSarima {
    /// Estimated coefficients
    pub fn parameters(&self) -> &SarimaParameters {
        &self.parameters
    }

    /// Innovation variance
    pub fn sigma2(&self) -> f64 {
        self.sigma2
    }

    /// Conditional Gaussian log-likelihood at the estimate
    pub fn log_likelihood(&self) -> f64 {
        self.log_likelihood
    }

    /// Akaike information criterion
    pub fn aic(&self) -> f64 {
        let k = (self.parameter_count() + 1) as f64;
        -2.0 * self.log_likelihood + 2.0 * k
    }

    /// Optimiser iterations used
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// In-sample innovations on the differenced scale
    pub fn residuals(&self) -> &[f64] {
        &self.residuals
    }

    fn parameter_count(&self) -> usize {
        let p = &self.parameters;
        p.ar.len() + p.seasonal_ar.len() + p.ma.len() + p.seasonal_ma.len()
    }

    fn point_forecast(&self, horizon: usize) -> Result<Vec<f64>> {
        if horizon == 0 {
            return Err(DemandError::InputValidationError(
                "Forecast horizon must be at least one month".to_string(),
            ));
        }

        let ar = &self.ar_polynomial;
        let ma = &self.ma_polynomial;
        let mut w = self.differenced.clone();
        let mut e = self.residuals.clone();

        for _ in 0..horizon {
            let t = w.len();
            let mut next = 0.0;
            for k in 1..=ar.degree().min(t) {
                next -= ar.coefficient(k) * w[t - k];
            }
            for k in 1..=ma.degree().min(t) {
                next += ma.coefficient(k) * e[t - k];
            }
            w.push(next);
            e.push(0.0);
        }

        let future = &w[self.differenced.len()..];
        Ok(integrate(&self.history, future, &self.differencing)?)
    }
}

impl FittedModel for FittedSarima {
    fn forecast(&self, horizon: usize) -> Result<ForecastResult> {
        let values = self.point_forecast(horizon)?;
        ForecastResult::new(&self.series_name, &self.name, self.last_month, values)
    }

    fn forecast_with_intervals(&self, horizon: usize, level: f64) -> Result<ForecastResult> {
        if !(level > 0.0 && level < 1.0) {
            return Err(DemandError::InputValidationError(format!(
                "Confidence level must be between 0 and 1, got {}",
                level
            )));
        }

        let forecast = self.forecast(horizon)?;

        let full_ar = self.ar_polynomial.multiply(&self.differencing);
        let psi = psi_weights(&full_ar, &self.ma_polynomial, horizon)?;
        let normal = Normal::new(0.0, 1.0)
            .map_err(|e| DemandError::EstimationError(e.to_string()))?;
        let z = normal.inverse_cdf(0.5 + level / 2.0);

        let mut cumulative = 0.0;
        let intervals = forecast
            .values()
            .iter()
            .zip(&psi)
            .map(|(&value, &weight)| {
                cumulative += weight * weight;
                let margin = z * (self.sigma2 * cumulative).sqrt();
                (value - margin, value + margin)
            })
            .collect();

        forecast.with_intervals(level, intervals)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
