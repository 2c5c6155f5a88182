//! Lag polynomial arithmetic
//!
//! A lag polynomial `c0 + c1 B + c2 B^2 + ...` is stored by its coefficients,
//! lowest power first. Seasonal ARIMA models are products of such
//! polynomials: non-seasonal and seasonal autoregressive factors, moving
//! average factors and the differencing operator.

use crate::{MathError, Result};
use serde::{Deserialize, Serialize};

/// Polynomial in the backshift operator `B`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LagPolynomial {
    coefficients: Vec<f64>,
}

impl LagPolynomial {
    /// The identity polynomial `1`
    pub fn one() -> Self {
        Self {
            coefficients: vec![1.0],
        }
    }

    /// Autoregressive factor `1 - phi_1 B^s - phi_2 B^2s - ...`
    ///
    /// `step` is 1 for the non-seasonal factor and the seasonal period for
    /// the seasonal one.
    pub fn autoregressive(phi: &[f64], step: usize) -> Self {
        Self::from_lagged(phi, step, -1.0)
    }

    /// Moving average factor `1 + theta_1 B^s + theta_2 B^2s + ...`
    pub fn moving_average(theta: &[f64], step: usize) -> Self {
        Self::from_lagged(theta, step, 1.0)
    }

    /// Differencing operator `(1 - B^lag)^order`
    pub fn difference(lag: usize, order: usize) -> Self {
        let mut result = Self::one();
        if lag == 0 {
            return result;
        }

        let single = Self::from_lagged(&[1.0], lag, -1.0);
        for _ in 0..order {
            result = result.multiply(&single);
        }
        result
    }

    fn from_lagged(params: &[f64], step: usize, sign: f64) -> Self {
        let step = step.max(1);
        let mut coefficients = vec![0.0; params.len() * step + 1];
        coefficients[0] = 1.0;
        for (i, &p) in params.iter().enumerate() {
            coefficients[(i + 1) * step] = sign * p;
        }
        Self { coefficients }
    }

    /// Product of two lag polynomials
    pub fn multiply(&self, other: &Self) -> Self {
        let mut coefficients = vec![0.0; self.coefficients.len() + other.coefficients.len() - 1];
        for (i, &a) in self.coefficients.iter().enumerate() {
            if a == 0.0 {
                continue;
            }
            for (j, &b) in other.coefficients.iter().enumerate() {
                coefficients[i + j] += a * b;
            }
        }
        Self { coefficients }
    }

    /// Highest power of `B` present
    pub fn degree(&self) -> usize {
        self.coefficients.len() - 1
    }

    /// All coefficients, lowest power first
    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    /// Coefficient of `B^power`, zero beyond the degree
    pub fn coefficient(&self, power: usize) -> f64 {
        self.coefficients.get(power).copied().unwrap_or(0.0)
    }
}

/// Psi (MA-infinity) weights of the process `ar(B) x_t = ma(B) e_t`
///
/// Returns the first `count` weights `psi_0 = 1, psi_1, ...` of
/// `ma(B) / ar(B)`. `ar` must have a unit leading coefficient.
pub fn psi_weights(ar: &LagPolynomial, ma: &LagPolynomial, count: usize) -> Result<Vec<f64>> {
    if (ar.coefficient(0) - 1.0).abs() > f64::EPSILON {
        return Err(MathError::InvalidInput(
            "Autoregressive polynomial must have a unit leading coefficient".to_string(),
        ));
    }

    let mut psi: Vec<f64> = Vec::with_capacity(count);
    for j in 0..count {
        let mut value = ma.coefficient(j);
        for k in 1..=j.min(ar.degree()) {
            value -= ar.coefficient(k) * psi[j - k];
        }
        psi.push(value);
    }

    Ok(psi)
}
