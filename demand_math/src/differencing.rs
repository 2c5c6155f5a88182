//! Differencing and integration of time series through lag polynomials

use crate::polynomial::LagPolynomial;
use crate::{MathError, Result};

/// Apply a differencing polynomial to a series
///
/// Output element `t` is `sum_k c_k * y[t + degree - k]`, so the result is
/// `degree` elements shorter than the input.
pub fn difference(series: &[f64], operator: &LagPolynomial) -> Result<Vec<f64>> {
    let degree = operator.degree();
    if series.len() <= degree {
        return Err(MathError::InsufficientData(format!(
            "Need more than {} observations to difference, have {}",
            degree,
            series.len()
        )));
    }

    let coefficients = operator.coefficients();
    let differenced = (degree..series.len())
        .map(|t| {
            coefficients
                .iter()
                .enumerate()
                .map(|(k, &c)| c * series[t - k])
                .sum()
        })
        .collect();

    Ok(differenced)
}

/// Undo differencing for values following the end of `history`
///
/// Each new level is `(w_t - sum_{k>=1} c_k * y_{t-k}) / c_0`, with earlier
/// integrated values feeding later ones.
pub fn integrate(
    history: &[f64],
    differenced: &[f64],
    operator: &LagPolynomial,
) -> Result<Vec<f64>> {
    let degree = operator.degree();
    if history.len() < degree {
        return Err(MathError::InsufficientData(format!(
            "Need at least {} historical values to integrate, have {}",
            degree,
            history.len()
        )));
    }

    let lead = operator.coefficient(0);
    if lead == 0.0 {
        return Err(MathError::InvalidInput(
            "Differencing operator has a zero leading coefficient".to_string(),
        ));
    }

    let mut levels = history[history.len() - degree..].to_vec();
    let mut integrated = Vec::with_capacity(differenced.len());

    for &w in differenced {
        let t = levels.len();
        let mut value = w;
        for k in 1..=degree {
            value -= operator.coefficient(k) * levels[t - k];
        }
        value /= lead;

        levels.push(value);
        integrated.push(value);
    }

    Ok(integrated)
}
