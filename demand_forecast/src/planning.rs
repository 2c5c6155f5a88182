//! Purchase order planning from forecast unit demand

use crate::config::DEFAULT_SAFETY_RATIO;
use crate::error::{DemandError, Result};
use crate::models::ForecastResult;
use crate::series::YearMonth;
use serde::Serialize;

/// Recommended order for one future month
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderPlanRow {
    /// Month the demand is forecast for
    pub month: YearMonth,
    /// Forecast unit demand
    pub predicted_units: f64,
    /// Units to order
    pub order_quantity: u64,
}

/// Units to order so that demand plus safety stock is covered
///
/// `max(0, trunc(u + u * r - s))`. Fractional units are dropped, not
/// rounded.
pub fn order_quantity(predicted_units: f64, current_stock: f64, safety_ratio: f64) -> u64 {
    let safety_stock = predicted_units * safety_ratio;
    let required = (predicted_units + safety_stock - current_stock).trunc();
    if required.is_finite() && required > 0.0 {
        required as u64
    } else {
        0
    }
}

/// Parse an interactive stock entry
///
/// Blank input yields `default_stock`. Thousands separators (`,` or `_`)
/// are accepted in the integer part when every group after the first has
/// exactly three digits.
pub fn parse_stock(input: &str, default_stock: f64) -> Result<f64> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return validate_stock(default_stock);
    }

    let not_a_number = || {
        DemandError::InputValidationError(format!(
            "Current stock '{}' is not a number",
            trimmed
        ))
    };
    let cleaned = strip_digit_groups(trimmed).ok_or_else(not_a_number)?;
    let stock: f64 = cleaned.parse().map_err(|_| not_a_number())?;

    validate_stock(stock)
}

/// Remove thousands separators, or `None` if they are misplaced
fn strip_digit_groups(text: &str) -> Option<String> {
    let is_separator = |c: char| c == ',' || c == '_';

    let (sign, unsigned) = match text.strip_prefix(|c: char| c == '-' || c == '+') {
        Some(rest) => (&text[..1], rest),
        None => ("", text),
    };
    let (integer, fraction) = match unsigned.find('.') {
        Some(idx) => unsigned.split_at(idx),
        None => (unsigned, ""),
    };

    if fraction.contains(is_separator) {
        return None;
    }
    if !integer.contains(is_separator) {
        return Some(text.to_string());
    }

    let groups: Vec<&str> = integer.split(is_separator).collect();
    let all_digits = groups
        .iter()
        .all(|g| !g.is_empty() && g.chars().all(|c| c.is_ascii_digit()));
    let well_sized = groups[0].len() <= 3 && groups[1..].iter().all(|g| g.len() == 3);
    if !(all_digits && well_sized) {
        return None;
    }

    Some(format!("{}{}{}", sign, groups.concat(), fraction))
}

fn validate_stock(stock: f64) -> Result<f64> {
    if !stock.is_finite() {
        return Err(DemandError::InputValidationError(format!(
            "Current stock must be a finite number, got {}",
            stock
        )));
    }
    if stock < 0.0 {
        return Err(DemandError::InputValidationError(format!(
            "Current stock cannot be negative, got {}",
            stock
        )));
    }
    Ok(stock)
}

/// Applies the order formula to every month of a unit forecast
///
/// The same stock figure is used for each month; stock is not carried
/// forward between months and lead times are not modelled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrderPlanner {
    current_stock: f64,
    safety_ratio: f64,
}

impl OrderPlanner {
    /// Create a planner, rejecting negative or non-numeric inputs
    pub fn new(current_stock: f64, safety_ratio: f64) -> Result<Self> {
        let current_stock = validate_stock(current_stock)?;
        if !(safety_ratio.is_finite() && (0.0..=1.0).contains(&safety_ratio)) {
            return Err(DemandError::InputValidationError(format!(
                "Safety ratio must be between 0 and 1, got {}",
                safety_ratio
            )));
        }

        Ok(Self {
            current_stock,
            safety_ratio,
        })
    }

    /// Planner with the default safety ratio
    pub fn with_stock(current_stock: f64) -> Result<Self> {
        Self::new(current_stock, DEFAULT_SAFETY_RATIO)
    }

    pub fn current_stock(&self) -> f64 {
        self.current_stock
    }

    pub fn safety_ratio(&self) -> f64 {
        self.safety_ratio
    }

    /// Order quantity for one predicted demand value
    pub fn order_for(&self, predicted_units: f64) -> u64 {
        order_quantity(predicted_units, self.current_stock, self.safety_ratio)
    }

    /// One row per forecast month
    pub fn plan(&self, units_forecast: &ForecastResult) -> Vec<OrderPlanRow> {
        units_forecast
            .iter()
            .map(|(month, predicted_units)| OrderPlanRow {
                month,
                predicted_units,
                order_quantity: self.order_for(predicted_units),
            })
            .collect()
    }
}
