//! # Demand Planner
//!
//! Workspace entry point re-exporting the demand planning crates.
//!
//! - [`demand_forecast`]: loading, aggregation, seasonal forecasting and
//!   order planning
//! - [`demand_math`]: lag polynomials, differencing and optimisation
//!
//! ## Example
//!
//! ```
//! use demand_planner_workspace::demand_forecast::order_quantity;
//!
//! assert_eq!(order_quantity(1000.0, 500.0, 0.25), 750);
//! assert_eq!(order_quantity(200.0, 1000.0, 0.25), 0);
//! ```

pub use demand_forecast;
pub use demand_math;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_plan_settings() {
        let config = demand_forecast::PlannerConfig::default();
        assert_eq!(config.horizon, 7);
        assert_eq!(config.model.label(), "SARIMA(1,1,1)(1,1,1,12)");
    }

    #[test]
    fn test_math_reexport() {
        let operator = demand_math::LagPolynomial::difference(12, 1);
        assert_eq!(operator.degree(), 12);
    }
}
