use demand_forecast::models::{FittedModel, ForecastModel, SarimaModel};
use demand_forecast::{DemandError, MonthlySeries, SarimaConfig, YearMonth};
use std::f64::consts::PI;

// Trend plus yearly season plus a bounded irregular component
fn seasonal_value(t: usize) -> f64 {
    let irregular = ((t * 17 + 7) % 13) as f64 - 6.0;
    1000.0 + 10.0 * t as f64 + 100.0 * (2.0 * PI * t as f64 / 12.0).sin() + irregular
}

fn series_from(values: Vec<f64>) -> MonthlySeries {
    let start = YearMonth::new(2019, 1).unwrap();
    let points = std::iter::once(start)
        .chain(start.following(values.len() - 1))
        .zip(values)
        .collect();
    MonthlySeries::new("TotalUnits", points).unwrap()
}

fn seasonal_series(months: usize) -> MonthlySeries {
    series_from((0..months).map(seasonal_value).collect())
}

#[test]
fn test_sarima_forecast_follows_trend_and_season() {
    let series = seasonal_series(48);
    let model = SarimaModel::new(SarimaConfig::default()).unwrap();
    let fitted = model.fit(&series).unwrap();

    let forecast = fitted.forecast(7).unwrap();
    assert_eq!(forecast.horizon(), 7);
    assert_eq!(forecast.model_name(), "SARIMA(1,1,1)(1,1,1,12)");

    for (h, (_, value)) in forecast.iter().enumerate() {
        let truth = seasonal_value(48 + h);
        assert!(
            (value - truth).abs() < 0.1 * truth,
            "step {}: forecast {} too far from {}",
            h + 1,
            value,
            truth
        );
    }
}

#[test]
fn test_forecast_months_are_contiguous() {
    let series = seasonal_series(40);
    let fitted = SarimaModel::new(SarimaConfig::default())
        .unwrap()
        .fit(&series)
        .unwrap();

    let forecast = fitted.forecast(7).unwrap();
    let last = series.last_month().unwrap();
    assert_eq!(forecast.months()[0], last.succ());
    for pair in forecast.months().windows(2) {
        assert_eq!(pair[1], pair[0].succ());
    }
}

#[test]
fn test_fit_diagnostics() {
    let fitted = SarimaModel::new(SarimaConfig::default())
        .unwrap()
        .fit(&seasonal_series(48))
        .unwrap();

    assert!(fitted.sigma2() > 0.0);
    assert!(fitted.log_likelihood().is_finite());
    assert!(fitted.aic().is_finite());
    assert!(fitted.iterations() > 0);
    assert_eq!(fitted.residuals().len(), 48 - 13);
    assert_eq!(fitted.parameters().ar.len(), 1);
    assert_eq!(fitted.parameters().seasonal_ma.len(), 1);
}

#[test]
fn test_intervals_widen_with_horizon() {
    let fitted = SarimaModel::new(SarimaConfig::default())
        .unwrap()
        .fit(&seasonal_series(48))
        .unwrap();

    let forecast = fitted.forecast_with_intervals(7, 0.95).unwrap();
    let intervals = forecast.intervals().unwrap();
    assert_eq!(intervals.len(), 7);
    assert_eq!(forecast.interval_level(), Some(0.95));

    let widths: Vec<f64> = intervals.iter().map(|(lo, hi)| hi - lo).collect();
    for (value, (lo, hi)) in forecast.values().iter().zip(intervals) {
        assert!(lo < value && value < hi);
    }
    for pair in widths.windows(2) {
        assert!(pair[1] >= pair[0]);
    }
    assert!(widths[6] > widths[0]);
}

#[test]
fn test_short_series_is_rejected() {
    let model = SarimaModel::new(SarimaConfig::default()).unwrap();
    let result = model.fit(&seasonal_series(23));

    match result {
        Err(DemandError::EstimationError(msg)) => assert!(msg.contains("24")),
        other => panic!("expected EstimationError, got {:?}", other),
    }
}

#[test]
fn test_constant_series_is_rejected() {
    let model = SarimaModel::new(SarimaConfig::default()).unwrap();
    let result = model.fit(&series_from(vec![500.0; 36]));

    assert!(matches!(result, Err(DemandError::EstimationError(_))));
}

#[test]
fn test_exact_trend_and_season_is_rejected() {
    let values = (0..36)
        .map(|t| 1000.0 + 10.0 * t as f64 + 100.0 * (2.0 * PI * t as f64 / 12.0).sin())
        .collect();
    let model = SarimaModel::new(SarimaConfig::default()).unwrap();

    assert!(matches!(
        model.fit(&series_from(values)),
        Err(DemandError::EstimationError(_))
    ));
}

#[test]
fn test_non_seasonal_configuration() {
    let config = SarimaConfig::default()
        .with_order(1, 1, 0)
        .with_seasonal_order(0, 0, 0, 0);
    let model = SarimaModel::new(config).unwrap();
    assert_eq!(model.name(), "ARIMA(1,1,0)");

    let fitted = model.fit(&seasonal_series(30)).unwrap();
    let forecast = fitted.forecast(3).unwrap();
    assert_eq!(forecast.horizon(), 3);
    assert!(forecast.values().iter().all(|v| v.is_finite()));
}

#[test]
fn test_iteration_budget_exhaustion_is_an_error() {
    let config = SarimaConfig::default().with_max_iterations(2);
    let model = SarimaModel::new(config).unwrap();

    assert!(matches!(
        model.fit(&seasonal_series(48)),
        Err(DemandError::EstimationError(_))
    ));
}
