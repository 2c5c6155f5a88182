use demand_forecast::models::ForecastResult;
use demand_forecast::{order_quantity, OrderPlanner, YearMonth};
use proptest::prelude::*;

proptest! {
    #[test]
    fn order_never_negative_and_covers_demand(
        units in 0.0f64..1.0e7,
        stock in 0.0f64..1.0e7,
        ratio in 0.0f64..=1.0,
    ) {
        let quantity = order_quantity(units, stock, ratio) as f64;
        let required = units + units * ratio - stock;

        prop_assert!(quantity >= 0.0);
        // Truncation drops strictly less than one unit
        prop_assert!(quantity <= required.max(0.0));
        prop_assert!(quantity > required - 1.0);
    }

    #[test]
    fn more_stock_never_orders_more(
        units in 0.0f64..1.0e6,
        stock in 0.0f64..1.0e6,
        extra in 0.0f64..1.0e6,
        ratio in 0.0f64..=1.0,
    ) {
        prop_assert!(
            order_quantity(units, stock + extra, ratio) <= order_quantity(units, stock, ratio)
        );
    }

    #[test]
    fn more_demand_never_orders_less(
        units in 0.0f64..1.0e6,
        extra in 0.0f64..1.0e6,
        stock in 0.0f64..1.0e6,
        ratio in 0.0f64..=1.0,
    ) {
        prop_assert!(
            order_quantity(units + extra, stock, ratio) >= order_quantity(units, stock, ratio)
        );
    }

    #[test]
    fn higher_ratio_never_orders_less(
        units in 0.0f64..1.0e6,
        stock in 0.0f64..1.0e6,
        low in 0.0f64..=0.5,
        bump in 0.0f64..=0.5,
    ) {
        prop_assert!(
            order_quantity(units, stock, low + bump) >= order_quantity(units, stock, low)
        );
    }

    #[test]
    fn plan_is_deterministic(values in prop::collection::vec(0.0f64..1.0e5, 1..12)) {
        let last = YearMonth::new(2024, 5).unwrap();
        let forecast = ForecastResult::new("TotalUnits", "test", last, values.clone()).unwrap();
        let planner = OrderPlanner::new(60_000.0, 0.25).unwrap();

        let first = planner.plan(&forecast);
        let second = planner.plan(&forecast);
        prop_assert_eq!(&first, &second);
        prop_assert_eq!(first.len(), values.len());
    }
}

#[test]
fn test_worked_examples() {
    let planner = OrderPlanner::new(500.0, 0.25).unwrap();
    assert_eq!(planner.order_for(1000.0), 750);

    let planner = OrderPlanner::new(1000.0, 0.25).unwrap();
    assert_eq!(planner.order_for(200.0), 0);
}

#[test]
fn test_plan_months_follow_last_observation() {
    let last = YearMonth::new(2024, 6).unwrap();
    let forecast = ForecastResult::new("TotalUnits", "test", last, vec![1.0; 7]).unwrap();
    let rows = OrderPlanner::with_stock(0.0).unwrap().plan(&forecast);

    let months: Vec<String> = rows.iter().map(|r| r.month.to_string()).collect();
    assert_eq!(
        months,
        vec!["2024-07", "2024-08", "2024-09", "2024-10", "2024-11", "2024-12", "2025-01"]
    );
}

#[test]
fn test_default_stock_plan() {
    let last = YearMonth::new(2024, 12).unwrap();
    let forecast =
        ForecastResult::new("TotalUnits", "test", last, vec![50_000.0, 48_000.0]).unwrap();
    let rows = OrderPlanner::with_stock(60_000.0).unwrap().plan(&forecast);

    assert_eq!(rows[0].month.to_string(), "2025-01");
    assert_eq!(rows[0].order_quantity, 2_500);
    assert_eq!(rows[1].order_quantity, 0);
}
