use demand_forecast::{aggregate_monthly, DataLoader, Measure, YearMonth};
use pretty_assertions::assert_eq;
use rstest::rstest;

const SALES_CSV: &str = "\
ProductName,SalesMonth,TotalSales,TotalUnits
Aspirin,2023-01-01,100.0,10
Ibuprofen,2023-01-15,50.0,4
Aspirin,2023-02-01,120.0,12
Ibuprofen,2023-02-01,60.0,5
Aspirin,2023-04-01,90.0,9
";

#[rstest]
#[case(Measure::TotalSales, vec![150.0, 180.0, 90.0])]
#[case(Measure::TotalUnits, vec![14.0, 17.0, 9.0])]
fn test_monthly_totals(#[case] measure: Measure, #[case] expected: Vec<f64>) {
    let data = DataLoader::from_reader(SALES_CSV.as_bytes()).unwrap();
    let series = aggregate_monthly(data.records(), measure).unwrap();

    assert_eq!(series.values(), expected.as_slice());
    assert_eq!(series.name(), measure.column_name());
}

#[test]
fn test_gaps_are_kept_not_filled() {
    let data = DataLoader::from_reader(SALES_CSV.as_bytes()).unwrap();
    let series = aggregate_monthly(data.records(), Measure::TotalUnits).unwrap();

    let months: Vec<String> = series.months().iter().map(|m| m.to_string()).collect();
    assert_eq!(months, vec!["2023-01", "2023-02", "2023-04"]);
    assert_eq!(series.first_month(), Some(YearMonth::new(2023, 1).unwrap()));
    assert_eq!(series.missing_months(), vec![YearMonth::new(2023, 3).unwrap()]);
}

#[test]
fn test_months_cross_year_boundary() {
    let input = "\
ProductName,SalesMonth,TotalSales,TotalUnits
Aspirin,2023-12-01,1,1
Aspirin,2024-01-01,2,2
";
    let data = DataLoader::from_reader(input.as_bytes()).unwrap();
    let series = aggregate_monthly(data.records(), Measure::TotalSales).unwrap();

    assert_eq!(series.last_month(), Some(YearMonth::new(2024, 1).unwrap()));
    assert!(series.missing_months().is_empty());
}
