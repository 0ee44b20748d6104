//! Sales Calculator Module
//! Scalar KPIs and grouped `total_sales` sums over the cleaned transaction table.

use crate::data::processor::{PRODUCT_COL, REGION_COL, TOTAL_SALES_COL, UNITS_COL, YEAR_MONTH_COL};
use polars::prelude::*;
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatsError {
    #[error("average order value is undefined: no units sold")]
    DivisionByZero,
}

/// Headline figures shown on the KPI cards.
#[derive(Debug, Clone, PartialEq)]
pub struct Kpis {
    pub total_revenue: f64,
    pub units_sold_total: i64,
    pub avg_order_value: Result<f64, StatsError>,
}

/// Ordering applied to a grouped aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupOrder {
    /// Largest sum first; equal sums keep key order.
    ValueDescending,
    KeyAscending,
}

/// Ordered `(key, summed total_sales)` pairs.
pub type GroupedSales = Vec<(String, f64)>;

pub struct SalesCalculator;

impl SalesCalculator {
    /// Null `total_sales` cells are excluded from the revenue sum.
    /// A units total past `i64::MAX` is a compute error.
    pub fn compute_kpis(table: &DataFrame) -> PolarsResult<Kpis> {
        let total_revenue: f64 = table
            .column(TOTAL_SALES_COL)?
            .f64()?
            .into_iter()
            .flatten()
            .sum();
        let units_sold_total = table
            .column(UNITS_COL)?
            .i64()?
            .into_iter()
            .flatten()
            .try_fold(0_i64, |acc, units| acc.checked_add(units))
            .ok_or_else(|| {
                PolarsError::ComputeError("total units sold overflows a 64-bit integer".into())
            })?;

        let avg_order_value = if units_sold_total == 0 {
            Err(StatsError::DivisionByZero)
        } else {
            Ok(total_revenue / units_sold_total as f64)
        };

        Ok(Kpis {
            total_revenue,
            units_sold_total,
            avg_order_value,
        })
    }

    /// Group rows by `key_column` and sum `total_sales`.
    ///
    /// Nulls are excluded from each sum, so a group with only null sales sums to 0.
    /// Rows with a null key are dropped.
    pub fn aggregate_by(
        table: &DataFrame,
        key_column: &str,
        order: GroupOrder,
    ) -> PolarsResult<GroupedSales> {
        let keys = table.column(key_column)?.cast(&DataType::String)?;
        let keys = keys.str()?;
        let sales = table.column(TOTAL_SALES_COL)?.f64()?;

        let mut groups: BTreeMap<String, f64> = BTreeMap::new();
        for (key, value) in keys.into_iter().zip(sales.into_iter()) {
            let Some(key) = key else {
                continue;
            };
            let total = groups.entry(key.to_string()).or_insert(0.0);
            if let Some(value) = value {
                *total += value;
            }
        }

        let mut grouped: GroupedSales = groups.into_iter().collect();
        if order == GroupOrder::ValueDescending {
            grouped.sort_by(|a, b| b.1.total_cmp(&a.1));
        }
        Ok(grouped)
    }

    pub fn region_sales(table: &DataFrame) -> PolarsResult<GroupedSales> {
        Self::aggregate_by(table, REGION_COL, GroupOrder::ValueDescending)
    }

    /// `YYYY-MM` keys sort lexicographically in calendar order.
    pub fn monthly_sales(table: &DataFrame) -> PolarsResult<GroupedSales> {
        Self::aggregate_by(table, YEAR_MONTH_COL, GroupOrder::KeyAscending)
    }

    pub fn product_sales(table: &DataFrame) -> PolarsResult<GroupedSales> {
        Self::aggregate_by(table, PRODUCT_COL, GroupOrder::KeyAscending)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::processor::{raw_frame, DataProcessor};
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    fn cleaned(rows: &[[&str; 6]]) -> DataFrame {
        DataProcessor::clean_table(&raw_frame(rows)).unwrap().frame
    }

    fn example_table() -> DataFrame {
        cleaned(&[
            ["West", "Shoes", "2023-01-15", "$50.00", "10", "$200.00"],
            ["East", "Shoes", "2023-01-20", "$30", "5", "$50"],
        ])
    }

    #[test]
    fn test_kpis_for_example_rows() {
        let kpis = SalesCalculator::compute_kpis(&example_table()).unwrap();
        assert_relative_eq!(kpis.total_revenue, 650.0);
        assert_eq!(kpis.units_sold_total, 15);
        assert_relative_eq!(kpis.avg_order_value.unwrap(), 43.333_333, epsilon = 1e-4);
    }

    #[test]
    fn test_grouped_sales_for_example_rows() {
        let table = example_table();
        assert_eq!(
            SalesCalculator::region_sales(&table).unwrap(),
            vec![("West".to_string(), 500.0), ("East".to_string(), 150.0)]
        );
        assert_eq!(
            SalesCalculator::monthly_sales(&table).unwrap(),
            vec![("2023-01".to_string(), 650.0)]
        );
        assert_eq!(
            SalesCalculator::product_sales(&table).unwrap(),
            vec![("Shoes".to_string(), 650.0)]
        );
    }

    #[test]
    fn test_avg_order_value_zero_units() {
        let table = cleaned(&[["West", "Shoes", "2023-01-15", "$50.00", "0", "$0"]]);
        let kpis = SalesCalculator::compute_kpis(&table).unwrap();
        assert_eq!(kpis.avg_order_value, Err(StatsError::DivisionByZero));
    }

    #[test]
    fn test_avg_order_value_no_rows() {
        let kpis = SalesCalculator::compute_kpis(&cleaned(&[])).unwrap();
        assert_eq!(kpis.total_revenue, 0.0);
        assert_eq!(kpis.units_sold_total, 0);
        assert_eq!(kpis.avg_order_value, Err(StatsError::DivisionByZero));
    }

    #[test]
    fn test_units_total_overflow_is_an_error() {
        let table = DataFrame::new(vec![
            Column::new(UNITS_COL.into(), &[i64::MAX, 1]),
            Column::new(TOTAL_SALES_COL.into(), &[1.0, 1.0]),
        ])
        .unwrap();
        let err = SalesCalculator::compute_kpis(&table).unwrap_err();
        assert!(err.to_string().contains("overflows"), "{err}");
    }

    #[test]
    fn test_null_sales_are_excluded() {
        let table = cleaned(&[
            ["West", "Shoes", "2023-01-15", "$50.00", "10", "$200.00"],
            ["West", "Boots", "2023-02-01", "n/a", "4", "$10"],
        ]);
        let kpis = SalesCalculator::compute_kpis(&table).unwrap();
        assert_relative_eq!(kpis.total_revenue, 500.0);
        assert_eq!(kpis.units_sold_total, 14);

        let products = SalesCalculator::product_sales(&table).unwrap();
        assert_eq!(
            products,
            vec![("Boots".to_string(), 0.0), ("Shoes".to_string(), 500.0)]
        );
    }

    #[test]
    fn test_monthly_sales_chronological() {
        let table = cleaned(&[
            ["West", "Shoes", "2022-12-31", "$1", "1", "$0"],
            ["West", "Shoes", "2021-03-01", "$1", "2", "$0"],
            ["West", "Shoes", "2022-01-10", "$1", "3", "$0"],
        ]);
        let months: Vec<String> = SalesCalculator::monthly_sales(&table)
            .unwrap()
            .into_iter()
            .map(|(k, _)| k)
            .collect();
        assert_eq!(months, vec!["2021-03", "2022-01", "2022-12"]);
    }

    fn arb_row() -> impl Strategy<Value = (usize, u32, u32, u32)> {
        (0usize..4, 1u32..13, 0u32..100_000, 0u32..500)
    }

    const REGIONS: [&str; 4] = ["West", "East", "South", "Midwest"];

    proptest! {
        #[test]
        fn prop_region_sales_partition_revenue(rows in prop::collection::vec(arb_row(), 0..40)) {
            let rendered: Vec<[String; 6]> = rows
                .iter()
                .map(|&(region, month, cents, units)| {
                    [
                        REGIONS[region].to_string(),
                        "Shoes".to_string(),
                        format!("2022-{month:02}-01"),
                        format!("${}.{:02}", cents / 100, cents % 100),
                        units.to_string(),
                        "$0".to_string(),
                    ]
                })
                .collect();
            let borrowed: Vec<[&str; 6]> = rendered
                .iter()
                .map(|r| std::array::from_fn(|i| r[i].as_str()))
                .collect();
            let table = cleaned(&borrowed);

            let kpis = SalesCalculator::compute_kpis(&table).unwrap();
            let regions = SalesCalculator::region_sales(&table).unwrap();
            let region_total: f64 = regions.iter().map(|(_, v)| v).sum();
            let tolerance = 1e-6 * kpis.total_revenue.max(1.0);
            prop_assert!((region_total - kpis.total_revenue).abs() <= tolerance);

            for pair in regions.windows(2) {
                prop_assert!(pair[0].1 >= pair[1].1);
            }

            let months = SalesCalculator::monthly_sales(&table).unwrap();
            for pair in months.windows(2) {
                prop_assert!(pair[0].0 < pair[1].0);
            }
        }
    }
}
