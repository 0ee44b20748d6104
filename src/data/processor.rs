//! Data Processor Module
//! Cleans raw sales columns into typed values and derives `total_sales` and `year_month`.

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use polars::prelude::*;
use thiserror::Error;
use tracing::debug;

pub const REGION_COL: &str = "Region";
pub const PRODUCT_COL: &str = "Product";
pub const INVOICE_DATE_COL: &str = "Invoice Date";
pub const PRICE_COL: &str = "Price per Unit";
pub const UNITS_COL: &str = "Units Sold";
pub const PROFIT_COL: &str = "Operating Profit";
/// Pre-computed total shipped with the source file; discarded on load.
pub const SOURCE_TOTAL_COL: &str = "Total Sales";

pub const TOTAL_SALES_COL: &str = "total_sales";
pub const YEAR_MONTH_COL: &str = "year_month";

pub const REQUIRED_COLUMNS: [&str; 6] = [
    REGION_COL,
    PRODUCT_COL,
    INVOICE_DATE_COL,
    PRICE_COL,
    UNITS_COL,
    PROFIT_COL,
];

/// Days between 0001-01-01 and 1970-01-01, polars' `Date` epoch.
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// `%Y` accepts any digit count; shorter years are rejected, not guessed.
const MIN_YEAR: i32 = 1000;

/// 2^63, the first float past `i64::MAX`.
const UNITS_LIMIT: f64 = 9_223_372_036_854_775_808.0;

const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d", "%d-%b-%Y"];
const DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%m/%d/%Y %H:%M"];

#[derive(Error, Debug)]
pub enum ProcessorError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
    #[error("Missing required column '{0}'")]
    MissingColumn(String),
    #[error("Malformed 'Units Sold' value {value:?} at row {row}")]
    MalformedNumericField { row: usize, value: String },
    #[error("Malformed 'Invoice Date' value {value:?} at row {row}")]
    MalformedDateField { row: usize, value: String },
}

/// Counts gathered while cleaning; currency failures are absorbed as nulls.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleaningReport {
    pub rows: usize,
    pub price_nulls: usize,
    pub profit_nulls: usize,
}

/// A cleaned transaction table together with its cleaning counts.
#[derive(Debug, Clone)]
pub struct CleanedTable {
    pub frame: DataFrame,
    pub report: CleaningReport,
}

/// Strip every `$` and `,` and parse the rest as a decimal.
pub fn clean_currency(raw: &str) -> Option<f64> {
    let stripped: String = raw.chars().filter(|c| !matches!(c, '$' | ',')).collect();
    let stripped = stripped.trim();
    if stripped.is_empty() {
        return None;
    }
    stripped.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Strip thousands separators, parse as a decimal and truncate toward zero.
/// Negative or out-of-range counts are rejected.
pub fn parse_units(raw: &str) -> Option<i64> {
    let stripped = raw.replace(',', "");
    let value = stripped.trim().parse::<f64>().ok()?.trunc();
    (0.0..UNITS_LIMIT).contains(&value).then_some(value as i64)
}

pub fn parse_invoice_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
                .map(|dt| dt.date())
        })
        .filter(|date| date.year() >= MIN_YEAR)
}

/// Sortable calendar month bucket, e.g. `2023-01`.
pub fn year_month(date: NaiveDate) -> String {
    date.format("%Y-%m").to_string()
}

/// Turns the raw, all-text sales frame into the typed transaction table.
pub struct DataProcessor;

impl DataProcessor {
    /// Clean the raw frame.
    ///
    /// Price and profit degrade to null on bad input. Units and invoice date are
    /// strict: the first bad value aborts with the offending row, and no partial
    /// table is returned.
    pub fn clean_table(raw: &DataFrame) -> Result<CleanedTable, ProcessorError> {
        for name in REQUIRED_COLUMNS {
            if raw.column(name).is_err() {
                return Err(ProcessorError::MissingColumn(name.to_string()));
            }
        }

        let prices = Self::currency_values(raw, PRICE_COL)?;
        let profits = Self::currency_values(raw, PROFIT_COL)?;
        let units = Self::unit_values(raw)?;
        let dates = Self::date_values(raw)?;

        let total_sales: Vec<Option<f64>> = prices
            .iter()
            .zip(units.iter())
            .map(|(price, &units)| price.map(|p| p * units as f64))
            .collect();
        let year_months: Vec<String> = dates.iter().map(|&d| year_month(d)).collect();
        let epoch_days: Vec<i32> = dates
            .iter()
            .map(|d| d.num_days_from_ce() - UNIX_EPOCH_DAYS_FROM_CE)
            .collect();

        let report = CleaningReport {
            rows: raw.height(),
            price_nulls: prices.iter().filter(|v| v.is_none()).count(),
            profit_nulls: profits.iter().filter(|v| v.is_none()).count(),
        };

        // Keep the source column order; cleaned columns replace their raw text.
        let mut columns = Vec::with_capacity(raw.width() + 2);
        for column in raw.get_columns() {
            let cleaned = match column.name().as_str() {
                SOURCE_TOTAL_COL => continue,
                PRICE_COL => Column::new(PRICE_COL.into(), &prices),
                PROFIT_COL => Column::new(PROFIT_COL.into(), &profits),
                UNITS_COL => Column::new(UNITS_COL.into(), &units),
                INVOICE_DATE_COL => {
                    Column::new(INVOICE_DATE_COL.into(), &epoch_days).cast(&DataType::Date)?
                }
                _ => column.cast(&DataType::String)?,
            };
            columns.push(cleaned);
        }
        columns.push(Column::new(TOTAL_SALES_COL.into(), &total_sales));
        columns.push(Column::new(YEAR_MONTH_COL.into(), &year_months));

        let frame = DataFrame::new(columns)?;
        Ok(CleanedTable { frame, report })
    }

    fn text_column(raw: &DataFrame, name: &str) -> Result<Column, ProcessorError> {
        Ok(raw.column(name)?.cast(&DataType::String)?)
    }

    fn currency_values(raw: &DataFrame, name: &str) -> Result<Vec<Option<f64>>, ProcessorError> {
        let column = Self::text_column(raw, name)?;
        let values = column
            .str()?
            .into_iter()
            .enumerate()
            .map(|(row, cell)| {
                let cleaned = cell.and_then(clean_currency);
                if cleaned.is_none() {
                    debug!(
                        column = name,
                        row,
                        raw = ?cell,
                        "unparseable currency value set to null"
                    );
                }
                cleaned
            })
            .collect();
        Ok(values)
    }

    fn unit_values(raw: &DataFrame) -> Result<Vec<i64>, ProcessorError> {
        let column = Self::text_column(raw, UNITS_COL)?;
        column
            .str()?
            .into_iter()
            .enumerate()
            .map(|(row, cell)| {
                let cell = cell.unwrap_or_default();
                parse_units(cell).ok_or_else(|| ProcessorError::MalformedNumericField {
                    row,
                    value: cell.to_string(),
                })
            })
            .collect()
    }

    fn date_values(raw: &DataFrame) -> Result<Vec<NaiveDate>, ProcessorError> {
        let column = Self::text_column(raw, INVOICE_DATE_COL)?;
        column
            .str()?
            .into_iter()
            .enumerate()
            .map(|(row, cell)| {
                let cell = cell.unwrap_or_default();
                parse_invoice_date(cell).ok_or_else(|| ProcessorError::MalformedDateField {
                    row,
                    value: cell.to_string(),
                })
            })
            .collect()
    }
}

/// Build an all-text raw frame in source layout:
/// `(region, product, invoice date, price, units, profit)`.
#[cfg(test)]
pub(crate) fn raw_frame(rows: &[[&str; 6]]) -> DataFrame {
    let pick = |idx: usize| -> Vec<&str> { rows.iter().map(|r| r[idx]).collect() };
    DataFrame::new(
        REQUIRED_COLUMNS
            .iter()
            .enumerate()
            .map(|(idx, name)| Column::new((*name).into(), pick(idx)))
            .collect(),
    )
    .expect("raw test frame")
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const WEST: [&str; 6] = ["West", "Shoes", "2023-01-15", "$50.00", "10", "$200.00"];
    const EAST: [&str; 6] = ["East", "Shoes", "2023-01-20", "$30", "5", "$50"];

    #[test]
    fn test_clean_currency_strips_symbol_and_separators() {
        assert_eq!(clean_currency("$1,234.50"), Some(1234.50));
        assert_eq!(clean_currency("$30"), Some(30.0));
        assert_eq!(clean_currency(" 1,000 "), Some(1000.0));
    }

    #[test]
    fn test_clean_currency_rejects_garbage() {
        assert_eq!(clean_currency(""), None);
        assert_eq!(clean_currency("$"), None);
        assert_eq!(clean_currency("N/A"), None);
        assert_eq!(clean_currency("nan"), None);
    }

    #[test]
    fn test_parse_units() {
        assert_eq!(parse_units("1,200"), Some(1200));
        assert_eq!(parse_units("15"), Some(15));
        assert_eq!(parse_units("12.9"), Some(12));
        assert_eq!(parse_units("abc"), None);
        assert_eq!(parse_units(""), None);
    }

    #[test]
    fn test_parse_units_rejects_negative_and_out_of_range() {
        assert_eq!(parse_units("-5"), None);
        assert_eq!(parse_units("-0.5"), Some(0));
        assert_eq!(parse_units("1e30"), None);
        assert_eq!(parse_units("9223372036854775807"), None);
        assert_eq!(parse_units("inf"), None);
        assert_eq!(parse_units("NaN"), None);
        assert_eq!(parse_units("1e18"), Some(1_000_000_000_000_000_000));
    }

    #[test]
    fn test_oversized_units_abort_with_row() {
        let bad = ["East", "Shoes", "2023-01-20", "$30", "1e30", "$50"];
        let err = DataProcessor::clean_table(&raw_frame(&[WEST, bad])).unwrap_err();
        assert!(matches!(
            err,
            ProcessorError::MalformedNumericField { row: 1, ref value } if value == "1e30"
        ));
    }

    #[test]
    fn test_parse_invoice_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2020, 1, 5).unwrap();
        assert_eq!(parse_invoice_date("2020-01-05"), Some(expected));
        assert_eq!(parse_invoice_date("1/5/2020"), Some(expected));
        assert_eq!(parse_invoice_date("2020/01/05"), Some(expected));
        assert_eq!(parse_invoice_date("05-Jan-2020"), Some(expected));
        assert_eq!(parse_invoice_date("2020-01-05 13:45:00"), Some(expected));
        assert_eq!(parse_invoice_date("not a date"), None);
        assert_eq!(parse_invoice_date("2020-13-40"), None);
    }

    #[test]
    fn test_parse_invoice_date_requires_four_digit_year() {
        assert_eq!(parse_invoice_date("1/5/20"), None);
        assert_eq!(parse_invoice_date("20-01-05"), None);
        assert_eq!(parse_invoice_date("05-Jan-20"), None);
        assert_eq!(
            parse_invoice_date("1/5/1999"),
            NaiveDate::from_ymd_opt(1999, 1, 5)
        );

        let bad = ["East", "Shoes", "1/5/20", "$30", "5", "$50"];
        let err = DataProcessor::clean_table(&raw_frame(&[WEST, bad])).unwrap_err();
        assert!(matches!(
            err,
            ProcessorError::MalformedDateField { row: 1, ref value } if value == "1/5/20"
        ));
    }

    #[test]
    fn test_year_month_is_zero_padded() {
        let date = NaiveDate::from_ymd_opt(2021, 3, 9).unwrap();
        assert_eq!(year_month(date), "2021-03");
    }

    #[test]
    fn test_clean_table_derives_columns() {
        let cleaned = DataProcessor::clean_table(&raw_frame(&[WEST, EAST])).unwrap();
        let frame = &cleaned.frame;

        let totals: Vec<Option<f64>> = frame
            .column(TOTAL_SALES_COL)
            .unwrap()
            .f64()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(totals, vec![Some(500.0), Some(150.0)]);

        let units: Vec<Option<i64>> = frame
            .column(UNITS_COL)
            .unwrap()
            .i64()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(units, vec![Some(10), Some(5)]);

        let months = frame.column(YEAR_MONTH_COL).unwrap();
        let months: Vec<Option<&str>> = months.str().unwrap().into_iter().collect();
        assert_eq!(months, vec![Some("2023-01"), Some("2023-01")]);

        assert_eq!(
            frame.column(INVOICE_DATE_COL).unwrap().dtype(),
            &DataType::Date
        );
        assert_eq!(cleaned.report.rows, 2);
        assert_eq!(cleaned.report.price_nulls, 0);
    }

    #[test]
    fn test_bad_price_becomes_null_and_poisons_row_total() {
        let bad = ["North", "Boots", "2023-02-01", "free", "3", "oops"];
        let cleaned = DataProcessor::clean_table(&raw_frame(&[WEST, bad])).unwrap();

        let totals = cleaned.frame.column(TOTAL_SALES_COL).unwrap();
        let totals = totals.f64().unwrap();
        assert_eq!(totals.get(0), Some(500.0));
        assert_eq!(totals.get(1), None);

        let profits = cleaned.frame.column(PROFIT_COL).unwrap();
        assert_relative_eq!(profits.f64().unwrap().get(0).unwrap(), 200.0);
        assert_eq!(cleaned.report.price_nulls, 1);
        assert_eq!(cleaned.report.profit_nulls, 1);
    }

    #[test]
    fn test_malformed_units_abort_with_row() {
        let bad = ["East", "Shoes", "2023-01-20", "$30", "abc", "$50"];
        let err = DataProcessor::clean_table(&raw_frame(&[WEST, bad])).unwrap_err();
        match err {
            ProcessorError::MalformedNumericField { row, value } => {
                assert_eq!(row, 1);
                assert_eq!(value, "abc");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_malformed_date_aborts_with_row() {
        let bad = ["East", "Shoes", "someday", "$30", "5", "$50"];
        let err = DataProcessor::clean_table(&raw_frame(&[bad, WEST])).unwrap_err();
        assert!(matches!(
            err,
            ProcessorError::MalformedDateField { row: 0, ref value } if value == "someday"
        ));
    }

    #[test]
    fn test_missing_column_is_reported() {
        let frame = raw_frame(&[WEST]).drop(PROFIT_COL).unwrap();
        let err = DataProcessor::clean_table(&frame).unwrap_err();
        assert!(matches!(err, ProcessorError::MissingColumn(ref name) if name == PROFIT_COL));
    }

    #[test]
    fn test_source_total_is_dropped_and_extra_columns_kept() {
        let mut frame = raw_frame(&[WEST]);
        frame
            .with_column(Column::new(SOURCE_TOTAL_COL.into(), ["$999"]))
            .unwrap();
        frame
            .with_column(Column::new("Retailer".into(), ["Foot Locker"]))
            .unwrap();

        let cleaned = DataProcessor::clean_table(&frame).unwrap().frame;
        assert!(cleaned.column(SOURCE_TOTAL_COL).is_err());
        let retailer = cleaned.column("Retailer").unwrap();
        assert_eq!(retailer.str().unwrap().get(0), Some("Foot Locker"));
    }
}
