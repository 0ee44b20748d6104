//! Stats module - KPIs, grouped aggregates and the assembled report

mod calculator;
mod report;

pub use calculator::{Kpis, StatsError};
pub use report::{SalesReport, View, ViewData};

#[cfg(test)]
pub(crate) use report::example_report;
