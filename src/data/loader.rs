//! CSV Data Loader Module
//! Reads the sales CSV with Polars and hands it to the processor for cleaning.

use super::processor::{CleanedTable, DataProcessor, ProcessorError};
use polars::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Data file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("Failed to load CSV: {0}")]
    CsvError(#[from] PolarsError),
    #[error("Failed to clean {}: {source}", .path.display())]
    Cleaning {
        path: PathBuf,
        #[source]
        source: ProcessorError,
    },
}

/// Handles CSV file loading with Polars.
pub struct DataLoader;

impl DataLoader {
    /// Read every column as text so cleaning sees the values exactly as written.
    pub fn read_raw(path: &Path) -> Result<DataFrame, LoaderError> {
        if !path.is_file() {
            return Err(LoaderError::NotFound(path.to_path_buf()));
        }

        let path_str = path.to_string_lossy().to_string();
        let df = LazyCsvReader::new(&path_str)
            .with_has_header(true)
            .with_infer_schema_length(Some(0))
            .finish()?
            .collect()?;

        Ok(df)
    }

    /// Load and clean the sales file in one pass.
    pub fn load_and_clean(path: &Path) -> Result<CleanedTable, LoaderError> {
        let raw = Self::read_raw(path)?;
        info!(
            path = %path.display(),
            rows = raw.height(),
            columns = raw.width(),
            "read sales CSV"
        );

        let cleaned = DataProcessor::clean_table(&raw).map_err(|source| LoaderError::Cleaning {
            path: path.to_path_buf(),
            source,
        })?;

        let report = cleaned.report;
        if report.price_nulls > 0 || report.profit_nulls > 0 {
            warn!(
                price_nulls = report.price_nulls,
                profit_nulls = report.profit_nulls,
                "unparseable currency values were set to null"
            );
        }
        Ok(cleaned)
    }
}
