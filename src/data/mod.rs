//! Data module - CSV loading and cleaning

mod loader;
pub mod processor;

pub use loader::{DataLoader, LoaderError};
pub use processor::{CleanedTable, CleaningReport};
