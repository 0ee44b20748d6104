//! Config module - Dashboard settings

pub mod settings;

pub use settings::DashboardSettings;
