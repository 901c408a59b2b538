// Export our modules for use in the binary and tests
pub mod aggregate;
pub mod api;
pub mod config;
pub mod domain;
pub mod error;
pub mod gapminder;
pub mod map;

pub use domain::{Gender, Metric, TimeKey};
pub use error::{DashboardError, Result};
