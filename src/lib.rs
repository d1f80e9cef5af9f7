//! Descriptive and group-wise statistics over an insurance dataset.
//!
//! The flow is one way: [`records`] loads and coerces csv rows into a
//! [`records::Dataset`], [`stats`] aggregates it and [`report`] renders
//! the four report sections as plain text.

pub mod error;
pub mod records;
pub mod report;
pub mod stats;

pub use error::{AnalysisError, Result};
pub use records::{load_csv, Dataset};
pub use report::write_report;
