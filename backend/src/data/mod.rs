//! # Report Data Access
//!
//! The report pipeline reads the platform through a single seam, the
//! `ReportDataProvider` trait, so the service can be wired to the SQLite
//! database in production and to in-memory doubles in tests.
//!
//! - `aggregate`: range filtering and summary computation shared by all providers.
//! - `schema`: DDL of the platform and audit tables.
//! - `sqlite`: the rusqlite-backed provider.

pub mod aggregate;
#[cfg(test)]
pub mod memory;
pub mod schema;
pub mod sqlite;

use crate::errors::DataError;
use async_trait::async_trait;
use common::model::data::ReportData;
use common::model::report::{DateRange, ReportType};

pub use sqlite::SqliteDataProvider;

/// Supplies the aggregate of one report type for a time window.
#[async_trait]
pub trait ReportDataProvider: Send + Sync {
    async fn fetch(&self, report_type: ReportType, range: &DateRange)
        -> Result<ReportData, DataError>;
}
