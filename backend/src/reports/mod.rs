//! # Report Generation
//!
//! The pipeline behind `POST /reports/generate`:
//!
//! 1.  `request` validates the raw payload into a `ReportRequest`.
//! 2.  `service` fetches the aggregate once through the `ReportDataProvider`,
//!     builds the `ReportMetadata` and renders on the blocking pool.
//! 3.  `registry` maps each `ReportFormat` to its `FormatRenderer`.
//! 4.  `flatten` projects records onto fixed columns for the tabular formats.

pub mod flatten;
pub mod registry;
pub mod render;
pub mod request;
pub mod service;

pub use registry::RendererRegistry;
pub use service::ReportService;
