//! # Format Renderers
//!
//! One `FormatRenderer` per output format turns a `(ReportData, ReportMetadata)`
//! pair into a `RenderedArtifact`. Renderers are synchronous and stateless; the
//! service runs them on the blocking pool.
//!
//! - `json`: `{success, metadata, data}` envelope.
//! - `csv`: flattened rows, falling back to JSON when there are none.
//! - `xlsx`: summary sheet plus one table sheet per report type.
//! - `pdf`: title page and capped detail lines, rendered with genpdf.
//! - `xml`: fixed metadata/summary tags and `<item>` lists, rendered with quick-xml.
//! - `html`: standalone styled page with capped tables.

pub mod csv;
pub mod html;
pub mod json;
pub mod pdf;
pub mod xlsx;
pub mod xml;

use crate::errors::RenderError;
use chrono::{DateTime, Utc};
use common::model::data::ReportData;
use common::model::report::{ReportFormat, ReportMetadata, ReportType};

pub use self::csv::CsvRenderer;
pub use self::html::HtmlRenderer;
pub use self::json::JsonRenderer;
pub use self::pdf::PdfRenderer;
pub use self::xlsx::XlsxRenderer;
pub use self::xml::XmlRenderer;

/// A rendered report, ready to be sent to the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedArtifact {
    /// Format actually produced. Differs from the requested one on soft fallbacks.
    pub format: ReportFormat,
    pub mime_type: String,
    pub filename: String,
    pub body: Vec<u8>,
}

impl RenderedArtifact {
    pub fn new(format: ReportFormat, metadata: &ReportMetadata, body: Vec<u8>) -> Self {
        Self {
            format,
            mime_type: format.mime_type().to_string(),
            filename: default_filename(metadata.report_type, format, metadata.generated_at),
            body,
        }
    }
}

pub trait FormatRenderer: Send + Sync {
    fn format(&self) -> ReportFormat;

    fn render(
        &self,
        data: &ReportData,
        metadata: &ReportMetadata,
    ) -> Result<RenderedArtifact, RenderError>;
}

/// `<type>_report_<YYYY-MM-DD>.<ext>`
pub fn default_filename(
    report_type: ReportType,
    format: ReportFormat,
    generated_at: DateTime<Utc>,
) -> String {
    format!(
        "{}_report_{}.{}",
        report_type,
        generated_at.format("%Y-%m-%d"),
        format.extension()
    )
}

/// `totalRevenue` -> `Total Revenue`
pub fn humanize(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    for (i, ch) in key.chars().enumerate() {
        if i == 0 {
            out.extend(ch.to_uppercase());
        } else if ch.is_uppercase() {
            out.push(' ');
            out.push(ch);
        } else {
            out.push(ch);
        }
    }
    out
}

/// Section title of the detail table of a report type, if it has one.
pub fn table_title(report_type: ReportType) -> Option<&'static str> {
    match report_type {
        ReportType::Users => Some("Users"),
        ReportType::Courses => Some("Courses"),
        ReportType::Payments => Some("Payments"),
        ReportType::Enrollments => Some("Enrollments"),
        ReportType::Analytics => Some("Daily Activity"),
        ReportType::System => Some("System Logs"),
        ReportType::Comprehensive => None,
    }
}

/// Metadata as labelled display pairs, in a fixed order.
pub fn metadata_fields(metadata: &ReportMetadata) -> Vec<(&'static str, String)> {
    vec![
        ("Report Type", metadata.report_type.title().to_string()),
        (
            "Generated At",
            metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        ),
        ("Generated By", metadata.generated_by.clone()),
        ("Date Range", metadata.date_range.describe()),
        ("Format", metadata.format.as_str().to_uppercase()),
        ("Request ID", metadata.request_id.clone()),
    ]
}
