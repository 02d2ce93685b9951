//! # Report Descriptors
//!
//! The small vocabulary shared by every report: which domain is being reported on
//! (`ReportType`), how it is serialized (`ReportFormat`), the time window it covers
//! (`DateRange`) and the provenance block attached to every artifact (`ReportMetadata`).
//!
//! Both enums parse from the lowercase strings used on the wire. Parsing is the only
//! validation step that runs before data is fetched, so unknown values surface here
//! as `UnknownValue` errors.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The domain a report is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportType {
    Users,
    Courses,
    Payments,
    Enrollments,
    Analytics,
    System,
    Comprehensive,
}

impl ReportType {
    pub const ALL: [ReportType; 7] = [
        ReportType::Users,
        ReportType::Courses,
        ReportType::Payments,
        ReportType::Enrollments,
        ReportType::Analytics,
        ReportType::System,
        ReportType::Comprehensive,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReportType::Users => "users",
            ReportType::Courses => "courses",
            ReportType::Payments => "payments",
            ReportType::Enrollments => "enrollments",
            ReportType::Analytics => "analytics",
            ReportType::System => "system",
            ReportType::Comprehensive => "comprehensive",
        }
    }

    /// Human readable title used in document headers.
    pub fn title(&self) -> &'static str {
        match self {
            ReportType::Users => "Users Report",
            ReportType::Courses => "Courses Report",
            ReportType::Payments => "Payments Report",
            ReportType::Enrollments => "Enrollments Report",
            ReportType::Analytics => "Analytics Report",
            ReportType::System => "System Report",
            ReportType::Comprehensive => "Comprehensive Platform Report",
        }
    }
}

impl fmt::Display for ReportType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportType {
    type Err = UnknownValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ReportType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UnknownValue(s.to_string()))
    }
}

/// Output serialization of a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    Json,
    Csv,
    Xlsx,
    Pdf,
    Xml,
    Html,
}

impl ReportFormat {
    pub const ALL: [ReportFormat; 6] = [
        ReportFormat::Json,
        ReportFormat::Csv,
        ReportFormat::Xlsx,
        ReportFormat::Pdf,
        ReportFormat::Xml,
        ReportFormat::Html,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReportFormat::Json => "json",
            ReportFormat::Csv => "csv",
            ReportFormat::Xlsx => "xlsx",
            ReportFormat::Pdf => "pdf",
            ReportFormat::Xml => "xml",
            ReportFormat::Html => "html",
        }
    }

    /// File extension, without the leading dot.
    pub fn extension(&self) -> &'static str {
        self.as_str()
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ReportFormat::Json => "application/json",
            ReportFormat::Csv => "text/csv",
            ReportFormat::Xlsx => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
            ReportFormat::Pdf => "application/pdf",
            ReportFormat::Xml => "application/xml",
            ReportFormat::Html => "text/html",
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportFormat {
    type Err = UnknownValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ReportFormat::ALL
            .into_iter()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| UnknownValue(s.to_string()))
    }
}

/// Returned when a string does not name a known report type or format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownValue(pub String);

impl fmt::Display for UnknownValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown value '{}'", self.0)
    }
}

impl std::error::Error for UnknownValue {}

/// Inclusive time window. A missing bound leaves that side open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl DateRange {
    pub fn new(start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, ts: DateTime<Utc>) -> bool {
        self.start.is_none_or(|s| ts >= s) && self.end.is_none_or(|e| ts <= e)
    }

    /// Short description used in headers, e.g. `2024-01-01 to 2024-01-31`.
    pub fn describe(&self) -> String {
        let fmt = |d: Option<DateTime<Utc>>| {
            d.map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_else(|| "any".to_string())
        };
        match (self.start, self.end) {
            (None, None) => "All time".to_string(),
            (s, e) => format!("{} to {}", fmt(s), fmt(e)),
        }
    }
}

/// Provenance attached verbatim to every rendered artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportMetadata {
    pub generated_at: DateTime<Utc>,
    pub generated_by: String,
    pub report_type: ReportType,
    pub date_range: DateRange,
    pub format: ReportFormat,
    pub request_id: String,
}
