use serde::{Deserialize, Serialize};

/// Request payload for the report generation endpoint.
///
/// Values are kept as raw strings so that unknown report types and formats can be
/// rejected with a precise message instead of a generic deserialization error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateReportRequest {
    pub report_type: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    /// Defaults to `json` when absent.
    pub format: Option<String>,
    pub filename: Option<String>,
}

impl GenerateReportRequest {
    pub fn new(report_type: &str, format: &str) -> Self {
        Self {
            report_type: Some(report_type.to_string()),
            format: Some(format.to_string()),
            ..Self::default()
        }
    }
}
