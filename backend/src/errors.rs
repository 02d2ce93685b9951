//! # Report Errors
//!
//! Three layers of failures meet at the service boundary:
//!
//! - `DataError`: the data-access layer could not produce the aggregate.
//! - `RenderError`: a format renderer could not serialize the aggregate.
//! - `ReportError`: what callers see. Validation variants map to `400 Bad Request`,
//!   fetch and render failures to `500 Internal Server Error`, always with the
//!   `{success: false, message, error}` envelope.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use common::model::report::ReportFormat;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DataError {
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("query task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("{0}")]
    Unavailable(String),
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV serialization failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("workbook generation failed: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("PDF generation failed: {0}")]
    Pdf(#[from] genpdf::error::Error),

    #[error("XML serialization failed: {0}")]
    Xml(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("no renderer registered for format '{0}'")]
    MissingRenderer(ReportFormat),

    #[error("renderer task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Invalid report type: {0}")]
    InvalidReportType(String),

    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    #[error("Invalid date range: {0}")]
    InvalidDateRange(String),

    #[error("Failed to fetch report data")]
    DataFetchFailure(#[source] DataError),

    #[error("Failed to render {format} report")]
    RenderFailure {
        format: ReportFormat,
        #[source]
        source: RenderError,
    },
}

impl ReportError {
    /// Root cause text exposed in the `error` field of the envelope.
    pub fn detail(&self) -> String {
        match self {
            ReportError::InvalidReportType(_)
            | ReportError::InvalidFormat(_)
            | ReportError::InvalidDateRange(_) => self.to_string(),
            ReportError::DataFetchFailure(e) => e.to_string(),
            ReportError::RenderFailure { source, .. } => source.to_string(),
        }
    }

    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            ReportError::InvalidReportType(_)
                | ReportError::InvalidFormat(_)
                | ReportError::InvalidDateRange(_)
        )
    }
}

impl ResponseError for ReportError {
    fn status_code(&self) -> StatusCode {
        if self.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "success": false,
            "message": self.to_string(),
            "error": self.detail(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_are_client_errors() {
        let err = ReportError::InvalidReportType("bogus".to_string());
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "Invalid report type: bogus");
    }

    #[test]
    fn render_failure_exposes_cause() {
        let err = ReportError::RenderFailure {
            format: ReportFormat::Pdf,
            source: RenderError::MissingRenderer(ReportFormat::Pdf),
        };
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "Failed to render pdf report");
        assert_eq!(err.detail(), "no renderer registered for format 'pdf'");
    }
}
