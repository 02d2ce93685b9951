use crate::errors::RenderError;
use crate::reports::flatten::flatten;
use crate::reports::render::json::envelope;
use crate::reports::render::{FormatRenderer, RenderedArtifact};
use common::model::data::ReportData;
use common::model::report::{ReportFormat, ReportMetadata};
use log::info;

/// Comma separated rows of the flattened report.
///
/// An empty result set is not an error: the JSON envelope is returned instead of
/// an empty file, with the JSON MIME type and extension.
pub struct CsvRenderer;

impl FormatRenderer for CsvRenderer {
    fn format(&self) -> ReportFormat {
        ReportFormat::Csv
    }

    fn render(
        &self,
        data: &ReportData,
        metadata: &ReportMetadata,
    ) -> Result<RenderedArtifact, RenderError> {
        let rows = flatten(data);
        let Some(first) = rows.first() else {
            info!(
                "no {} rows to export as CSV, returning JSON instead",
                metadata.report_type
            );
            return Ok(RenderedArtifact::new(
                ReportFormat::Json,
                metadata,
                envelope(data, metadata)?,
            ));
        };

        let mut writer = ::csv::Writer::from_writer(Vec::new());
        writer.write_record(first.columns())?;
        for row in &rows {
            writer.write_record(row.values().map(|v| v.to_string()))?;
        }
        let body = writer
            .into_inner()
            .map_err(|e| RenderError::Io(e.into_error()))?;

        Ok(RenderedArtifact::new(ReportFormat::Csv, metadata, body))
    }
}
