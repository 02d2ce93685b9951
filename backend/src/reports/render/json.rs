use crate::errors::RenderError;
use crate::reports::render::{FormatRenderer, RenderedArtifact};
use common::model::data::ReportData;
use common::model::report::{ReportFormat, ReportMetadata};
use serde::Serialize;

#[derive(Serialize)]
struct Envelope<'a> {
    success: bool,
    metadata: &'a ReportMetadata,
    data: &'a ReportData,
}

/// The `{success, metadata, data}` document shared by the JSON renderer and the
/// CSV fallback.
pub fn envelope(data: &ReportData, metadata: &ReportMetadata) -> Result<Vec<u8>, RenderError> {
    Ok(serde_json::to_vec_pretty(&Envelope {
        success: true,
        metadata,
        data,
    })?)
}

pub struct JsonRenderer;

impl FormatRenderer for JsonRenderer {
    fn format(&self) -> ReportFormat {
        ReportFormat::Json
    }

    fn render(
        &self,
        data: &ReportData,
        metadata: &ReportMetadata,
    ) -> Result<RenderedArtifact, RenderError> {
        Ok(RenderedArtifact::new(
            ReportFormat::Json,
            metadata,
            envelope(data, metadata)?,
        ))
    }
}
