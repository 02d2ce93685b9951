use crate::audit::{AuditEvent, AuditQueue};
use crate::context::RequestContext;
use crate::data::ReportDataProvider;
use crate::errors::{RenderError, ReportError};
use crate::reports::registry::RendererRegistry;
use crate::reports::render::RenderedArtifact;
use crate::reports::request::{custom_filename, ReportRequest};
use chrono::Utc;
use common::model::report::{ReportFormat, ReportMetadata};
use common::requests::GenerateReportRequest;
use log::{error, info};
use std::sync::Arc;
use std::time::Instant;

/// Validates report requests, fetches the aggregate, renders it and records the
/// audit event. Shared read-only by every HTTP worker.
pub struct ReportService {
    provider: Arc<dyn ReportDataProvider>,
    renderers: Arc<RendererRegistry>,
    audit: AuditQueue,
}

impl ReportService {
    pub fn new(
        provider: Arc<dyn ReportDataProvider>,
        renderers: RendererRegistry,
        audit: AuditQueue,
    ) -> Self {
        Self {
            provider,
            renderers: Arc::new(renderers),
            audit,
        }
    }

    /// Formats that currently have a renderer.
    pub fn formats(&self) -> Vec<ReportFormat> {
        self.renderers.formats()
    }

    pub async fn generate(
        &self,
        ctx: &RequestContext,
        payload: &GenerateReportRequest,
    ) -> Result<RenderedArtifact, ReportError> {
        let request = ReportRequest::parse(payload)?;
        self.generate_validated(ctx, request).await
    }

    pub async fn generate_validated(
        &self,
        ctx: &RequestContext,
        request: ReportRequest,
    ) -> Result<RenderedArtifact, ReportError> {
        let started = Instant::now();
        let ReportRequest {
            report_type,
            format,
            date_range,
            filename,
        } = request;
        info!(
            "[{}] generating {} report as {} for {} ({})",
            ctx.request_id,
            report_type,
            format,
            ctx.actor,
            date_range.describe()
        );

        let render_failure = |source: RenderError| {
            error!(
                "[{}] rendering {} report as {} failed: {}",
                ctx.request_id, report_type, format, source
            );
            ReportError::RenderFailure { format, source }
        };

        let renderer = self.renderers.get(format).map_err(render_failure)?;

        let data = self
            .provider
            .fetch(report_type, &date_range)
            .await
            .map_err(|e| {
                error!(
                    "[{}] fetching {} data for {} export failed: {}",
                    ctx.request_id, report_type, format, e
                );
                ReportError::DataFetchFailure(e)
            })?;
        let records = data.record_count();

        let metadata = ReportMetadata {
            generated_at: Utc::now(),
            generated_by: ctx.actor.clone(),
            report_type,
            date_range,
            format,
            request_id: ctx.request_id.clone(),
        };

        let render_metadata = metadata.clone();
        let mut artifact = tokio::task::spawn_blocking(move || {
            renderer.render(&data, &render_metadata)
        })
        .await
        .map_err(RenderError::from)
        .and_then(|rendered| rendered)
        .map_err(render_failure)?;

        if let Some(name) = filename
            .as_deref()
            .and_then(|requested| custom_filename(requested, artifact.format.extension()))
        {
            artifact.filename = name;
        }

        self.audit.enqueue(AuditEvent {
            request_id: ctx.request_id.clone(),
            actor: ctx.actor.clone(),
            report_type,
            format: artifact.format,
            date_range,
            records,
            bytes: artifact.body.len(),
            occurred_at: metadata.generated_at,
        });

        info!(
            "[{}] {} report ready: {} ({} records, {} bytes) in {:?}",
            ctx.request_id,
            report_type,
            artifact.filename,
            records,
            artifact.body.len(),
            started.elapsed()
        );
        Ok(artifact)
    }
}
