use crate::audit::sink::AuditSink;
use chrono::{DateTime, Utc};
use common::model::report::{DateRange, ReportFormat, ReportType};
use log::{error, warn};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

/// Attempts made for each event before it is dropped.
const MAX_ATTEMPTS: u32 = 3;
const RETRY_BASE_DELAY: Duration = Duration::from_millis(100);

/// Summary of one successfully generated report.
#[derive(Debug, Clone, PartialEq)]
pub struct AuditEvent {
    pub request_id: String,
    pub actor: String,
    pub report_type: ReportType,
    pub format: ReportFormat,
    pub date_range: DateRange,
    pub records: usize,
    pub bytes: usize,
    pub occurred_at: DateTime<Utc>,
}

impl AuditEvent {
    pub fn action(&self) -> &'static str {
        "REPORT_GENERATED"
    }

    pub fn details(&self) -> String {
        format!(
            "type={} format={} range={} records={} bytes={}",
            self.report_type,
            self.format,
            self.date_range.describe(),
            self.records,
            self.bytes
        )
    }
}

/// Sending half of the audit channel, cloned into every service instance.
#[derive(Clone)]
pub struct AuditQueue {
    tx: mpsc::Sender<AuditEvent>,
}

impl AuditQueue {
    /// Creates the queue and the receiver to be handed to `start_audit_dispatcher`.
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<AuditEvent>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (Self { tx }, rx)
    }

    /// Enqueues without waiting. A full or closed queue is logged and the event dropped.
    pub fn enqueue(&self, event: AuditEvent) {
        match self.tx.try_send(event) {
            Ok(()) => {}
            Err(TrySendError::Full(event)) => {
                warn!(
                    "audit queue full, dropping event for request {}",
                    event.request_id
                );
            }
            Err(TrySendError::Closed(event)) => {
                warn!(
                    "audit dispatcher stopped, dropping event for request {}",
                    event.request_id
                );
            }
        }
    }
}

/// Drains the audit channel until every `AuditQueue` has been dropped.
///
/// Each event is delivered to `sink` with up to `MAX_ATTEMPTS` tries and a linear
/// back-off between them. Events that still fail are logged and discarded.
pub async fn start_audit_dispatcher(sink: Arc<dyn AuditSink>, mut rx: mpsc::Receiver<AuditEvent>) {
    while let Some(event) = rx.recv().await {
        deliver(sink.as_ref(), &event).await;
    }
}

async fn deliver(sink: &dyn AuditSink, event: &AuditEvent) {
    for attempt in 1..=MAX_ATTEMPTS {
        match sink.record(event).await {
            Ok(()) => return,
            Err(e) if attempt < MAX_ATTEMPTS => {
                warn!(
                    "audit write failed (attempt {}/{}) for request {}: {}",
                    attempt, MAX_ATTEMPTS, event.request_id, e
                );
                tokio::time::sleep(RETRY_BASE_DELAY * attempt).await;
            }
            Err(e) => {
                error!(
                    "audit event dropped for request {} after {} attempts: {}",
                    event.request_id, MAX_ATTEMPTS, e
                );
            }
        }
    }
}
