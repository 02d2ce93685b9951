use crate::audit::queue::AuditEvent;
use crate::data::schema;
use crate::errors::DataError;
use async_trait::async_trait;
use log::info;
use rusqlite::{params, Connection};
use std::path::PathBuf;

/// Destination of audit events.
#[async_trait]
pub trait AuditSink: Send + Sync {
    async fn record(&self, event: &AuditEvent) -> Result<(), DataError>;
}

/// Writes events to the `audit` log target.
pub struct LogAuditSink;

#[async_trait]
impl AuditSink for LogAuditSink {
    async fn record(&self, event: &AuditEvent) -> Result<(), DataError> {
        info!(
            target: "audit",
            "{} actor={} request={} {}",
            event.action(),
            event.actor,
            event.request_id,
            event.details()
        );
        Ok(())
    }
}

/// Appends events to the `audit_logs` table of the platform database.
pub struct SqliteAuditSink {
    path: PathBuf,
}

impl SqliteAuditSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl AuditSink for SqliteAuditSink {
    async fn record(&self, event: &AuditEvent) -> Result<(), DataError> {
        let path = self.path.clone();
        let event = event.clone();
        tokio::task::spawn_blocking(move || -> Result<(), DataError> {
            let conn = Connection::open(path)?;
            conn.execute_batch(schema::AUDIT_LOGS)?;
            conn.execute(
                "INSERT INTO audit_logs (id, request_id, actor, action, details, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    uuid::Uuid::new_v4().to_string(),
                    event.request_id,
                    event.actor,
                    event.action(),
                    event.details(),
                    event.occurred_at,
                ],
            )?;
            Ok(())
        })
        .await?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::queue::tests::sample_event;

    #[actix_web::test]
    async fn sqlite_sink_appends_rows() {
        let db = tempfile::NamedTempFile::new().unwrap();
        let sink = SqliteAuditSink::new(db.path());

        sink.record(&sample_event("req-1")).await.unwrap();
        sink.record(&sample_event("req-2")).await.unwrap();

        let conn = Connection::open(db.path()).unwrap();
        let (count, details): (i64, String) = conn
            .query_row(
                "SELECT COUNT(*), MAX(details) FROM audit_logs WHERE action = 'REPORT_GENERATED'",
                [],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .unwrap();
        assert_eq!(count, 2);
        assert!(details.contains("type=payments format=csv"));
    }
}
