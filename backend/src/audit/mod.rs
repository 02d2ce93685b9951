//! Business-event logging for generated reports.
//!
//! Report generation must never wait on, or fail because of, the audit trail. The
//! service therefore only enqueues an `AuditEvent` on a bounded channel
//! (`AuditQueue::enqueue`) and returns. A single long-running task,
//! `start_audit_dispatcher`, drains the channel and hands every event to the
//! configured `AuditSink`, retrying failed writes before giving up and logging the
//! dropped event.
//!
//! - `queue`: the event type, the sender handle and the dispatcher loop.
//! - `sink`: the `AuditSink` trait and its log and SQLite implementations.

pub mod queue;
pub mod sink;

pub use queue::{start_audit_dispatcher, AuditEvent, AuditQueue};
pub use sink::{AuditSink, LogAuditSink, SqliteAuditSink};
