mod audit;
mod config;
mod context;
mod data;
mod errors;
mod reports;
mod services;

use crate::audit::{AuditQueue, AuditSink, LogAuditSink, SqliteAuditSink};
use crate::config::{AppConfig, AuditSinkKind};
use crate::data::{schema, SqliteDataProvider};
use crate::reports::render::PdfRenderer;
use crate::reports::{RendererRegistry, ReportService};
use actix_web::{web, App, HttpServer};
use env_logger::Env;
use log::info;
use rusqlite::Connection;
use std::io;
use std::sync::Arc;

#[actix_web::main]
async fn main() -> io::Result<()> {
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let config = AppConfig::load().map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

    // Make sure the platform and audit tables exist before serving.
    Connection::open(&config.database)
        .and_then(|conn| schema::init(&conn))
        .map_err(|e| io::Error::other(format!("database {}: {}", config.database.display(), e)))?;

    let (audit, audit_rx) = AuditQueue::channel(config.audit_queue_capacity);
    let sink: Arc<dyn AuditSink> = match config.audit_sink {
        AuditSinkKind::Log => Arc::new(LogAuditSink),
        AuditSinkKind::Sqlite => Arc::new(SqliteAuditSink::new(&config.database)),
    };
    tokio::spawn(audit::start_audit_dispatcher(sink, audit_rx));

    let renderers = RendererRegistry::with_defaults(PdfRenderer::new(
        &config.font_dir,
        config.font_family.clone(),
    ));
    let service = web::Data::new(ReportService::new(
        Arc::new(SqliteDataProvider::new(&config.database)),
        renderers,
        audit,
    ));

    info!(
        "Report service running at {} (database {}, audit sink {:?})",
        config.bind_url(),
        config.database.display(),
        config.audit_sink
    );

    let json_limit = config.json_limit;
    HttpServer::new(move || {
        App::new()
            .app_data(services::reports::json_config(json_limit))
            .app_data(service.clone())
            .service(services::reports::configure_routes())
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
