//! Server configuration.
//!
//! Values are layered: built-in defaults, then an optional `reports.toml` in the
//! working directory, then `REPORTS_*` environment variables (e.g. `REPORTS_PORT=9000`).

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

const CONFIG_FILE: &str = "reports.toml";
const ENV_PREFIX: &str = "REPORTS_";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditSinkKind {
    Log,
    Sqlite,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// SQLite database holding the platform tables.
    pub database: PathBuf,
    /// Directory with the TTF files used for PDF output.
    pub font_dir: PathBuf,
    pub font_family: String,
    pub audit_queue_capacity: usize,
    pub audit_sink: AuditSinkKind,
    /// Maximum accepted JSON body, in bytes.
    pub json_limit: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            database: PathBuf::from("educademy.sqlite"),
            font_dir: PathBuf::from("./fonts"),
            font_family: "LiberationSans".to_string(),
            audit_queue_capacity: 256,
            audit_sink: AuditSinkKind::Log,
            json_limit: 1024 * 1024,
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, figment::Error> {
        Self::figment(Figment::new()).extract()
    }

    fn figment(base: Figment) -> Figment {
        base.merge(Serialized::defaults(AppConfig::default()))
            .merge(Toml::file(CONFIG_FILE))
            .merge(Env::prefixed(ENV_PREFIX))
    }

    pub fn bind_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}
