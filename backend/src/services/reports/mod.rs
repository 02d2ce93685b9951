//! # Report Service Module
//!
//! HTTP surface of the report pipeline, mounted under `/reports`. Identity comes
//! from the `X-User-Id` and `X-Request-Id` headers set by the gateway in front of
//! this service; see `RequestContext`.

mod generate;
mod types;

use actix_web::error::InternalError;
use actix_web::web::{self, get, post, scope};
use actix_web::{HttpResponse, Scope};
use serde_json::json;

/// The base path for all report endpoints.
const API_PATH: &str = "/reports";

/// Configures and returns the Actix `Scope` for the report routes.
///
/// # Registered Routes:
///
/// *   **`POST /generate`**:
///     - **Handler**: `generate::process`
///     - **Description**: Validates a `GenerateReportRequest`, renders the report and
///       returns it as an attachment. Invalid input answers `400`, fetch or render
///       failures `500`, both with the `{success, message, error}` envelope.
///
/// *   **`GET /types`**:
///     - **Handler**: `types::process`
///     - **Description**: Lists the report types and the formats with a renderer.
pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("/generate", post().to(generate::process))
        .route("/types", get().to(types::process))
}

/// JSON extractor settings: body size limit and malformed payloads answered with
/// the same envelope as validation errors.
pub fn json_config(limit: usize) -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(limit)
        .error_handler(|err, _req| {
            let body = json!({
                "success": false,
                "message": "Invalid request body",
                "error": err.to_string(),
            });
            InternalError::from_response(err, HttpResponse::BadRequest().json(body)).into()
        })
}
