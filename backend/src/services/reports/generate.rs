//! # Report Generation Endpoint
//!
//! `POST /reports/generate` accepts a `GenerateReportRequest` and answers with the
//! rendered report as a download:
//!
//! - `Content-Type`: MIME type of the produced format (JSON on the CSV fallback).
//! - `Content-Disposition`: `attachment; filename="<name>"`.
//! - `X-Request-Id`: the request id used in logs and the audit trail.
//!
//! Errors are returned as `ReportError`, which renders its own status and envelope.

use crate::context::RequestContext;
use crate::errors::ReportError;
use crate::reports::ReportService;
use actix_web::http::header;
use actix_web::{web, HttpRequest, HttpResponse};
use common::requests::GenerateReportRequest;

/// Actix web handler for `POST /reports/generate`.
pub async fn process(
    req: HttpRequest,
    service: web::Data<ReportService>,
    payload: web::Json<GenerateReportRequest>,
) -> Result<HttpResponse, ReportError> {
    let ctx = RequestContext::from_request(&req);
    let artifact = service.generate(&ctx, &payload).await?;

    Ok(HttpResponse::Ok()
        .content_type(artifact.mime_type)
        .insert_header((
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", artifact.filename),
        ))
        .insert_header(("X-Request-Id", ctx.request_id))
        .body(artifact.body))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::memory::MemoryDataProvider;
    use crate::data::aggregate::Dataset;
    use crate::services::reports::tests::{payments_only, service};
    use crate::services::reports::{configure_routes, json_config};
    use actix_web::http::StatusCode;
    use actix_web::{test, App};
    use serde_json::{json, Value};

    macro_rules! app {
        ($provider:expr) => {
            test::init_service(
                App::new()
                    .app_data(service($provider))
                    .app_data(json_config(1024 * 1024))
                    .service(configure_routes()),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn bogus_type_is_a_bad_request() {
        let app = app!(payments_only());
        let req = test::TestRequest::post()
            .uri("/reports/generate")
            .set_json(json!({"reportType": "bogus", "format": "csv"}))
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Invalid report type: bogus");
    }

    #[actix_web::test]
    async fn empty_format_is_a_bad_request() {
        let app = app!(payments_only());
        let req = test::TestRequest::post()
            .uri("/reports/generate")
            .set_json(json!({"reportType": "users", "format": ""}))
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Invalid format: ");
    }

    #[actix_web::test]
    async fn malformed_body_uses_the_envelope() {
        let app = app!(payments_only());
        let req = test::TestRequest::post()
            .uri("/reports/generate")
            .insert_header(header::ContentType::json())
            .set_payload("{not json")
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Invalid request body");
    }

    #[actix_web::test]
    async fn payments_csv_is_served_as_attachment() {
        let app = app!(payments_only());
        let req = test::TestRequest::post()
            .uri("/reports/generate")
            .insert_header(("X-User-Id", "admin-1"))
            .insert_header(("X-Request-Id", "req-99"))
            .set_json(json!({"reportType": "payments", "format": "csv", "filename": "march"}))
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let headers = resp.headers();
        assert_eq!(headers.get(header::CONTENT_TYPE).unwrap(), "text/csv");
        assert_eq!(
            headers.get(header::CONTENT_DISPOSITION).unwrap(),
            "attachment; filename=\"march.csv\""
        );
        assert_eq!(headers.get("X-Request-Id").unwrap(), "req-99");

        let body = test::read_body(resp).await;
        let text = std::str::from_utf8(&body).unwrap();
        assert!(text.starts_with("id,amount,currency,status,method"));
        assert_eq!(text.lines().count(), 4);
    }

    #[actix_web::test]
    async fn payments_pdf_is_served_as_attachment() {
        let app = app!(payments_only());
        let req = test::TestRequest::post()
            .uri("/reports/generate")
            .set_json(json!({"reportType": "payments", "format": "pdf"}))
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/pdf"
        );

        let body = test::read_body(resp).await;
        assert!(body.starts_with(b"%PDF-"));
    }

    #[actix_web::test]
    async fn empty_courses_csv_answers_json() {
        let app = app!(MemoryDataProvider::new(Dataset::default()));
        let req = test::TestRequest::post()
            .uri("/reports/generate")
            .set_json(json!({"reportType": "courses", "format": "csv"}))
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/json"
        );

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["courses"], json!([]));
    }

    #[actix_web::test]
    async fn provider_failure_is_a_server_error() {
        let app = app!(MemoryDataProvider::offline());
        let req = test::TestRequest::post()
            .uri("/reports/generate")
            .set_json(json!({"reportType": "users"}))
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Failed to fetch report data");
        assert_eq!(body["error"], "database offline");
    }
}
