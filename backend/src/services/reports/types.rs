use crate::reports::ReportService;
use actix_web::{web, HttpResponse, Responder};
use common::model::report::ReportType;
use serde_json::json;

/// Actix web handler for `GET /reports/types`.
pub async fn process(service: web::Data<ReportService>) -> impl Responder {
    let types: Vec<_> = ReportType::ALL
        .iter()
        .map(|t| json!({"id": t.as_str(), "title": t.title()}))
        .collect();
    let formats: Vec<_> = service
        .formats()
        .into_iter()
        .map(|f| json!({"id": f.as_str(), "mimeType": f.mime_type(), "extension": f.extension()}))
        .collect();

    HttpResponse::Ok().json(json!({
        "success": true,
        "reportTypes": types,
        "formats": formats,
    }))
}

#[cfg(test)]
mod tests {
    use crate::services::reports::configure_routes;
    use crate::services::reports::tests::{payments_only, service};
    use actix_web::{test, App};
    use serde_json::Value;

    #[actix_web::test]
    async fn lists_types_and_formats() {
        let app = test::init_service(
            App::new()
                .app_data(service(payments_only()))
                .service(configure_routes()),
        )
        .await;
        let req = test::TestRequest::get().uri("/reports/types").to_request();

        let body: Value = test::call_and_read_body_json(&app, req).await;

        let types = body["reportTypes"].as_array().unwrap();
        assert_eq!(types.len(), 7);
        assert_eq!(types[0]["id"], "users");
        let formats: Vec<&str> = body["formats"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|f| f["id"].as_str())
            .collect();
        assert_eq!(formats, vec!["json", "csv", "xlsx", "pdf", "xml", "html"]);
    }
}
