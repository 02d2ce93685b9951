use actix_web::HttpRequest;
use uuid::Uuid;

const USER_HEADER: &str = "X-User-Id";
const REQUEST_ID_HEADER: &str = "X-Request-Id";
const ANONYMOUS: &str = "anonymous";

/// Per-request identity threaded explicitly through the report pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    pub request_id: String,
    pub actor: String,
}

impl RequestContext {
    /// Builds the context from the `X-User-Id` / `X-Request-Id` headers set by the
    /// authentication layer in front of this service.
    pub fn from_request(req: &HttpRequest) -> Self {
        let header = |name: &str| {
            req.headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };

        Self {
            request_id: header(REQUEST_ID_HEADER).unwrap_or_else(|| Uuid::new_v4().to_string()),
            actor: header(USER_HEADER).unwrap_or_else(|| ANONYMOUS.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn reads_identity_headers() {
        let req = TestRequest::default()
            .insert_header((USER_HEADER, "admin-1"))
            .insert_header((REQUEST_ID_HEADER, "req-42"))
            .to_http_request();
        let ctx = RequestContext::from_request(&req);
        assert_eq!(ctx.actor, "admin-1");
        assert_eq!(ctx.request_id, "req-42");
    }

    #[test]
    fn falls_back_to_anonymous() {
        let req = TestRequest::default().to_http_request();
        let ctx = RequestContext::from_request(&req);
        assert_eq!(ctx.actor, ANONYMOUS);
        assert!(Uuid::parse_str(&ctx.request_id).is_ok());
    }
}
