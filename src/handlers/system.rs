//! 시스템 엔드포인트 (헬스체크, 환영 메시지, API 문서, 404)

use std::time::Instant;

use actix_web::{get, HttpRequest, HttpResponse};
use once_cell::sync::Lazy;
use serde_json::json;
use utoipa::OpenApi;

use crate::config::Environment;
use crate::docs::ApiDoc;

pub const SERVICE_NAME: &str = "restaurant-auth-backend";
pub const ROUTE_NOT_FOUND: &str = "Route not found";

static STARTED_AT: Lazy<Instant> = Lazy::new(Instant::now);

/// 부팅 시각을 고정합니다. `main` 에서 서버 시작 전에 호출합니다.
pub fn mark_started() {
    Lazy::force(&STARTED_AT);
}

/// 로드밸런서/모니터링용 헬스체크
///
/// ```json
/// { "status": "OK", "service": "restaurant-auth-backend", "timestamp": "...", "uptime": 42.1 }
/// ```
#[utoipa::path(get, path = "/health", tag = "System", responses((status = 200, description = "Service is up")))]
#[get("/health")]
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "status": "OK",
        "service": SERVICE_NAME,
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "uptime": STARTED_AT.elapsed().as_secs_f64(),
    }))
}

#[utoipa::path(get, path = "/", tag = "System", responses((status = 200, description = "Welcome message")))]
#[get("/")]
pub async fn welcome() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "message": "Welcome to the Djulah restaurant management API",
        "version": env!("CARGO_PKG_VERSION"),
        "environment": Environment::current().as_str(),
        "docs": "/api-docs",
        "health": "/health",
    }))
}

#[get("/api-docs/openapi.json")]
pub async fn openapi_json() -> HttpResponse {
    HttpResponse::Ok().json(ApiDoc::openapi())
}

/// Swagger UI 페이지. 스크립트는 CDN 에서 받고 스펙은 `/api-docs/openapi.json` 을 읽습니다.
#[get("/api-docs")]
pub async fn api_docs_page() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(SWAGGER_PAGE)
}

const SWAGGER_PAGE: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8" />
  <title>Djulah API Docs</title>
  <link rel="stylesheet" href="https://unpkg.com/swagger-ui-dist@5/swagger-ui.css" />
</head>
<body>
  <div id="swagger-ui"></div>
  <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-bundle.js" crossorigin></script>
  <script>
    window.onload = () => {
      window.ui = SwaggerUIBundle({ url: "/api-docs/openapi.json", dom_id: "#swagger-ui" });
    };
  </script>
</body>
</html>
"##;

/// 등록되지 않은 경로 (`App::default_service`)
pub async fn not_found(req: HttpRequest) -> HttpResponse {
    HttpResponse::NotFound().json(json!({
        "success": false,
        "message": ROUTE_NOT_FOUND,
        "data": null,
        "path": req.path(),
        "method": req.method().as_str(),
    }))
}
