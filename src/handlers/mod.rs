//! # HTTP Request Handlers Module
//!
//! HTTP 요청을 처리하는 핸들러 함수들입니다. 핸들러는 입력 검증, 서비스 호출,
//! 응답 봉투 작성만 담당하고 비즈니스 규칙은 서비스 계층에 둡니다.
//!
//! ```text
//! Client ─▶ Middlewares (CORS, Logger, Locale, Auth) ─▶ Handlers ─▶ Services ─▶ Repositories
//! ```
//!
//! ## 모듈 구성
//!
//! | 모듈 | 경로 |
//! |------|------|
//! | [`auth`] | `/api/auth/*` 가입, 인증, 로그인, 비밀번호 |
//! | [`users`] | `/api/users/*` 초대, 팀 관리 |
//! | [`kyc`] | `/api/kyc/*` KYC 제출, 상태 |
//! | [`admin`] | `/api/admin/*` KYC 심사, 레스토랑 관리, 통계 |
//! | [`ingredients`] | `/api/ingredients/*` 재료, 이미지 |
//! | [`system`] | `/`, `/health`, `/api-docs`, 404 |
//!
//! ## 입력 검증 순서
//!
//! 요청 본문은 서비스 인스턴스를 가져오기 전에 [`validate_request`] 로 검증합니다.
//! 검증 실패는 저장소를 건드리지 않고 400 `Validation failed` 로 끝납니다.
//!
//! ```rust,ignore
//! #[post("/login")]
//! pub async fn login(payload: web::Json<LoginRequest>, locale: Locale) -> AppResult<HttpResponse> {
//!     let request = payload.into_inner();
//!     validate_request(&request)?;
//!
//!     let session = AuthService::instance().login(request).await?;
//!     Ok(ApiResponse::success(translate(locale, MessageKey::LoginSuccess), session).ok())
//! }
//! ```

pub mod admin;
pub mod auth;
pub mod ingredients;
pub mod kyc;
pub mod system;
pub mod users;

use actix_web::error::JsonPayloadError;
use actix_web::{web, HttpRequest};
use validator::Validate;

use crate::config::ServerConfig;
use crate::core::errors::{flatten_validation_errors_in_order, AppError, AppResult};
use crate::domain::dto::validation::FieldOrder;

pub const INVALID_REQUEST_BODY: &str = "Invalid request body";

/// 검증 메시지는 `T::FIELDS` 순서로, 스키마 규칙 메시지는 마지막에 옵니다.
pub fn validate_request<T: Validate + FieldOrder>(request: &T) -> AppResult<()> {
    request
        .validate()
        .map_err(|errors| AppError::ValidationFailed(flatten_validation_errors_in_order(&errors, T::FIELDS)))
}

/// JSON 본문 크기 제한과 파싱 실패 응답
///
/// 파싱 실패도 표준 봉투(400 `Invalid request body`)로 응답합니다.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(ServerConfig::json_limit_bytes())
        .error_handler(|err: JsonPayloadError, req: &HttpRequest| {
            log::warn!("JSON 본문 파싱 실패 {}: {}", req.path(), err);
            AppError::ValidationError(INVALID_REQUEST_BODY.to_string()).into()
        })
}

/// 로컬 업로드 이미지 URL 의 기준 주소
///
/// `PUBLIC_BASE_URL` 이 있으면 그 값을, 없으면 요청의 scheme/host 를 사용합니다.
pub(crate) fn request_base_url(req: &HttpRequest) -> String {
    ServerConfig::public_base_url().unwrap_or_else(|| {
        let info = req.connection_info();
        format!("{}://{}", info.scheme(), info.host())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn test_request_base_url_from_connection() {
        let req = TestRequest::default()
            .insert_header(("host", "api.djulah.test"))
            .to_http_request();

        if ServerConfig::public_base_url().is_none() {
            assert_eq!(request_base_url(&req), "http://api.djulah.test");
        }
    }
}
