//! # 애플리케이션 에러 처리
//!
//! 모든 계층이 공유하는 단일 에러 타입 [`AppError`] 를 정의합니다.
//! 핸들러는 `AppResult<T>` 를 그대로 반환하고, Actix-Web 이
//! [`ResponseError`](actix_web::ResponseError) 구현을 통해 표준 응답 봉투로 변환합니다.
//!
//! ## 응답 형식
//!
//! ```json
//! { "success": false, "message": "Validation failed", "data": null, "errors": ["..."] }
//! ```
//!
//! | 변형 | HTTP 상태 |
//! |------|-----------|
//! | `ValidationError`, `ValidationFailed` | 400 |
//! | `AuthenticationError` | 401 |
//! | `AuthorizationError` | 403 |
//! | `NotFound` | 404 |
//! | `ConflictError` | 409 |
//! | `RateLimited` | 429 |
//! | 그 외 | 500 |
//!
//! 5xx 응답의 `message` 는 일반화된 문구만 담고, 원인 문자열은 운영 환경이
//! 아닐 때에만 `error` 필드로 노출됩니다.

use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use serde_json::json;
use thiserror::Error;

use crate::config::Environment;

/// `validator` 가 스키마 규칙 오류를 담는 키
const SCHEMA_ERRORS_KEY: &str = "__all__";

/// 애플리케이션 전역 에러 타입
#[derive(Error, Debug)]
pub enum AppError {
    /// MongoDB 작업 실패
    #[error("Database error: {0}")]
    DatabaseError(String),

    /// Redis 작업 실패
    #[error("Redis error: {0}")]
    RedisError(String),

    /// 단일 메시지 입력 오류 (비즈니스 규칙 위반 포함)
    #[error("{0}")]
    ValidationError(String),

    /// 필드별 검증 실패 목록
    ///
    /// 응답에는 `"Validation failed"` 메시지와 함께 `errors` 배열로 노출됩니다.
    #[error("Validation failed: {}", .0.join(", "))]
    ValidationFailed(Vec<String>),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    ConflictError(String),

    /// 인증 실패 (토큰 누락, 만료, 자격 증명 불일치)
    #[error("{0}")]
    AuthenticationError(String),

    /// 인가 실패 (역할/권한 부족, 이메일 미인증, KYC 미승인)
    #[error("{0}")]
    AuthorizationError(String),

    /// 요청 빈도 제한 초과
    #[error("{0}")]
    RateLimited(String),

    /// 이메일, 이미지 호스팅 등 외부 API 호출 실패
    ///
    /// 내부 문자열은 클라이언트에 그대로 노출되므로 사용자용 문장으로 작성합니다.
    #[error("{0}")]
    ExternalServiceError(String),

    #[error("Internal server error: {0}")]
    InternalError(String),
}

impl AppError {
    /// 클라이언트에 노출되는 메시지
    pub fn public_message(&self) -> String {
        match self {
            AppError::ValidationFailed(_) => "Validation failed".to_string(),
            AppError::DatabaseError(_) | AppError::RedisError(_) | AppError::InternalError(_) => {
                "Internal server error".to_string()
            }
            other => other.to_string(),
        }
    }
}

impl actix_web::ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) | AppError::ValidationFailed(_) => StatusCode::BAD_REQUEST,
            AppError::AuthenticationError(_) => StatusCode::UNAUTHORIZED,
            AppError::AuthorizationError(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::ConflictError(_) => StatusCode::CONFLICT,
            AppError::RateLimited(_) => StatusCode::TOO_MANY_REQUESTS,
            AppError::DatabaseError(_)
            | AppError::RedisError(_)
            | AppError::ExternalServiceError(_)
            | AppError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();

        if status.is_server_error() {
            log::error!("요청 처리 실패: {}", self);
        }

        let mut body = json!({
            "success": false,
            "message": self.public_message(),
            "data": null,
        });

        if let AppError::ValidationFailed(errors) = self {
            body["errors"] = json!(errors);
        }

        if status.is_server_error() && !Environment::current().is_production() {
            body["error"] = json!(self.to_string());
        }

        HttpResponse::build(status).json(body)
    }
}

impl From<mongodb::error::Error> for AppError {
    fn from(e: mongodb::error::Error) -> Self {
        AppError::DatabaseError(e.to_string())
    }
}

impl From<redis::RedisError> for AppError {
    fn from(e: redis::RedisError) -> Self {
        AppError::RedisError(e.to_string())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::ValidationFailed(flatten_validation_errors(&errors))
    }
}

/// `validator` 결과를 필드 이름 순으로 펼칩니다.
///
/// 메시지가 지정되지 않은 규칙은 `"<field> is invalid"` 로 대체됩니다.
pub fn flatten_validation_errors(errors: &validator::ValidationErrors) -> Vec<String> {
    flatten_validation_errors_in_order(errors, &[])
}

/// `order` 에 적힌 필드 순서대로 펼칩니다.
///
/// 목록에 없는 필드는 이름 순으로 뒤에 오고, 스키마 규칙(`__all__`)은 맨 끝에 옵니다.
/// 같은 메시지는 한 번만 남깁니다.
pub fn flatten_validation_errors_in_order(
    errors: &validator::ValidationErrors,
    order: &[&str],
) -> Vec<String> {
    let rank = |field: &str| {
        if field == SCHEMA_ERRORS_KEY {
            usize::MAX
        } else {
            order.iter().position(|f| *f == field).unwrap_or(order.len())
        }
    };

    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|(a, _), (b, _)| rank(a.as_ref()).cmp(&rank(b.as_ref())).then_with(|| a.cmp(b)));

    let mut flattened: Vec<String> = Vec::new();
    for (field, field_errors) in fields {
        for error in field_errors.iter() {
            let message = match &error.message {
                Some(message) => message.to_string(),
                None => format!("{} is invalid", field),
            };
            if !flattened.contains(&message) {
                flattened.push(message);
            }
        }
    }
    flattened
}

/// 편의성을 위한 Result 타입 별칭
pub type AppResult<T> = Result<T, AppError>;

/// 외부 라이브러리 에러를 AppError로 변환하는 확장 trait
///
/// ```rust,ignore
/// let hash = bcrypt::hash(password, cost).context("Failed to hash password")?;
/// ```
pub trait ErrorContext<T> {
    fn context(self, msg: &str) -> AppResult<T>;

    fn with_context<F>(self, f: F) -> AppResult<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ErrorContext<T> for Result<T, E>
where
    E: std::fmt::Display,
{
    fn context(self, msg: &str) -> AppResult<T> {
        self.map_err(|e| AppError::InternalError(format!("{}: {}", msg, e)))
    }

    fn with_context<F>(self, f: F) -> AppResult<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| AppError::InternalError(format!("{}: {}", f(), e)))
    }
}
