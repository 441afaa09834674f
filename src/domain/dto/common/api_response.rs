//! # 표준 응답 봉투
//!
//! 모든 성공 응답은 `{ success: true, message, data }` 형태로 나갑니다.
//! 실패 응답은 [`AppError`](crate::core::errors::AppError) 가 같은 형태로 만듭니다.

use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub message: String,
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
        }
    }

    pub fn into_response(self, status: StatusCode) -> HttpResponse {
        HttpResponse::build(status).json(self)
    }

    pub fn ok(self) -> HttpResponse {
        self.into_response(StatusCode::OK)
    }

    pub fn created(self) -> HttpResponse {
        self.into_response(StatusCode::CREATED)
    }
}

impl ApiResponse<()> {
    /// 데이터 없이 메시지만 반환 (`data: null`)
    pub fn message_only(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: None,
        }
    }
}
