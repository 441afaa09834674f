//! 미들웨어 모듈
//!
//! | 미들웨어 | 역할 |
//! |----------|------|
//! | [`AuthMiddleware`] | Bearer 토큰 검증, 사용자 조회, 역할/권한/KYC 확인 |
//! | [`negotiate_locale`] | `Accept-Language` 협상, `Content-Language` 응답 헤더 |
//! | [`rate_limit_envelope`] | Governor 의 429 를 표준 에러 봉투로 변환 |
//!
//! ## 특정 스코프에만 적용
//! ```rust,ignore
//! use actix_web::web;
//!
//! web::scope("/api/ingredients")
//!     .wrap(AuthMiddleware::ingredient_manager())
//!     .service(handlers::ingredients::list_ingredients)
//! ```
//!
//! `negotiate_locale`, `rate_limit_envelope` 는 `actix_web::middleware::from_fn` 으로 감쌉니다.

pub mod auth_middleware;
mod auth_inner;
pub mod locale;
pub mod rate_limit;

pub use auth_inner::{ACCESS_DENIED, EMAIL_NOT_VERIFIED, KYC_REQUIRED, NOT_AUTHORIZED};
pub use auth_middleware::AuthMiddleware;
pub use locale::negotiate_locale;
pub use rate_limit::rate_limit_envelope;
