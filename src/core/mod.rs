//! # Core
//!
//! 애플리케이션 전역에서 쓰는 두 가지 기반 기능입니다.
//!
//! ### [`registry`] - 싱글톤 레지스트리
//! - `#[service]` / `#[repository]` 매크로가 `inventory` 로 제출한 컴포넌트를 모아 초기화
//! - `Arc<T>` 필드 타입으로 의존성을 찾아 주입
//! - 인프라 객체(`Database`, `RedisClient`)는 [`ServiceLocator::set`] 으로 직접 등록
//!
//! ### [`errors`] - 통합 에러 처리
//! - [`AppError`]: 모든 계층이 공유하는 에러 타입
//! - `ResponseError` 구현으로 `{success: false, message, data: null, errors}` 봉투 응답
//! - `validator` 오류를 필드 메시지 목록으로 평탄화
//!
//! ## 사용 패턴
//!
//! ```rust,ignore
//! use crate::core::registry::ServiceLocator;
//!
//! ServiceLocator::set(database);
//! ServiceLocator::set(redis);
//! ServiceLocator::initialize_all().await?;
//!
//! let auth = AuthService::instance();
//! ```
//!
//! ```rust,ignore
//! use crate::core::errors::{AppError, AppResult};
//!
//! async fn find(&self, id: &str) -> AppResult<Ingredient> {
//!     self.repo
//!         .find_by_id(id)
//!         .await?
//!         .ok_or_else(|| AppError::NotFound("Ingredient not found".to_string()))
//! }
//! ```
//!
//! ## 트러블슈팅
//!
//! ```text
//! panic: Service not found: EmailService. Make sure it's registered...
//! ```
//! `#[service]` 매크로의 `name` 이 타입 이름 규칙과 맞는지, 또는 `ServiceLocator::set()` 으로
//! 등록했는지 확인합니다.

pub mod errors;
pub mod registry;

pub use errors::*;
pub use registry::*;
