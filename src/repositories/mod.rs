//! # 리포지토리 계층
//!
//! `#[repository]` 매크로로 등록되는 MongoDB 접근 객체들입니다.
//! 각 리포지토리는 `Database` 와 `RedisClient` 를 주입받으며, 단건 조회 캐시와
//! 무효화는 매크로가 생성하는 `cache_key` / `invalidate_cache` 를 사용합니다.
//!
//! 상태 전이를 동반하는 갱신(코드 소모, 초대 수락, KYC 심사)은 모두
//! "조건 필터 + `find_one_and_update`" 한 번으로 수행해 동시 요청 중 하나만 성공하게 합니다.

pub mod ingredients;
pub mod kyc;
pub mod restaurants;
pub mod users;

use mongodb::bson::oid::ObjectId;
use mongodb::error::{ErrorKind, WriteFailure};

use crate::core::errors::AppError;

/// 유니크 인덱스 위반 (E11000)
pub(crate) fn is_duplicate_key(error: &mongodb::error::Error) -> bool {
    matches!(
        error.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(write_error)) if write_error.code == 11000
    )
}

/// 경로 파라미터 ID 파싱. 형식이 틀리면 404 로 취급합니다.
pub(crate) fn parse_object_id(id: &str, not_found_message: &str) -> Result<ObjectId, AppError> {
    ObjectId::parse_str(id.trim()).map_err(|_| AppError::NotFound(not_found_message.to_string()))
}

pub(crate) fn db_error(e: mongodb::error::Error) -> AppError {
    AppError::DatabaseError(e.to_string())
}
