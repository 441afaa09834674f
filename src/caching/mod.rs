//! 캐싱 계층
//!
//! Redis 기반 캐시. 리포지토리의 단건 조회 캐시와
//! 인증 코드 재발송 쿨다운 플래그에 사용됩니다.
//!
//! ```rust,ignore
//! use crate::caching::redis::RedisClient;
//!
//! let cache = RedisClient::new().await?;
//! cache.set_with_expiry("user:64f...", &user, 600).await?;
//! let first = cache.set_if_absent("verification:resend:a@b.c", "1", 60).await?;
//! ```

pub mod redis;
