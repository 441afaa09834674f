//! JWT 세션 토큰 클레임

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// 사용자 ID (ObjectId hex)
    pub sub: String,
    /// 발급 시점의 역할. 권한 판단은 항상 저장소의 최신 값으로 합니다.
    pub role: String,
    pub iat: i64,
    pub exp: i64,
}
