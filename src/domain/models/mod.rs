//! 요청 범위 모델 (인증 주체, 접근 규칙, 토큰 클레임)

pub mod auth;
pub mod token;
