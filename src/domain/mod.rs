//! # 도메인 계층
//!
//! - [`entities`]: MongoDB 영속 모델과 상태 전이
//! - [`dto`]: HTTP 요청/응답 본문
//! - [`models`]: 인증 주체, 접근 규칙, 토큰 클레임

pub mod dto;
pub mod entities;
pub mod models;
