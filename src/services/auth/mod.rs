//! 인증 서비스 모듈
//!
//! - [`TokenService`]: JWT 세션 토큰 발급/검증
//! - [`AuthService`]: 가입, 이메일 인증, 로그인, 비밀번호 재설정/변경
//! - [`password`]: bcrypt 해시 헬퍼

pub mod auth_service;
pub mod password;
pub mod token_service;

pub use auth_service::*;
pub use token_service::*;
