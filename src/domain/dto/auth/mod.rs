//! 인증 흐름 DTO (가입, 이메일 인증, 로그인, 비밀번호 재설정/변경)

pub mod request;
pub mod response;

pub use request::*;
pub use response::*;
