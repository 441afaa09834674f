//! 사용자 관리 DTO (프로필, 초대, 권한)

pub mod request;
pub mod response;

pub use request::*;
pub use response::*;
