//! 슈퍼 관리자 DTO (KYC 심사, 레스토랑 관리, 통계)

pub mod request;
pub mod response;

pub use request::*;
pub use response::*;
