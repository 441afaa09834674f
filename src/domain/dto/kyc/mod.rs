//! KYC 제출/조회 DTO

pub mod request;
pub mod response;

pub use request::*;
pub use response::*;
