//! 공통 응답 형식

pub mod api_response;
pub mod pagination;

pub use api_response::*;
pub use pagination::*;
