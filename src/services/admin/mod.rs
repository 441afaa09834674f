//! 슈퍼 관리자용 레스토랑 관리 서비스 모듈

pub mod restaurant_service;

pub use restaurant_service::*;
