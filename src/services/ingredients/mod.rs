//! 재료 카탈로그 서비스 모듈

pub mod ingredient_service;

pub use ingredient_service::*;
