//! 레스토랑 직원 관리 서비스 모듈

pub mod invitation_service;

pub use invitation_service::*;
