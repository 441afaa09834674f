//! 트랜잭션 이메일 발송

pub mod email_service;
pub mod templates;

pub use email_service::*;
