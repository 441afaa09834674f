//! KYC 신청과 심사 서비스 모듈

pub mod kyc_service;

pub use kyc_service::*;
