//! 공통 유틸리티
//!
//! - [`codes`]: 일회용 코드/토큰 생성과 다이제스트
//! - [`phone`]: 전화번호 정규화
//! - [`i18n`]: 응답 메시지 다국어 처리
//! - [`string_utils`]: 문자열 정규화 헬퍼
//! - [`display_terminal`]: 부팅 로그 출력

pub mod codes;
pub mod display_terminal;
pub mod i18n;
pub mod phone;
pub mod string_utils;
