//! # 데이터 전송 객체 (DTO)
//!
//! HTTP 요청/응답 본문 구조체입니다. 요청 DTO 는 `validator` 로 검증하고
//! `utoipa` 스키마를 생성합니다. 응답 DTO 는 엔티티에서 변환되며
//! 비밀번호 해시와 일회용 비밀값을 절대 포함하지 않습니다.
//!
//! JSON 필드 이름은 camelCase 입니다.

pub mod admin;
pub mod auth;
pub mod common;
pub mod ingredients;
pub mod kyc;
pub mod users;
pub mod validation;
