//! Djulah 레스토랑 관리 백엔드
//!
//! 여러 레스토랑(테넌트)을 위한 인증과 관리 API 서버입니다.
//! 이메일 인증 기반 가입, 역할/권한 기반 접근 제어, 직원 초대,
//! KYC 심사를 통한 레스토랑 개설, 재료 이미지 관리를 제공합니다.
//!
//! # Features
//!
//! - **계정**: 가입, 6자리 이메일 인증 코드, 로그인, 비밀번호 재설정/변경
//! - **역할**: `super_admin`, `restaurant_admin`, `restaurant_staff` 와 세분화된 권한
//! - **초대**: 7일 유효 토큰, 레스토랑별 사용자 수 한도
//! - **KYC**: 제출, 심사, 승인 시 레스토랑 생성 및 신청자 관리자 지정
//! - **재료 이미지**: Cloudinary 또는 로컬 디스크 저장
//! - **응답 형식**: 모든 API 는 `{success, message, data, errors}` 봉투로 응답
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │   HTTP Routes   │ ← 스코프별 접근 규칙
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │  Middlewares    │ ← 인증, 로케일, 요청 제한
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │    Handlers     │ ← 요청 검증 / 응답 봉투
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │    Services     │ ← 비즈니스 로직, 이메일, 이미지 저장
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │  Repositories   │ ← 데이터 액세스
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │ MongoDB + Redis │ ← 저장소
//! └─────────────────┘
//! ```
//!
//! # Examples
//!
//! ```rust,ignore
//! use restaurant_auth_backend::services::auth::AuthService;
//!
//! let session = AuthService::instance().login(request).await?;
//! println!("{}", session.token);
//! ```

pub mod core;
pub mod config;
pub mod db;
pub mod caching;
pub mod docs;
pub mod domain;
pub mod repositories;
pub mod services;
pub mod utils;
pub mod routes;
pub mod handlers;
pub mod middlewares;
