//! # 서비스 계층
//!
//! `#[service]` 매크로로 등록되는 싱글톤 비즈니스 로직입니다. 핸들러는
//! `XxxService::instance()` 로 꺼내 쓰고, 의존하는 리포지토리와 서비스는
//! 레지스트리가 생성 시점에 주입합니다.
//!
//! | 모듈 | 서비스 | 역할 |
//! |------|--------|------|
//! | [`auth`] | `AuthService`, `TokenService` | 가입, 인증, 로그인, 비밀번호, JWT |
//! | [`users`] | `InvitationService` | 직원 초대, 권한, 삭제 |
//! | [`kyc`] | `KycService` | KYC 제출과 심사, 레스토랑 생성 |
//! | [`admin`] | `RestaurantService` | 레스토랑 목록/상태, 시스템 통계 |
//! | [`ingredients`] | `IngredientService` | 재료 카탈로그와 이미지 |
//! | [`media`] | `ImageService` | Cloudinary 또는 로컬 이미지 저장 |
//! | [`notifications`] | `EmailService` | Resend/Brevo 트랜잭션 메일 |

pub mod admin;
pub mod auth;
pub mod ingredients;
pub mod kyc;
pub mod media;
pub mod notifications;
pub mod users;
