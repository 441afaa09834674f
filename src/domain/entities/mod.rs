//! # 도메인 엔티티
//!
//! MongoDB 컬렉션과 1:1 로 대응하는 영속 모델입니다.
//!
//! | 엔티티 | 컬렉션 | 설명 |
//! |--------|--------|------|
//! | [`users::user::User`] | `users` | 계정, 역할, 권한, 일회용 코드 |
//! | [`restaurants::restaurant::Restaurant`] | `restaurants` | 테넌트 |
//! | [`kyc::kyc_submission::KycSubmission`] | `kyc_submissions` | 레스토랑 온보딩 신청 |
//! | [`ingredients::ingredient::Ingredient`] | `ingredients` | 테넌트 재료 카탈로그 |
//!
//! 코드 발급/검사와 KYC 심사 판단은 엔티티 메서드로 표현합니다. 코드와 토큰의
//! 소모(인증 완료, 비밀번호 재설정, 초대 수락)는 리포지토리의 조건부 갱신 한 번으로만 일어납니다.

pub mod ingredients;
pub mod kyc;
pub mod restaurants;
pub mod users;

use chrono::Duration;
use mongodb::bson::DateTime;

/// `now` 로부터 `duration` 이후의 시각
pub fn expires_after(now: DateTime, duration: Duration) -> DateTime {
    DateTime::from_millis(now.timestamp_millis() + duration.num_milliseconds())
}

/// 응답 직렬화를 위한 변환
pub fn to_chrono(value: DateTime) -> chrono::DateTime<chrono::Utc> {
    chrono::DateTime::from_timestamp_millis(value.timestamp_millis()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expires_after() {
        let now = DateTime::from_millis(1_000);
        assert_eq!(expires_after(now, Duration::minutes(10)).timestamp_millis(), 601_000);
    }

    #[test]
    fn test_to_chrono_keeps_millis() {
        let value = DateTime::from_millis(1_700_000_000_123);
        assert_eq!(to_chrono(value).timestamp_millis(), 1_700_000_000_123);
    }
}
