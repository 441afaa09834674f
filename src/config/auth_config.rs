//! 인증 관련 설정
//!
//! JWT 서명 키와 만료, 일회용 코드/토큰의 유효 기간, 인증 엔드포인트 요청 제한을 다룹니다.

use std::env;

use once_cell::sync::OnceCell;

use super::{env_or, parse_flag, Environment};

/// 운영 환경이 아닐 때 `JWT_SECRET` 이 없으면 쓰는 키
const DEVELOPMENT_JWT_SECRET: &str = "development-only-restaurant-auth-secret";

static JWT_SECRET: OnceCell<String> = OnceCell::new();

pub struct JwtConfig;

impl JwtConfig {
    /// 서명 키. 처음 호출될 때 한 번만 결정됩니다.
    ///
    /// 서버는 부팅 시 이 함수를 먼저 호출해 운영 환경의 키 누락을 기동 실패로 만듭니다.
    ///
    /// # Errors
    ///
    /// * 운영 환경에서 `JWT_SECRET` 이 없거나 비어 있을 때
    pub fn secret() -> Result<&'static str, String> {
        JWT_SECRET
            .get_or_try_init(|| {
                Self::resolve_secret(&Environment::current(), env::var("JWT_SECRET").ok())
            })
            .map(String::as_str)
    }

    pub fn resolve_secret(env: &Environment, configured: Option<String>) -> Result<String, String> {
        match configured.filter(|secret| !secret.trim().is_empty()) {
            Some(secret) => Ok(secret),
            None if env.is_production() => Err("JWT_SECRET must be set in production".to_string()),
            None => {
                log::warn!("JWT_SECRET 미설정: 개발용 키를 사용합니다");
                Ok(DEVELOPMENT_JWT_SECRET.to_string())
            }
        }
    }

    /// 세션 토큰 유효 시간. 기본 7일
    pub fn expiration_hours() -> i64 {
        env_or("JWT_EXPIRATION_HOURS", 24 * 7)
    }
}

/// 일회용 코드와 초대 토큰 정책
pub struct VerificationConfig;

impl VerificationConfig {
    /// 이메일 인증 코드 유효 시간 (분)
    pub const CODE_TTL_MINUTES: i64 = 10;

    /// 비밀번호 재설정 코드 유효 시간 (분)
    pub const RESET_CODE_TTL_MINUTES: i64 = 10;

    /// 인증 코드 재발송 최소 간격 (초)
    pub const RESEND_COOLDOWN_SECONDS: u64 = 60;

    /// 초대 토큰 유효 기간 (일)
    pub const INVITATION_TTL_DAYS: i64 = 7;

    /// 로그인/보호 리소스 접근에 이메일 인증을 요구하는지 여부
    ///
    /// `REQUIRE_EMAIL_VERIFICATION` 으로 명시하지 않으면 운영 환경에서만 요구합니다.
    pub fn email_verification_required() -> bool {
        Self::resolve_verification_requirement(
            &Environment::current(),
            env::var("REQUIRE_EMAIL_VERIFICATION").ok().as_deref(),
        )
    }

    pub fn resolve_verification_requirement(env: &Environment, flag: Option<&str>) -> bool {
        flag.and_then(parse_flag).unwrap_or_else(|| env.is_production())
    }
}

/// `/api/auth` 요청 제한 (IP 기준)
pub struct RateLimitConfig;

impl RateLimitConfig {
    /// 윈도우 당 허용 요청 수. 기본 50
    pub fn requests_per_window() -> u32 {
        env_or("AUTH_RATE_LIMIT_PER_WINDOW", 50u32).max(1)
    }

    /// 윈도우 길이 (초). 기본 15분
    pub fn window_seconds() -> u64 {
        env_or("AUTH_RATE_LIMIT_WINDOW_SECS", 15 * 60u64).max(1)
    }

    /// 토큰 버킷 보충 간격 (밀리초)
    ///
    /// 버스트 = 윈도우 당 요청 수, 보충 간격 = 윈도우 / 요청 수.
    pub fn replenish_interval_ms(requests: u32, window_seconds: u64) -> u64 {
        ((window_seconds * 1000) / u64::from(requests.max(1))).max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verification_required_defaults_by_environment() {
        assert!(VerificationConfig::resolve_verification_requirement(&Environment::Production, None));
        assert!(!VerificationConfig::resolve_verification_requirement(&Environment::Development, None));
    }

    #[test]
    fn test_verification_flag_overrides_environment() {
        assert!(VerificationConfig::resolve_verification_requirement(
            &Environment::Development,
            Some("true")
        ));
        assert!(!VerificationConfig::resolve_verification_requirement(
            &Environment::Production,
            Some("false")
        ));
        assert!(VerificationConfig::resolve_verification_requirement(
            &Environment::Production,
            Some("garbage")
        ));
    }

    #[test]
    fn test_jwt_secret_required_in_production() {
        assert!(JwtConfig::resolve_secret(&Environment::Production, None).is_err());
        assert!(JwtConfig::resolve_secret(&Environment::Production, Some("  ".into())).is_err());
        assert_eq!(
            JwtConfig::resolve_secret(&Environment::Production, Some("s3cret".into())).unwrap(),
            "s3cret"
        );
    }

    #[test]
    fn test_jwt_secret_falls_back_outside_production() {
        assert_eq!(
            JwtConfig::resolve_secret(&Environment::Development, None).unwrap(),
            DEVELOPMENT_JWT_SECRET
        );
    }

    #[test]
    fn test_replenish_interval() {
        assert_eq!(RateLimitConfig::replenish_interval_ms(50, 900), 18_000);
        assert_eq!(RateLimitConfig::replenish_interval_ms(0, 1), 1000);
    }
}
