//! # 애플리케이션 설정
//!
//! 모든 설정은 환경 변수에서 읽는 정적 접근자로 제공됩니다.
//! `.env` 파일은 `main.rs` 에서 `PROFILE` 값에 따라 먼저 로드됩니다.
//!
//! - [`data_config`]: 실행 환경, 서버 주소, 비밀번호 해시 비용, CORS, 테넌트 기본값
//! - [`auth_config`]: JWT, 일회용 코드 만료, 인증 엔드포인트 요청 제한
//! - [`integration_config`]: 이메일 발송, 이미지 저장소

pub mod auth_config;
pub mod data_config;
pub mod integration_config;

pub use auth_config::*;
pub use data_config::*;
pub use integration_config::*;

/// `"true"`, `"1"`, `"yes"` 등을 불리언으로 해석합니다.
pub(crate) fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// 환경 변수를 읽어 파싱하고, 없거나 잘못된 값이면 기본값을 사용합니다.
pub(crate) fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

/// 비어 있지 않은 환경 변수 값
pub(crate) fn env_non_empty(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flag() {
        assert_eq!(parse_flag("TRUE"), Some(true));
        assert_eq!(parse_flag(" 0 "), Some(false));
        assert_eq!(parse_flag("maybe"), None);
    }

    #[test]
    fn test_env_or_falls_back() {
        assert_eq!(env_or("RESTAURANT_AUTH_TEST_UNSET_KEY", 42u16), 42);
        assert_eq!(env_non_empty("RESTAURANT_AUTH_TEST_UNSET_KEY"), None);
    }
}
