//! 실행 환경과 서버 설정

use std::env;

use super::{env_non_empty, env_or};

/// 실행 환경
///
/// `ENVIRONMENT` 가 없으면 `NODE_ENV` 를 읽고, 둘 다 없으면 운영 환경으로 간주합니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Staging,
    Production,
}

impl Environment {
    pub fn current() -> Self {
        let raw = env::var("ENVIRONMENT")
            .or_else(|_| env::var("NODE_ENV"))
            .unwrap_or_else(|_| "production".to_string());
        Self::from_name(&raw)
    }

    pub fn from_name(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "development" | "dev" => Environment::Development,
            "test" | "testing" => Environment::Test,
            "staging" | "stage" => Environment::Staging,
            _ => Environment::Production,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Test => "test",
            Environment::Staging => "staging",
            Environment::Production => "production",
        }
    }
}

pub struct PasswordConfig;

impl PasswordConfig {
    /// `BCRYPT_COST` (4..=15) 또는 환경별 기본값
    pub fn bcrypt_cost() -> u32 {
        env::var("BCRYPT_COST")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .filter(|cost| (4..=15).contains(cost))
            .unwrap_or_else(|| Self::bcrypt_cost_for_env(&Environment::current()))
    }

    pub fn bcrypt_cost_for_env(env: &Environment) -> u32 {
        match env {
            Environment::Development | Environment::Test => 4,
            Environment::Staging | Environment::Production => 10,
        }
    }
}

pub struct ServerConfig;

impl ServerConfig {
    pub fn port() -> u16 {
        env_or("PORT", 5000)
    }

    pub fn host() -> String {
        env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string())
    }

    /// 외부에서 보이는 기본 URL. 로컬 업로드 이미지의 절대 경로에 사용합니다.
    pub fn public_base_url() -> Option<String> {
        env_non_empty("PUBLIC_BASE_URL").map(|url| url.trim_end_matches('/').to_string())
    }

    /// JSON 요청 본문 최대 크기 (바이트)
    pub fn json_limit_bytes() -> usize {
        env_or("JSON_BODY_LIMIT_BYTES", 10 * 1024 * 1024)
    }
}

/// CORS 허용 출처
pub struct CorsConfig;

impl CorsConfig {
    /// 운영 환경에서 허용할 출처 목록
    ///
    /// `ALLOWED_ORIGINS` (쉼표 구분) 와 `CLIENT_URL` 을 합칩니다.
    pub fn allowed_origins() -> Vec<String> {
        let mut origins = Self::parse_origins(&env::var("ALLOWED_ORIGINS").unwrap_or_default());
        if let Some(client) = env_non_empty("CLIENT_URL") {
            let client = client.trim_end_matches('/').to_string();
            if !origins.contains(&client) {
                origins.push(client);
            }
        }
        origins
    }

    pub fn parse_origins(raw: &str) -> Vec<String> {
        raw.split(',')
            .map(|o| o.trim().trim_end_matches('/').to_string())
            .filter(|o| !o.is_empty())
            .collect()
    }
}

/// 테넌트(레스토랑) 기본값
pub struct TenantConfig;

impl TenantConfig {
    /// KYC 승인으로 생성되는 레스토랑의 기본 사용자 수 한도
    pub fn default_max_users() -> u32 {
        env_or("DEFAULT_MAX_USERS", 10)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_from_name() {
        assert_eq!(Environment::from_name("development"), Environment::Development);
        assert_eq!(Environment::from_name("DEV"), Environment::Development);
        assert_eq!(Environment::from_name("test"), Environment::Test);
        assert_eq!(Environment::from_name("production"), Environment::Production);
        assert_eq!(Environment::from_name("unknown"), Environment::Production);
    }

    #[test]
    fn test_only_production_is_production() {
        assert!(Environment::Production.is_production());
        assert!(!Environment::Staging.is_production());
        assert_eq!(Environment::Development.as_str(), "development");
    }

    #[test]
    fn test_bcrypt_cost_for_each_environment() {
        assert_eq!(PasswordConfig::bcrypt_cost_for_env(&Environment::Development), 4);
        assert_eq!(PasswordConfig::bcrypt_cost_for_env(&Environment::Test), 4);
        assert_eq!(PasswordConfig::bcrypt_cost_for_env(&Environment::Production), 10);
    }

    #[test]
    fn test_parse_origins() {
        assert_eq!(
            CorsConfig::parse_origins(" https://app.djulah.com/ ,, http://localhost:3000"),
            vec!["https://app.djulah.com".to_string(), "http://localhost:3000".to_string()]
        );
        assert!(CorsConfig::parse_origins("").is_empty());
    }
}
