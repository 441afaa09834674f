//! JWT 세션 토큰 서비스
//!
//! HMAC-SHA256 으로 서명한 단일 액세스 토큰을 발급합니다. 만료 기본값은 7일입니다.

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use singleton_macro::service;

use crate::config::JwtConfig;
use crate::core::errors::AppError;
use crate::domain::entities::users::User;
use crate::domain::models::token::TokenClaims;

pub const INVALID_TOKEN_MESSAGE: &str = "Invalid token. Please login again.";
pub const EXPIRED_TOKEN_MESSAGE: &str = "Token expired. Please login again.";

#[service(name = "token")]
pub struct TokenService {}

impl TokenService {
    /// 사용자에게 세션 토큰을 발급합니다.
    ///
    /// # Errors
    ///
    /// * `AppError::InternalError` - 저장되지 않은 사용자이거나 서명 실패
    ///
    /// ```rust,ignore
    /// let token = TokenService::instance().issue(&user)?;
    /// ```
    pub fn issue(&self, user: &User) -> Result<String, AppError> {
        let sub = user
            .id_string()
            .ok_or_else(|| AppError::InternalError("사용자 ID가 없습니다".to_string()))?;

        let now = Utc::now();
        let claims = TokenClaims {
            sub,
            role: user.role.as_str().to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::hours(JwtConfig::expiration_hours())).timestamp(),
        };

        encode_claims(&claims, signing_secret()?)
    }

    /// 서명과 만료를 검증하고 클레임을 돌려줍니다.
    pub fn verify(&self, token: &str) -> Result<TokenClaims, AppError> {
        decode_claims(token, signing_secret()?)
    }

    /// `Authorization: Bearer <token>` 헤더 값에서 토큰만 잘라냅니다.
    pub fn extract_bearer_token<'a>(&self, auth_header: &'a str) -> Option<&'a str> {
        bearer_token(auth_header)
    }
}

fn signing_secret() -> Result<&'static str, AppError> {
    JwtConfig::secret().map_err(AppError::InternalError)
}

fn bearer_token(auth_header: &str) -> Option<&str> {
    auth_header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

fn encode_claims(claims: &TokenClaims, secret: &str) -> Result<String, AppError> {
    encode(&Header::default(), claims, &EncodingKey::from_secret(secret.as_bytes()))
        .map_err(|e| AppError::InternalError(format!("JWT 토큰 생성 실패: {}", e)))
}

fn decode_claims(token: &str, secret: &str) -> Result<TokenClaims, AppError> {
    decode::<TokenClaims>(token, &DecodingKey::from_secret(secret.as_bytes()), &Validation::default())
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => AppError::AuthenticationError(EXPIRED_TOKEN_MESSAGE.to_string()),
            _ => AppError::AuthenticationError(INVALID_TOKEN_MESSAGE.to_string()),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret";

    fn claims(exp_offset_secs: i64) -> TokenClaims {
        let now = Utc::now().timestamp();
        TokenClaims {
            sub: "65f0c0ffee0000000000abcd".to_string(),
            role: "restaurant_admin".to_string(),
            iat: now,
            exp: now + exp_offset_secs,
        }
    }

    #[test]
    fn test_round_trip() {
        let token = encode_claims(&claims(3600), SECRET).unwrap();
        let decoded = decode_claims(&token, SECRET).unwrap();
        assert_eq!(decoded.sub, "65f0c0ffee0000000000abcd");
        assert_eq!(decoded.role, "restaurant_admin");
    }

    #[test]
    fn test_expired_token() {
        let token = encode_claims(&claims(-3600), SECRET).unwrap();
        match decode_claims(&token, SECRET) {
            Err(AppError::AuthenticationError(msg)) => assert_eq!(msg, EXPIRED_TOKEN_MESSAGE),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_wrong_secret_and_garbage() {
        let token = encode_claims(&claims(3600), SECRET).unwrap();
        for (candidate, secret) in [(token.as_str(), "other"), ("not.a.jwt", SECRET)] {
            match decode_claims(candidate, secret) {
                Err(AppError::AuthenticationError(msg)) => assert_eq!(msg, INVALID_TOKEN_MESSAGE),
                other => panic!("unexpected: {:?}", other),
            }
        }
    }

    #[test]
    fn test_extract_bearer_token() {
        assert_eq!(bearer_token("Bearer abc.def"), Some("abc.def"));
        assert_eq!(bearer_token("Basic abc"), None);
        assert_eq!(bearer_token("Bearer "), None);
    }
}
