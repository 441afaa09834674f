//! bcrypt 비밀번호 해시

use crate::config::PasswordConfig;
use crate::core::errors::{AppResult, ErrorContext};

pub fn hash_password(password: &str) -> AppResult<String> {
    hash_password_with_cost(password, PasswordConfig::bcrypt_cost())
}

pub fn hash_password_with_cost(password: &str, cost: u32) -> AppResult<String> {
    let start = std::time::Instant::now();
    let hashed = bcrypt::hash(password, cost).context("비밀번호 해싱 실패")?;
    log::debug!("Password hashing took: {:?}", start.elapsed());
    Ok(hashed)
}

/// 해시 형식이 깨진 경우도 불일치로 취급합니다.
pub fn verify_password(password: &str, password_hash: &str) -> bool {
    bcrypt::verify(password, password_hash).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hashed = hash_password_with_cost("Str0ng!Pass", 4).unwrap();
        assert_ne!(hashed, "Str0ng!Pass");
        assert!(verify_password("Str0ng!Pass", &hashed));
        assert!(!verify_password("wrong", &hashed));
    }

    #[test]
    fn test_malformed_hash_is_mismatch() {
        assert!(!verify_password("anything", "not-a-bcrypt-hash"));
    }
}
