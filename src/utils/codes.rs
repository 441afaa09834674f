//! 일회용 비밀값 생성과 다이제스트
//!
//! 인증 코드, 재설정 코드, 초대 토큰은 원문을 이메일로만 보내고
//! 저장소에는 SHA-256 다이제스트만 남깁니다.

use rand::rngs::OsRng;
use rand::{Rng, RngCore};
use sha2::{Digest, Sha256};

/// 6자리 숫자 코드 (선행 0 포함)
pub fn generate_numeric_code() -> String {
    format!("{:06}", OsRng.gen_range(0..1_000_000u32))
}

/// `bytes` 바이트 난수를 16진수 문자열로 반환합니다.
pub fn generate_hex_token(bytes: usize) -> String {
    let mut buffer = vec![0u8; bytes];
    OsRng.fill_bytes(&mut buffer);
    buffer.iter().map(|b| format!("{:02x}", b)).collect()
}

/// 저장용 다이제스트
pub fn digest(secret: &str) -> String {
    format!("{:x}", Sha256::digest(secret.trim().as_bytes()))
}

pub fn is_six_digit_code(value: &str) -> bool {
    value.len() == 6 && value.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_code_shape() {
        for _ in 0..200 {
            let code = generate_numeric_code();
            assert!(is_six_digit_code(&code), "{}", code);
        }
    }

    #[test]
    fn test_hex_token_length_and_uniqueness() {
        let a = generate_hex_token(32);
        let b = generate_hex_token(32);

        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, b);
    }

    #[test]
    fn test_digest_is_stable_and_trims() {
        assert_eq!(digest("123456"), digest(" 123456 "));
        assert_ne!(digest("123456"), digest("123457"));
        assert_eq!(digest("abc").len(), 64);
    }

    #[test]
    fn test_six_digit_code() {
        assert!(is_six_digit_code("012345"));
        assert!(!is_six_digit_code("12345"));
        assert!(!is_six_digit_code("12345a"));
        assert!(!is_six_digit_code("１２３４５６"));
    }
}
