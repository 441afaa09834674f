//! # 공통 입력 검증 규칙
//!
//! `validator` 커스텀 규칙 함수 모음입니다. 각 규칙은 빈 값을 통과시키고,
//! 필수 여부는 필드의 `length(min = 1)` 규칙이 담당합니다. 덕분에 빈 입력은
//! "필수" 메시지 하나만, 형식 오류는 위반 항목별 메시지를 각각 받습니다.
//!
//! ```rust,ignore
//! #[validate(length(min = 1, message = "Password is required"))]
//! #[validate(custom(function = "password_min_length"))]
//! #[validate(custom(function = "password_has_uppercase"))]
//! pub password: String,
//! ```

use once_cell::sync::Lazy;
use regex::Regex;
use validator::ValidationError;

use crate::utils::codes::is_six_digit_code;

pub const MIN_PASSWORD_LENGTH: usize = 8;

/// 검증 메시지를 보고할 필드 순서
///
/// `validator` 는 필드 오류를 해시맵으로 모으므로 순서가 없습니다. 요청 DTO 는
/// 폼에 보이는 순서를 여기에 적고, 목록에 없는 키(스키마 규칙의 `__all__` 포함)는 뒤에 붙습니다.
pub trait FieldOrder {
    const FIELDS: &'static [&'static str];
}

/// ```rust,ignore
/// field_order!(LoginRequest: email, password);
/// ```
macro_rules! field_order {
    ($ty:ty: $($field:ident),+ $(,)?) => {
        impl $crate::domain::dto::validation::FieldOrder for $ty {
            const FIELDS: &'static [&'static str] = &[$(stringify!($field)),+];
        }
    };
}
pub(crate) use field_order;

/// 비밀번호 특수문자 집합
const PASSWORD_SPECIALS: &str = r#"!@#$%^&*()_+-=[]{};':"\|,.<>/?"#;

static EMAIL_SHAPE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9_]+([.-]?[A-Za-z0-9_]+)*@[A-Za-z0-9_]+([.-]?[A-Za-z0-9_]+)*(\.[A-Za-z0-9_]{2,3})+$")
        .expect("static email pattern")
});

fn rule(code: &'static str, message: &'static str) -> ValidationError {
    ValidationError::new(code).with_message(message.into())
}

pub fn email_shape(value: &str) -> Result<(), ValidationError> {
    let value = value.trim();
    if value.is_empty() || EMAIL_SHAPE.is_match(value) {
        Ok(())
    } else {
        Err(rule("email", "Please provide a valid email address"))
    }
}

pub fn password_min_length(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() || value.chars().count() >= MIN_PASSWORD_LENGTH {
        Ok(())
    } else {
        Err(rule("password_length", "Password must be at least 8 characters long"))
    }
}

pub fn password_has_uppercase(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() || value.chars().any(|c| c.is_ascii_uppercase()) {
        Ok(())
    } else {
        Err(rule("password_uppercase", "Password must contain at least one uppercase letter"))
    }
}

pub fn password_has_lowercase(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() || value.chars().any(|c| c.is_ascii_lowercase()) {
        Ok(())
    } else {
        Err(rule("password_lowercase", "Password must contain at least one lowercase letter"))
    }
}

pub fn password_has_digit(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() || value.chars().any(|c| c.is_ascii_digit()) {
        Ok(())
    } else {
        Err(rule("password_digit", "Password must contain at least one number"))
    }
}

pub fn password_has_special(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() || value.chars().any(|c| PASSWORD_SPECIALS.contains(c)) {
        Ok(())
    } else {
        Err(rule(
            "password_special",
            "Password must contain at least one special character (e.g. !@#$%^&*)",
        ))
    }
}

pub fn six_digit_code(value: &str) -> Result<(), ValidationError> {
    let value = value.trim();
    if value.is_empty() || is_six_digit_code(value) {
        Ok(())
    } else {
        Err(rule("code", "Verification code must be exactly 6 digits"))
    }
}

/// 확인 비밀번호 일치 여부. 확인 값이 비어 있으면 필수 규칙에 맡깁니다.
pub fn passwords_match(password: &str, confirmation: &str) -> Result<(), ValidationError> {
    if confirmation.is_empty() || password == confirmation {
        Ok(())
    } else {
        Err(rule("passwords_mismatch", "Passwords do not match"))
    }
}
