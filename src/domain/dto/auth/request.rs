//! # 인증 요청 DTO
//!
//! 모든 필드는 `#[serde(default)]` 로 받아, 누락된 필드도 역직렬화 실패가 아닌
//! 항목별 검증 메시지로 보고됩니다.

use serde::Deserialize;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::domain::dto::validation::{
    email_shape, field_order, password_has_digit, password_has_lowercase, password_has_special,
    password_has_uppercase, password_min_length, passwords_match, six_digit_code,
};
use crate::utils::phone::validate_cameroon_phone;
use crate::utils::string_utils::deserialize_trimmed;

/// 회원 가입
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", default)]
#[validate(schema(function = "register_passwords_match", skip_on_field_errors = false))]
pub struct RegisterRequest {
    #[serde(deserialize_with = "deserialize_trimmed")]
    #[validate(length(min = 1, message = "First name is required"))]
    pub first_name: String,

    #[serde(deserialize_with = "deserialize_trimmed")]
    #[validate(length(min = 1, message = "Last name is required"))]
    pub last_name: String,

    #[serde(deserialize_with = "deserialize_trimmed")]
    #[validate(length(min = 1, message = "Email is required"))]
    #[validate(custom(function = "email_shape"))]
    pub email: String,

    #[serde(deserialize_with = "deserialize_trimmed")]
    #[validate(length(min = 1, message = "Phone number is required"))]
    #[validate(custom(function = "optional_phone"))]
    pub phone_number: String,

    #[validate(length(min = 1, message = "Password is required"))]
    #[validate(custom(function = "password_min_length"))]
    #[validate(custom(function = "password_has_uppercase"))]
    #[validate(custom(function = "password_has_lowercase"))]
    #[validate(custom(function = "password_has_digit"))]
    #[validate(custom(function = "password_has_special"))]
    pub password: String,

    #[validate(length(min = 1, message = "Confirm password is required"))]
    pub confirm_password: String,
}

field_order!(RegisterRequest: first_name, last_name, email, phone_number, password, confirm_password);

fn optional_phone(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Ok(());
    }
    validate_cameroon_phone(value)
}

fn register_passwords_match(req: &RegisterRequest) -> Result<(), ValidationError> {
    passwords_match(&req.password, &req.confirm_password)
}

/// 이메일 인증 코드 확인
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct VerifyEmailRequest {
    #[serde(deserialize_with = "deserialize_trimmed")]
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,

    #[serde(deserialize_with = "deserialize_trimmed")]
    #[validate(length(min = 1, message = "Verification code is required"))]
    #[validate(custom(function = "six_digit_code"))]
    pub code: String,
}

field_order!(VerifyEmailRequest: email, code);

/// 이메일 하나만 받는 요청 (인증 코드 재발송, 비밀번호 재설정 코드 요청)
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct EmailOnlyRequest {
    #[serde(deserialize_with = "deserialize_trimmed")]
    #[validate(length(min = 1, message = "Email is required"))]
    #[validate(custom(function = "email_shape"))]
    pub email: String,
}

field_order!(EmailOnlyRequest: email);

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct LoginRequest {
    #[serde(deserialize_with = "deserialize_trimmed")]
    #[validate(length(min = 1, message = "Email is required"))]
    #[validate(custom(function = "email_shape"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

field_order!(LoginRequest: email, password);

/// 재설정 코드로 비밀번호 교체
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", default)]
#[validate(schema(function = "reset_passwords_match", skip_on_field_errors = false))]
pub struct ResetPasswordRequest {
    #[serde(deserialize_with = "deserialize_trimmed")]
    #[validate(length(min = 1, message = "Email is required"))]
    #[validate(custom(function = "email_shape"))]
    pub email: String,

    #[serde(deserialize_with = "deserialize_trimmed")]
    #[validate(length(min = 1, message = "Reset code is required"))]
    #[validate(custom(function = "six_digit_code"))]
    pub code: String,

    #[validate(length(min = 1, message = "Password is required"))]
    #[validate(custom(function = "password_min_length"))]
    #[validate(custom(function = "password_has_uppercase"))]
    #[validate(custom(function = "password_has_lowercase"))]
    #[validate(custom(function = "password_has_digit"))]
    #[validate(custom(function = "password_has_special"))]
    pub password: String,

    /// 생략 가능. 보내면 `password` 와 같아야 합니다.
    pub confirm_password: String,
}

field_order!(ResetPasswordRequest: email, code, password, confirm_password);

fn reset_passwords_match(req: &ResetPasswordRequest) -> Result<(), ValidationError> {
    passwords_match(&req.password, &req.confirm_password)
}

/// 로그인 상태에서 비밀번호 변경
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", default)]
#[validate(schema(function = "change_password_rules", skip_on_field_errors = false))]
pub struct ChangePasswordRequest {
    #[validate(length(min = 1, message = "Current password is required"))]
    pub current_password: String,

    #[validate(length(min = 1, message = "New password is required"))]
    #[validate(custom(function = "password_min_length"))]
    #[validate(custom(function = "password_has_uppercase"))]
    #[validate(custom(function = "password_has_lowercase"))]
    #[validate(custom(function = "password_has_digit"))]
    #[validate(custom(function = "password_has_special"))]
    pub new_password: String,

    #[validate(length(min = 1, message = "Confirm new password is required"))]
    pub confirm_new_password: String,
}

field_order!(ChangePasswordRequest: current_password, new_password, confirm_new_password);

fn change_password_rules(req: &ChangePasswordRequest) -> Result<(), ValidationError> {
    passwords_match(&req.new_password, &req.confirm_new_password)?;
    if !req.new_password.is_empty() && req.new_password == req.current_password {
        return Err(ValidationError::new("password_unchanged")
            .with_message("New password must be different from current password".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::errors::flatten_validation_errors_in_order;
    use crate::domain::dto::validation::FieldOrder;

    fn messages<T: Validate + FieldOrder>(req: &T) -> Vec<String> {
        match req.validate() {
            Ok(()) => Vec::new(),
            Err(errors) => flatten_validation_errors_in_order(&errors, T::FIELDS),
        }
    }

    fn valid_registration() -> RegisterRequest {
        serde_json::from_value(serde_json::json!({
            "firstName": " Amina ",
            "lastName": "Njoya",
            "email": "amina@example.com",
            "phoneNumber": "690 11 90 47",
            "password": "Str0ng!Pass",
            "confirmPassword": "Str0ng!Pass"
        }))
        .unwrap()
    }

    #[test]
    fn test_valid_registration_passes() {
        let req = valid_registration();
        assert_eq!(req.first_name, "Amina");
        assert!(messages(&req).is_empty());
    }

    #[test]
    fn test_weak_password_is_itemized() {
        let mut req = valid_registration();
        req.password = "weakpass".into();
        req.confirm_password = "weakpass".into();

        let errors = messages(&req);
        assert!(errors.contains(&"Password must contain at least one uppercase letter".to_string()));
        assert!(errors.contains(&"Password must contain at least one number".to_string()));
        assert!(errors.iter().any(|e| e.starts_with("Password must contain at least one special")));
        assert!(!errors.contains(&"Password must be at least 8 characters long".to_string()));
    }

    #[test]
    fn test_mismatch_and_missing_fields() {
        let req: RegisterRequest = serde_json::from_value(serde_json::json!({
            "email": "not-an-email",
            "password": "Str0ng!Pass",
            "confirmPassword": "Str0ng!Pas"
        }))
        .unwrap();

        assert_eq!(
            messages(&req),
            vec![
                "First name is required",
                "Last name is required",
                "Please provide a valid email address",
                "Phone number is required",
                "Passwords do not match",
            ]
        );
    }

    #[test]
    fn test_mismatch_reported_alongside_weak_password() {
        let mut req = valid_registration();
        req.password = "weakpass".into();
        req.confirm_password = "weakpas".into();

        let errors = messages(&req);
        assert_eq!(errors.first().map(String::as_str), Some("Password must contain at least one uppercase letter"));
        assert_eq!(errors.last().map(String::as_str), Some("Passwords do not match"));
    }

    #[test]
    fn test_change_password_mismatch_with_missing_current() {
        let req = ChangePasswordRequest {
            current_password: String::new(),
            new_password: "Str0ng!Pass".into(),
            confirm_new_password: "Str0ng!Pas".into(),
        };
        assert_eq!(
            messages(&req),
            vec!["Current password is required", "Passwords do not match"]
        );
    }

    #[test]
    fn test_empty_password_reports_required_only() {
        let mut req = valid_registration();
        req.password.clear();

        let errors = messages(&req);
        assert!(errors.contains(&"Password is required".to_string()));
        assert!(!errors.iter().any(|e| e.starts_with("Password must")));
    }

    #[test]
    fn test_verification_code_format() {
        let req = VerifyEmailRequest { email: "a@b.cm".into(), code: "12a456".into() };
        assert_eq!(messages(&req), vec!["Verification code must be exactly 6 digits"]);
    }

    #[test]
    fn test_change_password_must_differ() {
        let req = ChangePasswordRequest {
            current_password: "Str0ng!Pass".into(),
            new_password: "Str0ng!Pass".into(),
            confirm_new_password: "Str0ng!Pass".into(),
        };
        assert_eq!(messages(&req), vec!["New password must be different from current password"]);
    }

    #[test]
    fn test_reset_confirmation_is_optional() {
        let req = ResetPasswordRequest {
            email: "a@b.cm".into(),
            code: "123456".into(),
            password: "N3w!Password".into(),
            confirm_password: String::new(),
        };
        assert!(messages(&req).is_empty());
    }
}
