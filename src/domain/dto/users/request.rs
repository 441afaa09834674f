//! # 사용자 관리 요청 DTO

use serde::Deserialize;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::domain::dto::validation::{
    email_shape, field_order, password_has_digit, password_has_lowercase, password_has_special,
    password_has_uppercase, password_min_length, passwords_match,
};
use crate::domain::entities::users::Permission;
use crate::utils::phone::validate_cameroon_phone;
use crate::utils::string_utils::{deserialize_optional_string, deserialize_trimmed};

/// 직원 초대
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct InviteUserRequest {
    #[serde(deserialize_with = "deserialize_trimmed")]
    #[validate(length(min = 1, message = "Email is required"))]
    #[validate(custom(function = "email_shape"))]
    pub email: String,

    #[serde(deserialize_with = "deserialize_trimmed")]
    #[validate(length(min = 1, message = "First name is required"))]
    pub first_name: String,

    #[serde(deserialize_with = "deserialize_trimmed")]
    #[validate(length(min = 1, message = "Last name is required"))]
    pub last_name: String,

    #[serde(deserialize_with = "deserialize_optional_string")]
    #[validate(custom(function = "validate_cameroon_phone"))]
    pub phone_number: Option<String>,

    pub permissions: Vec<Permission>,
}

field_order!(InviteUserRequest: first_name, last_name, email, phone_number, permissions);

/// 초대 수락
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", default)]
#[validate(schema(function = "accept_passwords_match", skip_on_field_errors = false))]
pub struct AcceptInvitationRequest {
    #[serde(deserialize_with = "deserialize_trimmed")]
    #[validate(length(min = 1, message = "Token and password are required"))]
    pub token: String,

    #[validate(length(min = 1, message = "Token and password are required"))]
    #[validate(custom(function = "password_min_length"))]
    #[validate(custom(function = "password_has_uppercase"))]
    #[validate(custom(function = "password_has_lowercase"))]
    #[validate(custom(function = "password_has_digit"))]
    #[validate(custom(function = "password_has_special"))]
    pub password: String,

    pub confirm_password: String,
}

field_order!(AcceptInvitationRequest: token, password, confirm_password);

fn accept_passwords_match(req: &AcceptInvitationRequest) -> Result<(), ValidationError> {
    passwords_match(&req.password, &req.confirm_password)
}

/// 권한 교체
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdatePermissionsRequest {
    pub permissions: Vec<Permission>,
}

field_order!(UpdatePermissionsRequest: permissions);
