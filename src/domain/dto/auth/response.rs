use serde::Serialize;

use crate::domain::dto::users::UserResponse;

/// 인증 완료 응답 (이메일 인증, 로그인, 비밀번호 재설정)
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserResponse,
}

/// 가입 직후 응답. 토큰은 이메일 인증 후에 발급됩니다.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationResponse {
    pub user: UserResponse,
    pub verification_expires_in_minutes: i64,
}
