//! # 사용자 응답 DTO
//!
//! 엔티티에서 비밀번호 해시와 일회용 비밀값을 제거한 공개 표현입니다.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::entities::to_chrono;
use crate::domain::entities::users::{AccountStatus, KycStatus, Permission, Role, User};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub role: Role,
    pub restaurant: Option<String>,
    pub permissions: Vec<Permission>,
    pub is_verified: bool,
    pub account_status: AccountStatus,
    pub kyc_status: KycStatus,
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id_string().unwrap_or_default(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            email: user.email.clone(),
            phone_number: user.phone_number.clone(),
            role: user.role,
            restaurant: user.restaurant_id(),
            permissions: user.permissions.clone(),
            is_verified: user.is_verified,
            account_status: user.account_status,
            kyc_status: user.kyc_status,
            last_login_at: user.last_login_at.map(to_chrono),
            created_at: to_chrono(user.created_at),
        }
    }
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self::from(&user)
    }
}

/// 다른 리소스에 포함되는 사용자 요약
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: String,
    pub full_name: String,
    pub email: String,
    pub phone_number: Option<String>,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id_string().unwrap_or_default(),
            full_name: user.full_name(),
            email: user.email.clone(),
            phone_number: user.phone_number.clone(),
        }
    }
}

/// 레스토랑 구성원 목록
#[derive(Debug, Serialize)]
pub struct RestaurantUsersResponse {
    pub users: Vec<UserResponse>,
    pub count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::{oid::ObjectId, DateTime as BsonDateTime};

    #[test]
    fn test_response_hides_secrets() {
        let mut user = User::new_registration(
            "Amina".into(),
            "Njoya".into(),
            "amina@example.com".into(),
            None,
            "$2b$10$hash".into(),
            BsonDateTime::from_millis(0),
        );
        user.id = Some(ObjectId::new());
        user.issue_verification_code("digest".into(), BsonDateTime::from_millis(0));

        let json = serde_json::to_value(UserResponse::from(&user)).unwrap();
        let text = json.to_string();

        assert_eq!(json["role"], "restaurant_admin");
        assert_eq!(json["kycStatus"], "not_submitted");
        assert_eq!(json["firstName"], "Amina");
        assert!(!text.contains("$2b$10$hash"));
        assert!(!text.contains("digest"));
    }
}
