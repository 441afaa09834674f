//! User Entity
//!
//! 레스토랑 관리 백엔드의 계정 모델입니다.
//! 하나의 문서가 로그인 자격 증명, 테넌트 소속, 역할/권한,
//! 그리고 세 종류의 일회용 비밀값(이메일 인증 코드, 비밀번호 재설정 코드,
//! 초대 토큰)을 함께 보관합니다.
//!
//! ## 생명 주기
//!
//! ```text
//! 가입 ─▶ 미인증 ──(6자리 코드, 10분)──▶ 인증됨 ─▶ KYC 제출 ─▶ 승인 시 레스토랑 관리자
//! 초대 ─▶ 비활성 ──(초대 토큰, 7일)────▶ 활성 직원
//! ```
//!
//! 일회용 비밀값은 SHA-256 다이제스트로만 저장되며, 새로 발급하면 이전 값을 덮어쓰므로
//! 종류별로 유효한 값은 항상 하나뿐입니다.

use std::fmt;

use chrono::Duration;
use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::config::VerificationConfig;
use crate::domain::entities::expires_after;

/// 사용자 역할
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    SuperAdmin,
    RestaurantAdmin,
    RestaurantStaff,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::SuperAdmin => "super_admin",
            Role::RestaurantAdmin => "restaurant_admin",
            Role::RestaurantStaff => "restaurant_staff",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "super_admin" => Some(Role::SuperAdmin),
            "restaurant_admin" => Some(Role::RestaurantAdmin),
            "restaurant_staff" => Some(Role::RestaurantStaff),
            _ => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 직원에게 개별 부여하는 권한
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    ManageIngredients,
    ManageSuppliers,
    ManageStock,
    ViewReports,
    ManageUsers,
}

impl Permission {
    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::ManageIngredients => "manage_ingredients",
            Permission::ManageSuppliers => "manage_suppliers",
            Permission::ManageStock => "manage_stock",
            Permission::ViewReports => "view_reports",
            Permission::ManageUsers => "manage_users",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum AccountStatus {
    Active,
    /// 초대를 아직 수락하지 않은 계정
    Inactive,
    Suspended,
}

impl AccountStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountStatus::Active => "active",
            AccountStatus::Inactive => "inactive",
            AccountStatus::Suspended => "suspended",
        }
    }
}

/// 사용자 관점의 KYC 진행 상태
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum KycStatus {
    NotSubmitted,
    Pending,
    UnderReview,
    Approved,
    Rejected,
}

impl KycStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            KycStatus::NotSubmitted => "not_submitted",
            KycStatus::Pending => "pending",
            KycStatus::UnderReview => "under_review",
            KycStatus::Approved => "approved",
            KycStatus::Rejected => "rejected",
        }
    }

    /// 새 신청서를 낼 수 있는 상태인지
    pub fn can_submit(&self) -> bool {
        matches!(self, KycStatus::NotSubmitted | KycStatus::Rejected)
    }
}

/// 일회용 코드/토큰 검사 결과
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecretCheckError {
    /// 발급된 값이 없음 (이미 사용했거나 발급 전)
    Missing,
    Mismatch,
    Expired,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub first_name: String,
    pub last_name: String,
    /// 소문자로 정규화된 이메일 (유니크)
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    pub password_hash: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restaurant: Option<ObjectId>,
    #[serde(default)]
    pub permissions: Vec<Permission>,
    pub is_verified: bool,
    pub account_status: AccountStatus,
    pub kyc_status: KycStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kyc_submission: Option<ObjectId>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verification_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verification_code_expires: Option<DateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verification_sent_at: Option<DateTime>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reset_password_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reset_password_expires: Option<DateTime>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invitation_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invitation_expires: Option<DateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invited_by: Option<ObjectId>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_login_at: Option<DateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_changed_at: Option<DateTime>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

/// 초대로 생성되는 직원 계정의 입력값
pub struct InvitedUserDraft {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub temporary_password_hash: String,
    pub restaurant: ObjectId,
    pub permissions: Vec<Permission>,
    pub invited_by: ObjectId,
    pub invitation_token_digest: String,
}

fn check_secret(
    stored: Option<&str>,
    expires: Option<DateTime>,
    candidate_digest: &str,
    now: DateTime,
) -> Result<(), SecretCheckError> {
    let stored = stored.ok_or(SecretCheckError::Missing)?;
    if stored != candidate_digest {
        return Err(SecretCheckError::Mismatch);
    }
    match expires {
        Some(expires) if expires > now => Ok(()),
        _ => Err(SecretCheckError::Expired),
    }
}

impl User {
    /// 셀프 가입 계정. 가입자는 KYC 승인 후 자신의 레스토랑을 관리하게 됩니다.
    pub fn new_registration(
        first_name: String,
        last_name: String,
        email: String,
        phone_number: Option<String>,
        password_hash: String,
        now: DateTime,
    ) -> Self {
        Self {
            id: None,
            first_name,
            last_name,
            email,
            phone_number,
            password_hash,
            role: Role::RestaurantAdmin,
            restaurant: None,
            permissions: Vec::new(),
            is_verified: false,
            account_status: AccountStatus::Active,
            kyc_status: KycStatus::NotSubmitted,
            kyc_submission: None,
            verification_code: None,
            verification_code_expires: None,
            verification_sent_at: None,
            reset_password_code: None,
            reset_password_expires: None,
            invitation_token: None,
            invitation_expires: None,
            invited_by: None,
            last_login_at: None,
            password_changed_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// 초대된 직원 계정. 수락 전까지 비활성이며 임시 비밀번호로는 로그인할 수 없습니다.
    pub fn new_invitation(draft: InvitedUserDraft, now: DateTime) -> Self {
        let mut user = Self::new_registration(
            draft.first_name,
            draft.last_name,
            draft.email,
            draft.phone_number,
            draft.temporary_password_hash,
            now,
        );
        user.role = Role::RestaurantStaff;
        user.restaurant = Some(draft.restaurant);
        user.permissions = draft.permissions;
        user.account_status = AccountStatus::Inactive;
        user.kyc_status = KycStatus::Approved;
        user.invited_by = Some(draft.invited_by);
        user.invitation_token = Some(draft.invitation_token_digest);
        user.invitation_expires = Some(expires_after(now, Duration::days(VerificationConfig::INVITATION_TTL_DAYS)));
        user
    }

    pub fn id_string(&self) -> Option<String> {
        self.id.as_ref().map(|id| id.to_hex())
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name).trim().to_string()
    }

    pub fn is_super_admin(&self) -> bool {
        self.role == Role::SuperAdmin
    }

    pub fn is_restaurant_admin(&self) -> bool {
        self.role == Role::RestaurantAdmin
    }

    pub fn has_permission(&self, permission: Permission) -> bool {
        self.permissions.contains(&permission)
    }

    pub fn restaurant_id(&self) -> Option<String> {
        self.restaurant.as_ref().map(|id| id.to_hex())
    }

    pub fn is_active(&self) -> bool {
        self.account_status == AccountStatus::Active
    }

    /// 새 인증 코드를 발급합니다. 이전 코드는 무효가 됩니다.
    pub fn issue_verification_code(&mut self, code_digest: String, now: DateTime) {
        self.verification_code = Some(code_digest);
        self.verification_code_expires =
            Some(expires_after(now, Duration::minutes(VerificationConfig::CODE_TTL_MINUTES)));
        self.verification_sent_at = Some(now);
        self.updated_at = now;
    }

    pub fn check_verification_code(&self, code_digest: &str, now: DateTime) -> Result<(), SecretCheckError> {
        check_secret(
            self.verification_code.as_deref(),
            self.verification_code_expires,
            code_digest,
            now,
        )
    }

    pub fn issue_reset_code(&mut self, code_digest: String, now: DateTime) {
        self.reset_password_code = Some(code_digest);
        self.reset_password_expires =
            Some(expires_after(now, Duration::minutes(VerificationConfig::RESET_CODE_TTL_MINUTES)));
        self.updated_at = now;
    }

    pub fn check_reset_code(&self, code_digest: &str, now: DateTime) -> Result<(), SecretCheckError> {
        check_secret(
            self.reset_password_code.as_deref(),
            self.reset_password_expires,
            code_digest,
            now,
        )
    }

    pub fn check_invitation(&self, token_digest: &str, now: DateTime) -> Result<(), SecretCheckError> {
        check_secret(self.invitation_token.as_deref(), self.invitation_expires, token_digest, now)
    }

    /// 비밀번호 해시와 일회용 비밀값을 뺀 사본 (캐시 저장용)
    pub fn without_credentials(&self) -> User {
        User {
            password_hash: String::new(),
            verification_code: None,
            verification_code_expires: None,
            reset_password_code: None,
            reset_password_expires: None,
            invitation_token: None,
            invitation_expires: None,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(millis: i64) -> DateTime {
        DateTime::from_millis(millis)
    }

    fn registered() -> User {
        User::new_registration(
            "Amina".into(),
            "Njoya".into(),
            "amina@example.com".into(),
            Some("+237690119047".into()),
            "hash".into(),
            at(0),
        )
    }

    fn invited(now: DateTime) -> User {
        User::new_invitation(
            InvitedUserDraft {
                first_name: "Paul".into(),
                last_name: "Biya".into(),
                email: "paul@example.com".into(),
                phone_number: None,
                temporary_password_hash: "temp".into(),
                restaurant: ObjectId::new(),
                permissions: vec![Permission::ManageIngredients],
                invited_by: ObjectId::new(),
                invitation_token_digest: "token-digest".into(),
            },
            now,
        )
    }

    #[test]
    fn test_registration_defaults() {
        let user = registered();

        assert_eq!(user.role, Role::RestaurantAdmin);
        assert_eq!(user.kyc_status, KycStatus::NotSubmitted);
        assert!(!user.is_verified);
        assert!(user.is_active());
        assert_eq!(user.full_name(), "Amina Njoya");
    }

    #[test]
    fn test_verification_code_missing_before_issue() {
        let mut user = registered();
        assert_eq!(
            user.check_verification_code("digest-1", at(0)),
            Err(SecretCheckError::Missing)
        );

        user.issue_verification_code("digest-1".into(), at(0));
        assert_eq!(user.check_verification_code("digest-1", at(1_000)), Ok(()));
        assert_eq!(user.verification_sent_at, Some(at(0)));
    }

    #[test]
    fn test_verification_code_expires_after_ten_minutes() {
        let mut user = registered();
        user.issue_verification_code("digest".into(), at(0));

        let just_before = at(10 * 60 * 1000 - 1);
        let at_expiry = at(10 * 60 * 1000);

        assert_eq!(user.check_verification_code("digest", just_before), Ok(()));
        assert_eq!(user.check_verification_code("digest", at_expiry), Err(SecretCheckError::Expired));
    }

    #[test]
    fn test_new_code_replaces_previous() {
        let mut user = registered();
        user.issue_verification_code("first".into(), at(0));
        user.issue_verification_code("second".into(), at(30_000));

        assert_eq!(user.check_verification_code("first", at(31_000)), Err(SecretCheckError::Mismatch));
        assert_eq!(user.check_verification_code("second", at(31_000)), Ok(()));
    }

    #[test]
    fn test_reset_code_flow() {
        let mut user = registered();
        user.issue_reset_code("reset".into(), at(0));

        assert_eq!(user.check_reset_code("other", at(1)), Err(SecretCheckError::Mismatch));
        assert_eq!(user.check_reset_code("reset", at(1)), Ok(()));

        let fifteen_minutes = at(15 * 60 * 1000);
        assert_eq!(user.check_reset_code("reset", fifteen_minutes), Err(SecretCheckError::Expired));
    }

    #[test]
    fn test_invitation_defaults() {
        let user = invited(at(0));

        assert_eq!(user.role, Role::RestaurantStaff);
        assert_eq!(user.account_status, AccountStatus::Inactive);
        assert_eq!(user.kyc_status, KycStatus::Approved);
        assert!(user.has_permission(Permission::ManageIngredients));

        let six_days = at(6 * 24 * 60 * 60 * 1000);
        assert_eq!(user.check_invitation("token-digest", six_days), Ok(()));
        assert_eq!(user.check_invitation("other", six_days), Err(SecretCheckError::Mismatch));
    }

    #[test]
    fn test_without_credentials_strips_secrets() {
        let mut user = invited(at(0));
        user.issue_verification_code("code".into(), at(0));
        user.issue_reset_code("reset".into(), at(0));

        let cached = user.without_credentials();

        assert!(cached.password_hash.is_empty());
        assert_eq!(cached.verification_code, None);
        assert_eq!(cached.reset_password_code, None);
        assert_eq!(cached.invitation_token, None);
        assert_eq!(cached.invitation_expires, None);
        assert_eq!(cached.email, user.email);
        assert_eq!(cached.role, user.role);
        assert_eq!(cached.restaurant, user.restaurant);

        let json = serde_json::to_value(&cached).unwrap();
        assert_eq!(json["password_hash"], "");
        assert!(json.get("invitation_token").is_none());
    }

    #[test]
    fn test_invitation_expires_after_seven_days() {
        let user = invited(at(0));
        let eight_days = at(8 * 24 * 60 * 60 * 1000);

        assert_eq!(user.check_invitation("token-digest", eight_days), Err(SecretCheckError::Expired));
    }

    #[test]
    fn test_enum_wire_names() {
        assert_eq!(serde_json::to_string(&Role::SuperAdmin).unwrap(), "\"super_admin\"");
        assert_eq!(
            serde_json::from_str::<Permission>("\"view_reports\"").unwrap(),
            Permission::ViewReports
        );
        assert_eq!(Role::parse("restaurant_staff"), Some(Role::RestaurantStaff));
        assert_eq!(Role::parse("owner"), None);
        assert!(KycStatus::Rejected.can_submit());
        assert!(!KycStatus::Pending.can_submit());
    }
}
