//! # 레스토랑 직원 관리 서비스
//!
//! 레스토랑 관리자가 직원을 초대하고, 권한을 조정하고, 내보내는 흐름입니다.
//! 모든 조회와 변경은 호출자의 레스토랑 ID 로 범위가 제한됩니다.
//!
//! 초대된 계정은 임시 비밀번호와 7일짜리 토큰을 가진 `inactive` 상태로 만들어지고,
//! 토큰 원문은 초대 메일에만 실립니다. 수락은 토큰 다이제스트와 만료 시각을 조건으로 한
//! 원자적 갱신이라 같은 토큰으로 두 번 활성화될 수 없습니다.

use std::sync::Arc;

use mongodb::bson::DateTime;
use singleton_macro::service;

use crate::core::errors::AppError;
use crate::domain::dto::auth::AuthResponse;
use crate::domain::dto::users::{
    AcceptInvitationRequest, InviteUserRequest, RestaurantUsersResponse, UserResponse,
};
use crate::domain::entities::users::{InvitedUserDraft, Permission, SecretCheckError, User};
use crate::domain::models::auth::AuthenticatedUser;
use crate::repositories::parse_object_id;
use crate::repositories::restaurants::RestaurantRepository;
use crate::repositories::users::UserRepository;
use crate::services::auth::password::hash_password;
use crate::services::auth::TokenService;
use crate::services::notifications::EmailService;
use crate::utils::codes::{digest, generate_hex_token};
use crate::utils::phone::normalize_phone_number;
use crate::utils::string_utils::{mask_email, normalize_email};

pub const INVALID_INVITATION: &str = "Invalid or expired invitation token";
pub const EXPIRED_INVITATION: &str = "Invitation has expired. Please ask your administrator for a new one.";
pub const MEMBER_NOT_FOUND: &str = "User not found in your restaurant";

const INVITATION_TOKEN_BYTES: usize = 32;
const TEMPORARY_PASSWORD_BYTES: usize = 16;

#[service(name = "invitation")]
pub struct InvitationService {
    user_repo: Arc<UserRepository>,
    restaurant_repo: Arc<RestaurantRepository>,
    token_service: Arc<TokenService>,
    email_service: Arc<EmailService>,
}

/// 중복을 제거하되 요청 순서는 유지합니다.
pub fn dedup_permissions(permissions: Vec<Permission>) -> Vec<Permission> {
    let mut unique = Vec::with_capacity(permissions.len());
    for permission in permissions {
        if !unique.contains(&permission) {
            unique.push(permission);
        }
    }
    unique
}

/// 관리자 계정은 직원 관리 대상이 아닙니다.
fn is_protected_member(user: &User) -> bool {
    user.is_restaurant_admin() || user.is_super_admin()
}

fn invitation_error(error: SecretCheckError) -> AppError {
    match error {
        SecretCheckError::Expired => AppError::ValidationError(EXPIRED_INVITATION.to_string()),
        SecretCheckError::Missing | SecretCheckError::Mismatch => {
            AppError::ValidationError(INVALID_INVITATION.to_string())
        }
    }
}

impl InvitationService {
    /// 직원 초대
    ///
    /// # Errors
    ///
    /// * `ConflictError` - 이미 가입된 이메일
    /// * `ValidationError` - 레스토랑 정원 초과 (수락 대기 중인 초대 포함)
    /// * `AuthorizationError` - 비활성 레스토랑
    pub async fn invite(&self, actor: &AuthenticatedUser, request: InviteUserRequest) -> Result<UserResponse, AppError> {
        let restaurant_id = actor.require_restaurant()?;
        let restaurant = self
            .restaurant_repo
            .find_by_id(&restaurant_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Restaurant not found".to_string()))?;

        if !restaurant.is_active() {
            return Err(AppError::AuthorizationError(format!(
                "Restaurant is {}. Invitations are disabled.",
                restaurant.status.as_str()
            )));
        }

        let email = normalize_email(&request.email);
        if self.user_repo.exists_by_email(&email).await? {
            return Err(AppError::ConflictError("User already exists with this email".to_string()));
        }

        let members = self.user_repo.count_by_restaurant(&restaurant_id).await?;
        restaurant.ensure_capacity(members)?;

        let token = generate_hex_token(INVITATION_TOKEN_BYTES);
        let temporary_password_hash = hash_password(&generate_hex_token(TEMPORARY_PASSWORD_BYTES))?;

        let draft = InvitedUserDraft {
            first_name: request.first_name,
            last_name: request.last_name,
            email,
            phone_number: request.phone_number.as_deref().and_then(normalize_phone_number),
            temporary_password_hash,
            restaurant: restaurant_id,
            permissions: dedup_permissions(request.permissions),
            invited_by: actor.object_id()?,
            invitation_token_digest: digest(&token),
        };

        let invitee = self
            .user_repo
            .create(User::new_invitation(draft, DateTime::now()))
            .await?;

        if let Err(e) = self
            .email_service
            .send_invitation(&invitee, &actor.full_name, &restaurant.name, &token)
            .await
        {
            // 메일이 없으면 수락할 방법이 없으므로 자리를 되돌려 놓습니다.
            if let Some(id) = invitee.id {
                if let Err(cleanup) = self.user_repo.delete(&id).await {
                    log::error!("초대 롤백 실패 ({}): {}", mask_email(&invitee.email), cleanup);
                }
            }
            log::error!("초대 메일 발송 실패 ({}): {}", mask_email(&invitee.email), e);
            return Err(AppError::ExternalServiceError("Failed to send invitation email".to_string()));
        }

        log::info!(
            "직원 초대: {} → 레스토랑 {} (초대자 {})",
            mask_email(&invitee.email),
            restaurant_id.to_hex(),
            actor.user_id
        );
        Ok(UserResponse::from(&invitee))
    }

    /// 초대 수락. 비밀번호를 설정하고 계정을 활성화한 뒤 세션 토큰을 발급합니다.
    pub async fn accept(&self, request: AcceptInvitationRequest) -> Result<AuthResponse, AppError> {
        let token_digest = digest(&request.token);
        let invitee = self
            .user_repo
            .find_by_invitation_token(&token_digest)
            .await?
            .ok_or_else(|| AppError::ValidationError(INVALID_INVITATION.to_string()))?;

        let now = DateTime::now();
        invitee
            .check_invitation(&token_digest, now)
            .map_err(invitation_error)?;

        let password_hash = hash_password(&request.password)?;
        let activated = self
            .user_repo
            .consume_invitation(&token_digest, &password_hash, now)
            .await?
            .ok_or_else(|| AppError::ValidationError(INVALID_INVITATION.to_string()))?;

        log::info!("초대 수락: {}", mask_email(&activated.email));
        let token = self.token_service.issue(&activated)?;
        Ok(AuthResponse {
            token,
            user: UserResponse::from(&activated),
        })
    }

    pub async fn list_members(&self, actor: &AuthenticatedUser) -> Result<RestaurantUsersResponse, AppError> {
        let restaurant_id = actor.require_restaurant()?;
        let users: Vec<UserResponse> = self
            .user_repo
            .list_by_restaurant(&restaurant_id)
            .await?
            .iter()
            .map(UserResponse::from)
            .collect();

        Ok(RestaurantUsersResponse {
            count: users.len(),
            users,
        })
    }

    pub async fn update_permissions(
        &self,
        actor: &AuthenticatedUser,
        member_id: &str,
        permissions: Vec<Permission>,
    ) -> Result<UserResponse, AppError> {
        let restaurant_id = actor.require_restaurant()?;
        let member_id = parse_object_id(member_id, MEMBER_NOT_FOUND)?;

        let member = self
            .user_repo
            .find_in_restaurant(&member_id, &restaurant_id)
            .await?
            .ok_or_else(|| AppError::NotFound(MEMBER_NOT_FOUND.to_string()))?;

        if is_protected_member(&member) {
            return Err(AppError::AuthorizationError("Cannot modify admin permissions".to_string()));
        }

        let updated = self
            .user_repo
            .set_permissions(&member_id, &dedup_permissions(permissions))
            .await?
            .ok_or_else(|| AppError::NotFound(MEMBER_NOT_FOUND.to_string()))?;

        log::info!("권한 변경: 사용자 {} (변경자 {})", member_id.to_hex(), actor.user_id);
        Ok(UserResponse::from(&updated))
    }

    pub async fn remove_member(&self, actor: &AuthenticatedUser, member_id: &str) -> Result<(), AppError> {
        let restaurant_id = actor.require_restaurant()?;
        let member_id = parse_object_id(member_id, MEMBER_NOT_FOUND)?;

        if member_id == actor.object_id()? {
            return Err(AppError::ValidationError("You cannot remove yourself".to_string()));
        }

        let member = self
            .user_repo
            .find_in_restaurant(&member_id, &restaurant_id)
            .await?
            .ok_or_else(|| AppError::NotFound(MEMBER_NOT_FOUND.to_string()))?;

        if is_protected_member(&member) {
            return Err(AppError::AuthorizationError("Cannot remove restaurant admin".to_string()));
        }

        if !self.user_repo.delete(&member_id).await? {
            return Err(AppError::NotFound(MEMBER_NOT_FOUND.to_string()));
        }

        log::info!("직원 삭제: 사용자 {} (삭제자 {})", member_id.to_hex(), actor.user_id);
        Ok(())
    }
}
