//! # 인증 서비스
//!
//! 가입, 이메일 인증, 로그인, 비밀번호 재설정/변경 흐름을 담당합니다.
//!
//! ## 일회용 코드
//!
//! 6자리 코드는 이메일로만 전달되고 저장소에는 다이제스트만 남습니다.
//! 새 코드를 발급하면 이전 코드는 덮어써져 무효가 됩니다. 코드 소모는
//! [`UserRepository`] 의 조건부 갱신 한 번으로 처리되어 같은 코드가 두 번 쓰이지 않습니다.
//!
//! ## 로그인 실패 메시지
//!
//! 이메일이 없거나 비밀번호가 틀린 경우 모두 같은 401 메시지를 돌려줍니다.
//! 계정 상태(미인증, 정지, 초대 미수락)는 비밀번호가 맞은 뒤에만 구분해서 알려 줍니다.

use std::sync::Arc;

use mongodb::bson::DateTime;
use singleton_macro::service;

use crate::caching::redis::RedisClient;
use crate::config::VerificationConfig;
use crate::core::errors::AppError;
use crate::domain::dto::auth::{
    AuthResponse, ChangePasswordRequest, LoginRequest, RegisterRequest, RegistrationResponse,
    ResetPasswordRequest, VerifyEmailRequest,
};
use crate::domain::dto::users::UserResponse;
use crate::domain::entities::users::{AccountStatus, SecretCheckError, User};
use crate::repositories::users::UserRepository;
use crate::services::auth::password::{hash_password, verify_password};
use crate::services::auth::TokenService;
use crate::services::notifications::EmailService;
use crate::utils::codes::{digest, generate_numeric_code};
use crate::utils::phone::normalize_phone_number;
use crate::utils::string_utils::{mask_email, normalize_email};

pub const INVALID_CREDENTIALS: &str = "Invalid email or password";
pub const INVALID_VERIFICATION_CODE: &str = "Invalid verification code";
pub const EXPIRED_VERIFICATION_CODE: &str = "Verification code has expired. Please request a new one.";
pub const INVALID_RESET_CODE: &str = "Invalid or expired reset code";
pub const EXPIRED_RESET_CODE: &str = "Reset code has expired. Please request a new one.";
pub const REGISTRATION_EMAIL_FAILED: &str =
    "Account created but the verification email could not be sent. Please request a new code.";

#[service(name = "auth")]
pub struct AuthService {
    user_repo: Arc<UserRepository>,
    token_service: Arc<TokenService>,
    email_service: Arc<EmailService>,
    redis: Arc<RedisClient>,
}

/// 비밀번호가 맞은 사용자에게 로그인을 허용할지 판단합니다.
pub fn login_gate(user: &User, verification_required: bool) -> Result<(), AppError> {
    if verification_required && !user.is_verified {
        return Err(AppError::AuthorizationError(
            "Please verify your email before logging in".to_string(),
        ));
    }

    match user.account_status {
        AccountStatus::Active => Ok(()),
        AccountStatus::Suspended => Err(AppError::AuthorizationError(
            "Your account has been suspended. Please contact support.".to_string(),
        )),
        AccountStatus::Inactive => Err(AppError::AuthorizationError(
            "Your account is not active. Please accept your invitation first.".to_string(),
        )),
    }
}

fn verification_code_error(error: SecretCheckError) -> AppError {
    match error {
        SecretCheckError::Expired => AppError::ValidationError(EXPIRED_VERIFICATION_CODE.to_string()),
        SecretCheckError::Missing | SecretCheckError::Mismatch => {
            AppError::ValidationError(INVALID_VERIFICATION_CODE.to_string())
        }
    }
}

fn reset_code_error(error: SecretCheckError) -> AppError {
    match error {
        SecretCheckError::Expired => AppError::ValidationError(EXPIRED_RESET_CODE.to_string()),
        SecretCheckError::Missing | SecretCheckError::Mismatch => {
            AppError::ValidationError(INVALID_RESET_CODE.to_string())
        }
    }
}

fn resend_cooldown_key(email: &str) -> String {
    format!("auth:resend-verification:{}", email)
}

/// 재발송 쿨다운 중일 때의 429. `remaining` 을 모르면 쿨다운 전체 길이를 알려 줍니다.
pub(crate) fn cooldown_error(remaining: Option<u64>) -> AppError {
    let remaining = remaining.unwrap_or(VerificationConfig::RESEND_COOLDOWN_SECONDS);
    AppError::RateLimited(format!(
        "Please wait {} seconds before requesting a new code",
        remaining.max(1)
    ))
}

fn require_id(user: &User) -> Result<mongodb::bson::oid::ObjectId, AppError> {
    user.id
        .ok_or_else(|| AppError::InternalError("user without id".to_string()))
}

impl AuthService {
    /// 신규 가입
    ///
    /// 인증되지 않은 계정이라도 같은 이메일이 있으면 409 로 거부합니다.
    /// 인증 메일 발송에 실패해도 계정은 남으며, 재발송으로 복구할 수 있습니다.
    pub async fn register(&self, request: RegisterRequest) -> Result<RegistrationResponse, AppError> {
        let email = normalize_email(&request.email);

        if self.user_repo.exists_by_email(&email).await? {
            return Err(AppError::ConflictError("User already exists with this email".to_string()));
        }

        let phone_number = normalize_phone_number(&request.phone_number).ok_or_else(|| {
            AppError::ValidationError("Please provide a valid Cameroon phone number (e.g. 690119047)".to_string())
        })?;

        let password_hash = hash_password(&request.password)?;
        let now = DateTime::now();
        let code = generate_numeric_code();

        let mut user = User::new_registration(
            request.first_name,
            request.last_name,
            email,
            Some(phone_number),
            password_hash,
            now,
        );
        user.issue_verification_code(digest(&code), now);

        let user = self.user_repo.create(user).await?;
        log::info!("신규 가입: {}", mask_email(&user.email));

        if let Err(e) = self.email_service.send_verification_code(&user, &code).await {
            log::error!("가입 인증 메일 발송 실패 ({}): {}", mask_email(&user.email), e);
            return Err(AppError::ExternalServiceError(REGISTRATION_EMAIL_FAILED.to_string()));
        }

        // 쿨다운은 메일이 나간 뒤에만 시작합니다.
        self.start_resend_cooldown(&user.email).await;

        Ok(RegistrationResponse {
            user: UserResponse::from(&user),
            verification_expires_in_minutes: VerificationConfig::CODE_TTL_MINUTES,
        })
    }

    /// 인증 코드를 확인하고 세션 토큰을 발급합니다.
    pub async fn verify_email(&self, request: VerifyEmailRequest) -> Result<AuthResponse, AppError> {
        let email = normalize_email(&request.email);
        let user = self
            .user_repo
            .find_by_email(&email)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        if user.is_verified {
            return Err(AppError::ValidationError("Email is already verified".to_string()));
        }

        let now = DateTime::now();
        let code_digest = digest(&request.code);
        user.check_verification_code(&code_digest, now)
            .map_err(verification_code_error)?;

        let verified = self
            .user_repo
            .consume_verification_code(&require_id(&user)?, &code_digest, now)
            .await?
            .ok_or_else(|| AppError::ValidationError(INVALID_VERIFICATION_CODE.to_string()))?;

        log::info!("이메일 인증 완료: {}", mask_email(&verified.email));
        self.issue_session(verified).await
    }

    /// 새 인증 코드를 보냅니다. 이메일당 1분에 한 번까지 허용됩니다.
    pub async fn resend_verification(&self, email: &str) -> Result<(), AppError> {
        let email = normalize_email(email);
        let mut user = self
            .user_repo
            .find_by_email(&email)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        if user.is_verified {
            return Err(AppError::ValidationError("Email is already verified".to_string()));
        }

        if !self.start_resend_cooldown(&email).await {
            let remaining = self.redis.ttl(&resend_cooldown_key(&email)).await.ok().flatten();
            return Err(cooldown_error(remaining));
        }

        let code = generate_numeric_code();
        user.issue_verification_code(digest(&code), DateTime::now());
        self.user_repo.store_verification_code(&user).await?;
        if let Err(e) = self.email_service.send_verification_code(&user, &code).await {
            self.clear_resend_cooldown(&email).await;
            return Err(e);
        }

        log::info!("인증 코드 재발송: {}", mask_email(&email));
        Ok(())
    }

    /// 쿨다운을 시작합니다. 이미 진행 중이면 `false`.
    ///
    /// Redis 장애 시에는 제한 없이 통과시킵니다.
    async fn start_resend_cooldown(&self, email: &str) -> bool {
        match self
            .redis
            .set_if_absent(&resend_cooldown_key(email), "1", VerificationConfig::RESEND_COOLDOWN_SECONDS)
            .await
        {
            Ok(started) => started,
            Err(e) => {
                log::warn!("재발송 쿨다운 확인 실패: {}", e);
                true
            }
        }
    }

    async fn clear_resend_cooldown(&self, email: &str) {
        if let Err(e) = self.redis.del(&resend_cooldown_key(email)).await {
            log::warn!("재발송 쿨다운 해제 실패: {}", e);
        }
    }

    pub async fn login(&self, request: LoginRequest) -> Result<AuthResponse, AppError> {
        let email = normalize_email(&request.email);

        let Some(user) = self.user_repo.find_by_email(&email).await? else {
            log::warn!("로그인 실패 (미등록): {}", mask_email(&email));
            return Err(AppError::AuthenticationError(INVALID_CREDENTIALS.to_string()));
        };

        if !verify_password(&request.password, &user.password_hash) {
            log::warn!("로그인 실패 (비밀번호 불일치): {}", mask_email(&email));
            return Err(AppError::AuthenticationError(INVALID_CREDENTIALS.to_string()));
        }

        login_gate(&user, VerificationConfig::email_verification_required())?;

        self.user_repo.record_login(&require_id(&user)?, DateTime::now()).await?;
        log::info!("로그인: {}", mask_email(&email));
        self.issue_session(user).await
    }

    /// 재설정 코드 발송. 인증된 계정만 대상입니다.
    pub async fn forgot_password(&self, email: &str) -> Result<(), AppError> {
        let email = normalize_email(email);
        let mut user = self
            .user_repo
            .find_by_email(&email)
            .await?
            .filter(|user| user.is_verified)
            .ok_or_else(|| AppError::NotFound("No verified account found with this email".to_string()))?;

        let code = generate_numeric_code();
        user.issue_reset_code(digest(&code), DateTime::now());
        self.user_repo.store_reset_code(&user).await?;
        self.email_service.send_password_reset_code(&user, &code).await?;

        log::info!("비밀번호 재설정 코드 발송: {}", mask_email(&email));
        Ok(())
    }

    /// 재설정 코드로 비밀번호를 바꾸고 새 세션 토큰을 발급합니다.
    pub async fn reset_password(&self, request: ResetPasswordRequest) -> Result<AuthResponse, AppError> {
        let email = normalize_email(&request.email);
        let user = self
            .user_repo
            .find_by_email(&email)
            .await?
            .ok_or_else(|| AppError::ValidationError(INVALID_RESET_CODE.to_string()))?;

        let now = DateTime::now();
        let code_digest = digest(&request.code);
        user.check_reset_code(&code_digest, now).map_err(reset_code_error)?;

        let password_hash = hash_password(&request.password)?;
        let updated = self
            .user_repo
            .consume_reset_code(&require_id(&user)?, &code_digest, &password_hash, now)
            .await?
            .ok_or_else(|| AppError::ValidationError(INVALID_RESET_CODE.to_string()))?;

        log::info!("비밀번호 재설정 완료: {}", mask_email(&email));
        self.issue_session(updated).await
    }

    pub async fn profile(&self, user_id: &str) -> Result<UserResponse, AppError> {
        let user = self
            .user_repo
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
        Ok(UserResponse::from(&user))
    }

    pub async fn change_password(&self, user_id: &str, request: ChangePasswordRequest) -> Result<(), AppError> {
        let user = self
            .user_repo
            .find_with_credentials(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        if !verify_password(&request.current_password, &user.password_hash) {
            return Err(AppError::ValidationError("Current password is incorrect".to_string()));
        }

        let password_hash = hash_password(&request.new_password)?;
        self.user_repo
            .update_password(&require_id(&user)?, &password_hash, DateTime::now())
            .await?;

        log::info!("비밀번호 변경: {}", mask_email(&user.email));
        Ok(())
    }

    async fn issue_session(&self, user: User) -> Result<AuthResponse, AppError> {
        let token = self.token_service.issue(&user)?;
        Ok(AuthResponse {
            token,
            user: UserResponse::from(&user),
        })
    }
}
