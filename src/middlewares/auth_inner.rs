//! AuthMiddleware 인증 로직의 핵심적인 기능
//!
//! 토큰 검증 → 사용자 조회 → 계정 상태 확인 → 접근 규칙 확인 순서로 진행하며,
//! 실패하면 다음 서비스로 넘기지 않고 표준 에러 봉투로 바로 응답합니다.

use std::rc::Rc;

use actix_web::body::EitherBody;
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse};
use actix_web::http::header;
use actix_web::{Error, HttpMessage, ResponseError};
use futures_util::future::LocalBoxFuture;

use crate::config::VerificationConfig;
use crate::core::errors::AppError;
use crate::domain::entities::users::User;
use crate::domain::models::auth::{AccessRule, AuthenticatedUser};
use crate::repositories::users::UserRepository;
use crate::services::auth::{login_gate, TokenService, INVALID_TOKEN_MESSAGE};

pub const NOT_AUTHORIZED: &str = "Not authorized. Please login to access this resource.";
pub const ACCESS_DENIED: &str = "Access denied. Insufficient permissions.";
pub const KYC_REQUIRED: &str = "KYC approval required to access this resource";
pub const EMAIL_NOT_VERIFIED: &str = "Please verify your email before accessing this resource.";

/// 실제 인증 로직을 수행하는 서비스
pub struct AuthMiddlewareService<S> {
    pub service: Rc<S>,
    pub rule: AccessRule,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, actix_web::Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let rule = self.rule.clone();

        Box::pin(async move {
            match authenticate(&req, &rule).await {
                Ok(user) => {
                    log::debug!("인증 성공: 사용자 ID {} ({})", user.user_id, user.role.as_str());
                    req.extensions_mut().insert(user);
                }
                Err(err) => {
                    log::warn!("인증/인가 실패 {} {}: {}", req.method(), req.path(), err);
                    let response = err.error_response();
                    let (req, _) = req.into_parts();
                    return Ok(ServiceResponse::new(req, response).map_into_right_body());
                }
            }

            let res = service.call(req).await?;
            Ok(res.map_into_left_body())
        })
    }
}

async fn authenticate(req: &ServiceRequest, rule: &AccessRule) -> Result<AuthenticatedUser, AppError> {
    let token_service = TokenService::instance();

    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| token_service.extract_bearer_token(h))
        .ok_or_else(|| AppError::AuthenticationError(NOT_AUTHORIZED.to_string()))?;

    let claims = token_service.verify(token)?;

    // 토큰 발급 이후 삭제되었거나 정지된 계정을 걸러내기 위해 매번 조회합니다.
    let user = UserRepository::instance()
        .find_by_id(&claims.sub)
        .await?
        .ok_or_else(|| AppError::AuthenticationError(INVALID_TOKEN_MESSAGE.to_string()))?;

    authorize(&user, rule, VerificationConfig::email_verification_required())
}

/// 조회된 사용자에게 접근 규칙을 적용합니다.
pub(crate) fn authorize(
    user: &User,
    rule: &AccessRule,
    verification_required: bool,
) -> Result<AuthenticatedUser, AppError> {
    if verification_required && !user.is_verified {
        return Err(AppError::AuthorizationError(EMAIL_NOT_VERIFIED.to_string()));
    }
    login_gate(user, false)?;

    let principal = AuthenticatedUser::from_user(user)
        .ok_or_else(|| AppError::AuthenticationError(INVALID_TOKEN_MESSAGE.to_string()))?;

    if !rule.is_satisfied(&principal) {
        return Err(AppError::AuthorizationError(ACCESS_DENIED.to_string()));
    }
    if !rule.kyc_satisfied(&principal) {
        return Err(AppError::AuthorizationError(KYC_REQUIRED.to_string()));
    }

    Ok(principal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::users::{AccountStatus, KycStatus, Permission, Role};
    use crate::middlewares::AuthMiddleware;
    use actix_web::http::StatusCode;
    use actix_web::{test as atest, web, App, HttpResponse};
    use mongodb::bson::{oid::ObjectId, DateTime};

    fn member(role: Role, kyc_status: KycStatus, permissions: Vec<Permission>) -> User {
        let mut user = User::new_registration(
            "Awa".into(),
            "Fotso".into(),
            "owner@example.com".into(),
            None,
            "hash".into(),
            DateTime::now(),
        );
        user.id = Some(ObjectId::new());
        user.role = role;
        user.kyc_status = kyc_status;
        user.permissions = permissions;
        user.is_verified = true;
        user
    }

    fn message(result: Result<AuthenticatedUser, AppError>) -> String {
        match result {
            Err(AppError::AuthorizationError(msg)) => msg,
            other => panic!("expected authorization error, got {:?}", other),
        }
    }

    #[test]
    fn test_role_gate() {
        let staff = member(Role::RestaurantStaff, KycStatus::Approved, vec![]);
        let admin_only = AccessRule::roles(&[Role::SuperAdmin]);

        assert_eq!(message(authorize(&staff, &admin_only, false)), ACCESS_DENIED);
        assert!(authorize(&staff, &AccessRule::authenticated(), false).is_ok());
    }

    #[test]
    fn test_kyc_gate_runs_after_role_gate() {
        let rule = AccessRule::roles(&[Role::RestaurantAdmin]).with_kyc_approval();

        let pending = member(Role::RestaurantAdmin, KycStatus::Pending, vec![]);
        assert_eq!(message(authorize(&pending, &rule, false)), KYC_REQUIRED);

        let approved = member(Role::RestaurantAdmin, KycStatus::Approved, vec![]);
        let principal = authorize(&approved, &rule, false).unwrap();
        assert_eq!(principal.role, Role::RestaurantAdmin);
    }

    #[test]
    fn test_permission_opens_ingredient_routes() {
        let rule = AccessRule::roles(&[Role::RestaurantAdmin])
            .or_permissions(&[Permission::ManageIngredients])
            .with_kyc_approval();
        let cook = member(Role::RestaurantStaff, KycStatus::Approved, vec![Permission::ManageIngredients]);

        assert!(authorize(&cook, &rule, false).is_ok());
    }

    #[test]
    fn test_account_state_gates() {
        let mut user = member(Role::RestaurantAdmin, KycStatus::Approved, vec![]);
        user.is_verified = false;
        assert!(authorize(&user, &AccessRule::authenticated(), false).is_ok());
        assert_eq!(message(authorize(&user, &AccessRule::authenticated(), true)), EMAIL_NOT_VERIFIED);

        user.is_verified = true;
        user.account_status = AccountStatus::Suspended;
        assert!(message(authorize(&user, &AccessRule::authenticated(), true)).contains("suspended"));
    }

    #[actix_web::test]
    async fn test_missing_token_is_rejected_with_envelope() {
        let app = atest::init_service(
            App::new().service(
                web::scope("/api/kyc")
                    .wrap(AuthMiddleware::kyc_applicant())
                    .route("/status", web::get().to(HttpResponse::Ok)),
            ),
        )
        .await;

        let req = atest::TestRequest::get().uri("/api/kyc/status").to_request();
        let resp = atest::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let body: serde_json::Value = atest::read_body_json(resp).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], NOT_AUTHORIZED);
    }

    #[actix_web::test]
    async fn test_non_bearer_scheme_is_rejected() {
        let app = atest::init_service(
            App::new().service(
                web::scope("/api/admin")
                    .wrap(AuthMiddleware::super_admin())
                    .route("/stats", web::get().to(HttpResponse::Ok)),
            ),
        )
        .await;

        let req = atest::TestRequest::get()
            .uri("/api/admin/stats")
            .insert_header((header::AUTHORIZATION, "Basic dXNlcjpwYXNz"))
            .to_request();
        let resp = atest::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }
}
