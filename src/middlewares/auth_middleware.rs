//! 인증/인가 미들웨어
//!
//! 스코프마다 [`AccessRule`] 하나를 붙여 Bearer 토큰 검증, 사용자 조회,
//! 역할/권한 확인, KYC 승인 확인을 한 번에 수행합니다.
//!
//! ```rust,ignore
//! web::scope("/api/admin")
//!     .wrap(AuthMiddleware::super_admin())
//!     .service(handlers::admin::list_kyc_submissions)
//! ```

use std::future::{ready, Ready};
use std::rc::Rc;

use actix_web::{
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    Error, Result,
};

use crate::domain::entities::users::{Permission, Role};
use crate::domain::models::auth::AccessRule;
use crate::middlewares::auth_inner::AuthMiddlewareService;

pub struct AuthMiddleware {
    rule: AccessRule,
}

impl AuthMiddleware {
    pub fn new(rule: AccessRule) -> Self {
        Self { rule }
    }

    /// 로그인한 사용자면 누구나
    pub fn authenticated() -> Self {
        Self::new(AccessRule::authenticated())
    }

    pub fn super_admin() -> Self {
        Self::new(AccessRule::roles(&[Role::SuperAdmin]))
    }

    /// 팀 관리 (초대, 권한 변경, 제거)
    pub fn restaurant_manager() -> Self {
        Self::new(AccessRule::roles(&[Role::RestaurantAdmin, Role::SuperAdmin]).with_kyc_approval())
    }

    /// KYC 제출/조회. 승인 전이므로 KYC 조건은 없습니다.
    pub fn kyc_applicant() -> Self {
        Self::new(AccessRule::roles(&[Role::RestaurantAdmin]))
    }

    pub fn ingredient_manager() -> Self {
        Self::new(
            AccessRule::roles(&[Role::RestaurantAdmin, Role::SuperAdmin])
                .or_permissions(&[Permission::ManageIngredients])
                .with_kyc_approval(),
        )
    }
}

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = AuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service: Rc::new(service),
            rule: self.rule.clone(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets() {
        assert_eq!(AuthMiddleware::authenticated().rule, AccessRule::default());

        let manager = AuthMiddleware::restaurant_manager().rule;
        assert!(manager.require_kyc_approval);
        assert!(manager.permissions.is_empty());

        let applicant = AuthMiddleware::kyc_applicant().rule;
        assert_eq!(applicant.roles, vec![Role::RestaurantAdmin]);
        assert!(!applicant.require_kyc_approval);

        let ingredients = AuthMiddleware::ingredient_manager().rule;
        assert_eq!(ingredients.permissions, vec![Permission::ManageIngredients]);
    }
}
