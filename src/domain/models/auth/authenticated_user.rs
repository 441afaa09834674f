//! 인증된 요청 주체
//!
//! 인증 미들웨어가 토큰 검증과 사용자 조회를 마친 뒤 요청 extensions 에 넣는 값입니다.
//! 핸들러는 추출자로 꺼내 씁니다.
//!
//! ```rust,ignore
//! async fn profile(user: AuthenticatedUser) -> AppResult<HttpResponse> { ... }
//! ```

use std::future::{ready, Ready};

use actix_web::{FromRequest, HttpMessage, HttpRequest};
use mongodb::bson::oid::ObjectId;
use serde::Serialize;

use crate::core::errors::AppError;
use crate::domain::entities::users::{KycStatus, Permission, Role, User};

#[derive(Debug, Clone, Serialize)]
pub struct AuthenticatedUser {
    pub user_id: String,
    pub email: String,
    pub full_name: String,
    pub role: Role,
    pub permissions: Vec<Permission>,
    pub restaurant_id: Option<String>,
    pub kyc_status: KycStatus,
    pub is_verified: bool,
}

impl AuthenticatedUser {
    pub fn from_user(user: &User) -> Option<Self> {
        Some(Self {
            user_id: user.id_string()?,
            email: user.email.clone(),
            full_name: user.full_name(),
            role: user.role,
            permissions: user.permissions.clone(),
            restaurant_id: user.restaurant_id(),
            kyc_status: user.kyc_status,
            is_verified: user.is_verified,
        })
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.role == role
    }

    pub fn has_any_role(&self, roles: &[Role]) -> bool {
        roles.contains(&self.role)
    }

    pub fn has_permission(&self, permission: Permission) -> bool {
        self.permissions.contains(&permission)
    }

    pub fn is_super_admin(&self) -> bool {
        self.has_role(Role::SuperAdmin)
    }

    pub fn object_id(&self) -> Result<ObjectId, AppError> {
        ObjectId::parse_str(&self.user_id)
            .map_err(|_| AppError::AuthenticationError("Invalid token. Please login again.".to_string()))
    }

    /// 소속 레스토랑. 없으면 테넌트 범위 작업을 할 수 없습니다.
    pub fn require_restaurant(&self) -> Result<ObjectId, AppError> {
        self.restaurant_id
            .as_deref()
            .and_then(|id| ObjectId::parse_str(id).ok())
            .ok_or_else(|| AppError::ValidationError("You are not assigned to a restaurant".to_string()))
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
        match req.extensions().get::<AuthenticatedUser>() {
            Some(user) => ready(Ok(user.clone())),
            None => ready(Err(AppError::AuthenticationError(
                "Not authorized. Please login to access this resource.".to_string(),
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    fn staff() -> AuthenticatedUser {
        AuthenticatedUser {
            user_id: ObjectId::new().to_hex(),
            email: "cook@example.com".into(),
            full_name: "Jean Kamga".into(),
            role: Role::RestaurantStaff,
            permissions: vec![Permission::ManageIngredients],
            restaurant_id: None,
            kyc_status: KycStatus::Approved,
            is_verified: true,
        }
    }

    #[test]
    fn test_role_and_permission_checks() {
        let user = staff();

        assert!(user.has_any_role(&[Role::RestaurantAdmin, Role::RestaurantStaff]));
        assert!(!user.is_super_admin());
        assert!(user.has_permission(Permission::ManageIngredients));
        assert!(!user.has_permission(Permission::ManageUsers));
        assert!(user.object_id().is_ok());
    }

    #[test]
    fn test_require_restaurant() {
        let mut user = staff();
        assert!(matches!(user.require_restaurant(), Err(AppError::ValidationError(_))));

        let restaurant = ObjectId::new();
        user.restaurant_id = Some(restaurant.to_hex());
        assert_eq!(user.require_restaurant().unwrap(), restaurant);
    }

    #[actix_web::test]
    async fn test_extractor_reads_extensions() {
        let req = TestRequest::default().to_http_request();
        assert!(AuthenticatedUser::extract(&req).await.is_err());

        req.extensions_mut().insert(staff());
        let extracted = AuthenticatedUser::extract(&req).await.unwrap();
        assert_eq!(extracted.email, "cook@example.com");
    }
}
