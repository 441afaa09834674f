//! OpenAPI 문서
//!
//! 핸들러의 `#[utoipa::path]` 를 모아 `/api-docs/openapi.json` 으로 제공합니다.
//! 요청 본문 스키마는 경로 선언에서 자동으로 수집됩니다.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::entities::kyc::KycSubmissionStatus;
use crate::domain::entities::restaurants::RestaurantStatus;
use crate::domain::entities::users::{AccountStatus, KycStatus, Permission, Role};
use crate::handlers;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Djulah Restaurant Management API",
        description = "Authentication, team management, KYC onboarding and ingredient images for restaurant tenants"
    ),
    paths(
        handlers::system::health_check,
        handlers::system::welcome,
        handlers::auth::register,
        handlers::auth::verify_email,
        handlers::auth::resend_verification,
        handlers::auth::login,
        handlers::auth::forgot_password,
        handlers::auth::reset_password,
        handlers::auth::profile,
        handlers::auth::change_password,
        handlers::users::invite_user,
        handlers::users::accept_invitation,
        handlers::users::list_restaurant_users,
        handlers::users::update_permissions,
        handlers::users::remove_user,
        handlers::kyc::submit_kyc,
        handlers::kyc::kyc_status,
        handlers::admin::list_kyc_submissions,
        handlers::admin::get_kyc_submission,
        handlers::admin::start_kyc_review,
        handlers::admin::approve_kyc,
        handlers::admin::reject_kyc,
        handlers::admin::list_restaurants,
        handlers::admin::get_restaurant,
        handlers::admin::update_restaurant_status,
        handlers::admin::system_stats,
        handlers::ingredients::create_ingredient,
        handlers::ingredients::list_ingredients,
        handlers::ingredients::get_ingredient,
        handlers::ingredients::upload_ingredient_image,
        handlers::ingredients::delete_ingredient_image,
    ),
    components(schemas(Role, Permission, AccountStatus, KycStatus, KycSubmissionStatus, RestaurantStatus)),
    modifiers(&BearerAuth),
    tags(
        (name = "System"),
        (name = "Authentication", description = "Registration, verification, login and passwords"),
        (name = "Users", description = "Invitations and team management"),
        (name = "KYC", description = "Restaurant onboarding"),
        (name = "Admin", description = "Super admin operations"),
        (name = "Ingredients", description = "Ingredient catalogue and images")
    )
)]
pub struct ApiDoc;

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bearer_scheme_registered() {
        let doc = serde_json::to_value(ApiDoc::openapi()).unwrap();

        assert_eq!(doc["components"]["securitySchemes"]["bearer_auth"]["scheme"], "bearer");
        assert!(doc["paths"]["/api/ingredients/{id}/image"]["delete"].is_object());
    }
}
