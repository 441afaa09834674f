//! User Management HTTP Handlers
//!
//! 레스토랑 관리자의 직원 초대와 팀 관리, 그리고 초대받은 직원의 수락 엔드포인트입니다.
//!
//! # Endpoints
//!
//! - `POST /api/users/accept-invitation` (공개)
//! - `POST /api/users/invite`
//! - `GET /api/users/restaurant-users`
//! - `PATCH /api/users/{user_id}/permissions`
//! - `DELETE /api/users/{user_id}`

use actix_web::{delete, get, patch, post, web, HttpResponse};

use crate::core::errors::AppResult;
use crate::domain::dto::common::ApiResponse;
use crate::domain::dto::users::{AcceptInvitationRequest, InviteUserRequest, UpdatePermissionsRequest};
use crate::domain::models::auth::AuthenticatedUser;
use crate::handlers::validate_request;
use crate::middlewares::AuthMiddleware;
use crate::services::users::InvitationService;
use crate::utils::i18n::{translate, Locale, MessageKey};

/// 직원 초대
///
/// 비활성 계정을 만들고 7일 유효한 초대 링크를 이메일로 보냅니다.
#[utoipa::path(
    post,
    path = "/api/users/invite",
    tag = "Users",
    security(("bearer_auth" = [])),
    request_body = InviteUserRequest,
    responses(
        (status = 201, description = "Invitation sent"),
        (status = 400, description = "Validation failed or user limit reached"),
        (status = 403, description = "Restaurant is suspended or inactive"),
        (status = 409, description = "User already exists with this email")
    )
)]
#[post("/invite", wrap = "AuthMiddleware::restaurant_manager()")]
pub async fn invite_user(user: AuthenticatedUser, payload: web::Json<InviteUserRequest>) -> AppResult<HttpResponse> {
    let request = payload.into_inner();
    validate_request(&request)?;

    let invited = InvitationService::instance().invite(&user, request).await?;

    Ok(ApiResponse::success("Invitation sent successfully", invited).created())
}

/// 초대 수락
///
/// 비밀번호를 정하면 계정이 활성화되고 바로 로그인 토큰을 받습니다.
#[utoipa::path(
    post,
    path = "/api/users/accept-invitation",
    tag = "Users",
    request_body = AcceptInvitationRequest,
    responses(
        (status = 200, description = "Invitation accepted, session token issued"),
        (status = 400, description = "Invalid or expired invitation token")
    )
)]
#[post("/accept-invitation")]
pub async fn accept_invitation(
    payload: web::Json<AcceptInvitationRequest>,
    locale: Locale,
) -> AppResult<HttpResponse> {
    let request = payload.into_inner();
    validate_request(&request)?;

    let session = InvitationService::instance().accept(request).await?;

    Ok(ApiResponse::success(translate(locale, MessageKey::InvitationAccepted), session).ok())
}

#[utoipa::path(
    get,
    path = "/api/users/restaurant-users",
    tag = "Users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Members of the caller's restaurant"),
        (status = 400, description = "You are not assigned to a restaurant")
    )
)]
#[get("/restaurant-users", wrap = "AuthMiddleware::restaurant_manager()")]
pub async fn list_restaurant_users(user: AuthenticatedUser) -> AppResult<HttpResponse> {
    let members = InvitationService::instance().list_members(&user).await?;

    Ok(ApiResponse::success("Restaurant users retrieved successfully", members).ok())
}

#[utoipa::path(
    patch,
    path = "/api/users/{user_id}/permissions",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("user_id" = String, Path, description = "Member id")),
    request_body = UpdatePermissionsRequest,
    responses(
        (status = 200, description = "Permissions replaced"),
        (status = 403, description = "Cannot modify admin permissions"),
        (status = 404, description = "User not found in your restaurant")
    )
)]
#[patch("/{user_id}/permissions", wrap = "AuthMiddleware::restaurant_manager()")]
pub async fn update_permissions(
    user: AuthenticatedUser,
    path: web::Path<String>,
    payload: web::Json<UpdatePermissionsRequest>,
) -> AppResult<HttpResponse> {
    let request = payload.into_inner();
    validate_request(&request)?;

    let updated = InvitationService::instance()
        .update_permissions(&user, &path.into_inner(), request.permissions)
        .await?;

    Ok(ApiResponse::success("User permissions updated successfully", updated).ok())
}

#[utoipa::path(
    delete,
    path = "/api/users/{user_id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("user_id" = String, Path, description = "Member id")),
    responses(
        (status = 200, description = "Member removed"),
        (status = 400, description = "You cannot remove yourself"),
        (status = 403, description = "Cannot remove restaurant admin"),
        (status = 404, description = "User not found in your restaurant")
    )
)]
#[delete("/{user_id}", wrap = "AuthMiddleware::restaurant_manager()")]
pub async fn remove_user(user: AuthenticatedUser, path: web::Path<String>) -> AppResult<HttpResponse> {
    InvitationService::instance().remove_member(&user, &path.into_inner()).await?;

    Ok(ApiResponse::message_only("User removed successfully").ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::json_config;
    use crate::middlewares::NOT_AUTHORIZED;
    use actix_web::http::StatusCode;
    use actix_web::{test, App};
    use serde_json::{json, Value};

    #[actix_web::test]
    async fn test_accept_invitation_validates_before_lookup() {
        let app = test::init_service(
            App::new()
                .app_data(json_config())
                .service(web::scope("/api/users").service(accept_invitation)),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/users/accept-invitation")
            .set_json(json!({ "token": "", "password": "" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["errors"], json!(["Token and password are required"]));
    }

    #[actix_web::test]
    async fn test_team_routes_require_token() {
        let app = test::init_service(
            App::new().app_data(json_config()).service(
                web::scope("/api/users")
                    .service(accept_invitation)
                    .service(invite_user)
                    .service(list_restaurant_users),
            ),
        )
        .await;

        let req = test::TestRequest::get().uri("/api/users/restaurant-users").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], NOT_AUTHORIZED);
    }
}
