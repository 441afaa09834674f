//! KYC HTTP Handlers
//!
//! 레스토랑 관리자 가입자가 사업자 정보와 서류를 제출하고 심사 상태를 확인합니다.
//! 심사(승인/반려)는 [`admin`](crate::handlers::admin) 핸들러가 담당합니다.

use actix_web::{get, post, web, HttpResponse};

use crate::core::errors::AppResult;
use crate::domain::dto::common::ApiResponse;
use crate::domain::dto::kyc::SubmitKycRequest;
use crate::domain::models::auth::AuthenticatedUser;
use crate::handlers::validate_request;
use crate::services::kyc::KycService;
use crate::utils::i18n::{translate, Locale, MessageKey};

/// KYC 신청서 제출
///
/// 상태가 `not_submitted` 또는 `rejected` 일 때만 제출할 수 있습니다.
#[utoipa::path(
    post,
    path = "/api/kyc/submit",
    tag = "KYC",
    security(("bearer_auth" = [])),
    request_body = SubmitKycRequest,
    responses(
        (status = 201, description = "Submission received"),
        (status = 400, description = "Validation failed"),
        (status = 409, description = "A submission is already pending or approved")
    )
)]
#[post("/submit")]
pub async fn submit_kyc(
    user: AuthenticatedUser,
    payload: web::Json<SubmitKycRequest>,
    locale: Locale,
) -> AppResult<HttpResponse> {
    let request = payload.into_inner();
    validate_request(&request)?;

    let submission = KycService::instance().submit(&user, request).await?;

    Ok(ApiResponse::success(translate(locale, MessageKey::KycSubmitted), submission).created())
}

#[utoipa::path(
    get,
    path = "/api/kyc/status",
    tag = "KYC",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "Current KYC status and latest submission"))
)]
#[get("/status")]
pub async fn kyc_status(user: AuthenticatedUser) -> AppResult<HttpResponse> {
    let status = KycService::instance().status(&user).await?;

    Ok(ApiResponse::success("KYC status retrieved successfully", status).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::json_config;
    use crate::middlewares::AuthMiddleware;
    use crate::domain::entities::users::{KycStatus, Role};
    use actix_web::dev::Service as _;
    use actix_web::http::StatusCode;
    use actix_web::{test, App, HttpMessage as _};
    use serde_json::json;

    #[actix_web::test]
    async fn test_submit_requires_authentication() {
        let app = test::init_service(
            App::new().app_data(json_config()).service(
                web::scope("/api/kyc")
                    .wrap(AuthMiddleware::kyc_applicant())
                    .service(submit_kyc)
                    .service(kyc_status),
            ),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/kyc/submit")
            .set_json(json!({ "restaurantName": "Chez Mama" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn test_submit_validation_runs_before_service() {
        // 미들웨어 없이 주체를 직접 넣어 검증 단계만 확인합니다.
        let app = test::init_service(
            App::new()
                .app_data(json_config())
                .wrap_fn(|req, srv| {
                    req.extensions_mut().insert(applicant());
                    srv.call(req)
                })
                .service(web::scope("/api/kyc").service(submit_kyc)),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/kyc/submit")
            .set_json(json!({ "restaurantName": "Chez Mama" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "Validation failed");
        assert!(body["errors"].as_array().map_or(0, Vec::len) > 1);
    }

    fn applicant() -> AuthenticatedUser {
        AuthenticatedUser {
            user_id: mongodb::bson::oid::ObjectId::new().to_hex(),
            email: "owner@example.com".into(),
            full_name: "Awa Fotso".into(),
            role: Role::RestaurantAdmin,
            permissions: vec![],
            restaurant_id: None,
            kyc_status: KycStatus::NotSubmitted,
            is_verified: true,
        }
    }
}
