//! Super Admin HTTP Handlers
//!
//! KYC 심사, 레스토랑 상태 관리, 시스템 통계 엔드포인트입니다.
//! 모든 경로는 `AuthMiddleware::super_admin()` 스코프 아래에 등록됩니다.

use actix_web::{get, patch, post, web, HttpResponse};

use crate::core::errors::{AppError, AppResult};
use crate::domain::dto::admin::{
    ApproveKycRequest, RejectKycRequest, StatusListQuery, UpdateRestaurantStatusRequest,
};
use crate::domain::dto::common::ApiResponse;
use crate::domain::models::auth::AuthenticatedUser;
use crate::handlers::validate_request;
use crate::services::admin::{RestaurantService, INVALID_RESTAURANT_STATUS};
use crate::services::kyc::KycService;

/// KYC 신청 목록 (`?status=&page=&limit=`)
#[utoipa::path(
    get,
    path = "/api/admin/kyc-submissions",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(
        ("status" = Option<String>, Query, description = "pending | under_review | approved | rejected"),
        ("page" = Option<u64>, Query, description = "Page number, default 1"),
        ("limit" = Option<u64>, Query, description = "Page size, default 20, max 100")
    ),
    responses(
        (status = 200, description = "Paginated submissions"),
        (status = 400, description = "Unknown status filter")
    )
)]
#[get("/kyc-submissions")]
pub async fn list_kyc_submissions(query: web::Query<StatusListQuery>) -> AppResult<HttpResponse> {
    let page = KycService::instance().list(&query).await?;

    Ok(ApiResponse::success("KYC submissions retrieved successfully", page).ok())
}

#[utoipa::path(
    get,
    path = "/api/admin/kyc-submissions/{id}",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Submission id")),
    responses(
        (status = 200, description = "Submission with applicant summary"),
        (status = 404, description = "KYC submission not found")
    )
)]
#[get("/kyc-submissions/{id}")]
pub async fn get_kyc_submission(path: web::Path<String>) -> AppResult<HttpResponse> {
    let submission = KycService::instance().get(&path.into_inner()).await?;

    Ok(ApiResponse::success("KYC submission retrieved successfully", submission).ok())
}

/// 심사 시작 (`pending → under_review`)
#[utoipa::path(
    post,
    path = "/api/admin/kyc-submissions/{id}/review",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Submission id")),
    responses(
        (status = 200, description = "Submission is under review"),
        (status = 409, description = "Submission is not pending")
    )
)]
#[post("/kyc-submissions/{id}/review")]
pub async fn start_kyc_review(user: AuthenticatedUser, path: web::Path<String>) -> AppResult<HttpResponse> {
    let submission = KycService::instance().start_review(&user, &path.into_inner()).await?;

    Ok(ApiResponse::success("KYC submission marked as under review", submission).ok())
}

/// 승인. 레스토랑이 생성되고 신청자가 그 관리자가 됩니다.
#[utoipa::path(
    post,
    path = "/api/admin/kyc-submissions/{id}/approve",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Submission id")),
    request_body = ApproveKycRequest,
    responses(
        (status = 200, description = "Approved, restaurant created"),
        (status = 404, description = "KYC submission not found"),
        (status = 409, description = "Submission has already been processed")
    )
)]
#[post("/kyc-submissions/{id}/approve")]
pub async fn approve_kyc(
    user: AuthenticatedUser,
    path: web::Path<String>,
    payload: Option<web::Json<ApproveKycRequest>>,
) -> AppResult<HttpResponse> {
    let request = payload.map(web::Json::into_inner).unwrap_or_default();
    validate_request(&request)?;

    let approval = KycService::instance()
        .approve(&user, &path.into_inner(), request.review_notes)
        .await?;

    Ok(ApiResponse::success("KYC approved and restaurant created successfully", approval).ok())
}

#[utoipa::path(
    post,
    path = "/api/admin/kyc-submissions/{id}/reject",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Submission id")),
    request_body = RejectKycRequest,
    responses(
        (status = 200, description = "Rejected"),
        (status = 400, description = "Rejection reason is required"),
        (status = 409, description = "Submission has already been processed")
    )
)]
#[post("/kyc-submissions/{id}/reject")]
pub async fn reject_kyc(
    user: AuthenticatedUser,
    path: web::Path<String>,
    payload: web::Json<RejectKycRequest>,
) -> AppResult<HttpResponse> {
    let request = payload.into_inner();
    validate_request(&request)?;

    let submission = KycService::instance()
        .reject(&user, &path.into_inner(), &request.rejection_reason, request.review_notes)
        .await?;

    Ok(ApiResponse::success("KYC submission rejected", submission).ok())
}

#[utoipa::path(
    get,
    path = "/api/admin/restaurants",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(
        ("status" = Option<String>, Query, description = "active | suspended | inactive"),
        ("page" = Option<u64>, Query, description = "Page number, default 1"),
        ("limit" = Option<u64>, Query, description = "Page size, default 20, max 100")
    ),
    responses((status = 200, description = "Paginated restaurants"))
)]
#[get("/restaurants")]
pub async fn list_restaurants(query: web::Query<StatusListQuery>) -> AppResult<HttpResponse> {
    let page = RestaurantService::instance().list(&query).await?;

    Ok(ApiResponse::success("Restaurants retrieved successfully", page).ok())
}

#[utoipa::path(
    get,
    path = "/api/admin/restaurants/{id}",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Restaurant id")),
    responses(
        (status = 200, description = "Restaurant with owner and usage stats"),
        (status = 404, description = "Restaurant not found")
    )
)]
#[get("/restaurants/{id}")]
pub async fn get_restaurant(path: web::Path<String>) -> AppResult<HttpResponse> {
    let detail = RestaurantService::instance().detail(&path.into_inner()).await?;

    Ok(ApiResponse::success("Restaurant retrieved successfully", detail).ok())
}

#[utoipa::path(
    patch,
    path = "/api/admin/restaurants/{id}/status",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Restaurant id")),
    request_body = UpdateRestaurantStatusRequest,
    responses(
        (status = 200, description = "Status updated"),
        (status = 400, description = "Invalid status"),
        (status = 404, description = "Restaurant not found")
    )
)]
#[patch("/restaurants/{id}/status")]
pub async fn update_restaurant_status(
    user: AuthenticatedUser,
    path: web::Path<String>,
    payload: web::Json<UpdateRestaurantStatusRequest>,
) -> AppResult<HttpResponse> {
    let request = payload.into_inner();
    validate_request(&request)?;
    let status = request
        .parsed_status()
        .ok_or_else(|| AppError::ValidationError(INVALID_RESTAURANT_STATUS.to_string()))?;

    let restaurant = RestaurantService::instance()
        .update_status(&user, &path.into_inner(), status)
        .await?;

    Ok(ApiResponse::success("Restaurant status updated successfully", restaurant).ok())
}

#[utoipa::path(
    get,
    path = "/api/admin/stats",
    tag = "Admin",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "Active restaurants, active users and KYC counts"))
)]
#[get("/stats")]
pub async fn system_stats() -> AppResult<HttpResponse> {
    let stats = RestaurantService::instance().system_stats().await?;

    Ok(ApiResponse::success("System statistics retrieved successfully", stats).ok())
}
