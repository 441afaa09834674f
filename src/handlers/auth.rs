//! Authentication HTTP Handlers
//!
//! 가입, 이메일 인증, 로그인, 비밀번호 재설정/변경 엔드포인트입니다.
//! 성공 메시지는 요청의 [`Locale`] 에 맞춰 번역됩니다.
//!
//! # Endpoints
//!
//! - `POST /api/auth/register`
//! - `POST /api/auth/verify-email`
//! - `POST /api/auth/resend-verification`
//! - `POST /api/auth/login`
//! - `POST /api/auth/forgot-password`
//! - `POST /api/auth/reset-password`
//! - `GET /api/auth/profile` (인증 필요)
//! - `PUT /api/auth/change-password` (인증 필요)

use actix_web::{get, post, put, web, HttpResponse};

use crate::core::errors::AppResult;
use crate::domain::dto::auth::{
    ChangePasswordRequest, EmailOnlyRequest, LoginRequest, RegisterRequest, ResetPasswordRequest,
    VerifyEmailRequest,
};
use crate::domain::dto::common::ApiResponse;
use crate::domain::models::auth::AuthenticatedUser;
use crate::handlers::validate_request;
use crate::middlewares::AuthMiddleware;
use crate::services::auth::AuthService;
use crate::utils::i18n::{translate, Locale, MessageKey};

/// 회원 가입
///
/// 계정을 만들고 6자리 인증 코드를 이메일로 보냅니다.
#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "Authentication",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Registration successful"),
        (status = 400, description = "Validation failed"),
        (status = 409, description = "User already exists with this email")
    )
)]
#[post("/register")]
pub async fn register(payload: web::Json<RegisterRequest>, locale: Locale) -> AppResult<HttpResponse> {
    let request = payload.into_inner();
    validate_request(&request)?;

    let registration = AuthService::instance().register(request).await?;

    Ok(ApiResponse::success(translate(locale, MessageKey::RegistrationSuccess), registration).created())
}

#[utoipa::path(
    post,
    path = "/api/auth/verify-email",
    tag = "Authentication",
    request_body = VerifyEmailRequest,
    responses(
        (status = 200, description = "Email verified, session token issued"),
        (status = 400, description = "Invalid or expired code"),
        (status = 404, description = "User not found")
    )
)]
#[post("/verify-email")]
pub async fn verify_email(payload: web::Json<VerifyEmailRequest>, locale: Locale) -> AppResult<HttpResponse> {
    let request = payload.into_inner();
    validate_request(&request)?;

    let session = AuthService::instance().verify_email(request).await?;

    Ok(ApiResponse::success(translate(locale, MessageKey::EmailVerified), session).ok())
}

/// 인증 코드 재발송 (이메일 당 분당 1회)
#[utoipa::path(
    post,
    path = "/api/auth/resend-verification",
    tag = "Authentication",
    request_body = EmailOnlyRequest,
    responses(
        (status = 200, description = "New code sent"),
        (status = 400, description = "Email is already verified"),
        (status = 404, description = "User not found"),
        (status = 429, description = "Cooldown not elapsed")
    )
)]
#[post("/resend-verification")]
pub async fn resend_verification(payload: web::Json<EmailOnlyRequest>, locale: Locale) -> AppResult<HttpResponse> {
    let request = payload.into_inner();
    validate_request(&request)?;

    AuthService::instance().resend_verification(&request.email).await?;

    Ok(ApiResponse::message_only(translate(locale, MessageKey::VerificationCodeSent)).ok())
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful"),
        (status = 401, description = "Invalid email or password"),
        (status = 403, description = "Unverified, suspended or not yet activated account")
    )
)]
#[post("/login")]
pub async fn login(payload: web::Json<LoginRequest>, locale: Locale) -> AppResult<HttpResponse> {
    let request = payload.into_inner();
    validate_request(&request)?;

    let session = AuthService::instance().login(request).await?;

    Ok(ApiResponse::success(translate(locale, MessageKey::LoginSuccess), session).ok())
}

#[utoipa::path(
    post,
    path = "/api/auth/forgot-password",
    tag = "Authentication",
    request_body = EmailOnlyRequest,
    responses(
        (status = 200, description = "Reset code sent"),
        (status = 404, description = "No verified account found with this email")
    )
)]
#[post("/forgot-password")]
pub async fn forgot_password(payload: web::Json<EmailOnlyRequest>, locale: Locale) -> AppResult<HttpResponse> {
    let request = payload.into_inner();
    validate_request(&request)?;

    AuthService::instance().forgot_password(&request.email).await?;

    Ok(ApiResponse::message_only(translate(locale, MessageKey::ResetCodeSent)).ok())
}

#[utoipa::path(
    post,
    path = "/api/auth/reset-password",
    tag = "Authentication",
    request_body = ResetPasswordRequest,
    responses(
        (status = 200, description = "Password reset, session token issued"),
        (status = 400, description = "Invalid or expired reset code")
    )
)]
#[post("/reset-password")]
pub async fn reset_password(payload: web::Json<ResetPasswordRequest>, locale: Locale) -> AppResult<HttpResponse> {
    let request = payload.into_inner();
    validate_request(&request)?;

    let session = AuthService::instance().reset_password(request).await?;

    Ok(ApiResponse::success(translate(locale, MessageKey::PasswordReset), session).ok())
}

#[utoipa::path(
    get,
    path = "/api/auth/profile",
    tag = "Authentication",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current user"),
        (status = 401, description = "Not authorized")
    )
)]
#[get("/profile", wrap = "AuthMiddleware::authenticated()")]
pub async fn profile(user: AuthenticatedUser, locale: Locale) -> AppResult<HttpResponse> {
    let profile = AuthService::instance().profile(&user.user_id).await?;

    Ok(ApiResponse::success(translate(locale, MessageKey::ProfileRetrieved), profile).ok())
}

#[utoipa::path(
    put,
    path = "/api/auth/change-password",
    tag = "Authentication",
    security(("bearer_auth" = [])),
    request_body = ChangePasswordRequest,
    responses(
        (status = 200, description = "Password changed"),
        (status = 400, description = "Current password is incorrect or policy violated"),
        (status = 401, description = "Not authorized")
    )
)]
#[put("/change-password", wrap = "AuthMiddleware::authenticated()")]
pub async fn change_password(
    user: AuthenticatedUser,
    payload: web::Json<ChangePasswordRequest>,
    locale: Locale,
) -> AppResult<HttpResponse> {
    let request = payload.into_inner();
    validate_request(&request)?;

    AuthService::instance().change_password(&user.user_id, request).await?;

    Ok(ApiResponse::message_only(translate(locale, MessageKey::PasswordChanged)).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::{json_config, INVALID_REQUEST_BODY};
    use crate::middlewares::rate_limit_envelope;
    use crate::services::auth::auth_service::cooldown_error;
    use actix_web::http::StatusCode;
    use actix_web::middleware::from_fn;
    use actix_web::{test, App};
    use serde_json::{json, Value};

    macro_rules! auth_app {
        () => {
            test::init_service(
                App::new().app_data(json_config()).service(
                    web::scope("/api/auth")
                        .service(register)
                        .service(login)
                        .service(verify_email)
                        .service(reset_password),
                ),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn test_register_reports_every_violation() {
        let app = auth_app!();
        let req = test::TestRequest::post()
            .uri("/api/auth/register")
            .set_json(json!({
                "firstName": "Awa",
                "email": "not-an-email",
                "password": "short",
                "confirmPassword": "different"
            }))
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "Validation failed");
        let errors: Vec<String> = serde_json::from_value(body["errors"].clone()).unwrap();
        assert_eq!(
            errors,
            vec![
                "Last name is required",
                "Please provide a valid email address",
                "Phone number is required",
                "Password must be at least 8 characters long",
                "Password must contain at least one uppercase letter",
                "Password must contain at least one number",
                "Password must contain at least one special character (e.g. !@#$%^&*)",
                "Passwords do not match",
            ]
        );
    }

    // 검증 실패는 서비스 인스턴스를 가져오기 전에 응답하므로 계정이 만들어지지 않습니다.
    #[actix_web::test]
    async fn test_weak_password_is_rejected_before_account_creation() {
        let app = auth_app!();
        let req = test::TestRequest::post()
            .uri("/api/auth/register")
            .set_json(json!({
                "firstName": "Awa",
                "lastName": "Fotso",
                "email": "awa@example.com",
                "phoneNumber": "690119047",
                "password": "weakpass",
                "confirmPassword": "weakpass"
            }))
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["success"], false);
        assert!(body["data"].is_null());
        let errors: Vec<String> = serde_json::from_value(body["errors"].clone()).unwrap();
        assert_eq!(
            errors,
            vec![
                "Password must contain at least one uppercase letter",
                "Password must contain at least one number",
                "Password must contain at least one special character (e.g. !@#$%^&*)",
            ]
        );
    }

    #[actix_web::test]
    async fn test_resend_cooldown_reaches_client_with_remaining_seconds() {
        async fn cooling_down() -> AppResult<HttpResponse> {
            Err(cooldown_error(Some(42)))
        }

        let app = test::init_service(
            App::new().app_data(json_config()).service(
                web::scope("/api/auth")
                    .wrap(from_fn(rate_limit_envelope))
                    .service(resend_verification)
                    .route("/resend-verification-cooldown", web::post().to(cooling_down)),
            ),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/auth/resend-verification-cooldown")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Please wait 42 seconds before requesting a new code");

        let req = test::TestRequest::post()
            .uri("/api/auth/resend-verification")
            .set_json(json!({ "email": "nope" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_login_requires_credentials() {
        let app = auth_app!();
        let req = test::TestRequest::post()
            .uri("/api/auth/login")
            .set_json(json!({ "email": "" }))
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["success"], false);
        assert!(body["data"].is_null());
    }

    #[actix_web::test]
    async fn test_malformed_json_uses_envelope() {
        let app = auth_app!();
        let req = test::TestRequest::post()
            .uri("/api/auth/login")
            .insert_header(("content-type", "application/json"))
            .set_payload("{\"email\": ")
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], INVALID_REQUEST_BODY);
    }

    #[actix_web::test]
    async fn test_verification_code_must_be_six_digits() {
        let app = auth_app!();
        let req = test::TestRequest::post()
            .uri("/api/auth/verify-email")
            .set_json(json!({ "email": "owner@example.com", "code": "12ab" }))
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_profile_requires_token() {
        let app = test::init_service(App::new().service(web::scope("/api/auth").service(profile))).await;
        let req = test::TestRequest::get().uri("/api/auth/profile").to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }
}
