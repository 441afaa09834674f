//! API 라우트 설정 모듈
//!
//! 기능별 스코프와 각 스코프의 접근 규칙을 한곳에서 정의합니다.
//!
//! | 스코프 | 접근 |
//! |--------|------|
//! | `/`, `/health`, `/api-docs` | 공개 |
//! | `/api/auth` | 공개 + 요청 제한, `profile`/`change-password` 는 인증 필요 |
//! | `/api/users` | `accept-invitation` 공개, 나머지는 관리자 + KYC 승인 |
//! | `/api/kyc` | 레스토랑 관리자 |
//! | `/api/admin` | 슈퍼 관리자 |
//! | `/api/ingredients` | 관리자 또는 `manage_ingredients` 권한 + KYC 승인 |
//! | `/uploads` | 로컬 저장 이미지 정적 제공 |
//!
//! `/api/auth` 스코프는 워커 간에 요청 제한 상태를 공유해야 하므로 `main.rs` 에서
//! Governor 를 감싸 등록합니다.
//!
//! ```rust,ignore
//! App::new()
//!     .service(auth_scope().wrap(Governor::new(&governor_conf)))
//!     .configure(configure_all_routes)
//! ```

use actix_files::Files;
use actix_web::{web, Scope};

use crate::config::StorageConfig;
use crate::handlers;
use crate::middlewares::AuthMiddleware;
use crate::services::media::LOCAL_URL_PREFIX;

/// `/api/auth` 스코프 (요청 제한 미들웨어는 호출 측에서 감쌉니다)
pub fn auth_scope() -> Scope {
    web::scope("/api/auth")
        .service(handlers::auth::register)
        .service(handlers::auth::verify_email)
        .service(handlers::auth::resend_verification)
        .service(handlers::auth::login)
        .service(handlers::auth::forgot_password)
        .service(handlers::auth::reset_password)
        .service(handlers::auth::profile)
        .service(handlers::auth::change_password)
}

/// `/api/auth` 를 제외한 모든 라우트
pub fn configure_all_routes(cfg: &mut web::ServiceConfig) {
    configure_system_routes(cfg);
    configure_user_routes(cfg);
    configure_kyc_routes(cfg);
    configure_admin_routes(cfg);
    configure_ingredient_routes(cfg);
    configure_upload_routes(cfg);
}

fn configure_system_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(handlers::system::welcome)
        .service(handlers::system::health_check)
        .service(handlers::system::openapi_json)
        .service(handlers::system::api_docs_page);
}

/// 수락은 공개, 팀 관리 라우트는 핸들러에 붙은 `AuthMiddleware::restaurant_manager()` 로 보호됩니다.
fn configure_user_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/users")
            .service(handlers::users::accept_invitation)
            .service(handlers::users::invite_user)
            .service(handlers::users::list_restaurant_users)
            .service(handlers::users::update_permissions)
            .service(handlers::users::remove_user),
    );
}

fn configure_kyc_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/kyc")
            .wrap(AuthMiddleware::kyc_applicant())
            .service(handlers::kyc::submit_kyc)
            .service(handlers::kyc::kyc_status),
    );
}

fn configure_admin_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/admin")
            .wrap(AuthMiddleware::super_admin())
            .service(handlers::admin::list_kyc_submissions)
            .service(handlers::admin::get_kyc_submission)
            .service(handlers::admin::start_kyc_review)
            .service(handlers::admin::approve_kyc)
            .service(handlers::admin::reject_kyc)
            .service(handlers::admin::list_restaurants)
            .service(handlers::admin::get_restaurant)
            .service(handlers::admin::update_restaurant_status)
            .service(handlers::admin::system_stats),
    );
}

fn configure_ingredient_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/ingredients")
            .wrap(AuthMiddleware::ingredient_manager())
            .service(handlers::ingredients::create_ingredient)
            .service(handlers::ingredients::list_ingredients)
            .service(handlers::ingredients::get_ingredient)
            .service(handlers::ingredients::upload_ingredient_image)
            .service(handlers::ingredients::delete_ingredient_image),
    );
}

fn configure_upload_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(Files::new(LOCAL_URL_PREFIX, StorageConfig::upload_dir()));
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::{test, App};

    #[actix_web::test]
    async fn test_public_and_protected_routes() {
        let app = test::init_service(
            App::new()
                .app_data(handlers::json_config())
                .service(auth_scope())
                .configure(configure_all_routes)
                .default_service(web::to(handlers::system::not_found)),
        )
        .await;

        let cases = [
            (test::TestRequest::get().uri("/health"), StatusCode::OK),
            (test::TestRequest::get().uri("/"), StatusCode::OK),
            (test::TestRequest::get().uri("/api/auth/profile"), StatusCode::UNAUTHORIZED),
            (test::TestRequest::get().uri("/api/users/restaurant-users"), StatusCode::UNAUTHORIZED),
            (test::TestRequest::get().uri("/api/kyc/status"), StatusCode::UNAUTHORIZED),
            (test::TestRequest::get().uri("/api/admin/stats"), StatusCode::UNAUTHORIZED),
            (test::TestRequest::get().uri("/api/ingredients"), StatusCode::UNAUTHORIZED),
            (test::TestRequest::get().uri("/api/unknown"), StatusCode::NOT_FOUND),
        ];

        for (req, expected) in cases {
            let resp = test::call_service(&app, req.to_request()).await;
            assert_eq!(resp.status(), expected, "{}", resp.request().path());
        }
    }
}
