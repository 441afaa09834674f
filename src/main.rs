//! Djulah 레스토랑 관리 백엔드 메인 애플리케이션
//!
//! MongoDB, Redis 연결과 싱글톤 레지스트리를 초기화한 뒤
//! Actix-web HTTP 서버를 구동합니다.

use std::io;
use std::sync::Arc;

use actix_cors::Cors;
use actix_governor::{Governor, GovernorConfigBuilder};
use actix_web::http::header;
use actix_web::middleware::{self, from_fn};
use actix_web::{web, App, HttpServer};
use dotenv::dotenv;
use env_logger::Env;
use log::{error, info, warn};

use restaurant_auth_backend::caching::redis::RedisClient;
use restaurant_auth_backend::config::{
    CorsConfig, Environment, JwtConfig, RateLimitConfig, ServerConfig, StorageConfig,
};
use restaurant_auth_backend::core::registry::ServiceLocator;
use restaurant_auth_backend::db::Database;
use restaurant_auth_backend::handlers;
use restaurant_auth_backend::middlewares::{negotiate_locale, rate_limit_envelope};
use restaurant_auth_backend::repositories::{
    ingredients::IngredientRepository, kyc::KycRepository, restaurants::RestaurantRepository,
    users::UserRepository,
};
use restaurant_auth_backend::routes::{auth_scope, configure_all_routes};
use restaurant_auth_backend::utils::display_terminal::print_server_banner;

#[actix_web::main]
async fn main() -> io::Result<()> {
    load_env_file();
    init_logging();
    handlers::system::mark_started();

    info!("🚀 Djulah 백엔드 시작중...");

    JwtConfig::secret().map_err(|e| {
        error!("JWT 설정 오류: {}", e);
        io::Error::other(e)
    })?;

    let (database, redis_client) = initialize_data_stores().await?;

    ServiceLocator::set(database);
    ServiceLocator::set(redis_client);

    ServiceLocator::initialize_all().await.map_err(|e| {
        error!("서비스 초기화 실패: {}", e);
        io::Error::other(e.to_string())
    })?;

    info!("✅ 모든 서비스가 성공적으로 초기화되었습니다!");

    ensure_indexes().await;
    prepare_upload_dir()?;

    start_http_server().await
}

/// HTTP 서버를 구성하고 실행합니다
///
/// 미들웨어는 바깥에서 안쪽 순서로 보안 헤더, CORS, 접근 로그, 경로 정규화,
/// 로케일 협상입니다. `/api/auth` 스코프에만 IP 기반 요청 제한이 걸립니다.
///
/// # Errors
///
/// * `std::io::Error` - 요청 제한 설정 오류, 포트 바인딩 실패 또는 서버 실행 오류
async fn start_http_server() -> io::Result<()> {
    let bind_address = format!("{}:{}", ServerConfig::host(), ServerConfig::port());
    let environment = Environment::current();

    // 워커 간에 한도를 공유하도록 클로저 밖에서 한 번만 만듭니다.
    let requests = RateLimitConfig::requests_per_window();
    let window = RateLimitConfig::window_seconds();
    let governor_conf = GovernorConfigBuilder::default()
        .milliseconds_per_request(RateLimitConfig::replenish_interval_ms(requests, window))
        .burst_size(requests)
        .finish()
        .ok_or_else(|| io::Error::other("요청 제한 설정이 올바르지 않습니다"))?;

    info!("🛡️ /api/auth 요청 제한: {}초당 {}회", window, requests);

    print_server_banner(&bind_address, environment.as_str(), "/api-docs");

    HttpServer::new(move || {
        App::new()
            .wrap(security_headers())
            .wrap(configure_cors(&Environment::current()))
            .wrap(middleware::Logger::default())
            .wrap(middleware::NormalizePath::trim())
            .wrap(from_fn(negotiate_locale))
            .app_data(handlers::json_config())
            .service(
                auth_scope()
                    .wrap(Governor::new(&governor_conf))
                    .wrap(from_fn(rate_limit_envelope)),
            )
            .configure(configure_all_routes)
            .default_service(web::to(handlers::system::not_found))
    })
    .bind(&bind_address)?
    .run()
    .await
}

/// 환경별 설정 파일을 로드합니다
///
/// * `PROFILE=dev` - `.env.dev` (기본값)
/// * `PROFILE=prod` - `.env.prod`
/// * 기타 - `.env`
fn load_env_file() {
    let profile = std::env::var("PROFILE").unwrap_or_else(|_| "dev".to_string());

    match profile.as_str() {
        "dev" => {
            dotenv::from_filename(".env.dev").ok();
        }
        "prod" => {
            dotenv::from_filename(".env.prod").ok();
        }
        _ => {
            dotenv().ok();
        }
    }
}

/// `RUST_LOG` 가 없으면 `info,actix_web=info` 로 시작합니다.
fn init_logging() {
    env_logger::init_from_env(Env::default().default_filter_or("info,actix_web=info"));
}

/// MongoDB와 Redis 연결을 초기화합니다
///
/// 둘 중 하나라도 실패하면 서버를 띄우지 않습니다.
async fn initialize_data_stores() -> io::Result<(Arc<Database>, Arc<RedisClient>)> {
    info!("📡 데이터베이스 연결 중...");

    let database = Database::new().await.map_err(|e| {
        error!("MongoDB 연결 실패: {}", e);
        io::Error::other(e.to_string())
    })?;

    let redis_client = RedisClient::new().await.map_err(|e| {
        error!("Redis 연결 실패: {}", e);
        io::Error::other(e.to_string())
    })?;

    info!("✅ Redis 연결 성공");

    Ok((Arc::new(database), Arc::new(redis_client)))
}

/// 컬렉션 인덱스를 만듭니다. 실패해도 서버는 계속 기동합니다.
async fn ensure_indexes() {
    let results = [
        ("users", UserRepository::instance().create_indexes().await),
        ("restaurants", RestaurantRepository::instance().create_indexes().await),
        ("kyc_submissions", KycRepository::instance().create_indexes().await),
        ("ingredients", IngredientRepository::instance().create_indexes().await),
    ];

    for (collection, result) in results {
        if let Err(e) = result {
            warn!("{} 인덱스 생성 실패: {}", collection, e);
        }
    }
}

/// 로컬 이미지 저장 디렉터리를 준비합니다.
fn prepare_upload_dir() -> io::Result<()> {
    let dir = StorageConfig::upload_dir();
    std::fs::create_dir_all(&dir)?;
    if StorageConfig::cloudinary().is_none() {
        info!("🖼  Cloudinary 미설정: 이미지를 {} 에 저장합니다", dir);
    }
    Ok(())
}

fn security_headers() -> middleware::DefaultHeaders {
    middleware::DefaultHeaders::new()
        .add((header::X_CONTENT_TYPE_OPTIONS, "nosniff"))
        .add((header::X_FRAME_OPTIONS, "DENY"))
        .add((header::REFERRER_POLICY, "no-referrer"))
        .add((header::X_XSS_PROTECTION, "0"))
}

/// CORS 설정을 구성합니다
///
/// 운영 환경은 `ALLOWED_ORIGINS` 와 `CLIENT_URL` 에 있는 출처만 허용하고,
/// 그 외 환경은 모든 출처를 허용합니다.
fn configure_cors(environment: &Environment) -> Cors {
    if !environment.is_production() {
        return Cors::permissive();
    }

    CorsConfig::allowed_origins()
        .iter()
        .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
        .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "PATCH", "OPTIONS"])
        .allowed_headers(vec![
            header::AUTHORIZATION,
            header::ACCEPT,
            header::CONTENT_TYPE,
            header::ACCEPT_LANGUAGE,
        ])
        .supports_credentials()
        .max_age(3600)
}
