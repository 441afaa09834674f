//! 운영 지원 도구: 계정을 이메일 인증 완료 상태로 바꿉니다.
//!
//! ```bash
//! PROFILE=prod cargo run --bin verify_user -- owner@example.com
//! ```

use std::error::Error;
use std::sync::Arc;

use env_logger::Env;
use log::{info, warn};
use mongodb::bson::{doc, Bson};

use restaurant_auth_backend::caching::redis::RedisClient;
use restaurant_auth_backend::core::registry::ServiceLocator;
use restaurant_auth_backend::db::Database;
use restaurant_auth_backend::repositories::users::UserRepository;

#[actix_web::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let Some(email) = std::env::args().nth(1) else {
        warn!("사용법: verify_user <email>");
        return Err("email argument is required".into());
    };
    let email = email.trim().to_lowercase();

    ServiceLocator::set(Arc::new(Database::new().await?));
    ServiceLocator::set(Arc::new(RedisClient::new().await?));

    let users = UserRepository::instance();
    let Some(user) = users.find_by_email(&email).await? else {
        warn!("사용자를 찾을 수 없습니다: {}", email);
        return Err(format!("no user with email {}", email).into());
    };

    if user.is_verified {
        info!("이미 인증된 계정입니다: {}", email);
        return Ok(());
    }

    let id = user.id.ok_or("stored user has no id")?;
    users
        .update(
            &id,
            doc! {
                "is_verified": true,
                "verification_code": Bson::Null,
                "verification_code_expires": Bson::Null,
            },
        )
        .await?;

    info!("✅ {} 계정을 인증 완료로 변경했습니다", email);
    Ok(())
}
