//! 운영 지원 도구: 계정에 `super_admin` 역할을 부여하고 KYC 를 승인 상태로 만듭니다.
//!
//! ```bash
//! PROFILE=prod cargo run --bin promote_super_admin -- ops@example.com
//! ```

use std::error::Error;
use std::sync::Arc;

use env_logger::Env;
use log::{info, warn};

use restaurant_auth_backend::caching::redis::RedisClient;
use restaurant_auth_backend::core::registry::ServiceLocator;
use restaurant_auth_backend::db::Database;
use restaurant_auth_backend::domain::entities::users::{KycStatus, Role};
use restaurant_auth_backend::repositories::users::UserRepository;

#[actix_web::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let Some(email) = std::env::args().nth(1) else {
        warn!("사용법: promote_super_admin <email>");
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
    let id = user.id.ok_or("stored user has no id")?;

    users.set_role(&id, Role::SuperAdmin).await?;
    users.set_kyc_status(&id, KycStatus::Approved, None).await?;

    info!("✅ {} 계정을 super_admin 으로 승격했습니다 (이전 역할: {})", email, user.role.as_str());
    Ok(())
}
