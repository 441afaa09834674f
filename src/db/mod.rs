//! # MongoDB 연결
//!
//! 애플리케이션 전체가 공유하는 MongoDB 클라이언트 래퍼입니다.
//! 부팅 시 한 번 생성해 `ServiceLocator::set` 으로 등록하면
//! `#[repository]` 매크로가 만든 리포지토리들이 주입받아 사용합니다.
//!
//! | 환경 변수 | 기본값 |
//! |-----------|--------|
//! | `MONGODB_URI` | `mongodb://localhost:27017` |
//! | `DATABASE_NAME` | `restaurant_auth` |
//! | `MONGODB_MAX_POOL_SIZE` | `20` |
//! | `MONGODB_SERVER_SELECTION_TIMEOUT_SECS` | `10` |

use std::env;
use std::time::Duration;

use log::info;
use mongodb::{bson::doc, options::ClientOptions, Client};

const APP_NAME: &str = "restaurant_auth_backend";

#[derive(Clone)]
pub struct Database {
    client: Client,
    database_name: String,
}

impl Database {
    /// 연결을 만들고 `ping` 으로 가용성을 확인합니다.
    ///
    /// 서버 선택 제한 시간 안에 응답이 없으면 부팅을 중단할 수 있도록 에러를 돌려줍니다.
    pub async fn new() -> Result<Self, Box<dyn std::error::Error>> {
        let mongodb_uri = env::var("MONGODB_URI")
            .unwrap_or_else(|_| "mongodb://localhost:27017".to_string());
        let database_name = env::var("DATABASE_NAME")
            .unwrap_or_else(|_| "restaurant_auth".to_string());

        let mut options = ClientOptions::parse(&mongodb_uri).await?;
        options.app_name = Some(APP_NAME.to_string());
        options.max_pool_size = Some(env_number("MONGODB_MAX_POOL_SIZE", 20));
        options.server_selection_timeout = Some(Duration::from_secs(
            env_number("MONGODB_SERVER_SELECTION_TIMEOUT_SECS", 10).into(),
        ));

        let client = Client::with_options(options)?;
        client
            .database(&database_name)
            .run_command(doc! { "ping": 1 })
            .await?;

        info!("✅ MongoDB 연결 성공: {}", database_name);

        Ok(Self { client, database_name })
    }

    /// 리포지토리가 컬렉션을 열 때 사용하는 데이터베이스 핸들
    pub fn get_database(&self) -> mongodb::Database {
        self.client.database(&self.database_name)
    }
}

fn env_number(key: &str, default: u32) -> u32 {
    env::var(key)
        .ok()
        .and_then(|raw| raw.parse().ok())
        .unwrap_or(default)
}
