//! # Redis 클라이언트
//!
//! JSON 직렬화 기반 캐시와 짧은 수명의 플래그(재발송 쿨다운 등)를 제공합니다.
//! 연결은 `ConnectionManager` 하나를 복제해 사용하며, 끊어지면 자동으로 재연결됩니다.

use std::env;

use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client};
use serde::{de::DeserializeOwned, Serialize};

#[derive(Clone)]
pub struct RedisClient {
    manager: ConnectionManager,
}

fn serialization_error(e: serde_json::Error) -> redis::RedisError {
    redis::RedisError::from((redis::ErrorKind::TypeError, "JSON conversion failed", e.to_string()))
}

impl RedisClient {
    /// `REDIS_URL` (기본 `redis://localhost:6379`) 로 연결하고 `PING` 으로 확인합니다.
    pub async fn new() -> Result<Self, Box<dyn std::error::Error>> {
        let redis_url = env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".to_string());

        let client = Client::open(redis_url)?;
        let mut manager = ConnectionManager::new(client).await?;
        redis::cmd("PING").query_async::<()>(&mut manager).await?;

        log::info!("✅ Redis 연결 성공");

        Ok(Self { manager })
    }

    fn conn(&self) -> ConnectionManager {
        self.manager.clone()
    }

    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, redis::RedisError> {
        let value: Option<String> = self.conn().get(key).await?;
        value
            .map(|json| serde_json::from_str(&json).map_err(serialization_error))
            .transpose()
    }

    pub async fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<(), redis::RedisError> {
        let json = serde_json::to_string(value).map_err(serialization_error)?;
        self.conn().set(key, json).await
    }

    pub async fn set_with_expiry<T: Serialize>(
        &self,
        key: &str,
        value: &T,
        seconds: usize,
    ) -> Result<(), redis::RedisError> {
        let json = serde_json::to_string(value).map_err(serialization_error)?;
        self.conn().set_ex(key, json, seconds as u64).await
    }

    /// 키가 없을 때만 만료 시간과 함께 저장합니다 (`SET NX EX`).
    ///
    /// 저장했으면 `true`, 이미 키가 있으면 `false`.
    pub async fn set_if_absent(&self, key: &str, value: &str, seconds: u64) -> Result<bool, redis::RedisError> {
        let reply: Option<String> = redis::cmd("SET")
            .arg(key)
            .arg(value)
            .arg("NX")
            .arg("EX")
            .arg(seconds)
            .query_async(&mut self.conn())
            .await?;
        Ok(reply.is_some())
    }

    /// 남은 만료 시간 (초). 키가 없거나 만료가 없으면 `None`
    pub async fn ttl(&self, key: &str) -> Result<Option<u64>, redis::RedisError> {
        let ttl: i64 = self.conn().ttl(key).await?;
        Ok(u64::try_from(ttl).ok())
    }

    pub async fn del(&self, key: &str) -> Result<(), redis::RedisError> {
        self.conn().del(key).await
    }

    pub async fn del_multiple(&self, keys: &[String]) -> Result<(), redis::RedisError> {
        if keys.is_empty() {
            return Ok(());
        }
        self.conn().del(keys).await
    }

    pub async fn keys(&self, pattern: &str) -> Result<Vec<String>, redis::RedisError> {
        self.conn().keys(pattern).await
    }
}
