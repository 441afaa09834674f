//! 재료 엔티티
//!
//! 테넌트별 재료 카탈로그 항목. 이미지 참조는 로컬 경로(`/uploads/...`)
//! 또는 호스팅 URL 입니다.

use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ingredient {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub restaurant: ObjectId,
    pub name: String,
    pub unit: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub created_by: ObjectId,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl Ingredient {
    pub fn new(
        restaurant: ObjectId,
        name: String,
        unit: String,
        category: Option<String>,
        created_by: ObjectId,
        now: DateTime,
    ) -> Self {
        Self {
            id: None,
            restaurant,
            name,
            unit,
            category,
            image: None,
            created_by,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn id_string(&self) -> Option<String> {
        self.id.as_ref().map(|id| id.to_hex())
    }
}
