use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::entities::ingredients::Ingredient;
use crate::domain::entities::to_chrono;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IngredientResponse {
    pub id: String,
    pub restaurant: String,
    pub name: String,
    pub unit: String,
    pub category: Option<String>,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<&Ingredient> for IngredientResponse {
    fn from(i: &Ingredient) -> Self {
        Self {
            id: i.id_string().unwrap_or_default(),
            restaurant: i.restaurant.to_hex(),
            name: i.name.clone(),
            unit: i.unit.clone(),
            category: i.category.clone(),
            image: i.image.clone(),
            created_at: to_chrono(i.created_at),
        }
    }
}

/// 이미지 업로드 결과
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IngredientImageResponse {
    pub ingredient: IngredientResponse,
    pub image: String,
    pub full_url: String,
}
