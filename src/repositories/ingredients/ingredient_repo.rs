//! 재료 리포지토리. 모든 조회는 레스토랑 ID 로 범위가 제한됩니다.

use std::sync::Arc;

use futures_util::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, DateTime};
use mongodb::options::{FindOneAndUpdateOptions, IndexOptions, ReturnDocument};
use mongodb::IndexModel;
use singleton_macro::repository;

use crate::caching::redis::RedisClient;
use crate::core::errors::AppError;
use crate::core::registry::Repository;
use crate::db::Database;
use crate::domain::entities::ingredients::Ingredient;
use crate::repositories::{db_error, is_duplicate_key};

#[repository(name = "ingredient", collection = "ingredients")]
pub struct IngredientRepository {
    db: Arc<Database>,
    redis: Arc<RedisClient>,
}

impl IngredientRepository {
    pub async fn find_in_restaurant(&self, id: &ObjectId, restaurant: &ObjectId) -> Result<Option<Ingredient>, AppError> {
        self.collection::<Ingredient>()
            .find_one(doc! { "_id": *id, "restaurant": *restaurant })
            .await
            .map_err(db_error)
    }

    pub async fn create(&self, mut ingredient: Ingredient) -> Result<Ingredient, AppError> {
        let result = self
            .collection::<Ingredient>()
            .insert_one(&ingredient)
            .await
            .map_err(|e| {
                if is_duplicate_key(&e) {
                    AppError::ConflictError("An ingredient with this name already exists".to_string())
                } else {
                    db_error(e)
                }
            })?;

        ingredient.id = result.inserted_id.as_object_id();
        Ok(ingredient)
    }

    pub async fn list_by_restaurant(&self, restaurant: &ObjectId) -> Result<Vec<Ingredient>, AppError> {
        self.collection::<Ingredient>()
            .find(doc! { "restaurant": *restaurant })
            .sort(doc! { "name": 1 })
            .await
            .map_err(db_error)?
            .try_collect::<Vec<Ingredient>>()
            .await
            .map_err(db_error)
    }

    pub async fn count_by_restaurant(&self, restaurant: &ObjectId) -> Result<u64, AppError> {
        self.collection::<Ingredient>()
            .count_documents(doc! { "restaurant": *restaurant })
            .await
            .map_err(db_error)
    }

    /// 이미지 참조 교체. `None` 이면 필드를 제거합니다.
    pub async fn set_image(&self, id: &ObjectId, image: Option<&str>) -> Result<Option<Ingredient>, AppError> {
        let now = DateTime::now();
        let update = match image {
            Some(image) => doc! { "$set": { "image": image, "updated_at": now } },
            None => doc! { "$set": { "updated_at": now }, "$unset": { "image": "" } },
        };

        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();

        self.collection::<Ingredient>()
            .find_one_and_update(doc! { "_id": *id }, update)
            .with_options(options)
            .await
            .map_err(db_error)
    }

    pub async fn create_indexes(&self) -> Result<(), AppError> {
        let name_index = IndexModel::builder()
            .keys(doc! { "restaurant": 1, "name": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("restaurant_name_unique".to_string())
                    .build(),
            )
            .build();

        self.collection::<Ingredient>()
            .create_indexes([name_index])
            .await
            .map_err(db_error)?;
        Ok(())
    }
}
