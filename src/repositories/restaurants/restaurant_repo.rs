//! 레스토랑 리포지토리
//!
//! `kyc_submission` 유니크 인덱스로 신청서 하나당 레스토랑 하나를 보장합니다.

use std::sync::Arc;

use futures_util::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, DateTime, Document};
use mongodb::options::{FindOneAndUpdateOptions, IndexOptions, ReturnDocument};
use mongodb::IndexModel;
use singleton_macro::repository;

use crate::caching::redis::RedisClient;
use crate::core::errors::AppError;
use crate::core::registry::Repository;
use crate::db::Database;
use crate::domain::dto::common::PageQuery;
use crate::domain::entities::restaurants::{Restaurant, RestaurantStatus};
use crate::repositories::{db_error, is_duplicate_key};

#[repository(name = "restaurant", collection = "restaurants")]
pub struct RestaurantRepository {
    db: Arc<Database>,
    redis: Arc<RedisClient>,
}

impl RestaurantRepository {
    pub async fn find_by_id(&self, id: &ObjectId) -> Result<Option<Restaurant>, AppError> {
        self.collection::<Restaurant>()
            .find_one(doc! { "_id": *id })
            .await
            .map_err(db_error)
    }

    pub async fn create(&self, mut restaurant: Restaurant) -> Result<Restaurant, AppError> {
        let result = self
            .collection::<Restaurant>()
            .insert_one(&restaurant)
            .await
            .map_err(|e| {
                if is_duplicate_key(&e) {
                    AppError::ConflictError("A restaurant already exists for this KYC submission".to_string())
                } else {
                    db_error(e)
                }
            })?;

        restaurant.id = result.inserted_id.as_object_id();
        let _ = self.invalidate_collection_cache(None).await;
        Ok(restaurant)
    }

    pub async fn update_status(&self, id: &ObjectId, status: RestaurantStatus) -> Result<Option<Restaurant>, AppError> {
        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();

        let updated = self
            .collection::<Restaurant>()
            .find_one_and_update(
                doc! { "_id": *id },
                doc! { "$set": { "status": status.as_str(), "updated_at": DateTime::now() } },
            )
            .with_options(options)
            .await
            .map_err(db_error)?;

        if updated.is_some() {
            let _ = self.invalidate_cache(&id.to_hex()).await;
        }
        Ok(updated)
    }

    pub async fn delete(&self, id: &ObjectId) -> Result<bool, AppError> {
        let result = self
            .collection::<Restaurant>()
            .delete_one(doc! { "_id": *id })
            .await
            .map_err(db_error)?;
        Ok(result.deleted_count > 0)
    }

    /// 상태 필터와 페이지 단위 목록, 전체 건수
    pub async fn list(
        &self,
        status: Option<RestaurantStatus>,
        page: &PageQuery,
    ) -> Result<(Vec<Restaurant>, u64), AppError> {
        let filter = match status {
            Some(status) => doc! { "status": status.as_str() },
            None => Document::new(),
        };

        let total = self
            .collection::<Restaurant>()
            .count_documents(filter.clone())
            .await
            .map_err(db_error)?;

        let items = self
            .collection::<Restaurant>()
            .find(filter)
            .sort(doc! { "created_at": -1 })
            .skip(page.skip())
            .limit(page.limit() as i64)
            .await
            .map_err(db_error)?
            .try_collect::<Vec<Restaurant>>()
            .await
            .map_err(db_error)?;

        Ok((items, total))
    }

    pub async fn count_by_status(&self, status: RestaurantStatus) -> Result<u64, AppError> {
        self.collection::<Restaurant>()
            .count_documents(doc! { "status": status.as_str() })
            .await
            .map_err(db_error)
    }

    pub async fn create_indexes(&self) -> Result<(), AppError> {
        let submission_index = IndexModel::builder()
            .keys(doc! { "kyc_submission": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("kyc_submission_unique".to_string())
                    .build(),
            )
            .build();

        let status_index = IndexModel::builder()
            .keys(doc! { "status": 1, "created_at": -1 })
            .options(IndexOptions::builder().name("status_created_at".to_string()).build())
            .build();

        self.collection::<Restaurant>()
            .create_indexes([submission_index, status_index])
            .await
            .map_err(db_error)?;
        Ok(())
    }
}
