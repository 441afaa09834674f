//! KYC 신청서 리포지토리
//!
//! 심사 상태 전이는 [`KycRepository::transition`] 한 곳에서만 일어납니다.
//! 이전 상태 목록을 필터로 걸어, 이미 다른 관리자가 처리한 신청서에는 `None` 을 돌려줍니다.

use std::sync::Arc;

use futures_util::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, Document};
use mongodb::options::{FindOneAndUpdateOptions, FindOneOptions, IndexOptions, ReturnDocument};
use mongodb::IndexModel;
use singleton_macro::repository;

use crate::caching::redis::RedisClient;
use crate::core::errors::AppError;
use crate::core::registry::Repository;
use crate::db::Database;
use crate::domain::dto::common::PageQuery;
use crate::domain::entities::kyc::{KycSubmission, KycSubmissionStatus};
use crate::repositories::db_error;

/// 심사 전 상태로 되돌리는 갱신 문서. 승인 중 연결된 레스토랑도 떼어 냅니다.
fn restore_update(previous: &KycSubmission) -> Document {
    let mut update = doc! { "$set": {
        "status": previous.status.as_str(),
        "review_notes": previous.review_notes.clone(),
        "rejection_reason": previous.rejection_reason.clone(),
        "reviewed_by": previous.reviewed_by,
        "reviewed_at": previous.reviewed_at,
        "updated_at": previous.updated_at,
    }};
    match previous.restaurant {
        Some(restaurant) => {
            if let Ok(set) = update.get_document_mut("$set") {
                set.insert("restaurant", restaurant);
            }
        }
        None => {
            update.insert("$unset", doc! { "restaurant": "" });
        }
    }
    update
}

#[repository(name = "kyc", collection = "kyc_submissions")]
pub struct KycRepository {
    db: Arc<Database>,
    redis: Arc<RedisClient>,
}

impl KycRepository {
    pub async fn find_by_id(&self, id: &ObjectId) -> Result<Option<KycSubmission>, AppError> {
        self.collection::<KycSubmission>()
            .find_one(doc! { "_id": *id })
            .await
            .map_err(db_error)
    }

    /// 신청자의 가장 최근 신청서
    pub async fn find_latest_by_applicant(&self, applicant: &ObjectId) -> Result<Option<KycSubmission>, AppError> {
        let options = FindOneOptions::builder().sort(doc! { "submitted_at": -1 }).build();

        self.collection::<KycSubmission>()
            .find_one(doc! { "applicant": *applicant })
            .with_options(options)
            .await
            .map_err(db_error)
    }

    pub async fn create(&self, mut submission: KycSubmission) -> Result<KycSubmission, AppError> {
        let result = self
            .collection::<KycSubmission>()
            .insert_one(&submission)
            .await
            .map_err(db_error)?;

        submission.id = result.inserted_id.as_object_id();
        Ok(submission)
    }

    /// `from` 상태 중 하나일 때만 `next` 의 심사 필드로 교체합니다.
    pub async fn transition(
        &self,
        next: &KycSubmission,
        from: &[KycSubmissionStatus],
    ) -> Result<Option<KycSubmission>, AppError> {
        let id = next
            .id
            .ok_or_else(|| AppError::InternalError("KYC submission without id".to_string()))?;
        let from: Vec<&str> = from.iter().map(KycSubmissionStatus::as_str).collect();

        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();

        let updated = self
            .collection::<KycSubmission>()
            .find_one_and_update(
                doc! { "_id": id, "status": { "$in": from } },
                doc! { "$set": {
                    "status": next.status.as_str(),
                    "review_notes": next.review_notes.clone(),
                    "rejection_reason": next.rejection_reason.clone(),
                    "reviewed_by": next.reviewed_by,
                    "reviewed_at": next.reviewed_at,
                    "updated_at": next.updated_at,
                }},
            )
            .with_options(options)
            .await
            .map_err(db_error)?;

        if updated.is_some() {
            let _ = self.invalidate_cache(&id.to_hex()).await;
        }
        Ok(updated)
    }

    /// 승인 후 생성된 레스토랑을 연결합니다.
    pub async fn link_restaurant(&self, id: &ObjectId, restaurant: &ObjectId) -> Result<(), AppError> {
        self.collection::<KycSubmission>()
            .update_one(doc! { "_id": *id }, doc! { "$set": { "restaurant": *restaurant } })
            .await
            .map_err(db_error)?;
        Ok(())
    }

    /// 승인 보상: 레스토랑 생성이나 연결에 실패하면 심사 전 상태로 되돌립니다.
    pub async fn restore(&self, previous: &KycSubmission) -> Result<(), AppError> {
        let id = previous
            .id
            .ok_or_else(|| AppError::InternalError("KYC submission without id".to_string()))?;

        self.collection::<KycSubmission>()
            .update_one(doc! { "_id": id }, restore_update(previous))
            .await
            .map_err(db_error)?;
        Ok(())
    }

    pub async fn list(
        &self,
        status: Option<KycSubmissionStatus>,
        page: &PageQuery,
    ) -> Result<(Vec<KycSubmission>, u64), AppError> {
        let filter = match status {
            Some(status) => doc! { "status": status.as_str() },
            None => Document::new(),
        };

        let total = self
            .collection::<KycSubmission>()
            .count_documents(filter.clone())
            .await
            .map_err(db_error)?;

        let items = self
            .collection::<KycSubmission>()
            .find(filter)
            .sort(doc! { "submitted_at": -1 })
            .skip(page.skip())
            .limit(page.limit() as i64)
            .await
            .map_err(db_error)?
            .try_collect::<Vec<KycSubmission>>()
            .await
            .map_err(db_error)?;

        Ok((items, total))
    }

    pub async fn count_by_status(&self, status: KycSubmissionStatus) -> Result<u64, AppError> {
        self.collection::<KycSubmission>()
            .count_documents(doc! { "status": status.as_str() })
            .await
            .map_err(db_error)
    }

    pub async fn create_indexes(&self) -> Result<(), AppError> {
        let status_index = IndexModel::builder()
            .keys(doc! { "status": 1, "submitted_at": -1 })
            .options(IndexOptions::builder().name("status_submitted_at".to_string()).build())
            .build();

        let applicant_index = IndexModel::builder()
            .keys(doc! { "applicant": 1, "submitted_at": -1 })
            .options(IndexOptions::builder().name("applicant_submitted_at".to_string()).build())
            .build();

        self.collection::<KycSubmission>()
            .create_indexes([status_index, applicant_index])
            .await
            .map_err(db_error)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::kyc::{BusinessDetails, KycDocuments};
    use mongodb::bson::DateTime;

    fn pending() -> KycSubmission {
        let mut submission = KycSubmission::new(
            ObjectId::new(),
            BusinessDetails::default(),
            KycDocuments::default(),
            DateTime::from_millis(0),
        );
        submission.id = Some(ObjectId::new());
        submission
    }

    #[test]
    fn test_restore_update_detaches_restaurant() {
        let update = restore_update(&pending());

        let set = update.get_document("$set").unwrap();
        assert_eq!(set.get_str("status").unwrap(), "pending");
        assert!(!set.contains_key("restaurant"));
        assert!(update.get_document("$unset").unwrap().contains_key("restaurant"));
    }

    #[test]
    fn test_restore_update_keeps_existing_restaurant() {
        let mut previous = pending();
        let restaurant = ObjectId::new();
        previous.restaurant = Some(restaurant);

        let update = restore_update(&previous);

        assert_eq!(update.get_document("$set").unwrap().get_object_id("restaurant").unwrap(), restaurant);
        assert!(!update.contains_key("$unset"));
    }
}
