//! # 사용자 리포지토리 구현
//!
//! `users` 컬렉션 접근 계층입니다. ID 단건 조회는 인증 미들웨어가 매 요청마다
//! 호출하므로 Redis 에 10분간 캐시하고, 문서를 바꾸는 모든 메서드는 캐시를 무효화합니다.
//! 캐시와 [`UserRepository::find_by_id`] 결과에는 비밀번호 해시와 일회용 비밀값이
//! 빠져 있습니다. 자격 증명이 필요한 조회(이메일 조회, [`UserRepository::find_with_credentials`])는
//! 캐시를 거치지 않습니다.
//!
//! 일회용 비밀값 소모 메서드(`consume_*`)는 다이제스트와 만료 시각을 필터에 넣은
//! 단일 `find_one_and_update` 로 동작합니다. 같은 코드/토큰으로 동시에 들어온
//! 요청 중 하나만 문서를 돌려받고 나머지는 `None` 을 받습니다.

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
use crate::domain::entities::users::{AccountStatus, KycStatus, Permission, Role, User};
use crate::repositories::{db_error, is_duplicate_key};

const USER_CACHE_TTL_SECONDS: usize = 600;

#[repository(name = "user", collection = "users")]
pub struct UserRepository {
    db: Arc<Database>,
    redis: Arc<RedisClient>,
}

fn after_update() -> FindOneAndUpdateOptions {
    FindOneAndUpdateOptions::builder()
        .return_document(ReturnDocument::After)
        .build()
}

/// 인증 코드 소모: 다이제스트가 같고 아직 만료되지 않은 경우에만 일치합니다.
fn verification_consumption(id: &ObjectId, code_digest: &str, now: DateTime) -> (Document, Document) {
    (
        doc! {
            "_id": *id,
            "verification_code": code_digest,
            "verification_code_expires": { "$gt": now },
        },
        doc! {
            "$set": { "is_verified": true, "updated_at": now },
            "$unset": { "verification_code": "", "verification_code_expires": "" },
        },
    )
}

fn reset_consumption(id: &ObjectId, code_digest: &str, password_hash: &str, now: DateTime) -> (Document, Document) {
    (
        doc! {
            "_id": *id,
            "reset_password_code": code_digest,
            "reset_password_expires": { "$gt": now },
        },
        doc! {
            "$set": { "password_hash": password_hash, "password_changed_at": now, "updated_at": now },
            "$unset": { "reset_password_code": "", "reset_password_expires": "" },
        },
    )
}

fn invitation_consumption(token_digest: &str, password_hash: &str, now: DateTime) -> (Document, Document) {
    (
        doc! {
            "invitation_token": token_digest,
            "invitation_expires": { "$gt": now },
        },
        doc! {
            "$set": {
                "password_hash": password_hash,
                "is_verified": true,
                "account_status": AccountStatus::Active.as_str(),
                "password_changed_at": now,
                "updated_at": now,
            },
            "$unset": { "invitation_token": "", "invitation_expires": "" },
        },
    )
}

impl UserRepository {
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        self.collection::<User>()
            .find_one(doc! { "email": email })
            .await
            .map_err(db_error)
    }

    pub async fn exists_by_email(&self, email: &str) -> Result<bool, AppError> {
        let count = self
            .collection::<User>()
            .count_documents(doc! { "email": email })
            .await
            .map_err(db_error)?;
        Ok(count > 0)
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<User>, AppError> {
        let Ok(object_id) = ObjectId::parse_str(id) else {
            return Ok(None);
        };

        let cache_key = self.cache_key(id);
        if let Ok(Some(cached)) = self.redis.get::<User>(&cache_key).await {
            return Ok(Some(cached));
        }

        let user = self
            .collection::<User>()
            .find_one(doc! { "_id": object_id })
            .await
            .map_err(db_error)?
            .map(|user| user.without_credentials());

        if let Some(ref user) = user {
            if let Err(e) = self.redis.set_with_expiry(&cache_key, user, USER_CACHE_TTL_SECONDS).await {
                log::warn!("사용자 캐시 저장 실패 ({}): {}", id, e);
            }
        }

        Ok(user)
    }

    /// 비밀번호 해시를 포함한 전체 문서. 캐시를 거치지 않습니다.
    pub async fn find_with_credentials(&self, id: &str) -> Result<Option<User>, AppError> {
        let Ok(object_id) = ObjectId::parse_str(id) else {
            return Ok(None);
        };

        self.collection::<User>()
            .find_one(doc! { "_id": object_id })
            .await
            .map_err(db_error)
    }

    /// 특정 레스토랑 소속 사용자만 조회
    pub async fn find_in_restaurant(&self, user_id: &ObjectId, restaurant: &ObjectId) -> Result<Option<User>, AppError> {
        self.collection::<User>()
            .find_one(doc! { "_id": *user_id, "restaurant": *restaurant })
            .await
            .map_err(db_error)
    }

    pub async fn create(&self, mut user: User) -> Result<User, AppError> {
        let result = self
            .collection::<User>()
            .insert_one(&user)
            .await
            .map_err(|e| {
                if is_duplicate_key(&e) {
                    AppError::ConflictError("User already exists with this email".to_string())
                } else {
                    db_error(e)
                }
            })?;

        user.id = result.inserted_id.as_object_id();
        Ok(user)
    }

    /// `$set` / `$unset` 등을 담은 갱신 문서를 적용하고 갱신 후 문서를 반환합니다.
    async fn apply(&self, filter: Document, update: Document) -> Result<Option<User>, AppError> {
        let updated = self
            .collection::<User>()
            .find_one_and_update(filter, update)
            .with_options(after_update())
            .await
            .map_err(db_error)?;

        if let Some(id) = updated.as_ref().and_then(User::id_string) {
            let _ = self.invalidate_cache(&id).await;
        }
        Ok(updated)
    }

    pub async fn update(&self, id: &ObjectId, set: Document) -> Result<Option<User>, AppError> {
        let mut set = set;
        set.insert("updated_at", DateTime::now());
        self.apply(doc! { "_id": *id }, doc! { "$set": set }).await
    }

    /// 새 인증 코드 저장. 이전 코드는 덮어씁니다.
    pub async fn store_verification_code(&self, user: &User) -> Result<(), AppError> {
        let id = user.id.ok_or_else(|| AppError::InternalError("user without id".to_string()))?;
        self.apply(
            doc! { "_id": id },
            doc! { "$set": {
                "verification_code": user.verification_code.clone(),
                "verification_code_expires": user.verification_code_expires,
                "verification_sent_at": user.verification_sent_at,
                "updated_at": user.updated_at,
            }},
        )
        .await?;
        Ok(())
    }

    /// 인증 코드를 소모하고 계정을 인증 상태로 바꿉니다.
    pub async fn consume_verification_code(
        &self,
        id: &ObjectId,
        code_digest: &str,
        now: DateTime,
    ) -> Result<Option<User>, AppError> {
        let (filter, update) = verification_consumption(id, code_digest, now);
        self.apply(filter, update).await
    }

    pub async fn store_reset_code(&self, user: &User) -> Result<(), AppError> {
        let id = user.id.ok_or_else(|| AppError::InternalError("user without id".to_string()))?;
        self.apply(
            doc! { "_id": id },
            doc! { "$set": {
                "reset_password_code": user.reset_password_code.clone(),
                "reset_password_expires": user.reset_password_expires,
                "updated_at": user.updated_at,
            }},
        )
        .await?;
        Ok(())
    }

    /// 재설정 코드를 소모하고 비밀번호를 교체합니다.
    pub async fn consume_reset_code(
        &self,
        id: &ObjectId,
        code_digest: &str,
        password_hash: &str,
        now: DateTime,
    ) -> Result<Option<User>, AppError> {
        let (filter, update) = reset_consumption(id, code_digest, password_hash, now);
        self.apply(filter, update).await
    }

    pub async fn find_by_invitation_token(&self, token_digest: &str) -> Result<Option<User>, AppError> {
        self.collection::<User>()
            .find_one(doc! { "invitation_token": token_digest })
            .await
            .map_err(db_error)
    }

    /// 초대 토큰을 소모하고 계정을 활성화합니다.
    pub async fn consume_invitation(
        &self,
        token_digest: &str,
        password_hash: &str,
        now: DateTime,
    ) -> Result<Option<User>, AppError> {
        let (filter, update) = invitation_consumption(token_digest, password_hash, now);
        self.apply(filter, update).await
    }

    pub async fn record_login(&self, id: &ObjectId, now: DateTime) -> Result<(), AppError> {
        self.update(id, doc! { "last_login_at": now }).await?;
        Ok(())
    }

    pub async fn update_password(&self, id: &ObjectId, password_hash: &str, now: DateTime) -> Result<(), AppError> {
        self.update(id, doc! { "password_hash": password_hash, "password_changed_at": now })
            .await?;
        Ok(())
    }

    pub async fn set_permissions(&self, id: &ObjectId, permissions: &[Permission]) -> Result<Option<User>, AppError> {
        let values: Vec<&str> = permissions.iter().map(Permission::as_str).collect();
        self.update(id, doc! { "permissions": values }).await
    }

    pub async fn set_kyc_status(
        &self,
        id: &ObjectId,
        status: KycStatus,
        submission: Option<ObjectId>,
    ) -> Result<Option<User>, AppError> {
        let mut set = doc! { "kyc_status": status.as_str() };
        if let Some(submission) = submission {
            set.insert("kyc_submission", submission);
        }
        self.update(id, set).await
    }

    /// KYC 승인 후 신청자를 새 레스토랑의 관리자로 지정합니다.
    pub async fn assign_restaurant_admin(&self, id: &ObjectId, restaurant: &ObjectId) -> Result<Option<User>, AppError> {
        self.update(
            id,
            doc! {
                "role": Role::RestaurantAdmin.as_str(),
                "restaurant": *restaurant,
                "kyc_status": KycStatus::Approved.as_str(),
            },
        )
        .await
    }

    pub async fn set_role(&self, id: &ObjectId, role: Role) -> Result<Option<User>, AppError> {
        self.update(id, doc! { "role": role.as_str() }).await
    }

    pub async fn list_by_restaurant(&self, restaurant: &ObjectId) -> Result<Vec<User>, AppError> {
        self.collection::<User>()
            .find(doc! { "restaurant": *restaurant })
            .sort(doc! { "created_at": -1 })
            .await
            .map_err(db_error)?
            .try_collect::<Vec<User>>()
            .await
            .map_err(db_error)
    }

    /// 레스토랑 소속 인원. 수락 대기 중인 초대도 자리를 차지합니다.
    pub async fn count_by_restaurant(&self, restaurant: &ObjectId) -> Result<u64, AppError> {
        self.collection::<User>()
            .count_documents(doc! { "restaurant": *restaurant })
            .await
            .map_err(db_error)
    }

    pub async fn count_active(&self) -> Result<u64, AppError> {
        self.collection::<User>()
            .count_documents(doc! { "account_status": AccountStatus::Active.as_str() })
            .await
            .map_err(db_error)
    }

    pub async fn delete(&self, id: &ObjectId) -> Result<bool, AppError> {
        let result = self
            .collection::<User>()
            .delete_one(doc! { "_id": *id })
            .await
            .map_err(db_error)?;

        if result.deleted_count > 0 {
            let _ = self.invalidate_cache(&id.to_hex()).await;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    pub async fn create_indexes(&self) -> Result<(), AppError> {
        let email_index = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(IndexOptions::builder().unique(true).name("email_unique".to_string()).build())
            .build();

        let restaurant_index = IndexModel::builder()
            .keys(doc! { "restaurant": 1, "created_at": -1 })
            .options(IndexOptions::builder().name("restaurant_members".to_string()).build())
            .build();

        let invitation_index = IndexModel::builder()
            .keys(doc! { "invitation_token": 1 })
            .options(
                IndexOptions::builder()
                    .name("invitation_token".to_string())
                    .sparse(true)
                    .build(),
            )
            .build();

        self.collection::<User>()
            .create_indexes([email_index, restaurant_index, invitation_index])
            .await
            .map_err(db_error)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> DateTime {
        DateTime::from_millis(1_700_000_000_000)
    }

    #[test]
    fn test_verification_consumption_matches_unexpired_digest() {
        let id = ObjectId::new();
        let (filter, update) = verification_consumption(&id, "code-digest", now());

        assert_eq!(filter.get_object_id("_id").unwrap(), id);
        assert_eq!(filter.get_str("verification_code").unwrap(), "code-digest");
        assert_eq!(
            filter.get_document("verification_code_expires").unwrap(),
            &doc! { "$gt": now() }
        );

        assert!(update.get_document("$set").unwrap().get_bool("is_verified").unwrap());
        let unset = update.get_document("$unset").unwrap();
        assert!(unset.contains_key("verification_code"));
        assert!(unset.contains_key("verification_code_expires"));
    }

    #[test]
    fn test_reset_consumption_replaces_password_and_clears_code() {
        let id = ObjectId::new();
        let (filter, update) = reset_consumption(&id, "reset-digest", "new-hash", now());

        assert_eq!(filter.get_str("reset_password_code").unwrap(), "reset-digest");
        assert_eq!(filter.get_document("reset_password_expires").unwrap(), &doc! { "$gt": now() });

        let set = update.get_document("$set").unwrap();
        assert_eq!(set.get_str("password_hash").unwrap(), "new-hash");
        assert_eq!(set.get_datetime("password_changed_at").unwrap(), &now());

        let unset = update.get_document("$unset").unwrap();
        assert!(unset.contains_key("reset_password_code"));
        assert!(unset.contains_key("reset_password_expires"));
    }

    #[test]
    fn test_invitation_consumption_activates_account() {
        let (filter, update) = invitation_consumption("token-digest", "real-hash", now());

        assert!(!filter.contains_key("_id"));
        assert_eq!(filter.get_str("invitation_token").unwrap(), "token-digest");
        assert_eq!(filter.get_document("invitation_expires").unwrap(), &doc! { "$gt": now() });

        let set = update.get_document("$set").unwrap();
        assert_eq!(set.get_str("password_hash").unwrap(), "real-hash");
        assert!(set.get_bool("is_verified").unwrap());
        assert_eq!(set.get_str("account_status").unwrap(), "active");

        let unset = update.get_document("$unset").unwrap();
        assert!(unset.contains_key("invitation_token"));
        assert!(unset.contains_key("invitation_expires"));
    }
}
