//! # KYC 서비스
//!
//! 레스토랑 관리자의 신청서 제출과 슈퍼 관리자의 심사를 담당합니다.
//!
//! ```text
//! not_submitted ─submit─▶ pending ─review─▶ under_review
//!        ▲                   │                  │
//!        └──── rejected ◀────┴──── reject ──────┤
//!                            └──── approve ─────┴─▶ approved (+ Restaurant)
//! ```
//!
//! ## 승인 순서
//!
//! 1. 신청서를 `pending|under_review` 조건으로 `approved` 로 원자적으로 전환
//! 2. 레스토랑 생성 (`kyc_submission` 유니크)
//! 3. 신청서에 레스토랑 연결, 신청자를 레스토랑 관리자로 지정
//! 4. 2~3 중 하나라도 실패하면 만든 레스토랑을 지우고 신청서를 이전 상태로 복원한 뒤 에러 반환
//! 5. 승인 메일 발송 (실패는 로그만)

use std::sync::Arc;

use mongodb::bson::oid::ObjectId;
use mongodb::bson::DateTime;
use singleton_macro::service;

use crate::config::TenantConfig;
use crate::core::errors::AppError;
use crate::domain::dto::admin::{KycApprovalResponse, RestaurantResponse, StatusListQuery};
use crate::domain::dto::common::{Paginated, Pagination};
use crate::domain::dto::kyc::{KycStatusResponse, KycSubmissionResponse, SubmitKycRequest};
use crate::domain::dto::users::UserSummary;
use crate::domain::entities::kyc::{KycSubmission, KycSubmissionStatus};
use crate::domain::entities::restaurants::Restaurant;
use crate::domain::entities::users::{KycStatus, User};
use crate::domain::models::auth::AuthenticatedUser;
use crate::repositories::kyc::KycRepository;
use crate::repositories::parse_object_id;
use crate::repositories::restaurants::RestaurantRepository;
use crate::repositories::users::UserRepository;
use crate::services::notifications::EmailService;

pub const SUBMISSION_NOT_FOUND: &str = "KYC submission not found";
pub const SUBMISSION_ALREADY_PROCESSED: &str = "KYC submission has already been processed";

#[service(name = "kyc")]
pub struct KycService {
    kyc_repo: Arc<KycRepository>,
    user_repo: Arc<UserRepository>,
    restaurant_repo: Arc<RestaurantRepository>,
    email_service: Arc<EmailService>,
}

/// 목록 필터 파싱. 알 수 없는 값은 400.
pub fn parse_submission_filter(raw: Option<&str>) -> Result<Option<KycSubmissionStatus>, AppError> {
    match raw {
        None => Ok(None),
        Some(value) => KycSubmissionStatus::parse(value).map(Some).ok_or_else(|| {
            AppError::ValidationError(
                "Invalid status. Must be pending, under_review, approved, or rejected".to_string(),
            )
        }),
    }
}

/// 제출 가능 여부. 처음이거나 반려된 경우만 허용합니다.
pub fn ensure_can_submit(status: KycStatus) -> Result<(), AppError> {
    if status.can_submit() {
        Ok(())
    } else {
        Err(AppError::ConflictError(format!(
            "KYC cannot be submitted while status is {}",
            status.as_str()
        )))
    }
}

impl KycService {
    pub async fn submit(&self, actor: &AuthenticatedUser, request: SubmitKycRequest) -> Result<KycSubmissionResponse, AppError> {
        let applicant = self.load_user(&actor.user_id).await?;
        ensure_can_submit(applicant.kyc_status)?;

        let applicant_id = actor.object_id()?;
        let (business, documents) = request.into_parts();
        let submission = self
            .kyc_repo
            .create(KycSubmission::new(applicant_id, business, documents, DateTime::now()))
            .await?;

        self.user_repo
            .set_kyc_status(&applicant_id, KycStatus::Pending, submission.id)
            .await?;

        log::info!(
            "KYC 제출: 신청서 {} (신청자 {})",
            submission.id_string().unwrap_or_default(),
            actor.user_id
        );
        Ok(KycSubmissionResponse::from(&submission))
    }

    pub async fn status(&self, actor: &AuthenticatedUser) -> Result<KycStatusResponse, AppError> {
        let user = self.load_user(&actor.user_id).await?;
        let submission = self
            .kyc_repo
            .find_latest_by_applicant(&actor.object_id()?)
            .await?;

        Ok(KycStatusResponse {
            kyc_status: user.kyc_status,
            submission: submission.as_ref().map(KycSubmissionResponse::from),
        })
    }

    pub async fn list(&self, query: &StatusListQuery) -> Result<Paginated<KycSubmissionResponse>, AppError> {
        let status = parse_submission_filter(query.status_filter())?;
        let page = query.page_query();
        let (submissions, total) = self.kyc_repo.list(status, &page).await?;

        Ok(Paginated {
            items: submissions.iter().map(KycSubmissionResponse::from).collect(),
            pagination: Pagination::new(&page, total),
        })
    }

    /// 신청자 요약을 포함한 단건 조회
    pub async fn get(&self, submission_id: &str) -> Result<KycSubmissionResponse, AppError> {
        let submission = self.load_submission(submission_id).await?;
        let applicant = self
            .user_repo
            .find_by_id(&submission.applicant.to_hex())
            .await?;

        Ok(KycSubmissionResponse::from(&submission).with_applicant(applicant.as_ref().map(UserSummary::from)))
    }

    /// `pending → under_review`
    pub async fn start_review(&self, reviewer: &AuthenticatedUser, submission_id: &str) -> Result<KycSubmissionResponse, AppError> {
        let current = self.load_submission(submission_id).await?;

        let mut next = current.clone();
        next.start_review(reviewer.object_id()?, DateTime::now())?;

        let updated = self
            .kyc_repo
            .transition(&next, &[KycSubmissionStatus::Pending])
            .await?
            .ok_or_else(|| AppError::ConflictError(SUBMISSION_ALREADY_PROCESSED.to_string()))?;

        self.user_repo
            .set_kyc_status(&updated.applicant, KycStatus::UnderReview, None)
            .await?;

        log::info!("KYC 심사 시작: {} (심사자 {})", submission_id, reviewer.user_id);
        Ok(KycSubmissionResponse::from(&updated))
    }

    /// 승인하고 레스토랑을 만듭니다. 레스토랑은 신청서당 최대 하나입니다.
    pub async fn approve(
        &self,
        reviewer: &AuthenticatedUser,
        submission_id: &str,
        review_notes: Option<String>,
    ) -> Result<KycApprovalResponse, AppError> {
        let previous = self.load_submission(submission_id).await?;
        let now = DateTime::now();

        let mut next = previous.clone();
        next.approve(reviewer.object_id()?, review_notes, now)?;

        let mut approved = self
            .kyc_repo
            .transition(&next, &[KycSubmissionStatus::Pending, KycSubmissionStatus::UnderReview])
            .await?
            .ok_or_else(|| AppError::ConflictError(SUBMISSION_ALREADY_PROCESSED.to_string()))?;

        let restaurant = match self.provision_restaurant(&approved, now).await {
            Ok(restaurant) => restaurant,
            Err(e) => {
                self.roll_back_approval(&previous, None).await;
                return Err(e);
            }
        };

        let restaurant_id = match restaurant.id {
            Some(id) => id,
            None => {
                self.roll_back_approval(&previous, None).await;
                return Err(AppError::InternalError("restaurant without id".to_string()));
            }
        };

        let applicant = match self.attach_restaurant(&approved, &restaurant_id).await {
            Ok(applicant) => applicant,
            Err(e) => {
                self.roll_back_approval(&previous, Some(&restaurant_id)).await;
                return Err(e);
            }
        };
        approved.restaurant = Some(restaurant_id);

        match applicant {
            Some(applicant) => self.email_service.notify_kyc_approved(&applicant, &restaurant.name).await,
            None => log::warn!("KYC 승인: 신청자 {} 를 찾을 수 없습니다", approved.applicant.to_hex()),
        }

        log::info!(
            "KYC 승인: 신청서 {} → 레스토랑 {} (심사자 {})",
            submission_id,
            restaurant_id.to_hex(),
            reviewer.user_id
        );

        Ok(KycApprovalResponse {
            submission: KycSubmissionResponse::from(&approved),
            restaurant: RestaurantResponse::from(&restaurant),
        })
    }

    /// 신청서에 레스토랑을 연결하고 신청자를 관리자로 지정합니다.
    async fn attach_restaurant(
        &self,
        approved: &KycSubmission,
        restaurant_id: &ObjectId,
    ) -> Result<Option<User>, AppError> {
        let submission_oid = approved
            .id
            .ok_or_else(|| AppError::InternalError("KYC submission without id".to_string()))?;

        self.kyc_repo.link_restaurant(&submission_oid, restaurant_id).await?;
        self.user_repo
            .assign_restaurant_admin(&approved.applicant, restaurant_id)
            .await
    }

    /// 승인 보상. 보상 자체의 실패는 로그만 남기고 원래 에러를 돌려주게 둡니다.
    async fn roll_back_approval(&self, previous: &KycSubmission, restaurant: Option<&ObjectId>) {
        let submission = previous.id_string().unwrap_or_default();

        if let Some(restaurant) = restaurant {
            if let Err(e) = self.restaurant_repo.delete(restaurant).await {
                log::error!("KYC 승인 보상: 레스토랑 {} 삭제 실패 ({}): {}", restaurant.to_hex(), submission, e);
            }
        }
        if let Err(e) = self.kyc_repo.restore(previous).await {
            log::error!("KYC 승인 복원 실패 ({}): {}", submission, e);
        }
    }

    async fn provision_restaurant(&self, approved: &KycSubmission, now: DateTime) -> Result<Restaurant, AppError> {
        let restaurant = Restaurant::from_submission(approved, TenantConfig::default_max_users(), now)?;
        self.restaurant_repo.create(restaurant).await
    }

    pub async fn reject(
        &self,
        reviewer: &AuthenticatedUser,
        submission_id: &str,
        rejection_reason: &str,
        review_notes: Option<String>,
    ) -> Result<KycSubmissionResponse, AppError> {
        let current = self.load_submission(submission_id).await?;

        let mut next = current.clone();
        next.reject(reviewer.object_id()?, rejection_reason, review_notes, DateTime::now())?;

        let rejected = self
            .kyc_repo
            .transition(&next, &[KycSubmissionStatus::Pending, KycSubmissionStatus::UnderReview])
            .await?
            .ok_or_else(|| AppError::ConflictError(SUBMISSION_ALREADY_PROCESSED.to_string()))?;

        if let Some(applicant) = self
            .user_repo
            .set_kyc_status(&rejected.applicant, KycStatus::Rejected, None)
            .await?
        {
            let reason = rejected.rejection_reason.as_deref().unwrap_or(rejection_reason);
            self.email_service.notify_kyc_rejected(&applicant, reason).await;
        }

        log::info!("KYC 반려: 신청서 {} (심사자 {})", submission_id, reviewer.user_id);
        Ok(KycSubmissionResponse::from(&rejected))
    }

    async fn load_submission(&self, submission_id: &str) -> Result<KycSubmission, AppError> {
        let id: ObjectId = parse_object_id(submission_id, SUBMISSION_NOT_FOUND)?;
        self.kyc_repo
            .find_by_id(&id)
            .await?
            .ok_or_else(|| AppError::NotFound(SUBMISSION_NOT_FOUND.to_string()))
    }

    async fn load_user(&self, user_id: &str) -> Result<User, AppError> {
        self.user_repo
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::kyc::{BusinessDetails, KycDocuments};

    fn submission() -> KycSubmission {
        let mut submission = KycSubmission::new(
            ObjectId::new(),
            BusinessDetails {
                restaurant_name: "Chez Mama".into(),
                ..Default::default()
            },
            KycDocuments::default(),
            DateTime::from_millis(0),
        );
        submission.id = Some(ObjectId::new());
        submission
    }

    #[test]
    fn test_parse_submission_filter() {
        assert_eq!(parse_submission_filter(None).unwrap(), None);
        assert_eq!(
            parse_submission_filter(Some("under_review")).unwrap(),
            Some(KycSubmissionStatus::UnderReview)
        );
        assert!(matches!(parse_submission_filter(Some("done")), Err(AppError::ValidationError(_))));
    }

    #[test]
    fn test_ensure_can_submit() {
        assert!(ensure_can_submit(KycStatus::NotSubmitted).is_ok());
        assert!(ensure_can_submit(KycStatus::Rejected).is_ok());
        for status in [KycStatus::Pending, KycStatus::UnderReview, KycStatus::Approved] {
            assert!(matches!(ensure_can_submit(status), Err(AppError::ConflictError(_))));
        }
    }

    #[test]
    fn test_second_approval_is_rejected_before_touching_storage() {
        let mut submission = submission();
        let reviewer = ObjectId::new();
        submission.approve(reviewer, None, DateTime::from_millis(1)).unwrap();

        let mut again = submission.clone();
        assert!(matches!(
            again.approve(reviewer, None, DateTime::from_millis(2)),
            Err(AppError::ConflictError(_))
        ));
    }

    #[test]
    fn test_approved_submission_yields_one_restaurant_draft() {
        let mut submission = submission();
        submission.approve(ObjectId::new(), None, DateTime::from_millis(1)).unwrap();

        let restaurant = Restaurant::from_submission(&submission, 10, DateTime::from_millis(1)).unwrap();
        assert_eq!(restaurant.name, "Chez Mama");
        assert_eq!(restaurant.owner, submission.applicant);
        assert_eq!(Some(restaurant.kyc_submission), submission.id);
    }
}
