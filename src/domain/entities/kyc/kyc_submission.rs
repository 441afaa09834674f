//! KYC 신청서 엔티티
//!
//! 레스토랑 관리자가 제출하는 사업자 정보와 증빙 서류 링크입니다.
//! 슈퍼 관리자의 심사 결과에 따라 다음과 같이 전이합니다.
//!
//! ```text
//! pending ──▶ under_review ──▶ approved  (레스토랑 생성)
//!    │             │
//!    └─────────────┴─────────▶ rejected  (사유 필수)
//! ```

use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::core::errors::{AppError, AppResult};
use crate::domain::entities::users::KycStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum KycSubmissionStatus {
    Pending,
    UnderReview,
    Approved,
    Rejected,
}

impl KycSubmissionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            KycSubmissionStatus::Pending => "pending",
            KycSubmissionStatus::UnderReview => "under_review",
            KycSubmissionStatus::Approved => "approved",
            KycSubmissionStatus::Rejected => "rejected",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(KycSubmissionStatus::Pending),
            "under_review" => Some(KycSubmissionStatus::UnderReview),
            "approved" => Some(KycSubmissionStatus::Approved),
            "rejected" => Some(KycSubmissionStatus::Rejected),
            _ => None,
        }
    }

    /// 아직 결론이 나지 않은 상태
    pub fn is_open(&self) -> bool {
        matches!(self, KycSubmissionStatus::Pending | KycSubmissionStatus::UnderReview)
    }
}

impl From<KycSubmissionStatus> for KycStatus {
    fn from(status: KycSubmissionStatus) -> Self {
        match status {
            KycSubmissionStatus::Pending => KycStatus::Pending,
            KycSubmissionStatus::UnderReview => KycStatus::UnderReview,
            KycSubmissionStatus::Approved => KycStatus::Approved,
            KycSubmissionStatus::Rejected => KycStatus::Rejected,
        }
    }
}

/// 증빙 서류 URL
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct KycDocuments {
    pub business_license: String,
    pub owner_id_front: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_id_back: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proof_of_address: Option<String>,
    #[serde(default)]
    pub additional_docs: Vec<String>,
}

/// 신청 시 입력받는 사업자 정보
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessDetails {
    pub restaurant_name: String,
    pub business_registration_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tax_id: Option<String>,
    pub address: String,
    pub city: String,
    pub phone_number: String,
    pub email: String,
    pub owner_full_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KycSubmission {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub applicant: ObjectId,
    #[serde(flatten)]
    pub business: BusinessDetails,
    pub documents: KycDocuments,
    pub status: KycSubmissionStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub review_notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviewed_by: Option<ObjectId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviewed_at: Option<DateTime>,
    /// 승인으로 생성된 레스토랑
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restaurant: Option<ObjectId>,
    pub submitted_at: DateTime,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl KycSubmission {
    pub fn new(applicant: ObjectId, business: BusinessDetails, documents: KycDocuments, now: DateTime) -> Self {
        Self {
            id: None,
            applicant,
            business,
            documents,
            status: KycSubmissionStatus::Pending,
            review_notes: None,
            rejection_reason: None,
            reviewed_by: None,
            reviewed_at: None,
            restaurant: None,
            submitted_at: now,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn id_string(&self) -> Option<String> {
        self.id.as_ref().map(|id| id.to_hex())
    }

    fn ensure_open(&self) -> AppResult<()> {
        if self.status.is_open() {
            Ok(())
        } else {
            Err(AppError::ConflictError(format!(
                "KYC submission has already been {}",
                self.status.as_str()
            )))
        }
    }

    /// `pending → under_review`
    pub fn start_review(&mut self, reviewer: ObjectId, now: DateTime) -> AppResult<()> {
        if self.status != KycSubmissionStatus::Pending {
            return Err(AppError::ConflictError(format!(
                "Only pending submissions can be moved to review (current status: {})",
                self.status.as_str()
            )));
        }
        self.status = KycSubmissionStatus::UnderReview;
        self.reviewed_by = Some(reviewer);
        self.updated_at = now;
        Ok(())
    }

    pub fn approve(&mut self, reviewer: ObjectId, review_notes: Option<String>, now: DateTime) -> AppResult<()> {
        self.ensure_open()?;
        self.status = KycSubmissionStatus::Approved;
        self.review_notes = review_notes;
        self.rejection_reason = None;
        self.reviewed_by = Some(reviewer);
        self.reviewed_at = Some(now);
        self.updated_at = now;
        Ok(())
    }

    /// 반려. 사유가 비어 있으면 거부합니다.
    pub fn reject(
        &mut self,
        reviewer: ObjectId,
        rejection_reason: &str,
        review_notes: Option<String>,
        now: DateTime,
    ) -> AppResult<()> {
        let reason = rejection_reason.trim();
        if reason.is_empty() {
            return Err(AppError::ValidationError("Rejection reason is required".to_string()));
        }
        self.ensure_open()?;
        self.status = KycSubmissionStatus::Rejected;
        self.rejection_reason = Some(reason.to_string());
        self.review_notes = review_notes;
        self.reviewed_by = Some(reviewer);
        self.reviewed_at = Some(now);
        self.updated_at = now;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submission() -> KycSubmission {
        KycSubmission::new(
            ObjectId::new(),
            BusinessDetails {
                restaurant_name: "Chez Mama".into(),
                business_registration_number: "RC/DLA/2024/B/123".into(),
                tax_id: None,
                address: "Rue de la Joie".into(),
                city: "Douala".into(),
                phone_number: "+237690119047".into(),
                email: "contact@chezmama.cm".into(),
                owner_full_name: "Mama Ngo".into(),
            },
            KycDocuments {
                business_license: "https://files/licence.pdf".into(),
                owner_id_front: "https://files/id.png".into(),
                ..Default::default()
            },
            DateTime::from_millis(0),
        )
    }

    #[test]
    fn test_approve_pending() {
        let mut kyc = submission();
        let reviewer = ObjectId::new();

        kyc.approve(reviewer, Some("All good".into()), DateTime::from_millis(5)).unwrap();

        assert_eq!(kyc.status, KycSubmissionStatus::Approved);
        assert_eq!(kyc.reviewed_by, Some(reviewer));
        assert_eq!(kyc.review_notes.as_deref(), Some("All good"));
    }

    #[test]
    fn test_second_approval_conflicts() {
        let mut kyc = submission();
        kyc.approve(ObjectId::new(), None, DateTime::from_millis(5)).unwrap();

        let second = kyc.approve(ObjectId::new(), None, DateTime::from_millis(6));
        assert!(matches!(second, Err(AppError::ConflictError(_))));
    }

    #[test]
    fn test_reject_requires_reason() {
        let mut kyc = submission();

        let blank = kyc.reject(ObjectId::new(), "   ", None, DateTime::from_millis(5));
        assert!(matches!(blank, Err(AppError::ValidationError(_))));
        assert_eq!(kyc.status, KycSubmissionStatus::Pending);

        kyc.reject(ObjectId::new(), " Blurry ID ", None, DateTime::from_millis(6)).unwrap();
        assert_eq!(kyc.status, KycSubmissionStatus::Rejected);
        assert_eq!(kyc.rejection_reason.as_deref(), Some("Blurry ID"));
    }

    #[test]
    fn test_review_then_approve() {
        let mut kyc = submission();
        kyc.start_review(ObjectId::new(), DateTime::from_millis(1)).unwrap();
        assert_eq!(kyc.status, KycSubmissionStatus::UnderReview);
        assert!(kyc.start_review(ObjectId::new(), DateTime::from_millis(2)).is_err());

        kyc.approve(ObjectId::new(), None, DateTime::from_millis(3)).unwrap();
        assert_eq!(KycStatus::from(kyc.status), KycStatus::Approved);
    }

    #[test]
    fn test_rejected_cannot_be_approved() {
        let mut kyc = submission();
        kyc.reject(ObjectId::new(), "Missing licence", None, DateTime::from_millis(1)).unwrap();

        assert!(kyc.approve(ObjectId::new(), None, DateTime::from_millis(2)).is_err());
    }
}
