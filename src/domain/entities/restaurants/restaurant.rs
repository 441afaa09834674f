//! 레스토랑(테넌트) 엔티티
//!
//! KYC 승인으로만 생성되며, 신청서 하나당 레스토랑 하나가 대응합니다.

use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::core::errors::{AppError, AppResult};
use crate::domain::entities::kyc::KycSubmission;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum RestaurantStatus {
    Active,
    Suspended,
    Inactive,
}

impl RestaurantStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RestaurantStatus::Active => "active",
            RestaurantStatus::Suspended => "suspended",
            RestaurantStatus::Inactive => "inactive",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "active" => Some(RestaurantStatus::Active),
            "suspended" => Some(RestaurantStatus::Suspended),
            "inactive" => Some(RestaurantStatus::Inactive),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Restaurant {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    pub address: String,
    pub city: String,
    pub phone_number: String,
    pub email: String,
    pub status: RestaurantStatus,
    /// 레스토랑 관리자 (KYC 신청자)
    pub owner: ObjectId,
    /// 생성 근거가 된 KYC 신청서 (유니크)
    pub kyc_submission: ObjectId,
    /// 요금제 사용자 수 한도 (관리자 포함)
    pub max_users: u32,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl Restaurant {
    /// 승인된 신청서로부터 레스토랑을 만듭니다.
    pub fn from_submission(submission: &KycSubmission, max_users: u32, now: DateTime) -> AppResult<Self> {
        let kyc_submission = submission
            .id
            .ok_or_else(|| AppError::InternalError("KYC submission has no id".to_string()))?;

        Ok(Self {
            id: None,
            name: submission.business.restaurant_name.clone(),
            address: submission.business.address.clone(),
            city: submission.business.city.clone(),
            phone_number: submission.business.phone_number.clone(),
            email: submission.business.email.clone(),
            status: RestaurantStatus::Active,
            owner: submission.applicant,
            kyc_submission,
            max_users: max_users.max(1),
            created_at: now,
            updated_at: now,
        })
    }

    pub fn id_string(&self) -> Option<String> {
        self.id.as_ref().map(|id| id.to_hex())
    }

    pub fn is_active(&self) -> bool {
        self.status == RestaurantStatus::Active
    }

    /// 한 명을 더 받을 수 있는지 확인합니다.
    pub fn ensure_capacity(&self, current_users: u64) -> AppResult<()> {
        if current_users >= u64::from(self.max_users) {
            return Err(AppError::ValidationError(format!(
                "User limit reached. Your plan allows {} users.",
                self.max_users
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::kyc::{BusinessDetails, KycDocuments};

    fn restaurant(max_users: u32) -> Restaurant {
        let mut submission = KycSubmission::new(
            ObjectId::new(),
            BusinessDetails {
                restaurant_name: "Le Bistrot".into(),
                city: "Yaoundé".into(),
                ..Default::default()
            },
            KycDocuments::default(),
            DateTime::from_millis(0),
        );
        submission.id = Some(ObjectId::new());
        Restaurant::from_submission(&submission, max_users, DateTime::from_millis(0)).unwrap()
    }

    #[test]
    fn test_from_submission_copies_business_details() {
        let r = restaurant(5);

        assert_eq!(r.name, "Le Bistrot");
        assert_eq!(r.city, "Yaoundé");
        assert!(r.is_active());
    }

    #[test]
    fn test_submission_without_id_is_rejected() {
        let submission = KycSubmission::new(
            ObjectId::new(),
            BusinessDetails::default(),
            KycDocuments::default(),
            DateTime::from_millis(0),
        );
        assert!(Restaurant::from_submission(&submission, 5, DateTime::from_millis(0)).is_err());
    }

    #[test]
    fn test_capacity_limit() {
        let r = restaurant(3);

        assert!(r.ensure_capacity(2).is_ok());
        match r.ensure_capacity(3) {
            Err(AppError::ValidationError(msg)) => {
                assert_eq!(msg, "User limit reached. Your plan allows 3 users.")
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_status_parse() {
        assert_eq!(RestaurantStatus::parse("suspended"), Some(RestaurantStatus::Suspended));
        assert_eq!(RestaurantStatus::parse("closed"), None);
    }
}
