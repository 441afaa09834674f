use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::dto::users::UserSummary;
use crate::domain::entities::restaurants::{Restaurant, RestaurantStatus};
use crate::domain::entities::to_chrono;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RestaurantResponse {
    pub id: String,
    pub name: String,
    pub address: String,
    pub city: String,
    pub phone_number: String,
    pub email: String,
    pub status: RestaurantStatus,
    pub owner_id: String,
    pub kyc_submission: String,
    pub max_users: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Restaurant> for RestaurantResponse {
    fn from(r: &Restaurant) -> Self {
        Self {
            id: r.id_string().unwrap_or_default(),
            name: r.name.clone(),
            address: r.address.clone(),
            city: r.city.clone(),
            phone_number: r.phone_number.clone(),
            email: r.email.clone(),
            status: r.status,
            owner_id: r.owner.to_hex(),
            kyc_submission: r.kyc_submission.to_hex(),
            max_users: r.max_users,
            created_at: to_chrono(r.created_at),
            updated_at: to_chrono(r.updated_at),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RestaurantStats {
    pub user_count: u64,
    pub ingredient_count: u64,
}

#[derive(Debug, Serialize)]
pub struct RestaurantDetailResponse {
    pub restaurant: RestaurantResponse,
    pub owner: Option<UserSummary>,
    pub stats: RestaurantStats,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KycCounts {
    pub pending: u64,
    pub under_review: u64,
    pub approved: u64,
    pub rejected: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemStatsResponse {
    pub total_restaurants: u64,
    pub total_users: u64,
    pub kyc: KycCounts,
}

/// KYC 승인 결과
#[derive(Debug, Serialize)]
pub struct KycApprovalResponse {
    pub submission: crate::domain::dto::kyc::KycSubmissionResponse,
    pub restaurant: RestaurantResponse,
}
