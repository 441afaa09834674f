//! 레스토랑 관리 서비스 (슈퍼 관리자 전용)

use std::sync::Arc;

use singleton_macro::service;

use crate::core::errors::AppError;
use crate::domain::dto::admin::{
    KycCounts, RestaurantDetailResponse, RestaurantResponse, RestaurantStats, StatusListQuery,
    SystemStatsResponse,
};
use crate::domain::dto::common::{Paginated, Pagination};
use crate::domain::dto::users::UserSummary;
use crate::domain::entities::kyc::KycSubmissionStatus;
use crate::domain::entities::restaurants::{Restaurant, RestaurantStatus};
use crate::domain::models::auth::AuthenticatedUser;
use crate::repositories::ingredients::IngredientRepository;
use crate::repositories::kyc::KycRepository;
use crate::repositories::parse_object_id;
use crate::repositories::restaurants::RestaurantRepository;
use crate::repositories::users::UserRepository;

pub const RESTAURANT_NOT_FOUND: &str = "Restaurant not found";
pub const INVALID_RESTAURANT_STATUS: &str = "Invalid status. Must be active, suspended, or inactive";

#[service(name = "restaurant")]
pub struct RestaurantService {
    restaurant_repo: Arc<RestaurantRepository>,
    user_repo: Arc<UserRepository>,
    ingredient_repo: Arc<IngredientRepository>,
    kyc_repo: Arc<KycRepository>,
}

pub fn parse_restaurant_filter(raw: Option<&str>) -> Result<Option<RestaurantStatus>, AppError> {
    match raw {
        None => Ok(None),
        Some(value) => RestaurantStatus::parse(value)
            .map(Some)
            .ok_or_else(|| AppError::ValidationError(INVALID_RESTAURANT_STATUS.to_string())),
    }
}

impl RestaurantService {
    pub async fn list(&self, query: &StatusListQuery) -> Result<Paginated<RestaurantResponse>, AppError> {
        let status = parse_restaurant_filter(query.status_filter())?;
        let page = query.page_query();
        let (restaurants, total) = self.restaurant_repo.list(status, &page).await?;

        Ok(Paginated {
            items: restaurants.iter().map(RestaurantResponse::from).collect(),
            pagination: Pagination::new(&page, total),
        })
    }

    /// 소유자 요약과 사용량 통계를 포함한 상세 조회
    pub async fn detail(&self, restaurant_id: &str) -> Result<RestaurantDetailResponse, AppError> {
        let restaurant = self.load(restaurant_id).await?;
        let id = restaurant
            .id
            .ok_or_else(|| AppError::InternalError("restaurant without id".to_string()))?;

        let owner = self.user_repo.find_by_id(&restaurant.owner.to_hex()).await?;
        let stats = RestaurantStats {
            user_count: self.user_repo.count_by_restaurant(&id).await?,
            ingredient_count: self.ingredient_repo.count_by_restaurant(&id).await?,
        };

        Ok(RestaurantDetailResponse {
            restaurant: RestaurantResponse::from(&restaurant),
            owner: owner.as_ref().map(UserSummary::from),
            stats,
        })
    }

    pub async fn update_status(
        &self,
        actor: &AuthenticatedUser,
        restaurant_id: &str,
        status: RestaurantStatus,
    ) -> Result<RestaurantResponse, AppError> {
        let id = parse_object_id(restaurant_id, RESTAURANT_NOT_FOUND)?;
        let updated = self
            .restaurant_repo
            .update_status(&id, status)
            .await?
            .ok_or_else(|| AppError::NotFound(RESTAURANT_NOT_FOUND.to_string()))?;

        log::info!(
            "레스토랑 상태 변경: {} → {} (변경자 {})",
            restaurant_id,
            status.as_str(),
            actor.user_id
        );
        Ok(RestaurantResponse::from(&updated))
    }

    /// 활성 레스토랑 수, 활성 사용자 수, 상태별 KYC 신청 수
    pub async fn system_stats(&self) -> Result<SystemStatsResponse, AppError> {
        let (restaurants, users, pending, under_review, approved, rejected) = futures_util::try_join!(
            self.restaurant_repo.count_by_status(RestaurantStatus::Active),
            self.user_repo.count_active(),
            self.kyc_repo.count_by_status(KycSubmissionStatus::Pending),
            self.kyc_repo.count_by_status(KycSubmissionStatus::UnderReview),
            self.kyc_repo.count_by_status(KycSubmissionStatus::Approved),
            self.kyc_repo.count_by_status(KycSubmissionStatus::Rejected),
        )?;

        Ok(SystemStatsResponse {
            total_restaurants: restaurants,
            total_users: users,
            kyc: KycCounts {
                pending,
                under_review,
                approved,
                rejected,
            },
        })
    }

    async fn load(&self, restaurant_id: &str) -> Result<Restaurant, AppError> {
        let id = parse_object_id(restaurant_id, RESTAURANT_NOT_FOUND)?;
        self.restaurant_repo
            .find_by_id(&id)
            .await?
            .ok_or_else(|| AppError::NotFound(RESTAURANT_NOT_FOUND.to_string()))
    }
}
