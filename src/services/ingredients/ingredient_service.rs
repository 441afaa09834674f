//! 재료 카탈로그와 재료 이미지 관리
//!
//! 모든 작업은 호출자의 레스토랑 범위 안에서만 이루어집니다. 다른 레스토랑의
//! 재료 ID 는 존재하지 않는 것과 같게 404 로 응답합니다.

use std::sync::Arc;

use mongodb::bson::DateTime;
use singleton_macro::service;

use crate::core::errors::AppError;
use crate::domain::dto::ingredients::{CreateIngredientRequest, IngredientImageResponse, IngredientResponse};
use crate::domain::entities::ingredients::Ingredient;
use crate::domain::models::auth::AuthenticatedUser;
use crate::repositories::ingredients::IngredientRepository;
use crate::repositories::parse_object_id;
use crate::services::media::{public_url, ImageService, ImageUpload};

pub const INGREDIENT_NOT_FOUND: &str = "Ingredient not found";

#[service(name = "ingredient")]
pub struct IngredientService {
    ingredient_repo: Arc<IngredientRepository>,
    image_service: Arc<ImageService>,
}

impl IngredientService {
    pub async fn create(&self, actor: &AuthenticatedUser, request: CreateIngredientRequest) -> Result<IngredientResponse, AppError> {
        let restaurant = actor.require_restaurant()?;
        let ingredient = Ingredient::new(
            restaurant,
            request.name,
            request.unit,
            request.category,
            actor.object_id()?,
            DateTime::now(),
        );

        let created = self.ingredient_repo.create(ingredient).await?;
        log::info!("재료 등록: {} (레스토랑 {})", created.name, restaurant.to_hex());
        Ok(IngredientResponse::from(&created))
    }

    pub async fn list(&self, actor: &AuthenticatedUser) -> Result<Vec<IngredientResponse>, AppError> {
        let restaurant = actor.require_restaurant()?;
        Ok(self
            .ingredient_repo
            .list_by_restaurant(&restaurant)
            .await?
            .iter()
            .map(IngredientResponse::from)
            .collect())
    }

    pub async fn get(&self, actor: &AuthenticatedUser, ingredient_id: &str) -> Result<IngredientResponse, AppError> {
        let ingredient = self.load(actor, ingredient_id).await?;
        Ok(IngredientResponse::from(&ingredient))
    }

    /// 이미지를 저장하고 교체합니다. 이전 이미지는 새 참조가 기록된 뒤 지웁니다.
    ///
    /// `base_url` 은 로컬 경로를 절대 URL 로 바꿀 때 사용됩니다.
    pub async fn upload_image(
        &self,
        actor: &AuthenticatedUser,
        ingredient_id: &str,
        upload: ImageUpload,
        base_url: &str,
    ) -> Result<IngredientImageResponse, AppError> {
        let ingredient = self.load(actor, ingredient_id).await?;
        let id = ingredient
            .id
            .ok_or_else(|| AppError::InternalError("ingredient without id".to_string()))?;

        let reference = self.image_service.store(upload).await?;

        let updated = match self.ingredient_repo.set_image(&id, Some(&reference)).await {
            Ok(Some(updated)) => updated,
            Ok(None) => {
                self.image_service.delete(&reference).await;
                return Err(AppError::NotFound(INGREDIENT_NOT_FOUND.to_string()));
            }
            Err(e) => {
                self.image_service.delete(&reference).await;
                return Err(e);
            }
        };

        if let Some(previous) = ingredient.image.as_deref() {
            self.image_service.delete(previous).await;
        }

        log::info!("재료 이미지 교체: {} → {}", ingredient_id, reference);
        Ok(IngredientImageResponse {
            ingredient: IngredientResponse::from(&updated),
            full_url: public_url(&reference, Some(base_url)),
            image: reference,
        })
    }

    pub async fn remove_image(&self, actor: &AuthenticatedUser, ingredient_id: &str) -> Result<IngredientResponse, AppError> {
        let ingredient = self.load(actor, ingredient_id).await?;
        let Some(previous) = ingredient.image.as_deref() else {
            return Err(AppError::ValidationError("Ingredient has no image".to_string()));
        };
        let id = ingredient
            .id
            .ok_or_else(|| AppError::InternalError("ingredient without id".to_string()))?;

        let updated = self
            .ingredient_repo
            .set_image(&id, None)
            .await?
            .ok_or_else(|| AppError::NotFound(INGREDIENT_NOT_FOUND.to_string()))?;

        self.image_service.delete(previous).await;
        log::info!("재료 이미지 삭제: {}", ingredient_id);
        Ok(IngredientResponse::from(&updated))
    }

    async fn load(&self, actor: &AuthenticatedUser, ingredient_id: &str) -> Result<Ingredient, AppError> {
        let restaurant = actor.require_restaurant()?;
        let id = parse_object_id(ingredient_id, INGREDIENT_NOT_FOUND)?;
        self.ingredient_repo
            .find_in_restaurant(&id, &restaurant)
            .await?
            .ok_or_else(|| AppError::NotFound(INGREDIENT_NOT_FOUND.to_string()))
    }
}
