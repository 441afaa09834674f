//! Ingredient HTTP Handlers
//!
//! 호출자 레스토랑의 재료 카탈로그와 재료 이미지(multipart `image` 필드) 엔드포인트입니다.

use actix_multipart::Multipart;
use actix_web::{delete, get, post, web, HttpRequest, HttpResponse};
use futures_util::TryStreamExt;
use utoipa::ToSchema;

use crate::config::StorageConfig;
use crate::core::errors::{AppError, AppResult};
use crate::domain::dto::common::ApiResponse;
use crate::domain::dto::ingredients::CreateIngredientRequest;
use crate::domain::models::auth::AuthenticatedUser;
use crate::handlers::{request_base_url, validate_request};
use crate::services::ingredients::IngredientService;
use crate::services::media::{ImageUpload, IMAGE_TOO_LARGE};

pub const IMAGE_FIELD: &str = "image";
pub const MISSING_IMAGE: &str = "Please upload an image";

/// 문서용 multipart 스키마
#[derive(ToSchema)]
#[allow(dead_code)]
pub struct ImageUploadForm {
    #[schema(value_type = String, format = Binary)]
    image: Vec<u8>,
}

#[utoipa::path(
    post,
    path = "/api/ingredients",
    tag = "Ingredients",
    security(("bearer_auth" = [])),
    request_body = CreateIngredientRequest,
    responses(
        (status = 201, description = "Ingredient created"),
        (status = 409, description = "An ingredient with this name already exists")
    )
)]
#[post("")]
pub async fn create_ingredient(
    user: AuthenticatedUser,
    payload: web::Json<CreateIngredientRequest>,
) -> AppResult<HttpResponse> {
    let request = payload.into_inner();
    validate_request(&request)?;

    let ingredient = IngredientService::instance().create(&user, request).await?;

    Ok(ApiResponse::success("Ingredient created successfully", ingredient).created())
}

#[utoipa::path(
    get,
    path = "/api/ingredients",
    tag = "Ingredients",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "Ingredients of the caller's restaurant"))
)]
#[get("")]
pub async fn list_ingredients(user: AuthenticatedUser) -> AppResult<HttpResponse> {
    let ingredients = IngredientService::instance().list(&user).await?;

    Ok(ApiResponse::success("Ingredients retrieved successfully", ingredients).ok())
}

#[utoipa::path(
    get,
    path = "/api/ingredients/{id}",
    tag = "Ingredients",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Ingredient id")),
    responses(
        (status = 200, description = "Ingredient"),
        (status = 404, description = "Ingredient not found")
    )
)]
#[get("/{id}")]
pub async fn get_ingredient(user: AuthenticatedUser, path: web::Path<String>) -> AppResult<HttpResponse> {
    let ingredient = IngredientService::instance().get(&user, &path.into_inner()).await?;

    Ok(ApiResponse::success("Ingredient retrieved successfully", ingredient).ok())
}

/// 재료 이미지 업로드/교체
///
/// jpeg, jpg, png, gif, webp 만 허용하며 최대 5MB 입니다. 이전 이미지는 삭제됩니다.
#[utoipa::path(
    post,
    path = "/api/ingredients/{id}/image",
    tag = "Ingredients",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Ingredient id")),
    request_body(content = ImageUploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Image stored, `{image, fullUrl}` returned"),
        (status = 400, description = "Missing file, unsupported type or file too large"),
        (status = 404, description = "Ingredient not found")
    )
)]
#[post("/{id}/image")]
pub async fn upload_ingredient_image(
    req: HttpRequest,
    user: AuthenticatedUser,
    path: web::Path<String>,
    payload: Multipart,
) -> AppResult<HttpResponse> {
    let upload = read_image_field(payload).await?;
    let base_url = request_base_url(&req);

    let result = IngredientService::instance()
        .upload_image(&user, &path.into_inner(), upload, &base_url)
        .await?;

    Ok(ApiResponse::success("Image uploaded successfully", result).ok())
}

#[utoipa::path(
    delete,
    path = "/api/ingredients/{id}/image",
    tag = "Ingredients",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Ingredient id")),
    responses(
        (status = 200, description = "Image removed"),
        (status = 400, description = "Ingredient has no image"),
        (status = 404, description = "Ingredient not found")
    )
)]
#[delete("/{id}/image")]
pub async fn delete_ingredient_image(user: AuthenticatedUser, path: web::Path<String>) -> AppResult<HttpResponse> {
    let ingredient = IngredientService::instance()
        .remove_image(&user, &path.into_inner())
        .await?;

    Ok(ApiResponse::success("Image deleted successfully", ingredient).ok())
}

/// `image` 필드 하나를 메모리로 읽습니다. 다른 필드는 버립니다.
///
/// 크기 제한을 넘는 순간 읽기를 멈추고 400 으로 응답합니다.
async fn read_image_field(mut payload: Multipart) -> AppResult<ImageUpload> {
    while let Some(mut field) = payload.try_next().await.map_err(multipart_error)? {
        if field.name() != Some(IMAGE_FIELD) {
            while field.try_next().await.map_err(multipart_error)?.is_some() {}
            continue;
        }

        let content_type = field
            .content_type()
            .map(|mime| mime.essence_str().to_string())
            .unwrap_or_default();

        let mut bytes = Vec::new();
        while let Some(chunk) = field.try_next().await.map_err(multipart_error)? {
            if bytes.len() + chunk.len() > StorageConfig::MAX_IMAGE_BYTES {
                return Err(AppError::ValidationError(IMAGE_TOO_LARGE.to_string()));
            }
            bytes.extend_from_slice(&chunk);
        }

        return Ok(ImageUpload { bytes, content_type });
    }

    Err(AppError::ValidationError(MISSING_IMAGE.to_string()))
}

fn multipart_error(err: actix_multipart::MultipartError) -> AppError {
    log::warn!("multipart 파싱 실패: {}", err);
    AppError::ValidationError(MISSING_IMAGE.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::users::{KycStatus, Permission, Role};
    use crate::middlewares::AuthMiddleware;
    use actix_web::dev::Service as _;
    use actix_web::http::StatusCode;
    use actix_web::{test, App, HttpMessage as _};
    use serde_json::Value;

    const BOUNDARY: &str = "----djulah-test-boundary";

    fn cook() -> AuthenticatedUser {
        AuthenticatedUser {
            user_id: mongodb::bson::oid::ObjectId::new().to_hex(),
            email: "cook@example.com".into(),
            full_name: "Jean Kamga".into(),
            role: Role::RestaurantStaff,
            permissions: vec![Permission::ManageIngredients],
            restaurant_id: Some(mongodb::bson::oid::ObjectId::new().to_hex()),
            kyc_status: KycStatus::Approved,
            is_verified: true,
        }
    }

    fn multipart_body(field: &str, content_type: &str, data: &[u8]) -> Vec<u8> {
        let mut body = format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"tomato.png\"\r\nContent-Type: {content_type}\r\n\r\n"
        )
        .into_bytes();
        body.extend_from_slice(data);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    async fn post_upload(body: Vec<u8>) -> (StatusCode, Value) {
        let app = test::init_service(
            App::new()
                .wrap_fn(|req, srv| {
                    req.extensions_mut().insert(cook());
                    srv.call(req)
                })
                .service(web::scope("/api/ingredients").service(upload_ingredient_image)),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/ingredients/64f000000000000000000001/image")
            .insert_header(("content-type", format!("multipart/form-data; boundary={BOUNDARY}")))
            .set_payload(body)
            .to_request();
        let resp = test::call_service(&app, req).await;
        let status = resp.status();
        (status, test::read_body_json(resp).await)
    }

    #[actix_web::test]
    async fn test_missing_image_field() {
        let (status, body) = post_upload(multipart_body("photo", "image/png", b"\x89PNG")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], MISSING_IMAGE);
    }

    #[actix_web::test]
    async fn test_oversized_image_is_rejected_while_streaming() {
        let data = vec![0u8; StorageConfig::MAX_IMAGE_BYTES + 1];
        let (status, body) = post_upload(multipart_body(IMAGE_FIELD, "image/png", &data)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], IMAGE_TOO_LARGE);
    }

    #[actix_web::test]
    async fn test_ingredient_scope_requires_token() {
        let app = test::init_service(
            App::new().service(
                web::scope("/api/ingredients")
                    .wrap(AuthMiddleware::ingredient_manager())
                    .service(list_ingredients),
            ),
        )
        .await;

        let resp = test::call_service(&app, test::TestRequest::get().uri("/api/ingredients").to_request()).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }
}
