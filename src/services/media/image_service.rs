//! # 이미지 저장 서비스
//!
//! Cloudinary 자격 증명이 모두 설정되어 있으면 서명 업로드를 사용하고,
//! 없으면 `{UPLOAD_DIR}/ingredients/` 아래 로컬 파일로 저장합니다.
//!
//! 반환되는 참조는 호스팅 URL(`https://res.cloudinary.com/...`) 또는
//! 로컬 경로(`/uploads/ingredients/<uuid>.<ext>`) 입니다.

use std::path::PathBuf;

use actix_web::web;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::Deserialize;
use sha2::{Digest, Sha256};
use singleton_macro::service;

use crate::config::{CloudinaryCredentials, StorageConfig};
use crate::core::errors::{AppError, ErrorContext};

pub const IMAGE_FOLDER: &str = "ingredients";
pub const LOCAL_URL_PREFIX: &str = "/uploads";
pub const INVALID_IMAGE_TYPE: &str = "Only image files are allowed (jpeg, jpg, png, gif, webp)";
pub const IMAGE_TOO_LARGE: &str = "File too large. Maximum size is 5MB";

/// 업로드된 파일 한 개
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

/// 허용된 MIME 타입의 파일 확장자
pub fn image_extension(content_type: &str) -> Option<&'static str> {
    match content_type.trim().to_ascii_lowercase().as_str() {
        "image/jpeg" | "image/jpg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/gif" => Some("gif"),
        "image/webp" => Some("webp"),
        _ => None,
    }
}

/// 형식과 크기를 검사하고 저장할 확장자를 돌려줍니다.
pub fn validate_upload(upload: &ImageUpload) -> Result<&'static str, AppError> {
    if upload.bytes.is_empty() {
        return Err(AppError::ValidationError("Please upload an image".to_string()));
    }
    if upload.bytes.len() > StorageConfig::MAX_IMAGE_BYTES {
        return Err(AppError::ValidationError(IMAGE_TOO_LARGE.to_string()));
    }
    image_extension(&upload.content_type)
        .ok_or_else(|| AppError::ValidationError(INVALID_IMAGE_TYPE.to_string()))
}

/// 클라이언트에 보여 줄 절대 URL
pub fn public_url(reference: &str, base_url: Option<&str>) -> String {
    if reference.starts_with("http://") || reference.starts_with("https://") {
        return reference.to_string();
    }
    match base_url {
        Some(base) => format!("{}{}", base.trim_end_matches('/'), reference),
        None => reference.to_string(),
    }
}

/// Cloudinary 요청 서명: 키 순으로 정렬한 `k=v&...` 뒤에 비밀키를 붙인 SHA-256
///
/// 계정의 서명 알고리즘이 SHA-256 으로 설정되어 있어야 합니다.
pub fn cloudinary_signature(params: &[(&str, &str)], api_secret: &str) -> String {
    let mut sorted: Vec<_> = params.to_vec();
    sorted.sort_by(|a, b| a.0.cmp(b.0));
    let joined = sorted
        .iter()
        .map(|(key, value)| format!("{}={}", key, value))
        .collect::<Vec<_>>()
        .join("&");
    format!("{:x}", Sha256::digest(format!("{}{}", joined, api_secret).as_bytes()))
}

/// 호스팅 URL 에서 `ingredients/<name>` 형태의 public id 를 뽑습니다.
pub fn cloudinary_public_id(url: &str) -> Option<String> {
    let filename = url.rsplit('/').next()?;
    let stem = filename.split('.').next().filter(|s| !s.is_empty())?;
    Some(format!("{}/{}", IMAGE_FOLDER, stem))
}

/// `/uploads/ingredients/x.jpg` → `{UPLOAD_DIR}/ingredients/x.jpg`
///
/// 상위 경로 이동이 섞인 참조는 거부합니다.
pub fn local_path_for(reference: &str, upload_dir: &str) -> Option<PathBuf> {
    let relative = reference.strip_prefix(LOCAL_URL_PREFIX)?.trim_start_matches('/');
    if relative.is_empty() || relative.split('/').any(|part| part == ".." || part.is_empty()) {
        return None;
    }
    Some(PathBuf::from(upload_dir).join(relative))
}

#[derive(Debug, Deserialize)]
struct CloudinaryUploadResponse {
    secure_url: String,
}

#[service(name = "image")]
pub struct ImageService {}

impl ImageService {
    /// 이미지를 저장하고 참조 문자열을 돌려줍니다.
    pub async fn store(&self, upload: ImageUpload) -> Result<String, AppError> {
        let extension = validate_upload(&upload)?;

        match StorageConfig::cloudinary() {
            Some(credentials) => self.upload_to_cloudinary(&credentials, upload).await,
            None => self.store_locally(upload, extension).await,
        }
    }

    /// 저장된 이미지를 지웁니다. 실패는 로그만 남깁니다.
    pub async fn delete(&self, reference: &str) {
        let result = if reference.starts_with(LOCAL_URL_PREFIX) {
            self.delete_local(reference).await
        } else if let Some(credentials) = StorageConfig::cloudinary() {
            self.delete_from_cloudinary(&credentials, reference).await
        } else {
            Ok(())
        };

        if let Err(e) = result {
            log::warn!("이미지 삭제 실패 ({}): {}", reference, e);
        }
    }

    async fn upload_to_cloudinary(
        &self,
        credentials: &CloudinaryCredentials,
        upload: ImageUpload,
    ) -> Result<String, AppError> {
        let timestamp = chrono::Utc::now().timestamp().to_string();
        let signature = cloudinary_signature(
            &[("folder", IMAGE_FOLDER), ("timestamp", timestamp.as_str())],
            &credentials.api_secret,
        );
        let data_uri = format!("data:{};base64,{}", upload.content_type, STANDARD.encode(&upload.bytes));

        let params = [
            ("file", data_uri.as_str()),
            ("api_key", credentials.api_key.as_str()),
            ("timestamp", timestamp.as_str()),
            ("folder", IMAGE_FOLDER),
            ("signature", signature.as_str()),
        ];

        let client = reqwest::Client::new();
        let response = client
            .post(format!(
                "https://api.cloudinary.com/v1_1/{}/image/upload",
                credentials.cloud_name
            ))
            .form(&params)
            .send()
            .await
            .map_err(|e| {
                log::error!("Cloudinary 업로드 요청 실패: {}", e);
                AppError::ExternalServiceError("Failed to upload image".to_string())
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            log::error!("Cloudinary 업로드 거부 {}: {}", status, error_text);
            return Err(AppError::ExternalServiceError("Failed to upload image".to_string()));
        }

        let body = response.json::<CloudinaryUploadResponse>().await.map_err(|e| {
            log::error!("Cloudinary 응답 파싱 실패: {}", e);
            AppError::ExternalServiceError("Failed to upload image".to_string())
        })?;

        log::info!("이미지 업로드 완료: {}", body.secure_url);
        Ok(body.secure_url)
    }

    async fn delete_from_cloudinary(&self, credentials: &CloudinaryCredentials, url: &str) -> Result<(), AppError> {
        let Some(public_id) = cloudinary_public_id(url) else {
            return Ok(());
        };

        let timestamp = chrono::Utc::now().timestamp().to_string();
        let signature = cloudinary_signature(
            &[("public_id", public_id.as_str()), ("timestamp", timestamp.as_str())],
            &credentials.api_secret,
        );
        let params = [
            ("public_id", public_id.as_str()),
            ("api_key", credentials.api_key.as_str()),
            ("timestamp", timestamp.as_str()),
            ("signature", signature.as_str()),
        ];

        let response = reqwest::Client::new()
            .post(format!(
                "https://api.cloudinary.com/v1_1/{}/image/destroy",
                credentials.cloud_name
            ))
            .form(&params)
            .send()
            .await
            .map_err(|e| AppError::ExternalServiceError(format!("Cloudinary 삭제 요청 실패: {}", e)))?;

        if !response.status().is_success() {
            return Err(AppError::ExternalServiceError(format!(
                "Cloudinary 삭제 실패: {}",
                response.status()
            )));
        }
        Ok(())
    }

    async fn store_locally(&self, upload: ImageUpload, extension: &str) -> Result<String, AppError> {
        let filename = format!("{}.{}", uuid::Uuid::new_v4(), extension);
        let directory = PathBuf::from(StorageConfig::upload_dir()).join(IMAGE_FOLDER);
        let path = directory.join(&filename);

        web::block(move || {
            std::fs::create_dir_all(&directory)?;
            std::fs::write(&path, &upload.bytes)
        })
        .await
        .context("이미지 저장 작업 실패")?
        .with_context(|| format!("이미지 파일 쓰기 실패 ({})", filename))?;

        let reference = format!("{}/{}/{}", LOCAL_URL_PREFIX, IMAGE_FOLDER, filename);
        log::info!("이미지 로컬 저장: {}", reference);
        Ok(reference)
    }

    async fn delete_local(&self, reference: &str) -> Result<(), AppError> {
        let Some(path) = local_path_for(reference, &StorageConfig::upload_dir()) else {
            return Ok(());
        };

        web::block(move || match std::fs::remove_file(&path) {
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            other => other,
        })
        .await
        .context("이미지 삭제 작업 실패")?
        .with_context(|| format!("이미지 파일 삭제 실패 ({})", reference))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upload(bytes: usize, content_type: &str) -> ImageUpload {
        ImageUpload {
            bytes: vec![0u8; bytes],
            content_type: content_type.to_string(),
        }
    }

    #[test]
    fn test_validate_upload() {
        assert_eq!(validate_upload(&upload(10, "image/png")).unwrap(), "png");
        assert_eq!(validate_upload(&upload(10, "IMAGE/JPEG")).unwrap(), "jpg");

        match validate_upload(&upload(10, "application/pdf")) {
            Err(AppError::ValidationError(msg)) => assert_eq!(msg, INVALID_IMAGE_TYPE),
            other => panic!("unexpected: {:?}", other),
        }
        match validate_upload(&upload(StorageConfig::MAX_IMAGE_BYTES + 1, "image/png")) {
            Err(AppError::ValidationError(msg)) => assert_eq!(msg, IMAGE_TOO_LARGE),
            other => panic!("unexpected: {:?}", other),
        }
        assert!(validate_upload(&upload(0, "image/png")).is_err());
    }

    #[test]
    fn test_public_url() {
        assert_eq!(
            public_url("/uploads/ingredients/a.png", Some("https://api.example.com/")),
            "https://api.example.com/uploads/ingredients/a.png"
        );
        assert_eq!(
            public_url("https://res.cloudinary.com/demo/a.png", Some("https://api.example.com")),
            "https://res.cloudinary.com/demo/a.png"
        );
        assert_eq!(public_url("/uploads/x.png", None), "/uploads/x.png");
    }

    #[test]
    fn test_signature_is_order_independent() {
        let a = cloudinary_signature(&[("timestamp", "1700000000"), ("folder", "ingredients")], "secret");
        let b = cloudinary_signature(&[("folder", "ingredients"), ("timestamp", "1700000000")], "secret");
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);

        let expected = format!("{:x}", Sha256::digest(b"folder=ingredients&timestamp=1700000000secret"));
        assert_eq!(a, expected);
    }

    #[test]
    fn test_cloudinary_public_id() {
        assert_eq!(
            cloudinary_public_id("https://res.cloudinary.com/demo/image/upload/v1/ingredients/abc123.jpg"),
            Some("ingredients/abc123".to_string())
        );
        assert_eq!(cloudinary_public_id("https://res.cloudinary.com/"), None);
    }

    #[test]
    fn test_local_path_rejects_traversal() {
        assert_eq!(
            local_path_for("/uploads/ingredients/a.png", "uploads"),
            Some(PathBuf::from("uploads").join("ingredients/a.png"))
        );
        assert_eq!(local_path_for("/uploads/../etc/passwd", "uploads"), None);
        assert_eq!(local_path_for("/static/a.png", "uploads"), None);
    }
}
