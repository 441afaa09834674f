use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::dto::validation::{email_shape, field_order};
use crate::domain::entities::kyc::{BusinessDetails, KycDocuments};
use crate::utils::phone::{normalize_phone_number, validate_cameroon_phone};
use crate::utils::string_utils::{deserialize_optional_string, deserialize_trimmed, normalize_email};

/// KYC 신청서 제출
///
/// 서류는 업로드가 끝난 파일의 URL 로 받습니다.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct SubmitKycRequest {
    #[serde(deserialize_with = "deserialize_trimmed")]
    #[validate(length(min = 1, message = "Restaurant name is required"))]
    pub restaurant_name: String,

    #[serde(deserialize_with = "deserialize_trimmed")]
    #[validate(length(min = 1, message = "Business registration number is required"))]
    pub business_registration_number: String,

    #[serde(deserialize_with = "deserialize_optional_string")]
    pub tax_id: Option<String>,

    #[serde(deserialize_with = "deserialize_trimmed")]
    #[validate(length(min = 1, message = "Address is required"))]
    pub address: String,

    #[serde(deserialize_with = "deserialize_trimmed")]
    #[validate(length(min = 1, message = "City is required"))]
    pub city: String,

    #[serde(deserialize_with = "deserialize_trimmed")]
    #[validate(length(min = 1, message = "Phone number is required"))]
    #[validate(custom(function = "validate_cameroon_phone"))]
    pub phone_number: String,

    #[serde(deserialize_with = "deserialize_trimmed")]
    #[validate(length(min = 1, message = "Business email is required"))]
    #[validate(custom(function = "email_shape"))]
    pub email: String,

    #[serde(deserialize_with = "deserialize_trimmed")]
    #[validate(length(min = 1, message = "Owner full name is required"))]
    pub owner_full_name: String,

    #[serde(deserialize_with = "deserialize_trimmed")]
    #[validate(url(message = "Business license must be a valid URL"))]
    pub business_license: String,

    #[serde(deserialize_with = "deserialize_trimmed")]
    #[validate(url(message = "Owner ID (front) must be a valid URL"))]
    pub owner_id_front: String,

    #[serde(deserialize_with = "deserialize_optional_string")]
    #[validate(url(message = "Owner ID (back) must be a valid URL"))]
    pub owner_id_back: Option<String>,

    #[serde(deserialize_with = "deserialize_optional_string")]
    #[validate(url(message = "Proof of address must be a valid URL"))]
    pub proof_of_address: Option<String>,

    pub additional_docs: Vec<String>,
}

field_order!(
    SubmitKycRequest: restaurant_name,
    business_registration_number,
    tax_id,
    address,
    city,
    phone_number,
    email,
    owner_full_name,
    business_license,
    owner_id_front,
    owner_id_back,
    proof_of_address,
    additional_docs,
);

impl SubmitKycRequest {
    /// 검증을 통과한 요청을 엔티티 입력값으로 분리합니다.
    pub fn into_parts(self) -> (BusinessDetails, KycDocuments) {
        let phone_number = normalize_phone_number(&self.phone_number).unwrap_or(self.phone_number);
        let additional_docs = self
            .additional_docs
            .into_iter()
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty())
            .collect();

        (
            BusinessDetails {
                restaurant_name: self.restaurant_name,
                business_registration_number: self.business_registration_number,
                tax_id: self.tax_id,
                address: self.address,
                city: self.city,
                phone_number,
                email: normalize_email(&self.email),
                owner_full_name: self.owner_full_name,
            },
            KycDocuments {
                business_license: self.business_license,
                owner_id_front: self.owner_id_front,
                owner_id_back: self.owner_id_back,
                proof_of_address: self.proof_of_address,
                additional_docs,
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::errors::flatten_validation_errors;

    fn request() -> SubmitKycRequest {
        serde_json::from_value(serde_json::json!({
            "restaurantName": "Chez Mama",
            "businessRegistrationNumber": "RC/DLA/2024/B/123",
            "address": "Rue de la Joie",
            "city": "Douala",
            "phoneNumber": "690119047",
            "email": "Contact@ChezMama.cm",
            "ownerFullName": "Mama Ngo",
            "businessLicense": "https://files.example.com/licence.pdf",
            "ownerIdFront": "https://files.example.com/id-front.png",
            "additionalDocs": ["", "https://files.example.com/menu.pdf"]
        }))
        .unwrap()
    }

    #[test]
    fn test_valid_submission_splits_into_parts() {
        let req = request();
        assert!(req.validate().is_ok());

        let (business, documents) = req.into_parts();
        assert_eq!(business.phone_number, "+237690119047");
        assert_eq!(business.email, "contact@chezmama.cm");
        assert_eq!(documents.additional_docs, vec!["https://files.example.com/menu.pdf"]);
    }

    #[test]
    fn test_documents_must_be_urls() {
        let mut req = request();
        req.business_license = "licence.pdf".into();

        let errors = flatten_validation_errors(&req.validate().unwrap_err());
        assert_eq!(errors, vec!["Business license must be a valid URL"]);
    }
}
