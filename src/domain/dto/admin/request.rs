use serde::Deserialize;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::domain::dto::common::PageQuery;
use crate::domain::dto::validation::field_order;
use crate::domain::entities::restaurants::RestaurantStatus;
use crate::utils::string_utils::{deserialize_optional_string, deserialize_trimmed};

/// `?status=&page=&limit=` 목록 쿼리
///
/// `serde(flatten)` 은 urlencoded 숫자 파싱과 맞지 않아 필드를 직접 둡니다.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatusListQuery {
    pub status: Option<String>,
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

impl StatusListQuery {
    pub fn page_query(&self) -> PageQuery {
        PageQuery { page: self.page, limit: self.limit }
    }

    /// 빈 문자열은 필터 없음으로 취급합니다.
    pub fn status_filter(&self) -> Option<&str> {
        self.status.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct ApproveKycRequest {
    #[serde(deserialize_with = "deserialize_optional_string")]
    #[validate(length(max = 2000, message = "Review notes must be at most 2000 characters"))]
    pub review_notes: Option<String>,
}

field_order!(ApproveKycRequest: review_notes);

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct RejectKycRequest {
    #[serde(deserialize_with = "deserialize_trimmed")]
    #[validate(length(min = 1, message = "Rejection reason is required"))]
    pub rejection_reason: String,

    #[serde(deserialize_with = "deserialize_optional_string")]
    #[validate(length(max = 2000, message = "Review notes must be at most 2000 characters"))]
    pub review_notes: Option<String>,
}

field_order!(RejectKycRequest: rejection_reason, review_notes);

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateRestaurantStatusRequest {
    #[serde(deserialize_with = "deserialize_trimmed")]
    #[validate(custom(function = "known_restaurant_status"))]
    pub status: String,
}

field_order!(UpdateRestaurantStatusRequest: status);

impl UpdateRestaurantStatusRequest {
    pub fn parsed_status(&self) -> Option<RestaurantStatus> {
        RestaurantStatus::parse(&self.status)
    }
}

fn known_restaurant_status(value: &str) -> Result<(), ValidationError> {
    match RestaurantStatus::parse(value) {
        Some(_) => Ok(()),
        None => Err(ValidationError::new("status")
            .with_message("Invalid status. Must be active, suspended, or inactive".into())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_validation() {
        let ok = UpdateRestaurantStatusRequest { status: "suspended".into() };
        assert!(ok.validate().is_ok());
        assert_eq!(ok.parsed_status(), Some(RestaurantStatus::Suspended));

        let bad = UpdateRestaurantStatusRequest { status: "closed".into() };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_reject_requires_reason() {
        let req: RejectKycRequest = serde_json::from_str(r#"{"rejectionReason": "   "}"#).unwrap();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_status_filter_ignores_blank() {
        let query = StatusListQuery { status: Some(" ".into()), ..Default::default() };
        assert_eq!(query.status_filter(), None);
    }
}
