use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::dto::users::UserSummary;
use crate::domain::entities::kyc::{KycDocuments, KycSubmission, KycSubmissionStatus};
use crate::domain::entities::to_chrono;
use crate::domain::entities::users::KycStatus;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KycDocumentsResponse {
    pub business_license: String,
    pub owner_id_front: String,
    pub owner_id_back: Option<String>,
    pub proof_of_address: Option<String>,
    pub additional_docs: Vec<String>,
}

impl From<&KycDocuments> for KycDocumentsResponse {
    fn from(docs: &KycDocuments) -> Self {
        Self {
            business_license: docs.business_license.clone(),
            owner_id_front: docs.owner_id_front.clone(),
            owner_id_back: docs.owner_id_back.clone(),
            proof_of_address: docs.proof_of_address.clone(),
            additional_docs: docs.additional_docs.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KycSubmissionResponse {
    pub id: String,
    pub applicant_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub applicant: Option<UserSummary>,
    pub restaurant_name: String,
    pub business_registration_number: String,
    pub tax_id: Option<String>,
    pub address: String,
    pub city: String,
    pub phone_number: String,
    pub email: String,
    pub owner_full_name: String,
    pub documents: KycDocumentsResponse,
    pub status: KycSubmissionStatus,
    pub review_notes: Option<String>,
    pub rejection_reason: Option<String>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub restaurant: Option<String>,
    pub submitted_at: DateTime<Utc>,
}

impl From<&KycSubmission> for KycSubmissionResponse {
    fn from(kyc: &KycSubmission) -> Self {
        Self {
            id: kyc.id_string().unwrap_or_default(),
            applicant_id: kyc.applicant.to_hex(),
            applicant: None,
            restaurant_name: kyc.business.restaurant_name.clone(),
            business_registration_number: kyc.business.business_registration_number.clone(),
            tax_id: kyc.business.tax_id.clone(),
            address: kyc.business.address.clone(),
            city: kyc.business.city.clone(),
            phone_number: kyc.business.phone_number.clone(),
            email: kyc.business.email.clone(),
            owner_full_name: kyc.business.owner_full_name.clone(),
            documents: KycDocumentsResponse::from(&kyc.documents),
            status: kyc.status,
            review_notes: kyc.review_notes.clone(),
            rejection_reason: kyc.rejection_reason.clone(),
            reviewed_at: kyc.reviewed_at.map(to_chrono),
            restaurant: kyc.restaurant.map(|id| id.to_hex()),
            submitted_at: to_chrono(kyc.submitted_at),
        }
    }
}

impl KycSubmissionResponse {
    pub fn with_applicant(mut self, applicant: Option<UserSummary>) -> Self {
        self.applicant = applicant;
        self
    }
}

/// 신청자 본인의 KYC 상태
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KycStatusResponse {
    pub kyc_status: KycStatus,
    pub submission: Option<KycSubmissionResponse>,
}
