//! # 이메일 발송 서비스
//!
//! SMTP 대신 HTTP API 로 메일을 보냅니다. 제공자는 설정된 API 키에 따라 정해지며
//! Resend 가 우선입니다.
//!
//! | 제공자 | 엔드포인트 | 인증 헤더 |
//! |--------|-----------|-----------|
//! | Resend | `POST https://api.resend.com/emails` | `Authorization: Bearer <key>` |
//! | Brevo  | `POST https://api.brevo.com/v3/smtp/email` | `api-key: <key>` |
//!
//! 재시도는 하지 않습니다. 실패는 호출한 요청의 에러로 보고됩니다.

use serde_json::{json, Value};
use singleton_macro::service;

use crate::config::{EmailConfig, EmailProvider};
use crate::core::errors::AppError;
use crate::domain::entities::users::User;
use crate::utils::string_utils::mask_email;

use super::templates::{self, EmailMessage};

pub const RESEND_ENDPOINT: &str = "https://api.resend.com/emails";
pub const BREVO_ENDPOINT: &str = "https://api.brevo.com/v3/smtp/email";

/// 제공자별 HTTP 요청 명세
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderRequest {
    pub url: &'static str,
    pub auth_header: (&'static str, String),
    pub body: Value,
}

/// 제공자 형식에 맞는 요청 본문을 만듭니다.
pub fn build_provider_request(
    provider: &EmailProvider,
    from_name: &str,
    from_address: &str,
    message: &EmailMessage,
) -> ProviderRequest {
    match provider {
        EmailProvider::Resend { api_key } => ProviderRequest {
            url: RESEND_ENDPOINT,
            auth_header: ("Authorization", format!("Bearer {}", api_key)),
            body: json!({
                "from": format!("{} <{}>", from_name, from_address),
                "to": [message.to],
                "subject": message.subject,
                "html": message.html,
            }),
        },
        EmailProvider::Brevo { api_key } => ProviderRequest {
            url: BREVO_ENDPOINT,
            auth_header: ("api-key", api_key.clone()),
            body: json!({
                "sender": { "name": from_name, "email": from_address },
                "to": [{ "email": message.to }],
                "subject": message.subject,
                "htmlContent": message.html,
            }),
        },
    }
}

#[service(name = "email")]
pub struct EmailService {}

impl EmailService {
    /// 메시지 한 통을 발송합니다.
    ///
    /// # Errors
    ///
    /// * `AppError::ExternalServiceError` - 제공자 미설정, 네트워크 오류, 2xx 가 아닌 응답
    pub async fn send(&self, message: &EmailMessage) -> Result<(), AppError> {
        let Some(provider) = EmailConfig::provider() else {
            log::error!("❌ 이메일 제공자가 설정되지 않았습니다 (RESEND_API_KEY 또는 BREVO_API_KEY 필요)");
            return Err(AppError::ExternalServiceError("No email provider configured".to_string()));
        };

        let request = build_provider_request(
            &provider,
            &EmailConfig::from_name(),
            &EmailConfig::from_address(),
            message,
        );

        let client = reqwest::Client::new();
        let response = client
            .post(request.url)
            .header(request.auth_header.0, request.auth_header.1)
            .json(&request.body)
            .send()
            .await
            .map_err(|e| {
                log::error!("❌ 이메일 요청 실패 ({}): {}", mask_email(&message.to), e);
                AppError::ExternalServiceError("Failed to send email".to_string())
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            log::error!(
                "❌ 이메일 발송 거부 ({}) {}: {}",
                mask_email(&message.to),
                status,
                error_text
            );
            return Err(AppError::ExternalServiceError("Failed to send email".to_string()));
        }

        log::info!("✅ 이메일 발송 완료: {} → {}", message.subject, mask_email(&message.to));
        Ok(())
    }

    pub async fn send_verification_code(&self, user: &User, code: &str) -> Result<(), AppError> {
        let brand = EmailConfig::from_name();
        self.send(&templates::verification_email(&brand, &user.email, &user.first_name, code))
            .await
    }

    pub async fn send_password_reset_code(&self, user: &User, code: &str) -> Result<(), AppError> {
        let brand = EmailConfig::from_name();
        self.send(&templates::password_reset_email(&brand, &user.email, &user.first_name, code))
            .await
    }

    pub async fn send_invitation(
        &self,
        invitee: &User,
        inviter_name: &str,
        restaurant_name: &str,
        token: &str,
    ) -> Result<(), AppError> {
        let brand = EmailConfig::from_name();
        let accept_url = format!("{}/accept-invitation?token={}", EmailConfig::client_url(), token);
        self.send(&templates::invitation_email(
            &brand,
            &invitee.email,
            &invitee.first_name,
            inviter_name,
            restaurant_name,
            &accept_url,
        ))
        .await
    }

    /// KYC 결과 알림은 실패해도 호출자에게 에러를 돌려주지 않습니다.
    pub async fn notify_kyc_approved(&self, applicant: &User, restaurant_name: &str) {
        let brand = EmailConfig::from_name();
        let login_url = format!("{}/login", EmailConfig::client_url());
        let message = templates::kyc_approved_email(&brand, &applicant.email, &applicant.first_name, restaurant_name, &login_url);
        if let Err(e) = self.send(&message).await {
            log::warn!("KYC 승인 알림 실패 ({}): {}", mask_email(&applicant.email), e);
        }
    }

    pub async fn notify_kyc_rejected(&self, applicant: &User, reason: &str) {
        let brand = EmailConfig::from_name();
        let message = templates::kyc_rejected_email(&brand, &applicant.email, &applicant.first_name, reason);
        if let Err(e) = self.send(&message).await {
            log::warn!("KYC 반려 알림 실패 ({}): {}", mask_email(&applicant.email), e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message() -> EmailMessage {
        EmailMessage {
            to: "jane@example.com".to_string(),
            subject: "Hello".to_string(),
            html: "<p>Hi</p>".to_string(),
        }
    }

    #[test]
    fn test_resend_payload() {
        let provider = EmailProvider::Resend { api_key: "re_123".to_string() };
        let request = build_provider_request(&provider, "Djulah", "noreply@djulah.com", &message());

        assert_eq!(request.url, RESEND_ENDPOINT);
        assert_eq!(request.auth_header, ("Authorization", "Bearer re_123".to_string()));
        assert_eq!(request.body["from"], "Djulah <noreply@djulah.com>");
        assert_eq!(request.body["to"][0], "jane@example.com");
        assert_eq!(request.body["html"], "<p>Hi</p>");
    }

    #[test]
    fn test_brevo_payload() {
        let provider = EmailProvider::Brevo { api_key: "xkeysib".to_string() };
        let request = build_provider_request(&provider, "Djulah", "noreply@djulah.com", &message());

        assert_eq!(request.url, BREVO_ENDPOINT);
        assert_eq!(request.auth_header, ("api-key", "xkeysib".to_string()));
        assert_eq!(request.body["sender"]["email"], "noreply@djulah.com");
        assert_eq!(request.body["to"][0]["email"], "jane@example.com");
        assert_eq!(request.body["htmlContent"], "<p>Hi</p>");
    }
}
