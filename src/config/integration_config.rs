//! 외부 연동 설정: 이메일 발송, 이미지 저장소

use std::env;

use super::env_non_empty;

/// 트랜잭션 이메일 제공자
///
/// `RESEND_API_KEY` 가 있으면 Resend, 없고 `BREVO_API_KEY` 가 있으면 Brevo 를 사용합니다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmailProvider {
    Resend { api_key: String },
    Brevo { api_key: String },
}

pub struct EmailConfig;

impl EmailConfig {
    pub fn provider() -> Option<EmailProvider> {
        Self::select_provider(env_non_empty("RESEND_API_KEY"), env_non_empty("BREVO_API_KEY"))
    }

    pub fn select_provider(resend: Option<String>, brevo: Option<String>) -> Option<EmailProvider> {
        match (resend, brevo) {
            (Some(api_key), _) => Some(EmailProvider::Resend { api_key }),
            (None, Some(api_key)) => Some(EmailProvider::Brevo { api_key }),
            (None, None) => None,
        }
    }

    pub fn from_address() -> String {
        env_non_empty("EMAIL_FROM").unwrap_or_else(|| "onboarding@resend.dev".to_string())
    }

    pub fn from_name() -> String {
        env_non_empty("EMAIL_FROM_NAME").unwrap_or_else(|| "Djulah".to_string())
    }

    /// 이메일 본문 링크에 사용되는 프런트엔드 주소
    pub fn client_url() -> String {
        env::var("CLIENT_URL")
            .unwrap_or_else(|_| "http://localhost:3000".to_string())
            .trim_end_matches('/')
            .to_string()
    }
}

/// Cloudinary 자격 증명
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloudinaryCredentials {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
}

pub struct StorageConfig;

impl StorageConfig {
    /// 세 값이 모두 있을 때만 호스팅 저장소를 사용합니다.
    pub fn cloudinary() -> Option<CloudinaryCredentials> {
        Some(CloudinaryCredentials {
            cloud_name: env_non_empty("CLOUDINARY_CLOUD_NAME")?,
            api_key: env_non_empty("CLOUDINARY_API_KEY")?,
            api_secret: env_non_empty("CLOUDINARY_API_SECRET")?,
        })
    }

    /// 로컬 업로드 루트 디렉터리. `/uploads` 경로로 정적 제공됩니다.
    pub fn upload_dir() -> String {
        env_non_empty("UPLOAD_DIR").unwrap_or_else(|| "uploads".to_string())
    }

    /// 재료 이미지 최대 크기 (5MB)
    pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resend_takes_precedence() {
        assert_eq!(
            EmailConfig::select_provider(Some("re_1".into()), Some("xkeysib".into())),
            Some(EmailProvider::Resend { api_key: "re_1".into() })
        );
        assert_eq!(
            EmailConfig::select_provider(None, Some("xkeysib".into())),
            Some(EmailProvider::Brevo { api_key: "xkeysib".into() })
        );
        assert_eq!(EmailConfig::select_provider(None, None), None);
    }
}
