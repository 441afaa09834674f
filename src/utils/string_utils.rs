//! # 문자열 유틸리티
//!
//! 요청 DTO 정규화와 로그 마스킹에 쓰이는 함수들입니다.

use serde::Deserialize;

/// 이메일은 대소문자 구분 없이 저장하고 조회합니다.
pub fn normalize_email(value: &str) -> String {
    value.trim().to_lowercase()
}

pub fn clean_optional_string(value: Option<String>) -> Option<String> {
    value.and_then(|s| {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

/// 공백 문자열을 `None` 으로 취급하는 serde 헬퍼
pub fn deserialize_optional_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(clean_optional_string(opt))
}

/// 앞뒤 공백을 제거하는 serde 헬퍼
pub fn deserialize_trimmed<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = String::deserialize(deserializer)?;
    Ok(value.trim().to_string())
}

/// 로그용 이메일 마스킹: `jane.doe@example.com` → `ja***@example.com`
pub fn mask_email(email: &str) -> String {
    match email.split_once('@') {
        Some((local, domain)) => {
            let visible: String = local.chars().take(2).collect();
            format!("{}***@{}", visible, domain)
        }
        None => "***".to_string(),
    }
}
