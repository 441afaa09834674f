//! 카메룬 휴대전화 번호 정규화
//!
//! 입력 형식이 제각각인 번호를 `+2376XXXXXXXX` 형태로 통일합니다.
//!
//! | 입력 | 결과 |
//! |------|------|
//! | `690119047` | `+237690119047` |
//! | `237690119047` | `+237690119047` |
//! | `+237 690 11 90 47` | `+237690119047` |
//! | `00237690119047` | `+237690119047` |

use once_cell::sync::Lazy;
use regex::Regex;

const COUNTRY_CODE: &str = "237";

static CAMEROON_MOBILE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+2376[0-9]{8}$").expect("static phone pattern"));

/// 구분 기호를 제거하고 국가 코드를 붙입니다.
///
/// 빈 입력은 `None`. 패턴에 맞지 않는 번호도 형식만 맞춰 반환하므로
/// 유효성은 [`is_valid_cameroon_phone`] 으로 따로 확인해야 합니다.
pub fn normalize_phone_number(raw: &str) -> Option<String> {
    let stripped: String = raw
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '(' | ')' | '.'))
        .collect();
    if stripped.is_empty() {
        return None;
    }

    if let Some(rest) = stripped.strip_prefix('+') {
        return Some(format!("+{}", rest));
    }

    let digits = stripped.trim_start_matches('0');
    if digits.starts_with(COUNTRY_CODE) {
        return Some(format!("+{}", digits));
    }

    Some(format!("+{}{}", COUNTRY_CODE, digits))
}

pub fn is_valid_cameroon_phone(raw: &str) -> bool {
    normalize_phone_number(raw)
        .map(|normalized| CAMEROON_MOBILE.is_match(&normalized))
        .unwrap_or(false)
}

/// `validator` 커스텀 규칙
pub fn validate_cameroon_phone(value: &str) -> Result<(), validator::ValidationError> {
    if is_valid_cameroon_phone(value) {
        Ok(())
    } else {
        Err(validator::ValidationError::new("phone_number")
            .with_message("Please provide a valid Cameroon phone number (e.g. 690119047)".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalizes_common_formats() {
        for input in [
            "690119047",
            "+237690119047",
            "237690119047",
            "+237 690 11 90 47",
            "690-11-90-47",
            "00237690119047",
            "(237) 690.119.047",
        ] {
            assert_eq!(normalize_phone_number(input).as_deref(), Some("+237690119047"), "{}", input);
        }
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(normalize_phone_number(""), None);
        assert_eq!(normalize_phone_number(" - "), None);
    }

    #[test]
    fn test_validity() {
        assert!(is_valid_cameroon_phone("690119047"));
        assert!(!is_valid_cameroon_phone("290119047"));
        assert!(!is_valid_cameroon_phone("69011904"));
        assert!(!is_valid_cameroon_phone("+33612345678"));
        assert!(validate_cameroon_phone("abc").is_err());
    }
}
