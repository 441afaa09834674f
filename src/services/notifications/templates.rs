//! 이메일 HTML 템플릿
//!
//! 사용자 입력이 들어가는 자리는 모두 [`escape_html`] 을 거칩니다.

use chrono::{Datelike, Utc};

use crate::config::VerificationConfig;

/// 발송할 메시지 한 통
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub html: String,
}

pub fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

fn layout(brand: &str, accent: &str, title: &str, body: &str) -> String {
    format!(
        r#"<div style="max-width: 600px; margin: 30px auto; background: white; border-radius: 16px; overflow: hidden; box-shadow: 0 15px 40px rgba(0,0,0,0.15); font-family: Arial, sans-serif;">
  <div style="background: {accent}; color: white; padding: 40px 20px; text-align: center;">
    <h1>{title}</h1>
  </div>
  <div style="padding: 50px 30px; text-align: center;">
    {body}
  </div>
  <div style="background: #1a1a1a; color: #aaa; padding: 25px; text-align: center; font-size: 13px;">
    <p>&copy; {year} {brand}</p>
  </div>
</div>"#,
        accent = accent,
        title = title,
        body = body,
        year = Utc::now().year(),
        brand = escape_html(brand),
    )
}

fn code_block(code: &str, color: &str, background: &str) -> String {
    format!(
        r#"<div style="font-size: 48px; font-weight: bold; letter-spacing: 12px; color: {color}; background: {background}; padding: 25px; border-radius: 16px; display: inline-block; margin: 25px 0;">{code}</div>"#,
        color = color,
        background = background,
        code = escape_html(code),
    )
}

fn greeting_name(first_name: &str) -> String {
    let trimmed = first_name.trim();
    if trimmed.is_empty() {
        "there".to_string()
    } else {
        escape_html(trimmed)
    }
}

pub fn verification_email(brand: &str, to: &str, first_name: &str, code: &str) -> EmailMessage {
    let body = format!(
        "<h2>Hello {}!</h2><p>Your verification code is:</p>{}<p><strong>Expires in {} minutes</strong></p>",
        greeting_name(first_name),
        code_block(code, "#4CAF50", "#f0f8f0"),
        VerificationConfig::CODE_TTL_MINUTES,
    );

    EmailMessage {
        to: to.to_string(),
        subject: format!("Your {} Verification Code", brand),
        html: layout(brand, "linear-gradient(135deg, #4CAF50, #45a049)", &format!("Welcome to {}!", escape_html(brand)), &body),
    }
}

pub fn password_reset_email(brand: &str, to: &str, first_name: &str, code: &str) -> EmailMessage {
    let body = format!(
        "<h2>Hello {}!</h2><p>Your password reset code:</p>{}<p><strong>Valid for {} minutes only</strong></p>",
        greeting_name(first_name),
        code_block(code, "#e91e63", "#fce4ec"),
        VerificationConfig::RESET_CODE_TTL_MINUTES,
    );

    EmailMessage {
        to: to.to_string(),
        subject: format!("{} - Password Reset Code", brand),
        html: layout(brand, "linear-gradient(135deg, #e91e63, #c2185b)", "Password Reset", &body),
    }
}

/// 초대 링크. 토큰 원문은 이 메일에만 실립니다.
pub fn invitation_email(
    brand: &str,
    to: &str,
    first_name: &str,
    inviter_name: &str,
    restaurant_name: &str,
    accept_url: &str,
) -> EmailMessage {
    let body = format!(
        r#"<h2>Hello {name}!</h2>
    <p>{inviter} invited you to join <strong>{restaurant}</strong> on {brand}.</p>
    <p style="margin-top: 30px;"><a href="{url}" style="background: #2196F3; color: white; padding: 15px 30px; text-decoration: none; border-radius: 8px; display: inline-block;">Accept Invitation</a></p>
    <p>This invitation expires in {days} days.</p>"#,
        name = greeting_name(first_name),
        inviter = escape_html(inviter_name),
        restaurant = escape_html(restaurant_name),
        brand = escape_html(brand),
        url = escape_html(accept_url),
        days = VerificationConfig::INVITATION_TTL_DAYS,
    );

    EmailMessage {
        to: to.to_string(),
        subject: format!("You're invited to join {} on {}", restaurant_name, brand),
        html: layout(brand, "linear-gradient(135deg, #2196F3, #1976D2)", "You're Invited!", &body),
    }
}

pub fn kyc_approved_email(brand: &str, to: &str, first_name: &str, restaurant_name: &str, login_url: &str) -> EmailMessage {
    let body = format!(
        r#"<h2>Congratulations {name}!</h2>
    <p>Your KYC submission has been <strong>approved</strong>.</p>
    <p>Your restaurant <strong>{restaurant}</strong> is now active on {brand}.</p>
    <p style="margin-top: 30px;"><a href="{url}" style="background: #4CAF50; color: white; padding: 15px 30px; text-decoration: none; border-radius: 8px; display: inline-block;">Access Your Dashboard</a></p>"#,
        name = greeting_name(first_name),
        restaurant = escape_html(restaurant_name),
        brand = escape_html(brand),
        url = escape_html(login_url),
    );

    EmailMessage {
        to: to.to_string(),
        subject: format!("KYC Approved - {}", brand),
        html: layout(brand, "linear-gradient(135deg, #4CAF50, #45a049)", "KYC Approved!", &body),
    }
}

pub fn kyc_rejected_email(brand: &str, to: &str, first_name: &str, reason: &str) -> EmailMessage {
    let body = format!(
        r#"<h2>Hello {name},</h2>
    <p>Unfortunately your KYC submission could not be approved.</p>
    <p><strong>Reason:</strong> {reason}</p>
    <p>You can correct the information and submit again.</p>"#,
        name = greeting_name(first_name),
        reason = escape_html(reason),
    );

    EmailMessage {
        to: to.to_string(),
        subject: format!("KYC Submission Update - {}", brand),
        html: layout(brand, "linear-gradient(135deg, #f44336, #d32f2f)", "KYC Review Result", &body),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("<b>\"Tom\" & 'Jerry'</b>"), "&lt;b&gt;&quot;Tom&quot; &amp; &#39;Jerry&#39;&lt;/b&gt;");
    }

    #[test]
    fn test_verification_email_contains_code_and_ttl() {
        let message = verification_email("Djulah", "jane@example.com", "Jane", "482913");
        assert_eq!(message.subject, "Your Djulah Verification Code");
        assert!(message.html.contains("482913"));
        assert!(message.html.contains("Expires in 10 minutes"));
        assert!(message.html.contains("Hello Jane!"));
    }

    #[test]
    fn test_names_are_escaped() {
        let message = password_reset_email("Djulah", "x@example.com", "<script>", "000111");
        assert!(!message.html.contains("<script>"));
        assert!(message.html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_blank_name_falls_back() {
        let message = password_reset_email("Djulah", "x@example.com", "  ", "000111");
        assert!(message.html.contains("Hello there!"));
    }

    #[test]
    fn test_invitation_email_links_token() {
        let message = invitation_email(
            "Djulah",
            "staff@example.com",
            "Sam",
            "Jane Doe",
            "Chez Jane",
            "http://localhost:3000/accept-invitation?token=abc123",
        );
        assert!(message.subject.contains("Chez Jane"));
        assert!(message.html.contains("accept-invitation?token=abc123"));
        assert!(message.html.contains("7 days"));
    }

    #[test]
    fn test_kyc_rejected_email_has_reason() {
        let message = kyc_rejected_email("Djulah", "owner@example.com", "Jane", "Blurry ID photo");
        assert!(message.html.contains("Blurry ID photo"));
    }
}
