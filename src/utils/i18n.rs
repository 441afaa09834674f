//! 응답 메시지 다국어 처리
//!
//! `Accept-Language` 헤더로 협상한 [`Locale`] 에 따라 인증 흐름의
//! 성공 메시지를 영어/프랑스어로 제공합니다.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Fr,
}

impl Locale {
    pub fn as_str(&self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Fr => "fr",
        }
    }

    fn from_tag(tag: &str) -> Option<Self> {
        let primary = tag.split(['-', '_']).next()?.trim().to_ascii_lowercase();
        match primary.as_str() {
            "en" => Some(Locale::En),
            "fr" => Some(Locale::Fr),
            _ => None,
        }
    }

    /// `Accept-Language` 값에서 지원 언어 중 품질값이 가장 높은 것을 고릅니다.
    ///
    /// 동률이면 헤더에 먼저 나온 언어, 지원 언어가 없으면 영어입니다.
    pub fn negotiate(header: Option<&str>) -> Self {
        let Some(header) = header else {
            return Locale::default();
        };

        let mut best: Option<(Locale, f32)> = None;
        for entry in header.split(',') {
            let mut parts = entry.split(';');
            let Some(locale) = parts.next().and_then(Locale::from_tag) else {
                continue;
            };
            let quality = parts
                .find_map(|p| p.trim().strip_prefix("q="))
                .and_then(|q| q.trim().parse::<f32>().ok())
                .unwrap_or(1.0);

            if quality <= 0.0 {
                continue;
            }
            if best.is_none_or(|(_, q)| quality > q) {
                best = Some((locale, quality));
            }
        }

        best.map(|(locale, _)| locale).unwrap_or_default()
    }
}

/// 다국어 응답 메시지 키
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKey {
    RegistrationSuccess,
    EmailVerified,
    VerificationCodeSent,
    LoginSuccess,
    ResetCodeSent,
    PasswordReset,
    PasswordChanged,
    ProfileRetrieved,
    InvitationAccepted,
    KycSubmitted,
}

pub fn translate(locale: Locale, key: MessageKey) -> &'static str {
    use MessageKey::*;

    match (locale, key) {
        (Locale::En, RegistrationSuccess) => {
            "Registration successful. Please check your email for the verification code."
        }
        (Locale::Fr, RegistrationSuccess) => {
            "Inscription réussie. Veuillez consulter votre e-mail pour le code de vérification."
        }
        (Locale::En, EmailVerified) => "Email verified successfully",
        (Locale::Fr, EmailVerified) => "E-mail vérifié avec succès",
        (Locale::En, VerificationCodeSent) => "A new verification code has been sent to your email",
        (Locale::Fr, VerificationCodeSent) => "Un nouveau code de vérification a été envoyé à votre e-mail",
        (Locale::En, LoginSuccess) => "Login successful",
        (Locale::Fr, LoginSuccess) => "Connexion réussie",
        (Locale::En, ResetCodeSent) => "Password reset code sent to your email",
        (Locale::Fr, ResetCodeSent) => "Code de réinitialisation envoyé à votre e-mail",
        (Locale::En, PasswordReset) => "Password reset successful",
        (Locale::Fr, PasswordReset) => "Mot de passe réinitialisé avec succès",
        (Locale::En, PasswordChanged) => "Password changed successfully",
        (Locale::Fr, PasswordChanged) => "Mot de passe modifié avec succès",
        (Locale::En, ProfileRetrieved) => "Profile retrieved successfully",
        (Locale::Fr, ProfileRetrieved) => "Profil récupéré avec succès",
        (Locale::En, InvitationAccepted) => "Invitation accepted! Welcome to the team.",
        (Locale::Fr, InvitationAccepted) => "Invitation acceptée ! Bienvenue dans l'équipe.",
        (Locale::En, KycSubmitted) => "KYC submission received. Our team will review it shortly.",
        (Locale::Fr, KycSubmitted) => "Dossier KYC reçu. Notre équipe l'examinera sous peu.",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negotiate_defaults_to_english() {
        assert_eq!(Locale::negotiate(None), Locale::En);
        assert_eq!(Locale::negotiate(Some("de-DE, es;q=0.8")), Locale::En);
        assert_eq!(Locale::negotiate(Some("")), Locale::En);
    }

    #[test]
    fn test_negotiate_respects_quality() {
        assert_eq!(Locale::negotiate(Some("fr-CM")), Locale::Fr);
        assert_eq!(Locale::negotiate(Some("en;q=0.5, fr;q=0.9")), Locale::Fr);
        assert_eq!(Locale::negotiate(Some("fr;q=0, en")), Locale::En);
        assert_eq!(Locale::negotiate(Some("de, fr-FR;q=0.7, en;q=0.7")), Locale::Fr);
    }

    #[test]
    fn test_translate() {
        assert_eq!(translate(Locale::En, MessageKey::LoginSuccess), "Login successful");
        assert_eq!(translate(Locale::Fr, MessageKey::LoginSuccess), "Connexion réussie");
    }
}
