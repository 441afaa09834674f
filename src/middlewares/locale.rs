//! `Accept-Language` 협상 미들웨어
//!
//! 협상한 [`Locale`] 을 요청 extensions 에 넣고 응답에 `Content-Language` 를 붙입니다.
//! 핸들러는 `Locale` 을 추출자로 받아 [`translate`](crate::utils::i18n::translate) 에 넘깁니다.

use std::future::{ready, Ready};

use actix_web::body::MessageBody;
use actix_web::dev::{ServiceRequest, ServiceResponse};
use actix_web::http::header::{self, HeaderValue};
use actix_web::middleware::Next;
use actix_web::{Error, FromRequest, HttpMessage, HttpRequest};

use crate::utils::i18n::Locale;

pub async fn negotiate_locale(
    req: ServiceRequest,
    next: Next<impl MessageBody + 'static>,
) -> Result<ServiceResponse<impl MessageBody>, Error> {
    let locale = locale_from_headers(req.headers());
    req.extensions_mut().insert(locale);

    let mut res = next.call(req).await?;
    res.headers_mut()
        .insert(header::CONTENT_LANGUAGE, HeaderValue::from_static(locale.as_str()));
    Ok(res)
}

fn locale_from_headers(headers: &header::HeaderMap) -> Locale {
    Locale::negotiate(headers.get(header::ACCEPT_LANGUAGE).and_then(|v| v.to_str().ok()))
}

/// 미들웨어가 없는 경로(테스트 앱 등)에서도 헤더로 직접 협상합니다.
impl FromRequest for Locale {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
        let locale = req
            .extensions()
            .get::<Locale>()
            .copied()
            .unwrap_or_else(|| locale_from_headers(req.headers()));
        ready(Ok(locale))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::middleware::from_fn;
    use actix_web::{test, web, App, HttpResponse};

    async fn echo(locale: Locale) -> HttpResponse {
        HttpResponse::Ok().body(locale.as_str())
    }

    #[actix_web::test]
    async fn test_content_language_header() {
        let app = test::init_service(
            App::new()
                .wrap(from_fn(negotiate_locale))
                .route("/", web::get().to(echo)),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/")
            .insert_header((header::ACCEPT_LANGUAGE, "fr-CM,fr;q=0.9,en;q=0.8"))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.headers().get(header::CONTENT_LANGUAGE).unwrap(), "fr");
        assert_eq!(test::read_body(resp).await, "fr");
    }

    #[actix_web::test]
    async fn test_extractor_without_middleware() {
        let req = test::TestRequest::default()
            .insert_header((header::ACCEPT_LANGUAGE, "de"))
            .to_http_request();

        assert_eq!(Locale::extract(&req).await.unwrap(), Locale::En);
    }
}
