//! 요청 제한 응답 봉투
//!
//! `actix-governor` 는 한도 초과 시 평문 429 를 돌려줍니다. 이 미들웨어를
//! Governor 바깥에 두면 같은 상황이 표준 에러 봉투로 나갑니다.
//!
//! 핸들러가 [`AppError`] 로 만든 429 (재발송 쿨다운 등)는 이미 봉투 형식이므로
//! 메시지를 그대로 둡니다.

use actix_web::body::MessageBody;
use actix_web::dev::{ServiceRequest, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::middleware::Next;
use actix_web::{Error, ResponseError};

use crate::core::errors::AppError;

pub const TOO_MANY_REQUESTS: &str = "Too many requests from this IP, please try again later.";

fn too_many_requests() -> AppError {
    AppError::RateLimited(TOO_MANY_REQUESTS.to_string())
}

pub async fn rate_limit_envelope(
    req: ServiceRequest,
    next: Next<impl MessageBody + 'static>,
) -> Result<ServiceResponse<impl MessageBody>, Error> {
    let peer = req.peer_addr();
    match next.call(req).await {
        Ok(res) if is_plain_throttle(&res) => {
            log::warn!("요청 제한 초과: {:?}", peer);
            let (req, _) = res.into_parts();
            Ok(ServiceResponse::new(req, too_many_requests().error_response()).map_into_right_body())
        }
        Ok(res) => Ok(res.map_into_left_body()),
        Err(err)
            if err.as_error::<AppError>().is_none()
                && err.as_response_error().status_code() == StatusCode::TOO_MANY_REQUESTS =>
        {
            log::warn!("요청 제한 초과: {:?}", peer);
            Err(too_many_requests().into())
        }
        Err(err) => Err(err),
    }
}

/// 에러 없이 만들어진 429 응답. 핸들러 에러로 만든 응답은 `error()` 가 채워져 있습니다.
fn is_plain_throttle<B>(res: &ServiceResponse<B>) -> bool {
    res.status() == StatusCode::TOO_MANY_REQUESTS && res.response().error().is_none()
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::middleware::from_fn;
    use actix_web::{test, web, App, HttpResponse};

    async fn throttled() -> HttpResponse {
        HttpResponse::TooManyRequests().body("Too Many Requests! Wait for 12s")
    }

    #[actix_web::test]
    async fn test_429_is_wrapped_in_envelope() {
        let app = test::init_service(
            App::new()
                .wrap(from_fn(rate_limit_envelope))
                .route("/limited", web::get().to(throttled))
                .route("/fine", web::get().to(HttpResponse::Ok)),
        )
        .await;

        let resp = test::call_service(&app, test::TestRequest::get().uri("/limited").to_request()).await;
        assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], TOO_MANY_REQUESTS);

        let resp = test::call_service(&app, test::TestRequest::get().uri("/fine").to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    async fn cooldown() -> Result<HttpResponse, AppError> {
        Err(AppError::RateLimited(
            "Please wait 42 seconds before requesting a new code".to_string(),
        ))
    }

    #[actix_web::test]
    async fn test_handler_429_keeps_its_message() {
        let app = test::init_service(
            App::new().service(
                web::scope("/api/auth")
                    .wrap(from_fn(rate_limit_envelope))
                    .route("/resend-verification", web::post().to(cooldown)),
            ),
        )
        .await;

        let req = test::TestRequest::post().uri("/api/auth/resend-verification").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Please wait 42 seconds before requesting a new code");
    }
}
