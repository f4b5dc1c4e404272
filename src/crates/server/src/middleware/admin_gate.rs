use crate::error::ApiError;
use crate::{consts, AppState};
use actix_service::{forward_ready, Service, Transform};
use actix_web::{
    body::{EitherBody, MessageBody},
    dev::{ServiceRequest, ServiceResponse},
    web, Error, HttpMessage, HttpRequest, ResponseError,
};
use application::auth::GateDecision;
use application::error::AppError;
use futures::future::{ok, LocalBoxFuture, Ready};
use log::warn;
use std::rc::Rc;
use url::Url;

// Middleware factory. Every request passing through it must be approved by
// the admin gate held in `AppState` before the wrapped service is called.
pub struct AdminGuard;

impl<S, B> Transform<S, ServiceRequest> for AdminGuard
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = AdminGuardMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(AdminGuardMiddleware {
            service: Rc::new(service),
        })
    }
}

pub struct AdminGuardMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for AdminGuardMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        Box::pin(async move {
            let state = req.app_data::<web::Data<AppState>>().cloned();
            let Some(state) = state else {
                let err = ApiError::Internal("application state is not registered".to_string());
                return Ok(reject(req, err));
            };

            let token = find_token(req.request(), &TOKEN_FINDERS);
            match state.gate.authorize(token.as_deref()) {
                GateDecision::Allow(claims) => {
                    req.extensions_mut().insert(claims);
                    service
                        .call(req)
                        .await
                        .map(ServiceResponse::map_into_left_body)
                }
                GateDecision::Deny(reason) => {
                    warn!(
                        "admin gate denied {} {}: {}",
                        req.method(),
                        req.path(),
                        reason
                    );
                    Ok(reject(req, ApiError::from(AppError::from(reason))))
                }
            }
        })
    }
}

fn reject<B>(req: ServiceRequest, err: ApiError) -> ServiceResponse<EitherBody<B>> {
    let (http_request, _payload) = req.into_parts();
    ServiceResponse::new(http_request, err.error_response()).map_into_right_body()
}

// 提取令牌的函数类型
type TokenFinder = fn(req: &HttpRequest) -> Option<String>;

const TOKEN_FINDERS: [TokenFinder; 3] = [token_from_header, token_from_ui_header, token_from_query];

fn find_token(req: &HttpRequest, finders: &[TokenFinder]) -> Option<String> {
    finders.iter().find_map(|finder| finder(req))
}

fn bearer(value: &str) -> String {
    value
        .strip_prefix("Bearer ")
        .unwrap_or(value)
        .trim()
        .to_string()
}

fn token_from_header(req: &HttpRequest) -> Option<String> {
    let auth_str = req.headers().get("Authorization")?.to_str().ok()?;
    auth_str.strip_prefix("Bearer ").map(|t| t.trim().to_string())
}

fn token_from_ui_header(req: &HttpRequest) -> Option<String> {
    let value = req
        .headers()
        .get(consts::UI_AUTHORIZATION_HEADER)?
        .to_str()
        .ok()?;
    Some(bearer(value))
}

fn token_from_query(req: &HttpRequest) -> Option<String> {
    let url = Url::parse(&format!("http://localhost/?{}", req.query_string())).ok()?;
    url.query_pairs()
        .find(|(key, _)| key == "token")
        .map(|(_, value)| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn test_token_sources() {
        let req = TestRequest::default()
            .insert_header(("Authorization", "Bearer abc"))
            .to_http_request();
        assert_eq!(find_token(&req, &TOKEN_FINDERS), Some("abc".to_string()));

        let req = TestRequest::default()
            .insert_header((consts::UI_AUTHORIZATION_HEADER, "Bearer def"))
            .to_http_request();
        assert_eq!(find_token(&req, &TOKEN_FINDERS), Some("def".to_string()));

        let req = TestRequest::default()
            .uri("/admin/check?token=ghi")
            .to_http_request();
        assert_eq!(find_token(&req, &TOKEN_FINDERS), Some("ghi".to_string()));

        let req = TestRequest::default()
            .insert_header(("Authorization", "Basic xyz"))
            .to_http_request();
        assert_eq!(find_token(&req, &TOKEN_FINDERS), None);
    }
}
