use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header,
    web, Error, HttpMessage, ResponseError,
};
use futures::future::{ready, LocalBoxFuture, Ready};

use crate::auth::extractors::AuthenticatedUser;
use crate::error::AppError;
use crate::state::AppState;

/// Rejects requests without a valid `Authorization: Bearer <token>` header.
///
/// On success the decoded identity is stored in the request extensions as an
/// [`AuthenticatedUser`]. Rejections are answered directly with the `AppError`
/// response instead of reaching the wrapped service. Wrap only the scopes and resources
/// that need protection.
pub struct AuthMiddleware;

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = AuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService { service }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: S,
}

/// The token from `Authorization: Bearer <token>`. The scheme name is case-insensitive.
fn bearer_token(req: &ServiceRequest) -> Option<&str> {
    let value = req.headers().get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.trim_start().split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("Bearer") && !token.is_empty()).then_some(token)
}

fn authenticate(req: &ServiceRequest) -> Result<AuthenticatedUser, AppError> {
    let state = req.app_data::<web::Data<AppState>>().ok_or_else(|| {
        AppError::InternalServerError("AppState is not registered on the app".into())
    })?;

    let token =
        bearer_token(req).ok_or_else(|| AppError::Unauthorized("Missing token".into()))?;

    let claims = state.auth.tokens().verify(token)?;
    Ok(claims.into())
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        match authenticate(&req) {
            Ok(user) => {
                req.extensions_mut().insert(user);
                let fut = self.service.call(req);
                Box::pin(async move { fut.await.map(ServiceResponse::map_into_left_body) })
            }
            Err(app_err) => {
                log::debug!("rejecting {} {}: {}", req.method(), req.path(), app_err);
                let response = req
                    .into_response(app_err.error_response())
                    .map_into_right_body();
                Box::pin(ready(Ok(response)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{Claims, PasswordHasher, TokenService};
    use crate::store::MemoryStore;
    use actix_web::{test, App, HttpResponse};
    use chrono::{Duration, Utc};
    use std::sync::Arc;
    use uuid::Uuid;

    const SECRET: &str = "middleware_test_secret";

    fn state() -> AppState {
        let store = Arc::new(MemoryStore::new());
        AppState::new(
            store.clone(),
            store,
            TokenService::new(SECRET, Duration::hours(1)),
            PasswordHasher::new(4),
        )
    }

    async fn whoami(user: AuthenticatedUser) -> HttpResponse {
        HttpResponse::Ok().json(user)
    }

    fn claims(exp_offset: Duration) -> Claims {
        let now = Utc::now();
        Claims {
            sub: Uuid::new_v4(),
            email: "a@x.com".to_string(),
            iat: now.timestamp(),
            exp: (now + exp_offset).timestamp(),
        }
    }

    macro_rules! protected_app {
        ($state:expr) => {
            test::init_service(
                App::new().app_data(web::Data::new($state)).service(
                    web::resource("/whoami")
                        .wrap(AuthMiddleware)
                        .route(web::get().to(whoami)),
                ),
            )
            .await
        };
    }

    #[actix_rt::test]
    async fn test_missing_token_is_rejected() {
        let app = protected_app!(state());
        let req = test::TestRequest::get().uri("/whoami").to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 401);
    }

    #[actix_rt::test]
    async fn test_non_bearer_scheme_is_rejected() {
        let app = protected_app!(state());
        let req = test::TestRequest::get()
            .uri("/whoami")
            .insert_header((header::AUTHORIZATION, "Basic YTpi"))
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 401);
    }

    #[actix_rt::test]
    async fn test_bearer_scheme_is_case_insensitive() {
        let state = state();
        let claims = claims(Duration::minutes(5));
        let token = state.auth.tokens().sign(&claims).unwrap();
        let app = protected_app!(state);

        for scheme in ["bearer", "BEARER", "BeArEr"] {
            let req = test::TestRequest::get()
                .uri("/whoami")
                .insert_header((header::AUTHORIZATION, format!("{} {}", scheme, token)))
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), 200, "scheme {:?} was refused", scheme);
        }

        let req = test::TestRequest::get()
            .uri("/whoami")
            .insert_header((header::AUTHORIZATION, "bearer "))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 401);
    }

    #[actix_rt::test]
    async fn test_valid_token_injects_identity() {
        let state = state();
        let claims = claims(Duration::minutes(5));
        let token = state.auth.tokens().sign(&claims).unwrap();
        let app = protected_app!(state);

        let req = test::TestRequest::get()
            .uri("/whoami")
            .insert_header((header::AUTHORIZATION, format!("Bearer {}", token)))
            .to_request();
        let user: AuthenticatedUser = test::call_and_read_body_json(&app, req).await;

        assert_eq!(user.id, claims.sub);
        assert_eq!(user.email, claims.email);
    }

    #[actix_rt::test]
    async fn test_expired_token_is_rejected() {
        let state = state();
        let token = state
            .auth
            .tokens()
            .sign(&claims(Duration::hours(-2)))
            .unwrap();
        let app = protected_app!(state);

        let req = test::TestRequest::get()
            .uri("/whoami")
            .insert_header((header::AUTHORIZATION, format!("Bearer {}", token)))
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 401);
    }

    #[actix_rt::test]
    async fn test_token_from_another_secret_is_rejected() {
        let foreign = TokenService::new("some_other_secret", Duration::hours(1))
            .sign(&claims(Duration::minutes(5)))
            .unwrap();
        let app = protected_app!(state());

        let req = test::TestRequest::get()
            .uri("/whoami")
            .insert_header((header::AUTHORIZATION, format!("Bearer {}", foreign)))
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 401);
    }
}
