//!
//! # Authorization Middleware
//!
//! Guards every protected route. A request passes only if it carries a
//! `Bearer` token that (a) verifies cryptographically and (b) is still present
//! in the owning user's stored token list. Membership is the revocation
//! mechanism: logout removes the entry, so a structurally fresh token dies the
//! moment it leaves the list.
//!
//! Failure mapping, on purpose:
//! - missing/`Bearer`-less header: 401
//! - token fails verification: 500 (see the `From` impl in `error.rs`)
//! - no user holds this token: 401

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::{header, Method},
    web, Error, HttpMessage,
};
use futures::future::{ready, LocalBoxFuture, Ready};
use std::rc::Rc;

use crate::auth::extractors::AuthSession;
use crate::error::AppError;
use crate::state::AppState;

pub struct AuthMiddleware;

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = AuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service: Rc::new(service),
        }))
    }
}

pub struct AuthMiddlewareService<S> {
    // Rc because the store lookup forces the call future to own the service.
    service: Rc<S>,
}

fn is_public(method: &Method, path: &str) -> bool {
    method == Method::POST && (path == "/users" || path == "/users/login")
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        Box::pin(async move {
            if is_public(req.method(), req.path()) {
                return service.call(req).await;
            }

            let state = req
                .app_data::<web::Data<AppState>>()
                .cloned()
                .ok_or_else(|| AppError::Internal("application state missing".into()))?;

            let token = req
                .headers()
                .get(header::AUTHORIZATION)
                .and_then(|value| value.to_str().ok())
                .and_then(|value| value.strip_prefix("Bearer "))
                .map(str::to_owned)
                .ok_or_else(|| AppError::Unauthenticated("Invalid token".into()))?;

            let user_id = state.tokens.verify(&token)?;

            let user = state
                .store
                .find_user_by_token(user_id, &token)
                .await
                .map_err(AppError::from)?
                .ok_or_else(|| AppError::Unauthenticated("Please authenticate.".into()))?;

            req.extensions_mut().insert(AuthSession { user, token });
            service.call(req).await
        })
    }
}
