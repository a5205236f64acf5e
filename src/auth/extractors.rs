use actix_web::dev::Payload;
use actix_web::{Error as ActixError, FromRequest, HttpMessage, HttpRequest};
use std::future::{ready, Ready};

use crate::error::AppError;
use crate::models::User;

/// The identity resolved by `AuthMiddleware`: the full user record and the
/// exact token string this request authenticated with. Handlers that revoke a
/// single session (logout) need the raw token, not just the user.
///
/// If the session is not found in the request extensions (e.g. the middleware
/// did not run on this route), the extractor fails with `Unauthenticated`.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub user: User,
    pub token: String,
}

impl FromRequest for AuthSession {
    type Error = ActixError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        match req.extensions().get::<AuthSession>().cloned() {
            Some(session) => ready(Ok(session)),
            None => {
                let err = AppError::Unauthenticated("Please authenticate.".to_string());
                ready(Err(err.into()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UserInput;
    use actix_web::http::StatusCode;
    use actix_web::test;

    fn session() -> AuthSession {
        let user = User::create(UserInput {
            name: "Test".into(),
            age: 0,
            email: "extract@test.com".into(),
            password: "longenough".into(),
        })
        .unwrap();
        AuthSession {
            user,
            token: "tok".into(),
        }
    }

    #[actix_rt::test]
    async fn test_auth_session_extractor_success() {
        let req = test::TestRequest::default().to_http_request();
        let expected = session();
        req.extensions_mut().insert(expected.clone());

        let mut payload = Payload::None;
        let extracted = AuthSession::from_request(&req, &mut payload).await.unwrap();
        assert_eq!(extracted.user.id, expected.user.id);
        assert_eq!(extracted.token, "tok");
    }

    #[actix_rt::test]
    async fn test_auth_session_extractor_failure() {
        let req = test::TestRequest::default().to_http_request();

        let mut payload = Payload::None;
        let result = AuthSession::from_request(&req, &mut payload).await;
        assert!(result.is_err());

        let response = result.unwrap_err().error_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
