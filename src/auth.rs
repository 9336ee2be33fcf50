use std::future::{ready, Ready};

use actix_web::{dev::Payload, FromRequest, HttpRequest};

use crate::error::AppError;

/// Header the authenticating reverse proxy uses to pass the signed-in username.
pub const USER_HEADER: &str = "X-Authenticated-User";

/// The signed-in user. Extraction fails with 401 when the request carries no identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub username: String,
}

impl FromRequest for AuthenticatedUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let username = req
            .headers()
            .get(USER_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|name| !name.is_empty());

        ready(match username {
            Some(name) => Ok(AuthenticatedUser {
                username: name.to_string(),
            }),
            None => Err(AppError::Unauthenticated),
        })
    }
}
