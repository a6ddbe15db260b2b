//! `CurrentUser` as a handler argument
//!
//! Normally the user is already in the request extensions, put there by
//! [`require_auth`](super::require_auth). Routes mounted outside that layer
//! verify the bearer token here instead.

use axum::{extract::FromRequestParts, http::request::Parts};

use super::middleware::authenticate;
use crate::AppError;
use crate::auth::CurrentUser;
use crate::core::ServerState;

impl FromRequestParts<ServerState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &ServerState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<CurrentUser>() {
            return Ok(user.clone());
        }

        let user = authenticate(state, &parts.headers, &parts.uri)?;
        parts.extensions.insert(user.clone());
        Ok(user)
    }
}
