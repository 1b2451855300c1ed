use std::convert::Infallible;

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::models::Identity;

/// Set by the authenticating proxy in front of the service
pub const USER_HEADER: &str = "x-journals-user";
pub const ADMIN_HEADER: &str = "x-journals-admin";

fn header<'a>(parts: &'a Parts, name: &str) -> Option<&'a str> {
    parts
        .headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

/// Requests without a user header are anonymous, admin needs a user too
impl<S: Send + Sync> FromRequestParts<S> for Identity {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Some(id) = header(parts, USER_HEADER) else {
            return Ok(Identity::anonymous());
        };

        let is_admin = matches!(
            header(parts, ADMIN_HEADER).map(str::to_lowercase).as_deref(),
            Some("1" | "true" | "yes")
        );

        Ok(Identity {
            id: Some(id.to_string()),
            is_admin,
        })
    }
}
