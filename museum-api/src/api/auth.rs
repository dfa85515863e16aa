//! Bearer-token middleware for mutating routes
//!
//! With `require_auth` off, requests without an `Authorization` header pass
//! through. A header that is present must always carry a valid access token.
//!
//! Handlers read the verified [`Caller`] to check that the token belongs to
//! the account named in the request and holds the role the route needs.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use museum_common::api::{verify_token, Role, TokenClaims, TokenKind};
use tracing::{debug, warn};

use crate::db::accounts;
use crate::{ApiError, ApiResult, AppState};

/// Verified caller, stored in request extensions
#[derive(Debug, Clone)]
pub struct Caller(pub TokenClaims);

impl Caller {
    pub fn email(&self) -> &str {
        &self.0.email
    }
}

/// Reject a caller acting for another account
///
/// Requests without a token pass; the middleware already refused them when
/// `require_auth` is on.
pub(crate) fn ensure_acting_as(caller: Option<&Caller>, email: &str) -> ApiResult<()> {
    match caller {
        Some(caller) if caller.email() != email => {
            warn!("{} attempted to act as {}", caller.email(), email);
            Err(ApiError::forbidden(format!("Token does not belong to {}", email)))
        }
        _ => Ok(()),
    }
}

/// Require the caller to hold one of `allowed`
pub(crate) async fn ensure_role(
    state: &AppState,
    caller: Option<&Caller>,
    allowed: &[Role],
) -> ApiResult<()> {
    let Some(caller) = caller else {
        return Ok(());
    };

    let roles = accounts::roles(&state.db, caller.email()).await?;
    if allowed.iter().any(|role| roles.has(*role)) {
        return Ok(());
    }

    let wanted: Vec<&str> = allowed.iter().map(Role::as_str).collect();
    warn!("{} lacks role {}", caller.email(), wanted.join("/"));
    Err(ApiError::forbidden(format!(
        "Requires a {} account",
        wanted.join(" or ")
    )))
}

pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let header_value = request
        .headers()
        .get(header::AUTHORIZATION)
        .map(|v| v.to_str().map(str::to_string));

    match header_value {
        Some(Ok(value)) => {
            let token = value
                .strip_prefix("Bearer ")
                .ok_or_else(|| ApiError::unauthorized("Authorization header must be 'Bearer <token>'"))?;

            let claims = verify_token(token, TokenKind::Access, state.signing_secret).map_err(|e| {
                warn!("Rejected bearer token on {}: {}", request.uri().path(), e);
                ApiError::from(e)
            })?;

            debug!("Authenticated {} for {}", claims.email, request.uri().path());
            request.extensions_mut().insert(Caller(claims));
        }
        Some(Err(_)) => {
            return Err(ApiError::unauthorized("Authorization header is not valid text"));
        }
        None if state.config.require_auth => {
            warn!("Missing bearer token on {}", request.uri().path());
            return Err(ApiError::unauthorized("Authentication credentials were not provided"));
        }
        None => {}
    }

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use museum_common::api::issue_token;

    fn caller(email: &str) -> Caller {
        let token = issue_token(email, TokenKind::Access, 5, 42);
        Caller(verify_token(&token, TokenKind::Access, 42).unwrap())
    }

    #[test]
    fn test_acting_as_matches_token_email() {
        let ann = caller("ann@example.com");
        assert!(ensure_acting_as(Some(&ann), "ann@example.com").is_ok());
        assert!(ensure_acting_as(None, "ann@example.com").is_ok());

        let err = ensure_acting_as(Some(&ann), "bob@example.com").unwrap_err();
        assert_eq!(err.status(), axum::http::StatusCode::FORBIDDEN);
    }
}
