/// Session middleware and role guards
use crate::{
    error::{Result, ServerError},
    state::AppState,
};
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use pulse_core::{Identity, UserId};

/// Name of the cookie carrying the session token
pub const SESSION_COOKIE: &str = "pulse_session";

/// Resolved caller, stored in request extensions by [`session_middleware`]
/// Can be used as an extractor in handlers
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub identity: Identity,
    pub session_id: String,
}

impl AuthenticatedUser {
    pub fn user_id(&self) -> UserId {
        self.identity.user_id
    }

    pub fn is_admin(&self) -> bool {
        self.identity.is_admin
    }
}

/// Reject non-admin callers with 403
pub fn require_admin(user: &AuthenticatedUser) -> Result<()> {
    if user.is_admin() {
        Ok(())
    } else {
        Err(ServerError::Forbidden("Admin access required".to_string()))
    }
}

/// Session token from `Authorization: Bearer` or the session cookie
pub fn extract_token(headers: &HeaderMap) -> Option<String> {
    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty());

    if let Some(token) = bearer {
        return Some(token.to_string());
    }

    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|h| h.to_str().ok())
        .flat_map(|h| h.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value.to_string())
        .filter(|t| !t.is_empty())
}

/// `Set-Cookie` value installing a session token
pub fn session_cookie(token: &str, max_age_secs: i64) -> String {
    format!("{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={max_age_secs}")
}

/// `Set-Cookie` value clearing the session cookie
pub fn clear_session_cookie() -> String {
    format!("{SESSION_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}

/// Resolve the caller's session or reject with 401
pub async fn resolve_session(state: &AppState, headers: &HeaderMap) -> Result<AuthenticatedUser> {
    let token =
        extract_token(headers).ok_or_else(|| ServerError::Auth("Not authenticated".to_string()))?;

    let claims = state.auth_service.verify_token(&token)?;
    let user_id = claims.user_id()?;

    let max_age = state.auth_service.session_expiration().num_seconds();
    let identity = pulse_storage::sessions::resolve(&state.pool, &claims.sid, max_age)
        .await?
        .filter(|identity| identity.user_id == user_id)
        .ok_or_else(|| ServerError::Auth("Session expired".to_string()))?;

    Ok(AuthenticatedUser {
        identity,
        session_id: claims.sid,
    })
}

/// Middleware that requires a live session
pub async fn session_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response> {
    let user = resolve_session(&state, request.headers())
        .await
        .map_err(|e| {
            tracing::debug!("Session rejected: {}", e);
            e
        })?;

    request.extensions_mut().insert(user);

    Ok(next.run(request).await)
}

/// Implement FromRequestParts so AuthenticatedUser can be used as an extractor
#[axum::async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = ServerError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or_else(|| ServerError::Auth("Not authenticated".to_string()))
    }
}
