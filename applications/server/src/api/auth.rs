/// Authentication API routes
use crate::{
    api::ApiJson,
    error::{Result, ServerError},
    middleware::{
        auth::{clear_session_cookie, extract_token, session_cookie},
        AuthenticatedUser,
    },
    state::AppState,
};
use axum::{
    extract::State,
    http::{header, HeaderMap},
    response::IntoResponse,
    Json,
};
use pulse_core::{CreateUser, UserId};
use serde::{Deserialize, Serialize};

const MIN_USERNAME_LEN: usize = 3;
const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub success: bool,
    pub id: UserId,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub username: String,
    pub is_admin: bool,
    pub access_token: String,
    pub token_type: String,
}

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub is_admin: bool,
}

/// Normalise and validate a registration; returns (username, email)
fn validate_registration(req: &RegisterRequest) -> Result<(String, String)> {
    let username = req.username.trim();
    let email = req.email.trim().to_lowercase();

    if username.chars().count() < MIN_USERNAME_LEN {
        return Err(ServerError::BadRequest(format!(
            "Username must be at least {MIN_USERNAME_LEN} characters"
        )));
    }
    if !email.contains('@') {
        return Err(ServerError::BadRequest("Invalid email address".to_string()));
    }
    if req.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ServerError::BadRequest(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }

    Ok((username.to_string(), email))
}

/// POST /api/register
pub async fn register(
    State(app_state): State<AppState>,
    ApiJson(req): ApiJson<RegisterRequest>,
) -> Result<Json<RegisterResponse>> {
    let (username, email) = validate_registration(&req)?;
    let password_hash = app_state.auth_service.hash_password(&req.password)?;

    let user = pulse_storage::users::create(
        &app_state.pool,
        CreateUser {
            username,
            email,
            password_hash,
            is_admin: false,
        },
    )
    .await?;

    tracing::info!("Registered user {} ({})", user.username, user.id);

    Ok(Json(RegisterResponse {
        success: true,
        id: user.id,
    }))
}

/// POST /api/login
pub async fn login(
    State(app_state): State<AppState>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> Result<impl IntoResponse> {
    let email = req.email.trim().to_lowercase();
    let invalid = || ServerError::Auth("Invalid email or password".to_string());

    let (user, password_hash) =
        pulse_storage::users::get_credentials_by_email(&app_state.pool, &email)
            .await?
            .ok_or_else(invalid)?;

    if !app_state
        .auth_service
        .verify_password(&req.password, &password_hash)?
    {
        return Err(invalid());
    }

    let max_age = app_state.auth_service.session_expiration().num_seconds();
    let purged = pulse_storage::sessions::delete_expired(&app_state.pool, max_age).await?;
    if purged > 0 {
        tracing::debug!("Purged {} expired session(s)", purged);
    }

    let session_id = uuid::Uuid::new_v4().to_string();
    pulse_storage::sessions::create(&app_state.pool, &session_id, user.id).await?;
    let access_token = app_state
        .auth_service
        .create_session_token(user.id, &session_id)?;

    let cookie = session_cookie(&access_token, max_age);

    tracing::debug!("User {} logged in", user.id);

    Ok((
        [(header::SET_COOKIE, cookie)],
        Json(LoginResponse {
            success: true,
            username: user.username,
            is_admin: user.is_admin,
            access_token,
            token_type: "Bearer".to_string(),
        }),
    ))
}

/// POST /api/logout
///
/// Always succeeds; a valid session is deleted server-side.
pub async fn logout(
    State(app_state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse> {
    if let Some(token) = extract_token(&headers) {
        if let Ok(claims) = app_state.auth_service.verify_token(&token) {
            pulse_storage::sessions::delete(&app_state.pool, &claims.sid).await?;
        }
    }

    Ok((
        [(header::SET_COOKIE, clear_session_cookie())],
        Json(serde_json::json!({ "success": true })),
    ))
}

/// GET /api/me
pub async fn me(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<MeResponse>> {
    let user = pulse_storage::users::get_by_id(&app_state.pool, auth.user_id())
        .await?
        .ok_or_else(|| ServerError::Auth("Session expired".to_string()))?;

    Ok(Json(MeResponse {
        id: user.id,
        username: user.username,
        email: user.email,
        is_admin: user.is_admin,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(username: &str, email: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn registration_normalises_fields() {
        let (username, email) =
            validate_registration(&request("  alice ", " Alice@X.com ", "secret1")).unwrap();
        assert_eq!(username, "alice");
        assert_eq!(email, "alice@x.com");
    }

    #[test]
    fn registration_rejects_short_or_malformed_fields() {
        assert!(validate_registration(&request("al", "a@x.com", "secret1")).is_err());
        assert!(validate_registration(&request("alice", "alice.x.com", "secret1")).is_err());
        assert!(validate_registration(&request("alice", "a@x.com", "12345")).is_err());
    }
}
