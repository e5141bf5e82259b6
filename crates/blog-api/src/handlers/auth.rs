//! Auth handlers: register, login, refresh, logout, me.

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};

use blog_core::error::AppError;
use blog_service::auth::Session;

use crate::dto::request::{LoginRequest, RefreshRequest, RegisterRequest};
use crate::dto::response::{MessageResponse, TokenResponse, UserResponse};
use crate::error::ApiError;
use crate::extractors::{AuthUser, ValidatedForm, ValidatedJson};
use crate::state::AppState;

/// Attach a new token pair to the response and build the body.
fn session_response(state: &AppState, session: Session) -> (HeaderMap, Json<TokenResponse>) {
    let mut headers = HeaderMap::new();
    state.transport.attach(
        &mut headers,
        &session.tokens.access_token,
        Some(&session.tokens.refresh_token),
    );

    let expires_in = state.auth_service.tokens().access_ttl().num_seconds();
    let body = TokenResponse::new(
        session.tokens.access_token,
        session.tokens.refresh_token,
        expires_in,
        &session.user,
    );
    (headers, Json(body))
}

/// POST /api/auth/register
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<RegisterRequest>,
) -> Result<(StatusCode, HeaderMap, Json<TokenResponse>), ApiError> {
    let session = state.auth_service.register(req.into()).await?;
    let (headers, body) = session_response(&state, session);
    Ok((StatusCode::CREATED, headers, body))
}

/// POST /api/auth/login and /api/auth/login-form
pub async fn login(
    State(state): State<AppState>,
    ValidatedForm(req): ValidatedForm<LoginRequest>,
) -> Result<(HeaderMap, Json<TokenResponse>), ApiError> {
    let session = state
        .auth_service
        .authenticate(&req.username, &req.password)
        .await?;
    Ok(session_response(&state, session))
}

/// POST /api/auth/login-json
pub async fn login_json(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> Result<(HeaderMap, Json<TokenResponse>), ApiError> {
    let session = state
        .auth_service
        .authenticate(&req.username, &req.password)
        .await?;
    Ok(session_response(&state, session))
}

/// POST /api/auth/refresh
///
/// Takes the refresh token from an optional JSON body, else from the
/// transport. Only the access token is reissued.
pub async fn refresh(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(HeaderMap, Json<TokenResponse>), ApiError> {
    let from_body = if body.iter().all(u8::is_ascii_whitespace) {
        None
    } else {
        serde_json::from_slice::<RefreshRequest>(&body)
            .map_err(|e| AppError::validation(format!("Invalid request body: {e}")))?
            .refresh_token
    };

    let refresh_token = from_body
        .filter(|t| !t.is_empty())
        .or_else(|| state.transport.extract_refresh(&headers))
        .ok_or_else(|| AppError::unauthorized("Refresh token not found"))?;

    let refreshed = state.auth_service.refresh(&refresh_token).await?;

    let mut out = HeaderMap::new();
    state
        .transport
        .attach(&mut out, &refreshed.access.token, None);

    let expires_in = state.auth_service.tokens().access_ttl().num_seconds();
    let body = TokenResponse::new(
        refreshed.access.token,
        refresh_token,
        expires_in,
        &refreshed.user,
    );
    Ok((out, Json(body)))
}

/// POST /api/auth/logout
///
/// Clears the client-side carriers. Issued tokens stay valid until they
/// expire.
pub async fn logout(State(state): State<AppState>) -> (HeaderMap, Json<MessageResponse>) {
    let mut headers = HeaderMap::new();
    state.transport.clear(&mut headers);
    (headers, Json(MessageResponse::new("Successfully logged out")))
}

/// GET /api/auth/me
pub async fn me(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<UserResponse>, ApiError> {
    let user = state.auth_service.current_user(&auth).await?;
    Ok(Json(UserResponse::from(user)))
}
