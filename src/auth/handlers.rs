use axum::{
    extract::{rejection::JsonRejection, State},
    routing::{get, post},
    Json, Router,
};
use tracing::{error, instrument, warn};

use crate::{
    auth::{
        dto::{LoginRequest, LoginResponse, MeResponse},
        error::{AuthError, GateError},
        extractors::AuthUser,
    },
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new().route("/auth/login", post(login))
}

pub fn me_routes() -> Router<AppState> {
    Router::new().route("/auth/me", get(get_me))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, AuthError> {
    let Json(payload) = payload.map_err(|e| {
        warn!(error = %e, "unreadable login body");
        AuthError::Validation
    })?;

    let outcome = state.auth.login(&payload.username, &payload.password).await?;
    Ok(Json(LoginResponse {
        success: true,
        message: "Login successful".into(),
        token: outcome.token,
        user: outcome.user,
    }))
}

#[instrument(skip_all, fields(user_id = %identity.id))]
pub async fn get_me(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
) -> Result<Json<MeResponse>, GateError> {
    let user = match state.users.find_by_id(&identity.id).await {
        Ok(Some(u)) => u,
        Ok(None) => {
            warn!("token subject no longer exists");
            return Err(GateError::InvalidToken);
        }
        Err(e) => {
            error!(error = %e, "find_by_id failed");
            return Err(GateError::Internal);
        }
    };

    Ok(Json(MeResponse {
        success: true,
        user: user.into(),
    }))
}
