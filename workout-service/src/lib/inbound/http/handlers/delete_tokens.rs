use axum::extract::State;
use axum::http::StatusCode;

use super::ApiError;
use crate::domain::token::ports::TokenServicePort;
use crate::inbound::http::middleware::CurrentUser;
use crate::inbound::http::router::AppState;

/// Log out everywhere: revoke every authentication token of the caller.
pub async fn delete_tokens(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<StatusCode, ApiError> {
    state
        .token_service
        .revoke_authentication_tokens(user.id)
        .await
        .map_err(ApiError::from)
        .map(|_| StatusCode::NO_CONTENT)
}
