use axum::extract::State;
use axum::http::StatusCode;
use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiJson;
use super::ApiSuccess;
use crate::domain::token::models::Token;
use crate::domain::token::ports::TokenServicePort;
use crate::inbound::http::router::AppState;

/// Log in: exchange username and password for an authentication token.
pub async fn create_token(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<CreateTokenRequest>,
) -> Result<ApiSuccess<CreateTokenResponseData>, ApiError> {
    state
        .token_service
        .create_authentication_token(&body.username, &body.password)
        .await
        .map_err(ApiError::from)
        .map(|token| ApiSuccess::new(StatusCode::CREATED, token.into()))
}

#[derive(Deserialize)]
pub struct CreateTokenRequest {
    username: String,
    password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateTokenResponseData {
    pub auth_token: AuthTokenData,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthTokenData {
    pub token: String,
    pub expiry: DateTime<Utc>,
}

impl From<Token> for CreateTokenResponseData {
    fn from(token: Token) -> Self {
        Self {
            auth_token: AuthTokenData {
                token: token.plaintext,
                expiry: token.expiry,
            },
        }
    }
}
