use std::sync::Arc;

use async_trait::async_trait;
use auth::TokenDigest;
use chrono::Duration;
use chrono::Utc;

use crate::domain::token::errors::TokenError;
use crate::domain::token::models::Token;
use crate::domain::token::models::TokenScope;
use crate::domain::token::ports::TokenRepository;
use crate::domain::token::ports::TokenServicePort;
use crate::domain::user::models::Password;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::Username;
use crate::domain::user::ports::UserRepository;

/// Domain service for login, logout and bearer token resolution.
pub struct TokenService<UR, TR>
where
    UR: UserRepository,
    TR: TokenRepository,
{
    users: Arc<UR>,
    tokens: Arc<TR>,
    password_hasher: auth::PasswordHasher,
    ttl: Duration,
    /// Verified against when the username is unknown, so that a failed login
    /// costs one Argon2 verification whether or not the user exists.
    decoy: Option<Password>,
}

const DECOY_PASSWORD: &str = "decoy-password-never-issued";

impl<UR, TR> TokenService<UR, TR>
where
    UR: UserRepository,
    TR: TokenRepository,
{
    /// Create a new token service.
    ///
    /// # Arguments
    /// * `users` - User lookup for login
    /// * `tokens` - Token persistence
    /// * `password_hasher` - Verifier for stored credentials
    /// * `ttl` - Lifetime of issued authentication tokens
    pub fn new(
        users: Arc<UR>,
        tokens: Arc<TR>,
        password_hasher: auth::PasswordHasher,
        ttl: Duration,
    ) -> Self {
        let decoy = match Password::hashed(&password_hasher, DECOY_PASSWORD) {
            Ok(decoy) => Some(decoy),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to hash decoy password");
                None
            }
        };

        Self {
            users,
            tokens,
            password_hasher,
            ttl,
            decoy,
        }
    }

    fn reject_unknown_user(&self, candidate: &str) -> TokenError {
        if let Some(decoy) = &self.decoy {
            let _ = decoy.matches(&self.password_hasher, candidate);
        }
        TokenError::InvalidCredentials
    }
}

#[async_trait]
impl<UR, TR> TokenServicePort for TokenService<UR, TR>
where
    UR: UserRepository,
    TR: TokenRepository,
{
    async fn create_authentication_token(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Token, TokenError> {
        // A name that could never have been registered is just an unknown user
        let Ok(username) = Username::new(username.to_string()) else {
            return Err(self.reject_unknown_user(password));
        };

        let Some(user) = self.users.find_by_username(&username).await? else {
            tracing::info!("Login rejected: unknown user");
            return Err(self.reject_unknown_user(password));
        };

        if !user.password.matches(&self.password_hasher, password)? {
            tracing::info!(user_id = %user.id, "Login rejected: password mismatch");
            return Err(TokenError::InvalidCredentials);
        }

        let token = self
            .tokens
            .create_and_insert(user.id, self.ttl, &TokenScope::AUTHENTICATION)
            .await?;

        tracing::info!(
            user_id = %user.id,
            expiry = %token.expiry,
            "Authentication token issued"
        );

        Ok(token)
    }

    async fn revoke_authentication_tokens(&self, user_id: UserId) -> Result<(), TokenError> {
        self.tokens
            .delete_all_for_user(user_id, &TokenScope::AUTHENTICATION)
            .await?;

        tracing::info!(user_id = %user_id, "Authentication tokens revoked");
        Ok(())
    }

    async fn resolve_identity(&self, plaintext: &str) -> Result<Option<User>, TokenError> {
        let digest = TokenDigest::from_plaintext(plaintext);

        self.tokens
            .find_user_by_token(&digest, &TokenScope::AUTHENTICATION, Utc::now())
            .await
    }
}
