use async_trait::async_trait;
use auth::TokenDigest;
use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;

use crate::domain::token::errors::TokenError;
use crate::domain::token::models::Token;
use crate::domain::token::models::TokenScope;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;

/// Port for token domain service operations.
#[async_trait]
pub trait TokenServicePort: Send + Sync + 'static {
    /// Log a user in and issue an authentication token.
    ///
    /// # Arguments
    /// * `username` - Raw username as submitted
    /// * `password` - Raw candidate password as submitted
    ///
    /// # Returns
    /// Freshly persisted token; its plaintext is not recoverable later
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown username or wrong password
    /// * `Password` - Stored hash could not be verified
    /// * `Generation` - Secure random source failed
    /// * `DatabaseError` - Database operation failed
    async fn create_authentication_token(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Token, TokenError>;

    /// Delete every authentication token owned by the user.
    async fn revoke_authentication_tokens(&self, user_id: UserId) -> Result<(), TokenError>;

    /// Resolve the owner of a presented authentication token.
    ///
    /// # Returns
    /// None when the token is unknown, expired or issued for another scope
    async fn resolve_identity(&self, plaintext: &str) -> Result<Option<User>, TokenError>;
}

/// Persistence operations for tokens.
///
/// Only digests reach storage.
#[async_trait]
pub trait TokenRepository: Send + Sync + 'static {
    /// Persist an already generated token.
    async fn insert(&self, token: &Token) -> Result<(), TokenError>;

    /// Generate a token for the user and persist it.
    ///
    /// The token is dropped if persistence fails.
    async fn create_and_insert(
        &self,
        user_id: UserId,
        ttl: Duration,
        scope: &TokenScope,
    ) -> Result<Token, TokenError>;

    /// Remove all tokens of the given scope owned by the user.
    async fn delete_all_for_user(
        &self,
        user_id: UserId,
        scope: &TokenScope,
    ) -> Result<(), TokenError>;

    /// Find the user owning a token with this digest and scope whose expiry
    /// is strictly after `now`.
    async fn find_user_by_token(
        &self,
        digest: &TokenDigest,
        scope: &TokenScope,
        now: DateTime<Utc>,
    ) -> Result<Option<User>, TokenError>;
}
