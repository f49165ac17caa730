use std::borrow::Cow;
use std::fmt;

use auth::TokenDigest;
use auth::TokenGenerator;
use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;

use crate::domain::token::errors::TokenError;
use crate::domain::user::models::UserId;

/// Purpose tag partitioning tokens.
///
/// Compared exactly on lookup. New kinds of tokens only need a new tag, the
/// storage schema stays the same.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TokenScope(Cow<'static, str>);

impl TokenScope {
    /// Session tokens presented as `Authorization: Bearer <token>`.
    pub const AUTHENTICATION: TokenScope = TokenScope(Cow::Borrowed("authentication"));

    pub fn new(scope: impl Into<String>) -> Self {
        Self(Cow::Owned(scope.into()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TokenScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Issued token bound to a user, scope and expiry.
///
/// `plaintext` goes back to the client exactly once; only `digest` is stored.
#[derive(Clone)]
pub struct Token {
    pub plaintext: String,
    pub digest: TokenDigest,
    pub user_id: UserId,
    pub expiry: DateTime<Utc>,
    pub scope: TokenScope,
}

impl Token {
    /// Generate a fresh token expiring `ttl` from now.
    ///
    /// # Errors
    /// * `Generation` - The secure random source failed
    pub fn generate(user_id: UserId, ttl: Duration, scope: TokenScope) -> Result<Self, TokenError> {
        let (plaintext, digest) = TokenGenerator::new().generate()?.into_parts();

        Ok(Self {
            plaintext,
            digest,
            user_id,
            expiry: Utc::now() + ttl,
            scope,
        })
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Token")
            .field("plaintext", &"[redacted]")
            .field("digest", &self.digest)
            .field("user_id", &self.user_id)
            .field("expiry", &self.expiry)
            .field("scope", &self.scope)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_binds_user_scope_and_expiry() {
        let before = Utc::now();
        let token = Token::generate(UserId(7), Duration::hours(24), TokenScope::AUTHENTICATION)
            .expect("Failed to generate token");

        assert_eq!(token.user_id, UserId(7));
        assert_eq!(token.scope.as_str(), "authentication");
        assert!(token.expiry >= before + Duration::hours(24));
        assert!(token.expiry <= Utc::now() + Duration::hours(24));
        assert_eq!(TokenDigest::from_plaintext(&token.plaintext), token.digest);
    }

    #[test]
    fn test_scope_equality_is_exact() {
        assert_eq!(TokenScope::new("authentication"), TokenScope::AUTHENTICATION);
        assert_ne!(TokenScope::new("Authentication"), TokenScope::AUTHENTICATION);
        assert_ne!(TokenScope::new("password-reset"), TokenScope::AUTHENTICATION);
    }
}
