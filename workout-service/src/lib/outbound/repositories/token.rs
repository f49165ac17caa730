use async_trait::async_trait;
use auth::TokenDigest;
use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use sqlx::PgPool;

use super::user::UserRow;
use crate::domain::token::errors::TokenError;
use crate::domain::token::models::Token;
use crate::domain::token::models::TokenScope;
use crate::domain::token::ports::TokenRepository;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;

pub struct PostgresTokenRepository {
    pool: PgPool,
}

impl PostgresTokenRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TokenRepository for PostgresTokenRepository {
    async fn insert(&self, token: &Token) -> Result<(), TokenError> {
        sqlx::query(
            r#"
            INSERT INTO tokens (hash, user_id, expiry, scope)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(token.digest.as_bytes())
        .bind(token.user_id.0)
        .bind(token.expiry)
        .bind(token.scope.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| TokenError::DatabaseError(e.to_string()))?;

        Ok(())
    }

    async fn create_and_insert(
        &self,
        user_id: UserId,
        ttl: Duration,
        scope: &TokenScope,
    ) -> Result<Token, TokenError> {
        let token = Token::generate(user_id, ttl, scope.clone())?;
        self.insert(&token).await?;
        Ok(token)
    }

    async fn delete_all_for_user(
        &self,
        user_id: UserId,
        scope: &TokenScope,
    ) -> Result<(), TokenError> {
        sqlx::query(
            r#"
            DELETE FROM tokens
            WHERE user_id = $1 AND scope = $2
            "#,
        )
        .bind(user_id.0)
        .bind(scope.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| TokenError::DatabaseError(e.to_string()))?;

        Ok(())
    }

    async fn find_user_by_token(
        &self,
        digest: &TokenDigest,
        scope: &TokenScope,
        now: DateTime<Utc>,
    ) -> Result<Option<User>, TokenError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT u.id, u.username, u.email, u.password_hash, u.bio, u.created_at, u.updated_at
            FROM users u
            INNER JOIN tokens t ON t.user_id = u.id
            WHERE t.hash = $1 AND t.scope = $2 AND t.expiry > $3
            "#,
        )
        .bind(digest.as_bytes())
        .bind(scope.as_str())
        .bind(now)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| TokenError::DatabaseError(e.to_string()))?;

        Ok(row.map(User::try_from).transpose()?)
    }
}
