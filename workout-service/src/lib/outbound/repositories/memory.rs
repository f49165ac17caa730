use std::collections::BTreeMap;
use std::collections::HashMap;

use async_trait::async_trait;
use auth::TokenDigest;
use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::domain::token::errors::TokenError;
use crate::domain::token::models::Token;
use crate::domain::token::models::TokenScope;
use crate::domain::token::ports::TokenRepository;
use crate::domain::user::errors::UserError;
use crate::domain::user::models::NewUser;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::Username;
use crate::domain::user::ports::UserRepository;
use crate::domain::workout::errors::WorkoutError;
use crate::domain::workout::models::Workout;
use crate::domain::workout::models::WorkoutDraft;
use crate::domain::workout::models::WorkoutEntry;
use crate::domain::workout::models::WorkoutId;
use crate::domain::workout::ports::WorkoutRepository;

/// Process-local storage backing all three repositories.
///
/// Mirrors the relational constraints: unique username and email, tokens and
/// workouts referencing existing users. Used by the integration tests and for
/// running the service without a database.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: RwLock<State>,
}

#[derive(Debug, Default)]
struct State {
    users: BTreeMap<i64, User>,
    tokens: HashMap<TokenDigest, StoredToken>,
    workouts: BTreeMap<i64, Workout>,
    next_user_id: i64,
    next_workout_id: i64,
    next_entry_id: i64,
}

#[derive(Debug, Clone)]
struct StoredToken {
    user_id: UserId,
    expiry: DateTime<Utc>,
    scope: TokenScope,
}

impl State {
    fn materialize(&mut self, id: WorkoutId, owner: UserId, draft: WorkoutDraft) -> Workout {
        let now = Utc::now();
        let mut entries: Vec<WorkoutEntry> = draft
            .entries
            .into_iter()
            .map(|entry| {
                self.next_entry_id += 1;
                WorkoutEntry {
                    id: self.next_entry_id,
                    exercise_name: entry.exercise_name,
                    sets: entry.sets,
                    measure: entry.measure,
                    weight: entry.weight,
                    notes: entry.notes,
                    order_index: entry.order_index,
                }
            })
            .collect();
        entries.sort_by_key(|entry| entry.order_index);

        Workout {
            id,
            user_id: owner,
            title: draft.title,
            description: draft.description,
            duration_minutes: draft.duration_minutes,
            calories_burned: draft.calories_burned,
            entries,
            created_at: now,
            updated_at: now,
        }
    }
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn create(&self, user: NewUser) -> Result<User, UserError> {
        let mut state = self.state.write().await;

        if state.users.values().any(|u| u.username == user.username) {
            return Err(UserError::UsernameAlreadyExists(
                user.username.as_str().to_string(),
            ));
        }
        if state.users.values().any(|u| u.email == user.email) {
            return Err(UserError::EmailAlreadyExists(user.email.as_str().to_string()));
        }

        state.next_user_id += 1;
        let now = Utc::now();
        let created = User {
            id: UserId(state.next_user_id),
            username: user.username,
            email: user.email,
            password: user.password,
            bio: user.bio,
            created_at: now,
            updated_at: now,
        };
        state.users.insert(created.id.0, created.clone());

        Ok(created)
    }

    async fn find_by_username(&self, username: &Username) -> Result<Option<User>, UserError> {
        let state = self.state.read().await;
        Ok(state
            .users
            .values()
            .find(|u| &u.username == username)
            .cloned())
    }
}

#[async_trait]
impl TokenRepository for InMemoryStore {
    async fn insert(&self, token: &Token) -> Result<(), TokenError> {
        let mut state = self.state.write().await;

        if !state.users.contains_key(&token.user_id.0) {
            return Err(TokenError::DatabaseError(format!(
                "token references missing user {}",
                token.user_id
            )));
        }
        if state.tokens.contains_key(&token.digest) {
            return Err(TokenError::DatabaseError("duplicate token digest".to_string()));
        }

        state.tokens.insert(
            token.digest,
            StoredToken {
                user_id: token.user_id,
                expiry: token.expiry,
                scope: token.scope.clone(),
            },
        );
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
        let mut state = self.state.write().await;
        state
            .tokens
            .retain(|_, stored| !(stored.user_id == user_id && &stored.scope == scope));
        Ok(())
    }

    async fn find_user_by_token(
        &self,
        digest: &TokenDigest,
        scope: &TokenScope,
        now: DateTime<Utc>,
    ) -> Result<Option<User>, TokenError> {
        let state = self.state.read().await;

        let user = state
            .tokens
            .get(digest)
            .filter(|stored| &stored.scope == scope && stored.expiry > now)
            .and_then(|stored| state.users.get(&stored.user_id.0))
            .cloned();

        Ok(user)
    }
}

#[async_trait]
impl WorkoutRepository for InMemoryStore {
    async fn create(&self, owner: UserId, draft: WorkoutDraft) -> Result<Workout, WorkoutError> {
        let mut state = self.state.write().await;

        if !state.users.contains_key(&owner.0) {
            return Err(WorkoutError::DatabaseError(format!(
                "workout references missing user {}",
                owner
            )));
        }

        state.next_workout_id += 1;
        let id = WorkoutId(state.next_workout_id);
        let workout = state.materialize(id, owner, draft);
        state.workouts.insert(id.0, workout.clone());

        Ok(workout)
    }

    async fn find_by_id(&self, id: WorkoutId) -> Result<Option<Workout>, WorkoutError> {
        Ok(self.state.read().await.workouts.get(&id.0).cloned())
    }

    async fn find_owner(&self, id: WorkoutId) -> Result<Option<UserId>, WorkoutError> {
        Ok(self
            .state
            .read()
            .await
            .workouts
            .get(&id.0)
            .map(|workout| workout.user_id))
    }

    async fn update(
        &self,
        id: WorkoutId,
        draft: WorkoutDraft,
    ) -> Result<Option<Workout>, WorkoutError> {
        let mut state = self.state.write().await;

        let Some(current) = state.workouts.get(&id.0) else {
            return Ok(None);
        };
        let (owner, created_at) = (current.user_id, current.created_at);

        let mut workout = state.materialize(id, owner, draft);
        workout.created_at = created_at;
        state.workouts.insert(id.0, workout.clone());

        Ok(Some(workout))
    }

    async fn delete(&self, id: WorkoutId) -> Result<bool, WorkoutError> {
        Ok(self.state.write().await.workouts.remove(&id.0).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::user::models::EmailAddress;
    use crate::domain::user::models::Password;

    async fn store_with_user() -> (InMemoryStore, User) {
        let store = InMemoryStore::new();
        let user = UserRepository::create(
            &store,
            NewUser {
                username: Username::new("alice".to_string()).unwrap(),
                email: EmailAddress::new("alice@example.com".to_string()).unwrap(),
                password: Password::from_hash("$argon2id$stub".to_string()),
                bio: String::new(),
            },
        )
        .await
        .unwrap();
        (store, user)
    }

    #[tokio::test]
    async fn test_lookup_finds_live_token() {
        let (store, user) = store_with_user().await;
        let token = store
            .create_and_insert(user.id, Duration::hours(1), &TokenScope::AUTHENTICATION)
            .await
            .unwrap();

        let found = store
            .find_user_by_token(
                &TokenDigest::from_plaintext(&token.plaintext),
                &TokenScope::AUTHENTICATION,
                Utc::now(),
            )
            .await
            .unwrap();

        assert_eq!(found.map(|u| u.id), Some(user.id));
    }

    #[tokio::test]
    async fn test_lookup_with_other_scope_is_not_found() {
        let (store, user) = store_with_user().await;
        let token = store
            .create_and_insert(user.id, Duration::hours(1), &TokenScope::AUTHENTICATION)
            .await
            .unwrap();

        let found = store
            .find_user_by_token(&token.digest, &TokenScope::new("activation"), Utc::now())
            .await
            .unwrap();

        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_lookup_of_expired_token_is_not_found() {
        let (store, user) = store_with_user().await;
        let token = Token::generate(user.id, Duration::hours(1), TokenScope::AUTHENTICATION).unwrap();
        store.insert(&token).await.unwrap();

        // Exactly at expiry counts as expired
        let at_expiry = store
            .find_user_by_token(&token.digest, &TokenScope::AUTHENTICATION, token.expiry)
            .await
            .unwrap();
        let before_expiry = store
            .find_user_by_token(
                &token.digest,
                &TokenScope::AUTHENTICATION,
                token.expiry - Duration::seconds(1),
            )
            .await
            .unwrap();

        assert!(at_expiry.is_none());
        assert!(before_expiry.is_some());
    }

    #[tokio::test]
    async fn test_delete_all_for_user_keeps_other_scopes() {
        let (store, user) = store_with_user().await;
        let auth_token = store
            .create_and_insert(user.id, Duration::hours(1), &TokenScope::AUTHENTICATION)
            .await
            .unwrap();
        let other_scope = TokenScope::new("activation");
        let other = store
            .create_and_insert(user.id, Duration::hours(1), &other_scope)
            .await
            .unwrap();

        store
            .delete_all_for_user(user.id, &TokenScope::AUTHENTICATION)
            .await
            .unwrap();

        let now = Utc::now();
        assert!(store
            .find_user_by_token(&auth_token.digest, &TokenScope::AUTHENTICATION, now)
            .await
            .unwrap()
            .is_none());
        assert!(store
            .find_user_by_token(&other.digest, &other_scope, now)
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn test_duplicate_username_and_email() {
        let (store, _) = store_with_user().await;

        let same_name = UserRepository::create(
            &store,
            NewUser {
                username: Username::new("alice".to_string()).unwrap(),
                email: EmailAddress::new("other@example.com".to_string()).unwrap(),
                password: Password::from_hash(String::new()),
                bio: String::new(),
            },
        )
        .await;
        let same_email = UserRepository::create(
            &store,
            NewUser {
                username: Username::new("bob".to_string()).unwrap(),
                email: EmailAddress::new("alice@example.com".to_string()).unwrap(),
                password: Password::from_hash(String::new()),
                bio: String::new(),
            },
        )
        .await;

        assert!(matches!(same_name, Err(UserError::UsernameAlreadyExists(_))));
        assert!(matches!(same_email, Err(UserError::EmailAlreadyExists(_))));
    }
}
