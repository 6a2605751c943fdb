//! PostgreSQL store, a thin adapter over the repositories in `crate::db`

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use travelhub_core::models::Window;

use super::{
    NewResort, NewReview, NewUser, RankedResort, Resort, ResortReview, Review, Session, Store,
    StoreError, User, UserReview,
};
use crate::db::{ResortRepo, SessionRepo, UserRepo};

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl Store for PgStore {
    fn backend_tag(&self) -> &'static str {
        "postgres"
    }

    async fn create_user(&self, user: NewUser) -> Result<User, StoreError> {
        UserRepo::new(&self.pool).create(user).await
    }

    async fn user_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        UserRepo::new(&self.pool).by_username(username).await
    }

    async fn user_by_id(&self, id: i64) -> Result<Option<User>, StoreError> {
        UserRepo::new(&self.pool).by_id(id).await
    }

    async fn set_admin(&self, user_id: i64, is_admin: bool) -> Result<(), StoreError> {
        UserRepo::new(&self.pool).set_admin(user_id, is_admin).await
    }

    async fn list_users(&self) -> Result<Vec<User>, StoreError> {
        UserRepo::new(&self.pool).list().await
    }

    async fn create_resort_with_review(
        &self,
        resort: NewResort,
        review: NewReview,
    ) -> Result<(Resort, Review), StoreError> {
        ResortRepo::new(&self.pool)
            .create_with_review(resort, review)
            .await
    }

    async fn add_review(&self, resort_id: i64, review: NewReview) -> Result<Review, StoreError> {
        ResortRepo::new(&self.pool).add_review(resort_id, review).await
    }

    async fn ranked_resorts(
        &self,
        window: Option<Window>,
    ) -> Result<Vec<RankedResort>, StoreError> {
        ResortRepo::new(&self.pool).ranked(window).await
    }

    async fn ranked_resort(&self, resort_id: i64) -> Result<Option<RankedResort>, StoreError> {
        ResortRepo::new(&self.pool).ranked_one(resort_id).await
    }

    async fn reviews_for_resort(&self, resort_id: i64) -> Result<Vec<ResortReview>, StoreError> {
        ResortRepo::new(&self.pool).reviews_for_resort(resort_id).await
    }

    async fn reviews_by_user(&self, user_id: i64) -> Result<Vec<UserReview>, StoreError> {
        ResortRepo::new(&self.pool).reviews_by_user(user_id).await
    }

    async fn create_session(&self, session: Session) -> Result<(), StoreError> {
        SessionRepo::new(&self.pool).create(&session).await
    }

    async fn session(&self, token: &str) -> Result<Option<Session>, StoreError> {
        SessionRepo::new(&self.pool).get(token).await
    }

    async fn delete_session(&self, token: &str) -> Result<(), StoreError> {
        SessionRepo::new(&self.pool).delete(token).await
    }

    async fn purge_expired_sessions(&self, now: DateTime<Utc>) -> Result<u64, StoreError> {
        SessionRepo::new(&self.pool).purge_expired(now).await
    }
}
