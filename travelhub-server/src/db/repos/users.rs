//! User repository

use sqlx::PgPool;

use super::map_conflict;
use crate::store::{NewUser, StoreError, User};

const USER_COLUMNS: &str = "id, username, nickname, password_hash, is_admin, created_at";

pub struct UserRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert a user. The UNIQUE constraint on `username` decides
    /// duplicates, so concurrent signups cannot both succeed.
    pub async fn create(&self, user: NewUser) -> Result<User, StoreError> {
        let username = user.username.as_str().to_owned();
        sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (username, nickname, password_hash, is_admin) \
             VALUES ($1, $2, $3, $4) RETURNING {USER_COLUMNS}"
        ))
        .bind(user.username.as_str())
        .bind(user.nickname.as_str())
        .bind(&user.password_hash)
        .bind(user.is_admin)
        .fetch_one(self.pool)
        .await
        .map_err(|e| map_conflict(e, || format!("username '{}' already exists", username)))
    }

    pub async fn by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        Ok(sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = $1"
        ))
        .bind(username)
        .fetch_optional(self.pool)
        .await?)
    }

    pub async fn by_id(&self, id: i64) -> Result<Option<User>, StoreError> {
        Ok(
            sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
                .bind(id)
                .fetch_optional(self.pool)
                .await?,
        )
    }

    pub async fn set_admin(&self, id: i64, is_admin: bool) -> Result<(), StoreError> {
        let result = sqlx::query("UPDATE users SET is_admin = $2 WHERE id = $1")
            .bind(id)
            .bind(is_admin)
            .execute(self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("user", id));
        }
        Ok(())
    }

    pub async fn list(&self) -> Result<Vec<User>, StoreError> {
        Ok(
            sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users ORDER BY id"))
                .fetch_all(self.pool)
                .await?,
        )
    }
}
