//! Persisted record types shared by every store backend

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

use travelhub_core::models::{Nickname, ResortDraft, ResortType, ReviewDraft, Username};

/// User record. `password_hash` is an Argon2id PHC string.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub nickname: String,
    pub password_hash: String,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
}

/// Public projection of a user (no credential material)
#[derive(Debug, Clone, Serialize)]
pub struct UserSummary {
    pub id: i64,
    pub username: String,
    pub nickname: String,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserSummary {
    fn from(u: &User) -> Self {
        Self {
            id: u.id,
            username: u.username.clone(),
            nickname: u.nickname.clone(),
            is_admin: u.is_admin,
            created_at: u.created_at,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: Username,
    pub nickname: Nickname,
    pub password_hash: String,
    pub is_admin: bool,
}

/// Resort record. `picture` is relative to the static directory.
#[derive(Debug, Clone, PartialEq)]
pub struct Resort {
    pub id: i64,
    pub country: String,
    pub state: Option<String>,
    pub city: Option<String>,
    pub county: Option<String>,
    pub resort_name: String,
    pub resort_type: ResortType,
    pub picture: Option<String>,
    pub creator_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewResort {
    pub draft: ResortDraft,
    pub picture: Option<String>,
    pub creator_id: Option<i64>,
}

/// One row of `user_resorts`
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Review {
    pub id: i64,
    pub user_id: i64,
    pub resort_id: i64,
    pub recommendation: Option<i32>,
    pub expenditure: Option<f64>,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewReview {
    pub user_id: i64,
    pub draft: ReviewDraft,
}

/// Review joined with the reviewer's nickname (resort detail page)
#[derive(Debug, Clone, FromRow)]
pub struct ResortReview {
    pub id: i64,
    pub user_id: i64,
    pub nickname: String,
    pub recommendation: Option<i32>,
    pub expenditure: Option<f64>,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Review joined with the resort name (profile page)
#[derive(Debug, Clone, FromRow)]
pub struct UserReview {
    pub id: i64,
    pub resort_id: i64,
    pub resort_name: String,
    pub recommendation: Option<i32>,
    pub expenditure: Option<f64>,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Resort with its aggregate score.
///
/// `avg_score` is the mean of non-null recommendations and is `None` when
/// the resort has no rated review.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedResort {
    pub resort: Resort,
    pub avg_score: Option<f64>,
    pub rating_count: i64,
}

/// Server-side login session
#[derive(Debug, Clone, FromRow)]
pub struct Session {
    pub token: String,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}
