//! In-memory store
//!
//! Same contract as the PostgreSQL backend, tables behind one
//! `tokio::sync::Mutex` so every operation is atomic.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use travelhub_core::models::Window;

use super::{
    NewResort, NewReview, NewUser, RankedResort, Resort, ResortReview, Review, Session, Store,
    StoreError, User, UserReview,
};

#[derive(Default)]
struct Tables {
    users: BTreeMap<i64, User>,
    resorts: BTreeMap<i64, Resort>,
    reviews: BTreeMap<i64, Review>,
    sessions: BTreeMap<String, Session>,
    next_user_id: i64,
    next_resort_id: i64,
    next_review_id: i64,
}

impl Tables {
    fn insert_review(&mut self, resort_id: i64, review: NewReview) -> Review {
        self.next_review_id += 1;
        let row = Review {
            id: self.next_review_id,
            user_id: review.user_id,
            resort_id,
            recommendation: review.draft.recommendation,
            expenditure: review.draft.expenditure,
            comment: review.draft.comment,
            created_at: Utc::now(),
        };
        self.reviews.insert(row.id, row.clone());
        row
    }

    fn rank(&self, resort: &Resort) -> RankedResort {
        let ratings: Vec<i32> = self
            .reviews
            .values()
            .filter(|r| r.resort_id == resort.id)
            .filter_map(|r| r.recommendation)
            .collect();

        let avg_score = if ratings.is_empty() {
            None
        } else {
            let sum: f64 = ratings.iter().map(|&r| f64::from(r)).sum();
            Some(sum / ratings.len() as f64)
        };

        RankedResort {
            resort: resort.clone(),
            avg_score,
            rating_count: ratings.len() as i64,
        }
    }

    fn require_user(&self, user_id: i64) -> Result<(), StoreError> {
        if self.users.contains_key(&user_id) {
            Ok(())
        } else {
            Err(StoreError::MissingReference(format!("user {user_id}")))
        }
    }
}

/// Score descending, unrated last, then id ascending.
fn ranking_order(a: &RankedResort, b: &RankedResort) -> Ordering {
    match (a.avg_score, b.avg_score) {
        (Some(x), Some(y)) => y.total_cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
    .then(a.resort.id.cmp(&b.resort.id))
}

#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    fn backend_tag(&self) -> &'static str {
        "memory"
    }

    async fn create_user(&self, user: NewUser) -> Result<User, StoreError> {
        let mut t = self.tables.lock().await;
        if t.users.values().any(|u| u.username == user.username.as_str()) {
            return Err(StoreError::Conflict(format!(
                "username '{}' already exists",
                user.username
            )));
        }

        t.next_user_id += 1;
        let row = User {
            id: t.next_user_id,
            username: user.username.into_string(),
            nickname: user.nickname.into_string(),
            password_hash: user.password_hash,
            is_admin: user.is_admin,
            created_at: Utc::now(),
        };
        t.users.insert(row.id, row.clone());
        Ok(row)
    }

    async fn user_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let t = self.tables.lock().await;
        Ok(t.users.values().find(|u| u.username == username).cloned())
    }

    async fn user_by_id(&self, id: i64) -> Result<Option<User>, StoreError> {
        Ok(self.tables.lock().await.users.get(&id).cloned())
    }

    async fn set_admin(&self, user_id: i64, is_admin: bool) -> Result<(), StoreError> {
        let mut t = self.tables.lock().await;
        let user = t
            .users
            .get_mut(&user_id)
            .ok_or_else(|| StoreError::not_found("user", user_id))?;
        user.is_admin = is_admin;
        Ok(())
    }

    async fn list_users(&self) -> Result<Vec<User>, StoreError> {
        Ok(self.tables.lock().await.users.values().cloned().collect())
    }

    async fn create_resort_with_review(
        &self,
        resort: NewResort,
        review: NewReview,
    ) -> Result<(Resort, Review), StoreError> {
        let mut t = self.tables.lock().await;
        // Validate every reference before the first write
        t.require_user(review.user_id)?;
        if let Some(creator) = resort.creator_id {
            t.require_user(creator)?;
        }

        t.next_resort_id += 1;
        let draft = resort.draft;
        let row = Resort {
            id: t.next_resort_id,
            country: draft.country,
            state: draft.state,
            city: draft.city,
            county: draft.county,
            resort_name: draft.resort_name,
            resort_type: draft.resort_type,
            picture: resort.picture,
            creator_id: resort.creator_id,
            created_at: Utc::now(),
        };
        t.resorts.insert(row.id, row.clone());
        let review = t.insert_review(row.id, review);
        Ok((row, review))
    }

    async fn add_review(&self, resort_id: i64, review: NewReview) -> Result<Review, StoreError> {
        let mut t = self.tables.lock().await;
        if !t.resorts.contains_key(&resort_id) {
            return Err(StoreError::not_found("resort", resort_id));
        }
        t.require_user(review.user_id)?;
        Ok(t.insert_review(resort_id, review))
    }

    async fn ranked_resorts(
        &self,
        window: Option<Window>,
    ) -> Result<Vec<RankedResort>, StoreError> {
        let t = self.tables.lock().await;
        let mut ranked: Vec<RankedResort> = t.resorts.values().map(|r| t.rank(r)).collect();
        ranked.sort_by(ranking_order);

        Ok(match window {
            Some(w) => {
                let range = w.range(ranked.len());
                ranked.drain(range).collect()
            }
            None => ranked,
        })
    }

    async fn ranked_resort(&self, resort_id: i64) -> Result<Option<RankedResort>, StoreError> {
        let t = self.tables.lock().await;
        Ok(t.resorts.get(&resort_id).map(|r| t.rank(r)))
    }

    async fn reviews_for_resort(&self, resort_id: i64) -> Result<Vec<ResortReview>, StoreError> {
        let t = self.tables.lock().await;
        Ok(t.reviews
            .values()
            .rev()
            .filter(|r| r.resort_id == resort_id)
            .map(|r| ResortReview {
                id: r.id,
                user_id: r.user_id,
                nickname: t
                    .users
                    .get(&r.user_id)
                    .map(|u| u.nickname.clone())
                    .unwrap_or_default(),
                recommendation: r.recommendation,
                expenditure: r.expenditure,
                comment: r.comment.clone(),
                created_at: r.created_at,
            })
            .collect())
    }

    async fn reviews_by_user(&self, user_id: i64) -> Result<Vec<UserReview>, StoreError> {
        let t = self.tables.lock().await;
        Ok(t.reviews
            .values()
            .rev()
            .filter(|r| r.user_id == user_id)
            .map(|r| UserReview {
                id: r.id,
                resort_id: r.resort_id,
                resort_name: t
                    .resorts
                    .get(&r.resort_id)
                    .map(|res| res.resort_name.clone())
                    .unwrap_or_default(),
                recommendation: r.recommendation,
                expenditure: r.expenditure,
                comment: r.comment.clone(),
                created_at: r.created_at,
            })
            .collect())
    }

    async fn create_session(&self, session: Session) -> Result<(), StoreError> {
        let mut t = self.tables.lock().await;
        t.require_user(session.user_id)?;
        if t.sessions.contains_key(&session.token) {
            return Err(StoreError::Conflict("session token collision".into()));
        }
        t.sessions.insert(session.token.clone(), session);
        Ok(())
    }

    async fn session(&self, token: &str) -> Result<Option<Session>, StoreError> {
        Ok(self.tables.lock().await.sessions.get(token).cloned())
    }

    async fn delete_session(&self, token: &str) -> Result<(), StoreError> {
        self.tables.lock().await.sessions.remove(token);
        Ok(())
    }

    async fn purge_expired_sessions(&self, now: DateTime<Utc>) -> Result<u64, StoreError> {
        let mut t = self.tables.lock().await;
        let before = t.sessions.len();
        t.sessions.retain(|_, s| !s.is_expired(now));
        Ok((before - t.sessions.len()) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use travelhub_core::models::{
        Nickname, ResortDraft, ResortInput, ResortType, ReviewDraft, Username,
    };

    async fn user(store: &MemoryStore, name: &str) -> User {
        store
            .create_user(NewUser {
                username: Username::new(name).unwrap(),
                nickname: Nickname::new(name).unwrap(),
                password_hash: "x".into(),
                is_admin: false,
            })
            .await
            .unwrap()
    }

    fn resort(name: &str) -> NewResort {
        NewResort {
            draft: ResortDraft::new(&ResortInput {
                country: "Italy".into(),
                resort_name: name.into(),
                resort_type: "Lake".into(),
                ..Default::default()
            })
            .unwrap(),
            picture: None,
            creator_id: None,
        }
    }

    fn rating(user_id: i64, score: Option<i32>) -> NewReview {
        NewReview {
            user_id,
            draft: ReviewDraft {
                recommendation: score,
                ..Default::default()
            },
        }
    }

    #[tokio::test]
    async fn duplicate_username_conflicts() {
        let store = MemoryStore::new();
        user(&store, "alice").await;
        let err = store
            .create_user(NewUser {
                username: Username::new("alice").unwrap(),
                nickname: Nickname::new("Other").unwrap(),
                password_hash: "y".into(),
                is_admin: false,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
    }

    #[tokio::test]
    async fn failed_insert_leaves_no_resort() {
        let store = MemoryStore::new();
        let err = store
            .create_resort_with_review(resort("Como"), rating(42, Some(5)))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::MissingReference(_)));
        assert!(store.ranked_resorts(None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn ranking_puts_unrated_last_and_breaks_ties_by_id() {
        let store = MemoryStore::new();
        let u = user(&store, "alice").await;

        let (unrated, _) = store
            .create_resort_with_review(resort("Unrated"), rating(u.id, None))
            .await
            .unwrap();
        let (low, _) = store
            .create_resort_with_review(resort("Low"), rating(u.id, Some(3)))
            .await
            .unwrap();
        let (high_a, _) = store
            .create_resort_with_review(resort("HighA"), rating(u.id, Some(9)))
            .await
            .unwrap();
        let (high_b, _) = store
            .create_resort_with_review(resort("HighB"), rating(u.id, Some(9)))
            .await
            .unwrap();

        let ids: Vec<i64> = store
            .ranked_resorts(None)
            .await
            .unwrap()
            .iter()
            .map(|r| r.resort.id)
            .collect();
        assert_eq!(ids, vec![high_a.id, high_b.id, low.id, unrated.id]);

        let window = store
            .ranked_resorts(Some(Window::new(1, 2)))
            .await
            .unwrap();
        assert_eq!(window.len(), 2);
        assert_eq!(window[0].resort.id, high_b.id);
        assert_eq!(window[1].resort.resort_type, ResortType::Lake);
    }

    #[tokio::test]
    async fn purge_drops_only_expired_sessions() {
        let store = MemoryStore::new();
        let u = user(&store, "alice").await;
        let now = Utc::now();
        for (token, offset) in [("old", -1), ("fresh", 1)] {
            store
                .create_session(Session {
                    token: token.into(),
                    user_id: u.id,
                    created_at: now,
                    expires_at: now + chrono::Duration::hours(offset),
                })
                .await
                .unwrap();
        }

        assert_eq!(store.purge_expired_sessions(now).await.unwrap(), 1);
        assert!(store.session("old").await.unwrap().is_none());
        assert!(store.session("fresh").await.unwrap().is_some());
    }
}
