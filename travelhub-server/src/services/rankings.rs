//! Ranked resort listings and detail pages

use std::sync::Arc;

use travelhub_core::models::Window;

use super::ServiceError;
use crate::store::{RankedResort, ResortReview, Store, UserReview};

/// A resort with its aggregate and every review, newest first
#[derive(Debug, Clone)]
pub struct ResortDetail {
    pub ranked: RankedResort,
    pub reviews: Vec<ResortReview>,
}

#[derive(Clone)]
pub struct Rankings {
    store: Arc<dyn Store>,
}

impl Rankings {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// `None` lists every resort.
    pub async fn ranked(&self, window: Option<Window>) -> Result<Vec<RankedResort>, ServiceError> {
        Ok(self.store.ranked_resorts(window).await?)
    }

    pub async fn detail(&self, resort_id: i64) -> Result<ResortDetail, ServiceError> {
        let ranked = self
            .store
            .ranked_resort(resort_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound {
                resource: "resort",
                id: resort_id.to_string(),
            })?;
        let reviews = self.store.reviews_for_resort(resort_id).await?;
        Ok(ResortDetail { ranked, reviews })
    }

    pub async fn reviews_by_user(&self, user_id: i64) -> Result<Vec<UserReview>, ServiceError> {
        Ok(self.store.reviews_by_user(user_id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryStore, NewResort, NewReview, NewUser};
    use travelhub_core::models::{
        Nickname, ResortDraft, ResortInput, ReviewDraft, Username,
    };

    async fn seed_user(store: &MemoryStore, name: &str) -> i64 {
        store
            .create_user(NewUser {
                username: Username::new(name).unwrap(),
                nickname: Nickname::new(name).unwrap(),
                password_hash: "x".into(),
                is_admin: false,
            })
            .await
            .unwrap()
            .id
    }

    async fn seed_resort(store: &MemoryStore, user_id: i64, name: &str, score: Option<i32>) -> i64 {
        let (resort, _) = store
            .create_resort_with_review(
                NewResort {
                    draft: ResortDraft::new(&ResortInput {
                        country: "Norway".into(),
                        resort_name: name.into(),
                        resort_type: "Mountain".into(),
                        ..Default::default()
                    })
                    .unwrap(),
                    picture: None,
                    creator_id: Some(user_id),
                },
                NewReview {
                    user_id,
                    draft: ReviewDraft {
                        recommendation: score,
                        ..Default::default()
                    },
                },
            )
            .await
            .unwrap();
        resort.id
    }

    #[tokio::test]
    async fn average_of_four_and_six_is_five() {
        let store = Arc::new(MemoryStore::new());
        let alice = seed_user(&store, "alice").await;
        let bob = seed_user(&store, "bob").await;
        let resort = seed_resort(&store, alice, "Geilo", Some(4)).await;
        store
            .add_review(
                resort,
                NewReview {
                    user_id: bob,
                    draft: ReviewDraft {
                        recommendation: Some(6),
                        ..Default::default()
                    },
                },
            )
            .await
            .unwrap();

        let rankings = Rankings::new(store);
        let detail = rankings.detail(resort).await.unwrap();
        assert_eq!(detail.ranked.avg_score, Some(5.0));
        assert_eq!(detail.ranked.rating_count, 2);
        assert_eq!(detail.reviews.len(), 2);
        assert_eq!(detail.reviews[0].nickname, "bob");
    }

    #[tokio::test]
    async fn unrated_resort_is_listed_last_with_null_score() {
        let store = Arc::new(MemoryStore::new());
        let alice = seed_user(&store, "alice").await;
        let unrated = seed_resort(&store, alice, "Quiet", None).await;
        let rated = seed_resort(&store, alice, "Busy", Some(2)).await;

        let ranked = Rankings::new(store).ranked(None).await.unwrap();
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].resort.id, rated);
        assert_eq!(ranked[1].resort.id, unrated);
        assert_eq!(ranked[1].avg_score, None);
        assert_eq!(ranked[1].rating_count, 0);
    }

    #[tokio::test]
    async fn unknown_resort_is_not_found() {
        let rankings = Rankings::new(Arc::new(MemoryStore::new()));
        let err = rankings.detail(404).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound { resource: "resort", .. }));
    }

    #[tokio::test]
    async fn profile_lists_own_reviews() {
        let store = Arc::new(MemoryStore::new());
        let alice = seed_user(&store, "alice").await;
        let bob = seed_user(&store, "bob").await;
        seed_resort(&store, alice, "First", Some(7)).await;
        seed_resort(&store, alice, "Second", None).await;
        seed_resort(&store, bob, "Other", Some(1)).await;

        let mine = Rankings::new(store).reviews_by_user(alice).await.unwrap();
        let names: Vec<&str> = mine.iter().map(|r| r.resort_name.as_str()).collect();
        assert_eq!(names, vec!["Second", "First"]);
    }
}
