//! Resort submission and follow-up reviews

use std::sync::Arc;

use travelhub_core::models::{ResortDraft, ResortInput, ReviewDraft, ReviewInput};

use super::ServiceError;
use crate::store::{NewResort, NewReview, Resort, Review, Store};
use crate::uploads::{PictureUpload, UploadStore};

/// Everything the profile form posts
#[derive(Debug, Clone, Default)]
pub struct ReviewSubmission {
    pub resort: ResortInput,
    pub review: ReviewInput,
    pub picture: Option<PictureUpload>,
}

#[derive(Clone)]
pub struct Reviews {
    store: Arc<dyn Store>,
    uploads: UploadStore,
}

impl Reviews {
    pub fn new(store: Arc<dyn Store>, uploads: UploadStore) -> Self {
        Self { store, uploads }
    }

    /// Create a resort with the submitter's review.
    ///
    /// Input is validated before anything touches disk. If persisting
    /// fails the stored picture is removed again.
    pub async fn submit(
        &self,
        user_id: i64,
        submission: ReviewSubmission,
    ) -> Result<(Resort, Review), ServiceError> {
        let resort_draft = ResortDraft::new(&submission.resort)?;
        let review_draft = ReviewDraft::new(&submission.review)?;

        let picture = match &submission.picture {
            Some(upload) => self.uploads.save(upload).await?,
            None => None,
        };

        let result = self
            .store
            .create_resort_with_review(
                NewResort {
                    draft: resort_draft,
                    picture: picture.clone(),
                    creator_id: Some(user_id),
                },
                NewReview {
                    user_id,
                    draft: review_draft,
                },
            )
            .await;

        match result {
            Ok((resort, review)) => {
                tracing::info!(
                    user_id,
                    resort_id = resort.id,
                    review_id = review.id,
                    picture = resort.picture.as_deref().unwrap_or("-"),
                    "resort submitted"
                );
                Ok((resort, review))
            }
            Err(e) => {
                tracing::error!(user_id, error = %e, "resort submission failed");
                if let Some(path) = &picture {
                    if let Err(io) = self.uploads.remove(path).await {
                        tracing::warn!(picture = %path, error = %io, "could not remove orphaned picture");
                    }
                }
                Err(e.into())
            }
        }
    }

    /// Add another review to an existing resort.
    pub async fn add_review(
        &self,
        resort_id: i64,
        user_id: i64,
        input: &ReviewInput,
    ) -> Result<Review, ServiceError> {
        let draft = ReviewDraft::new(input)?;
        let review = self
            .store
            .add_review(resort_id, NewReview { user_id, draft })
            .await?;
        tracing::info!(user_id, resort_id, review_id = review.id, "review added");
        Ok(review)
    }
}
