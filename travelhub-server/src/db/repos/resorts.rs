//! Resort and review repository
//!
//! - create_with_review: resort + first review in one transaction
//! - ranked: LEFT JOIN aggregate, unrated resorts sort last (no N+1)

use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use travelhub_core::models::{ResortType, Window};

use super::map_reference;

use crate::store::{
    NewResort, NewReview, RankedResort, Resort, ResortReview, Review, StoreError, UserReview,
};

const REVIEW_COLUMNS: &str =
    "id, user_id, resort_id, recommendation, expenditure, comment, created_at";

/// Aggregate over every resort. `avg_score` is NULL when no review carries
/// a rating; NULLS LAST keeps those after every rated resort.
const RANKED_SELECT: &str = r#"
    SELECT
        r.id, r.country, r.state, r.city, r.county, r.resort_name,
        r.resort_type, r.picture, r.creator_id, r.created_at,
        AVG(ur.recommendation)::float8 AS avg_score,
        COUNT(ur.recommendation) AS rating_count
    FROM resorts r
    LEFT JOIN user_resorts ur ON ur.resort_id = r.id
"#;

const RANKED_GROUP: &str = r#"
    GROUP BY r.id
    ORDER BY avg_score DESC NULLS LAST, r.id
"#;

/// Resort columns are read by name so the same mapper serves plain and
/// aggregated queries.
fn resort_from_row(row: &PgRow) -> Result<Resort, StoreError> {
    let id: i64 = row.try_get("id")?;
    let raw_type: String = row.try_get("resort_type")?;
    let resort_type: ResortType = raw_type
        .parse()
        .map_err(|_| StoreError::Corrupt(format!("resort {id} has unknown type '{raw_type}'")))?;

    Ok(Resort {
        id,
        country: row.try_get("country")?,
        state: row.try_get("state")?,
        city: row.try_get("city")?,
        county: row.try_get("county")?,
        resort_name: row.try_get("resort_name")?,
        resort_type,
        picture: row.try_get("picture")?,
        creator_id: row.try_get("creator_id")?,
        created_at: row.try_get("created_at")?,
    })
}

fn ranked_from_row(row: &PgRow) -> Result<RankedResort, StoreError> {
    Ok(RankedResort {
        resort: resort_from_row(row)?,
        avg_score: row.try_get("avg_score")?,
        rating_count: row.try_get("rating_count")?,
    })
}

pub struct ResortRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> ResortRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert a resort and its first review atomically.
    ///
    /// Any failure rolls the transaction back, so a resort never exists
    /// without the review that introduced it.
    pub async fn create_with_review(
        &self,
        resort: NewResort,
        review: NewReview,
    ) -> Result<(Resort, Review), StoreError> {
        let mut tx = self.pool.begin().await?;

        let draft = resort.draft;
        let row = sqlx::query(
            r#"
            INSERT INTO resorts
                (country, state, city, county, resort_name, resort_type, picture, creator_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, country, state, city, county, resort_name,
                      resort_type, picture, creator_id, created_at
            "#,
        )
        .bind(&draft.country)
        .bind(&draft.state)
        .bind(&draft.city)
        .bind(&draft.county)
        .bind(&draft.resort_name)
        .bind(draft.resort_type.as_str())
        .bind(&resort.picture)
        .bind(resort.creator_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_reference)?;
        let created = resort_from_row(&row)?;

        let review: Review = sqlx::query_as(&format!(
            "INSERT INTO user_resorts (user_id, resort_id, recommendation, expenditure, comment) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {REVIEW_COLUMNS}"
        ))
        .bind(review.user_id)
        .bind(created.id)
        .bind(review.draft.recommendation)
        .bind(review.draft.expenditure)
        .bind(&review.draft.comment)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_reference)?;

        tx.commit().await?;
        Ok((created, review))
    }

    /// Append a review to an existing resort.
    pub async fn add_review(&self, resort_id: i64, review: NewReview) -> Result<Review, StoreError> {
        let mut tx = self.pool.begin().await?;

        let (exists,): (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM resorts WHERE id = $1)")
                .bind(resort_id)
                .fetch_one(&mut *tx)
                .await?;
        if !exists {
            return Err(StoreError::not_found("resort", resort_id));
        }

        let review: Review = sqlx::query_as(&format!(
            "INSERT INTO user_resorts (user_id, resort_id, recommendation, expenditure, comment) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {REVIEW_COLUMNS}"
        ))
        .bind(review.user_id)
        .bind(resort_id)
        .bind(review.draft.recommendation)
        .bind(review.draft.expenditure)
        .bind(&review.draft.comment)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_reference)?;

        tx.commit().await?;
        Ok(review)
    }

    /// Ranked listing. `None` returns every resort (NULL LIMIT means all).
    pub async fn ranked(&self, window: Option<Window>) -> Result<Vec<RankedResort>, StoreError> {
        let (limit, offset) = match window {
            Some(w) => (Some(i64::from(w.limit)), i64::try_from(w.offset).unwrap_or(i64::MAX)),
            None => (None, 0),
        };

        let rows = sqlx::query(&format!("{RANKED_SELECT} {RANKED_GROUP} LIMIT $1 OFFSET $2"))
            .bind(limit)
            .bind(offset)
            .fetch_all(self.pool)
            .await?;

        rows.iter().map(ranked_from_row).collect()
    }

    pub async fn ranked_one(&self, resort_id: i64) -> Result<Option<RankedResort>, StoreError> {
        let row = sqlx::query(&format!("{RANKED_SELECT} WHERE r.id = $1 {RANKED_GROUP}"))
            .bind(resort_id)
            .fetch_optional(self.pool)
            .await?;

        row.as_ref().map(ranked_from_row).transpose()
    }

    /// Reviews of one resort with reviewer nicknames, newest first.
    pub async fn reviews_for_resort(&self, resort_id: i64) -> Result<Vec<ResortReview>, StoreError> {
        Ok(sqlx::query_as::<_, ResortReview>(
            r#"
            SELECT ur.id, ur.user_id, u.nickname, ur.recommendation,
                   ur.expenditure, ur.comment, ur.created_at
            FROM user_resorts ur
            JOIN users u ON u.id = ur.user_id
            WHERE ur.resort_id = $1
            ORDER BY ur.created_at DESC, ur.id DESC
            "#,
        )
        .bind(resort_id)
        .fetch_all(self.pool)
        .await?)
    }

    /// Reviews written by one user with resort names, newest first.
    pub async fn reviews_by_user(&self, user_id: i64) -> Result<Vec<UserReview>, StoreError> {
        Ok(sqlx::query_as::<_, UserReview>(
            r#"
            SELECT ur.id, ur.resort_id, r.resort_name, ur.recommendation,
                   ur.expenditure, ur.comment, ur.created_at
            FROM user_resorts ur
            JOIN resorts r ON r.id = ur.resort_id
            WHERE ur.user_id = $1
            ORDER BY ur.created_at DESC, ur.id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await?)
    }
}
