//! Rating Submission Use Case

use std::sync::Arc;

use kernel::id::{StoreId, UserId};

use crate::domain::entity::rating::{RatingDetail, SubmitOutcome};
use crate::domain::repository::{RatingRepository, StoreRepository};
use crate::domain::value_object::rating_value::RatingValue;
use crate::error::{RatingError, RatingResult};

/// Submission input (already validated)
#[derive(Debug, Clone, Copy)]
pub struct SubmitRatingInput {
    pub user_id: UserId,
    pub store_id: StoreId,
    pub rating_value: RatingValue,
}

/// Rate a store. A second submission for the same store replaces the
/// caller's previous value in place.
pub struct SubmitRatingUseCase<R>
where
    R: StoreRepository + RatingRepository,
{
    repo: Arc<R>,
}

impl<R> SubmitRatingUseCase<R>
where
    R: StoreRepository + RatingRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn execute(
        &self,
        input: SubmitRatingInput,
    ) -> RatingResult<(RatingDetail, SubmitOutcome)> {
        if self.repo.find_by_id(input.store_id).await?.is_none() {
            return Err(RatingError::StoreNotFound);
        }

        let (id, outcome) = self
            .repo
            .upsert(input.user_id, input.store_id, input.rating_value)
            .await?;

        let detail = self
            .repo
            .find_detail(id)
            .await?
            .ok_or_else(|| RatingError::Internal(format!("rating {id} missing after upsert")))?;

        tracing::info!(
            rating_id = %id,
            user_id = %input.user_id,
            store_id = %input.store_id,
            value = %input.rating_value,
            outcome = ?outcome,
            "Rating saved"
        );

        Ok((detail, outcome))
    }
}
