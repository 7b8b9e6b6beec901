//! Advertisements repository for database operations
//!
//! Advertisement CRUD belongs to another service; the booking flow
//! only needs the listing -> handling-agent lookup.

use sqlx::{Pool, Postgres};

use crate::error::{AppError, AppResult};

#[derive(Clone)]
pub struct AdvertisementsRepository {
    pool: Pool<Postgres>,
}

impl AdvertisementsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Resolve the agent handling an advertisement
    pub async fn owner_agent_id(&self, advertisement_id: i32) -> AppResult<i32> {
        sqlx::query_scalar::<_, i32>("SELECT agent_id FROM advertisements WHERE id = $1")
            .bind(advertisement_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "Advertisement with id {} not found",
                    advertisement_id
                ))
            })
    }
}
