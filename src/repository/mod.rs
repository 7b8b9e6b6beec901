//! Repository layer for database operations

pub mod advertisements;
pub mod appointments;

use sqlx::{Pool, Postgres};

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub appointments: appointments::AppointmentsRepository,
    pub advertisements: advertisements::AdvertisementsRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            appointments: appointments::AppointmentsRepository::new(pool.clone()),
            advertisements: advertisements::AdvertisementsRepository::new(pool.clone()),
            pool,
        }
    }
}
