//! Driver profile lookups.
//!
//! The watcher only ever needs a single exact-match lookup, so the trait
//! surface is kept to that one call. Tests substitute an in-memory fake.

use crate::entities::driver_profile::DriverProfile;
use async_trait::async_trait;
use sqlx::PgPool;
use thiserror::Error;

/// Errors raised by profile lookups.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database error
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Read-only access to driver profiles.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Look up the unique profile whose identifier equals `email`.
    ///
    /// Returns `Ok(None)` when no such profile exists.
    async fn find_by_email(&self, email: &str) -> Result<Option<DriverProfile>, StoreError>;
}

/// Postgres-backed profile store.
pub struct PgProfileStore {
    pool: PgPool,
}

impl PgProfileStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProfileStore for PgProfileStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<DriverProfile>, StoreError> {
        Ok(DriverProfile::get_by_email(&self.pool, email).await?)
    }
}
