//! # Ranque DB
//!
//! Credential and role stores for the Ranque API.
//!
//! - [`store`]: the [`UserStore`] and [`RoleStore`] capabilities
//! - [`memory`]: an in-memory implementation of both
//! - [`postgres`]: a PostgreSQL implementation of both, using SQLx
//!
//! # Example
//!
//! ```ignore
//! use ranque_db::{PgStore, init_db_pool};
//!
//! let pool = init_db_pool(&database_url).await?;
//! let store = PgStore::new(pool);
//! store.migrate().await?;
//! ```

pub mod memory;
pub mod postgres;
pub mod store;

use ranque_core::AppError;

// Re-export commonly used types at crate root
pub use memory::MemoryStore;
pub use postgres::PgStore;
pub use sqlx::PgPool;
pub use store::{RoleStore, UserStore};

/// Connects a PostgreSQL pool.
///
/// # Errors
///
/// Returns [`AppError::Persistence`] if the connection cannot be established.
pub async fn init_db_pool(database_url: &str) -> Result<PgPool, AppError> {
    sqlx::postgres::PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await
        .map_err(AppError::persistence)
}
