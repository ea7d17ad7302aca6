//! The backend driver seam.
//!
//! Every backend (embedded SQLite today; remote transports plug in here)
//! implements [`Driver`], giving the [`Client`](crate::client::Client) a
//! uniform batch-oriented interface to execute statements against.

use async_trait::async_trait;

use crate::error::Result;
use crate::result::ResultSet;
use crate::statement::Statement;

pub mod sqlite;

pub use sqlite::SqliteDriver;

/// A database backend capable of executing statement batches.
#[async_trait]
pub trait Driver: Send + Sync {
    /// Execute `stmts` in order as one batch.
    ///
    /// On success the returned sequence has exactly one [`ResultSet`] per
    /// statement, in submission order. On the first failing statement the
    /// whole call fails and no result sets are returned.
    async fn batch(&self, stmts: Vec<Statement>) -> Result<Vec<ResultSet>>;

    /// Release the backend's resources.
    async fn close(&self) -> Result<()>;
}
