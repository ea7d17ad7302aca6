//! The public client facade.
//!
//! [`Client`] hides the backend behind the [`Driver`] seam: `connect`
//! classifies the locator and opens the matching driver, `execute` runs a
//! single statement, `batch` runs an ordered group under one exclusive
//! hold of the backend connection.

use std::sync::Arc;

use tracing::{info, instrument};

use crate::config::{Backend, DbUrl};
use crate::driver::{Driver, SqliteDriver};
use crate::error::{ClientError, Result};
use crate::result::ResultSet;
use crate::statement::Statement;

/// Handle to one database, backed by whichever driver its locator named.
///
/// Cloning is cheap and clones share the same driver (and therefore the
/// same serialization gate).
#[derive(Clone)]
pub struct Client {
    driver: Arc<dyn Driver>,
}

// The driver is a trait object and has no Debug of its own.
impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client").finish_non_exhaustive()
    }
}

impl Client {
    /// Connect to the database named by `url`.
    ///
    /// `file:` URLs and bare paths open the embedded SQLite driver; the
    /// open happens on the blocking pool so the caller's scheduler is not
    /// stalled by file I/O. Remote schemes (`http`, `https`, `ws`, `wss`)
    /// are recognized but this build ships no driver for them.
    pub async fn connect(url: impl AsRef<str>) -> Result<Self> {
        let db_url = DbUrl::parse(url.as_ref())?;
        match db_url.backend() {
            Backend::File => {
                let locator = db_url.as_str().to_string();
                let driver =
                    tokio::task::spawn_blocking(move || SqliteDriver::open(locator)).await??;
                info!(url = %db_url, "client connected");
                Ok(Self::from_driver(Arc::new(driver)))
            }
            Backend::Http | Backend::Ws => Err(ClientError::UnsupportedScheme {
                scheme: db_url.scheme().to_string(),
            }),
        }
    }

    /// Wrap an already-constructed driver.
    ///
    /// This is the seam for backends `connect` does not dispatch to, and
    /// for drivers configured beyond what a locator can express (for
    /// example [`SqliteDriver::open_with_runtime`]).
    pub fn from_driver(driver: Arc<dyn Driver>) -> Self {
        Self { driver }
    }

    /// Execute one statement and return its result set.
    #[instrument(skip(self, stmt))]
    pub async fn execute(&self, stmt: impl Into<Statement>) -> Result<ResultSet> {
        let mut results = self.driver.batch(vec![stmt.into()]).await?;
        match results.pop() {
            Some(last) if results.is_empty() => Ok(last),
            _ => Err(ClientError::Internal(
                "driver returned a result count other than one for a single statement".to_string(),
            )),
        }
    }

    /// Execute `stmts` in order as one batch.
    ///
    /// Batches from concurrent callers are serialized; statements of two
    /// batches never interleave. On the first failing statement the whole
    /// call fails with the engine's message and no result sets.
    #[instrument(skip(self, stmts), fields(statements = stmts.len()))]
    pub async fn batch(&self, stmts: Vec<Statement>) -> Result<Vec<ResultSet>> {
        self.driver.batch(stmts).await
    }

    /// Close the database, releasing its connection.
    ///
    /// Waits for an in-flight batch to finish first; batches submitted
    /// after the close fail fast. Closing twice is fine.
    #[instrument(skip(self))]
    pub async fn close(&self) -> Result<()> {
        self.driver.close().await
    }
}
