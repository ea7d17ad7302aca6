//! Serialized driver for embedded SQLite databases.
//!
//! [`SqliteDriver`] is the sole owner of one `rusqlite::Connection` and
//! exposes it as a batch-oriented execution unit. An async mutex serializes
//! whole batches, and the blocking rusqlite work runs on a blocking thread
//! pool via `spawn_blocking`, so concurrent async tasks keep making
//! progress while a batch executes.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use rusqlite::{Connection, OpenFlags};
use tokio::runtime::Handle;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::driver::Driver;
use crate::error::{ClientError, Result};
use crate::result::ResultSet;
use crate::statement::{Params, Statement};
use crate::value::Value;

/// Driver for a single embedded SQLite connection.
///
/// The connection is created in autocommit mode and is never shared: every
/// batch (and `close`) first acquires the driver's async gate, then moves
/// the owned guard onto a blocking worker where the statements run. The
/// gate is released when the worker finishes, success or failure, so one
/// failed batch never wedges the next. Waiting callers suspend on the gate;
/// acquisition order is the FIFO fairness of `tokio::sync::Mutex` and is
/// not otherwise guaranteed.
///
/// A caller that drops its `batch` future after the worker has started
/// cannot stop the in-flight database work: the batch runs to completion on
/// the blocking pool and its outcome is discarded.
pub struct SqliteDriver {
    conn: Arc<Mutex<Option<Connection>>>,
    runtime: Option<Handle>,
}

impl SqliteDriver {
    /// Open (or create) a database at `locator`.
    ///
    /// The locator may be a plain path or a SQLite `file:` URI (the
    /// connection is opened with URI interpretation enabled, so
    /// `file:data.db?mode=ro` and `file::memory:` work as expected).
    ///
    /// This call blocks briefly (file I/O); call it during startup or wrap
    /// it in `spawn_blocking`, as [`Client::connect`](crate::Client::connect)
    /// does.
    pub fn open(locator: impl AsRef<Path>) -> Result<Self> {
        Self::open_inner(locator, None)
    }

    /// Open a database and dispatch its blocking work onto the blocking
    /// pool of `runtime` instead of the ambient runtime's.
    ///
    /// The driver borrows the runtime; it does not manage its lifecycle.
    pub fn open_with_runtime(locator: impl AsRef<Path>, runtime: Handle) -> Result<Self> {
        Self::open_inner(locator, Some(runtime))
    }

    /// Open a private in-memory database. Useful for tests.
    pub fn open_in_memory() -> Result<Self> {
        debug!("opening in-memory sqlite database");
        let conn = Connection::open_in_memory().map_err(|e| ClientError::Connect {
            locator: ":memory:".to_string(),
            message: e.to_string(),
        })?;
        Ok(Self::from_connection(conn, None))
    }

    fn open_inner(locator: impl AsRef<Path>, runtime: Option<Handle>) -> Result<Self> {
        let locator = locator.as_ref();
        // Mirrors the server-side open: URI interpretation on, SQLite's own
        // per-handle mutex off. The handle is still moved safely between
        // worker threads because the gate admits one batch at a time.
        let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
            | OpenFlags::SQLITE_OPEN_CREATE
            | OpenFlags::SQLITE_OPEN_URI
            | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        let conn = Connection::open_with_flags(locator, flags).map_err(|e| {
            ClientError::Connect {
                locator: locator.display().to_string(),
                message: e.to_string(),
            }
        })?;
        info!(locator = %locator.display(), "opened sqlite database");
        Ok(Self::from_connection(conn, runtime))
    }

    fn from_connection(conn: Connection, runtime: Option<Handle>) -> Self {
        Self {
            conn: Arc::new(Mutex::new(Some(conn))),
            runtime,
        }
    }

    /// Acquire the gate, then run `work` against the connection slot on a
    /// blocking worker. The owned guard moves into the worker closure, so
    /// the gate releases exactly when the work is done, panics included.
    async fn dispatch<T, F>(&self, work: F) -> Result<T>
    where
        F: FnOnce(&mut Option<Connection>) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let mut guard = Arc::clone(&self.conn).lock_owned().await;
        let task = move || work(&mut guard);
        match &self.runtime {
            Some(handle) => handle.spawn_blocking(task),
            None => tokio::task::spawn_blocking(task),
        }
        .await?
    }
}

#[async_trait]
impl Driver for SqliteDriver {
    async fn batch(&self, stmts: Vec<Statement>) -> Result<Vec<ResultSet>> {
        debug!(statements = stmts.len(), "dispatching batch");
        let results = self
            .dispatch(move |slot| {
                let conn = slot.as_ref().ok_or(ClientError::ConnectionClosed)?;
                run_batch(conn, &stmts)
            })
            .await?;
        debug!(result_sets = results.len(), "batch complete");
        Ok(results)
    }

    async fn close(&self) -> Result<()> {
        self.dispatch(|slot| match slot.take() {
            Some(conn) => conn.close().map_err(|(_, e)| response_error(e)),
            // Second close observes the empty slot; closing twice is fine.
            None => Ok(()),
        })
        .await?;
        info!("closed sqlite database");
        Ok(())
    }
}

// ── statement executor ───────────────────────────────────────────────

/// Execute `stmts` in order, translating rows into backend-neutral result
/// sets.
///
/// Runs only while the caller holds the driver's gate, so it is never
/// invoked concurrently with itself on the same connection.
fn run_batch(conn: &Connection, stmts: &[Statement]) -> Result<Vec<ResultSet>> {
    // A prior batch that failed mid-way may have left an implicit
    // transaction open; reset it so batches never observe each other's
    // transaction state. No-op in autocommit, since a bare ROLLBACK with
    // no open transaction is itself an error.
    if !conn.is_autocommit() {
        conn.execute_batch("ROLLBACK").map_err(response_error)?;
    }

    let mut result_sets = Vec::with_capacity(stmts.len());
    for stmt in stmts {
        result_sets.push(run_statement(conn, stmt)?);
    }
    Ok(result_sets)
}

/// Execute one statement and package its projection.
fn run_statement(conn: &Connection, stmt: &Statement) -> Result<ResultSet> {
    let mut prepared = conn.prepare(&stmt.sql).map_err(response_error)?;
    // Projection-order column names; empty for statements without one.
    let columns: Vec<String> = prepared
        .column_names()
        .iter()
        .map(|name| name.to_string())
        .collect();

    let mut rows = match &stmt.params {
        Params::Positional(values) => {
            prepared.query(rusqlite::params_from_iter(values.iter()))
        }
        Params::Named(pairs) => {
            let names: Vec<String> = pairs
                .iter()
                .map(|(name, _)| normalize_param_name(name))
                .collect();
            let bound: Vec<(&str, &dyn rusqlite::ToSql)> = names
                .iter()
                .zip(pairs.iter())
                .map(|(name, (_, value))| (name.as_str(), value as &dyn rusqlite::ToSql))
                .collect();
            prepared.query(bound.as_slice())
        }
    }
    .map_err(response_error)?;

    let mut values = Vec::new();
    while let Some(row) = rows.next().map_err(response_error)? {
        let mut record = Vec::with_capacity(columns.len());
        for i in 0..columns.len() {
            let v: rusqlite::types::Value = row.get(i).map_err(response_error)?;
            record.push(Value::from(v));
        }
        values.push(record);
    }
    Ok(ResultSet::new(columns, values))
}

/// Named parameters may be written without their SQLite prefix; default to
/// the `:` form the engine expects.
fn normalize_param_name(name: &str) -> String {
    match name.chars().next() {
        Some(':' | '@' | '$') => name.to_string(),
        _ => format!(":{name}"),
    }
}

/// Every engine failure in the execution path surfaces as one response
/// error carrying the engine's message.
fn response_error(err: rusqlite::Error) -> ClientError {
    ClientError::Response {
        message: err.to_string(),
    }
}

// ── tests ────────────────────────────────────────────────────────────
