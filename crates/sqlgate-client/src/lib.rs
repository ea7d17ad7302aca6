//! # sqlgate-client
//!
//! Unified SQL client with a serialized embedded SQLite driver.
//!
//! Provides an async [`Client`] over a pluggable [`Driver`] seam. The
//! embedded driver owns its `rusqlite` connection exclusively, runs every
//! batch on the blocking pool, and serializes concurrent batches through
//! an async gate so statements of two batches never interleave.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Client (execute / batch / close)       │
//! ├─────────────────────────────────────────┤
//! │  Driver trait (async seam)              │
//! ├─────────────────────────────────────────┤
//! │  SqliteDriver                           │
//! │    gate: Mutex<Option<Connection>>      │
//! │    work: spawn_blocking per batch       │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Quick start
//!
//! ```ignore
//! use sqlgate_client::{Client, Statement, Value};
//!
//! let client = Client::connect("file:app.db").await?;
//! client.execute("CREATE TABLE t (x INTEGER, y TEXT)").await?;
//! client
//!     .execute(Statement::with_params(
//!         "INSERT INTO t VALUES (?, ?)",
//!         vec![Value::from(1), Value::from("one")],
//!     ))
//!     .await?;
//! let rs = client.execute("SELECT x, y FROM t").await?;
//! assert_eq!(rs.rows()[0]["y"], Value::from("one"));
//! client.close().await?;
//! ```

pub mod client;
pub mod config;
pub mod driver;
pub mod error;
pub mod result;
pub mod statement;
pub mod value;

// ── re-exports ───────────────────────────────────────────────────────

pub use client::Client;
pub use config::{Backend, DbUrl};
pub use driver::{Driver, SqliteDriver};
pub use error::{ClientError, Result};
pub use result::{ResultSet, Row};
pub use statement::{Params, Statement};
pub use value::Value;
