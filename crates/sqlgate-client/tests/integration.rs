//! Integration tests for the sqlgate-client crate.
//!
//! These tests exercise the full client lifecycle against real SQLite
//! databases (in-memory and on disk via tempfile): single statements,
//! ordered batches, the serialization gate under concurrency, and the
//! close protocol.

use std::sync::Arc;

use sqlgate_client::{Client, ClientError, SqliteDriver, Statement, Value};

// ═══════════════════════════════════════════════════════════════════════
//  Single statement execution
// ═══════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn insert_then_select_round_trip() {
    let client = Client::connect(":memory:").await.unwrap();
    client
        .execute("CREATE TABLE users (id INTEGER, name TEXT)")
        .await
        .unwrap();

    client
        .batch(vec![
            Statement::with_params(
                "INSERT INTO users VALUES (?1, ?2)",
                vec![Value::from(1), Value::from("alice")],
            ),
            Statement::with_params(
                "INSERT INTO users VALUES (?1, ?2)",
                vec![Value::from(2), Value::from("bob")],
            ),
        ])
        .await
        .unwrap();

    let rs = client
        .execute("SELECT id, name FROM users ORDER BY id")
        .await
        .unwrap();
    assert_eq!(rs.columns(), ["id", "name"]);
    assert_eq!(rs.len(), 2);
    assert_eq!(rs.rows()[0]["id"], Value::from(1));
    assert_eq!(rs.rows()[0]["name"], Value::from("alice"));
    assert_eq!(rs.rows()[1]["id"], Value::from(2));
    assert_eq!(rs.rows()[1]["name"], Value::from("bob"));
}

#[tokio::test]
async fn writes_have_empty_projection() {
    let client = Client::connect(":memory:").await.unwrap();
    client
        .execute("CREATE TABLE t (n INTEGER)")
        .await
        .unwrap();

    let rs = client.execute("INSERT INTO t VALUES (1)").await.unwrap();
    assert!(rs.columns().is_empty());
    assert!(rs.is_empty());
}

#[tokio::test]
async fn named_params_bind_with_and_without_prefix() {
    let client = Client::connect(":memory:").await.unwrap();

    // One name supplied bare, one with its prefix; both must bind.
    let rs = client
        .execute(Statement::with_params(
            "SELECT :a AS a, @b AS b",
            vec![("a", Value::from(10)), ("@b", Value::from(20))],
        ))
        .await
        .unwrap();

    assert_eq!(rs.rows()[0]["a"], Value::from(10));
    assert_eq!(rs.rows()[0]["b"], Value::from(20));
}

#[tokio::test]
async fn column_name_and_position_agree() {
    let client = Client::connect(":memory:").await.unwrap();

    let rs = client
        .execute("SELECT 1 AS one, 'x' AS two")
        .await
        .unwrap();
    let row = &rs.rows()[0];
    assert_eq!(row.get(0), row.get_named("one"));
    assert_eq!(row.get(1), row.get_named("two"));
    assert_eq!(row[0], row["one"]);
    assert_eq!(row["two"], Value::from("x"));
}

// ═══════════════════════════════════════════════════════════════════════
//  Batch semantics
// ═══════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn batch_results_follow_statement_order() {
    let client = Client::connect(":memory:").await.unwrap();

    let results = client
        .batch(vec![
            "SELECT 1 AS n".into(),
            "SELECT 2 AS n".into(),
            "SELECT 3 AS n".into(),
        ])
        .await
        .unwrap();

    assert_eq!(results.len(), 3);
    for (i, rs) in results.iter().enumerate() {
        assert_eq!(rs.rows()[0]["n"], Value::from(i as i64 + 1));
    }
}

#[tokio::test]
async fn empty_batch_yields_no_results() {
    let client = Client::connect(":memory:").await.unwrap();
    let results = client.batch(Vec::new()).await.unwrap();
    assert!(results.is_empty());
}

#[tokio::test]
async fn failing_statement_fails_the_batch() {
    let client = Client::connect(":memory:").await.unwrap();
    client
        .execute("CREATE TABLE log (entry TEXT)")
        .await
        .unwrap();

    let err = client
        .batch(vec![
            Statement::new("INSERT INTO log VALUES ('first')"),
            Statement::new("SELECT * FROM no_such_table"),
            Statement::new("INSERT INTO log VALUES ('never')"),
        ])
        .await
        .unwrap_err();
    match err {
        ClientError::Response { message } => assert!(!message.is_empty()),
        other => panic!("expected Response, got {other:?}"),
    }

    // Autocommit mode: the statement before the failure already took
    // effect, and the one after it never ran.
    let rs = client.execute("SELECT entry FROM log").await.unwrap();
    assert_eq!(rs.len(), 1);
    assert_eq!(rs.rows()[0]["entry"], Value::from("first"));
}

#[tokio::test]
async fn stale_transaction_is_rolled_back() {
    let client = Client::connect(":memory:").await.unwrap();
    client
        .execute("CREATE TABLE acc (n INTEGER)")
        .await
        .unwrap();

    // This batch opens a transaction and then dies, leaving it open on
    // the connection.
    let err = client
        .batch(vec![
            Statement::new("BEGIN"),
            Statement::new("INSERT INTO acc VALUES (1)"),
            Statement::new("INSERT INTO missing VALUES (1)"),
        ])
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Response { .. }));

    // The next batch starts by rolling the leftover transaction back, so
    // the insert above is gone.
    let rs = client.execute("SELECT count(*) FROM acc").await.unwrap();
    assert_eq!(rs.rows()[0][0], Value::from(0));
}

// ═══════════════════════════════════════════════════════════════════════
//  Concurrency and the serialization gate
// ═══════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn concurrent_batches_never_interleave() {
    let client = Client::connect(":memory:").await.unwrap();
    client
        .execute("CREATE TABLE seq (tag INTEGER)")
        .await
        .unwrap();

    let writer = |tag: i64| {
        let client = client.clone();
        tokio::spawn(async move {
            let stmts = (0..40)
                .map(|_| {
                    Statement::with_params("INSERT INTO seq VALUES (?1)", vec![Value::from(tag)])
                })
                .collect();
            client.batch(stmts).await
        })
    };

    let a = writer(0);
    let b = writer(1);
    a.await.unwrap().unwrap();
    b.await.unwrap().unwrap();

    // Insertion order follows rowid. Two serialized batches must leave
    // exactly two contiguous runs of tags.
    let rs = client
        .execute("SELECT tag FROM seq ORDER BY rowid")
        .await
        .unwrap();
    let tags: Vec<i64> = rs
        .rows()
        .iter()
        .map(|row| row[0].as_integer().unwrap())
        .collect();
    assert_eq!(tags.len(), 80);
    let runs = 1 + tags.windows(2).filter(|w| w[0] != w[1]).count();
    assert_eq!(runs, 2, "batches interleaved: {tags:?}");
}

#[tokio::test]
async fn reader_sees_batches_atomically() {
    let client = Client::connect(":memory:").await.unwrap();
    client
        .execute("CREATE TABLE bulk (n INTEGER)")
        .await
        .unwrap();

    let writer = {
        let client = client.clone();
        tokio::spawn(async move {
            let stmts = (0..100)
                .map(|i| {
                    Statement::with_params("INSERT INTO bulk VALUES (?1)", vec![Value::from(i)])
                })
                .collect();
            client.batch(stmts).await
        })
    };

    // The count runs either before or after the whole write batch, never
    // in the middle of it.
    let rs = client.execute("SELECT count(*) FROM bulk").await.unwrap();
    let n = rs.rows()[0][0].as_integer().unwrap();
    assert!(n == 0 || n == 100, "reader observed a partial batch: {n}");

    writer.await.unwrap().unwrap();
}

// ═══════════════════════════════════════════════════════════════════════
//  Close lifecycle
// ═══════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn batch_after_close_fails_fast() {
    let client = Client::connect(":memory:").await.unwrap();
    client.close().await.unwrap();

    let err = client.execute("SELECT 1").await.unwrap_err();
    assert!(matches!(err, ClientError::ConnectionClosed));
}

#[tokio::test]
async fn close_is_idempotent() {
    let client = Client::connect(":memory:").await.unwrap();
    client.close().await.unwrap();
    client.close().await.unwrap();
}

#[tokio::test]
async fn close_races_with_inflight_batch() {
    let client = Client::connect(":memory:").await.unwrap();
    client
        .execute("CREATE TABLE r (n INTEGER)")
        .await
        .unwrap();

    let batch = {
        let client = client.clone();
        tokio::spawn(async move {
            let stmts = (0..200)
                .map(|i| Statement::with_params("INSERT INTO r VALUES (?1)", vec![Value::from(i)]))
                .collect();
            client.batch(stmts).await
        })
    };
    let close = {
        let client = client.clone();
        tokio::spawn(async move { client.close().await })
    };

    // The gate decides who goes first. Close always succeeds; the batch
    // either ran to completion before it or was rejected outright.
    close.await.unwrap().unwrap();
    match batch.await.unwrap() {
        Ok(results) => assert_eq!(results.len(), 200),
        Err(ClientError::ConnectionClosed) => {}
        Err(other) => panic!("unexpected error: {other}"),
    }
}

// ═══════════════════════════════════════════════════════════════════════
//  Locator handling
// ═══════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn connect_opens_on_disk_paths() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("gate.db");

    let client = Client::connect(db_path.to_str().unwrap()).await.unwrap();
    client
        .execute("CREATE TABLE t (n INTEGER)")
        .await
        .unwrap();
    client.execute("INSERT INTO t VALUES (7)").await.unwrap();
    client.close().await.unwrap();
    assert!(db_path.exists());

    // Reopen the same file and read the row back.
    let client = Client::connect(db_path.to_str().unwrap()).await.unwrap();
    let rs = client.execute("SELECT n FROM t").await.unwrap();
    assert_eq!(rs.rows()[0][0], Value::from(7));
    client.close().await.unwrap();
}

#[tokio::test]
async fn connect_accepts_memory_locators() {
    for locator in [":memory:", "file::memory:"] {
        let client = Client::connect(locator).await.unwrap();
        let rs = client.execute("SELECT 41 + 1 AS n").await.unwrap();
        assert_eq!(rs.rows()[0]["n"], Value::from(42));
        client.close().await.unwrap();
    }
}

// ═══════════════════════════════════════════════════════════════════════
//  Dedicated worker runtime
// ═══════════════════════════════════════════════════════════════════════

// Sync test on purpose: runtimes must be dropped outside async context.
#[test]
fn dedicated_runtime_runs_batches() {
    let worker = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .enable_all()
        .build()
        .unwrap();
    let front = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap();

    let driver = SqliteDriver::open_with_runtime(":memory:", worker.handle().clone()).unwrap();
    let client = Client::from_driver(Arc::new(driver));

    front.block_on(async {
        client
            .execute("CREATE TABLE t (n INTEGER)")
            .await
            .unwrap();
        client
            .batch(vec![
                "INSERT INTO t VALUES (1)".into(),
                "INSERT INTO t VALUES (2)".into(),
            ])
            .await
            .unwrap();
        let rs = client.execute("SELECT count(*) FROM t").await.unwrap();
        assert_eq!(rs.rows()[0][0], Value::from(2));
        client.close().await.unwrap();
    });
}
