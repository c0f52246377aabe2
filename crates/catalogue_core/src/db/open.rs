//! Connection bootstrap utilities for SQLite.
//!
//! # Responsibility
//! - Open file or in-memory writer connections and migrate them.
//! - Open read-only connections for the catalogue reader.
//! - Configure connection pragmas required by core behavior.
//!
//! # Invariants
//! - Writer connections have `foreign_keys=ON` and migrations fully applied.
//! - Reader connections are opened without `SQLITE_OPEN_CREATE` and only
//!   returned when the schema version equals [`latest_version`].

use super::migrations::{apply_migrations, current_user_version, latest_version};
use super::{DbError, DbResult};
use log::{debug, error, info};
use rusqlite::{Connection, OpenFlags};
use std::path::Path;
use std::time::{Duration, Instant};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Opens (creating if needed) a SQLite store file and applies all pending migrations.
///
/// # Side effects
/// - Emits `db_open` logging events with duration and status.
pub fn open_db(path: impl AsRef<Path>) -> DbResult<Connection> {
    open_logged("file", || Connection::open(path), bootstrap_writer)
}

/// Opens an in-memory SQLite store and applies all pending migrations.
///
/// # Side effects
/// - Emits `db_open` logging events with duration and status.
pub fn open_db_in_memory() -> DbResult<Connection> {
    open_logged("memory", Connection::open_in_memory, bootstrap_writer)
}

/// Opens an existing store read-only.
///
/// `target` is a file path or a `file:` URI. Fails when the store does not
/// exist yet or when its schema is not the version this binary reads.
///
/// # Side effects
/// - Emits a single `debug` event on success. Failures are returned
///   unlogged; the connecting caller reports them once per attempt.
pub fn open_db_read_only(target: &str) -> DbResult<Connection> {
    let started_at = Instant::now();
    let flags = OpenFlags::SQLITE_OPEN_READ_ONLY
        | OpenFlags::SQLITE_OPEN_URI
        | OpenFlags::SQLITE_OPEN_NO_MUTEX;
    let mut conn = Connection::open_with_flags(target, flags)?;
    bootstrap_reader(&mut conn)?;
    debug!(
        "event=db_open module=db status=ok mode=read_only duration_ms={}",
        started_at.elapsed().as_millis()
    );
    Ok(conn)
}

fn open_logged(
    mode: &str,
    open: impl FnOnce() -> rusqlite::Result<Connection>,
    bootstrap: fn(&mut Connection) -> DbResult<()>,
) -> DbResult<Connection> {
    let started_at = Instant::now();
    info!("event=db_open module=db status=start mode={mode}");

    let mut conn = match open() {
        Ok(conn) => conn,
        Err(err) => {
            error!(
                "event=db_open module=db status=error mode={mode} duration_ms={} error_code=db_open_failed error={}",
                started_at.elapsed().as_millis(),
                err
            );
            return Err(err.into());
        }
    };

    match bootstrap(&mut conn) {
        Ok(()) => {
            info!(
                "event=db_open module=db status=ok mode={mode} duration_ms={}",
                started_at.elapsed().as_millis()
            );
            Ok(conn)
        }
        Err(err) => {
            error!(
                "event=db_open module=db status=error mode={mode} duration_ms={} error_code=db_bootstrap_failed error={}",
                started_at.elapsed().as_millis(),
                err
            );
            Err(err)
        }
    }
}

fn bootstrap_writer(conn: &mut Connection) -> DbResult<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(BUSY_TIMEOUT)?;
    apply_migrations(conn)?;
    Ok(())
}

fn bootstrap_reader(conn: &mut Connection) -> DbResult<()> {
    conn.busy_timeout(BUSY_TIMEOUT)?;
    let db_version = current_user_version(conn)?;
    let expected = latest_version();
    if db_version > expected {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported: expected,
        });
    }
    if db_version < expected {
        return Err(DbError::SchemaNotReady {
            db_version,
            expected,
        });
    }
    Ok(())
}
