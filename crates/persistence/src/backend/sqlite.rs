// Copyright (C) 2026 The Attendance Tracker Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! SQLite-specific backend utilities.
//!
//! This module is limited to:
//! - Connection pool construction
//! - Per-connection configuration (PRAGMA statements)
//! - Migration execution
//!
//! All domain queries and mutations live in `queries/` or `mutations/`.

use std::time::Duration;

use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, CustomizeConnection, Pool};
use diesel::sql_types::Integer;
use diesel::{RunQueryDsl, SqliteConnection};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::info;

use crate::error::PersistenceError;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Pool of `SQLite` connections.
pub type SqlitePool = Pool<ConnectionManager<SqliteConnection>>;

/// Helper row struct for PRAGMA queries.
///
/// Diesel has no PRAGMA DSL.
#[derive(QueryableByName)]
struct PragmaRow {
    #[diesel(sql_type = Integer)]
    foreign_keys: i32,
}

/// Applies the per-connection PRAGMAs every pooled connection needs.
///
/// `foreign_keys` is a per-connection setting in `SQLite`, so it must be
/// applied on every acquire rather than once at startup.
#[derive(Debug, Clone, Copy)]
struct ConnectionCustomizer {
    busy_timeout: Duration,
}

impl CustomizeConnection<SqliteConnection, diesel::r2d2::Error> for ConnectionCustomizer {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), diesel::r2d2::Error> {
        diesel::sql_query("PRAGMA foreign_keys = ON")
            .execute(conn)
            .map_err(diesel::r2d2::Error::QueryError)?;
        diesel::sql_query(format!(
            "PRAGMA busy_timeout = {}",
            self.busy_timeout.as_millis()
        ))
        .execute(conn)
        .map_err(diesel::r2d2::Error::QueryError)?;
        Ok(())
    }
}

/// Builds a connection pool for `database_url`.
///
/// In-memory databases only live as long as one connection is open, so
/// `keep_alive` disables idle reaping and connection recycling.
///
/// # Errors
///
/// Returns an error if the initial connections cannot be established.
pub fn build_pool(
    database_url: &str,
    max_size: u32,
    connection_timeout: Duration,
    keep_alive: bool,
) -> Result<SqlitePool, PersistenceError> {
    info!(database_url, max_size, "Building SQLite connection pool");

    let mut builder = Pool::<ConnectionManager<SqliteConnection>>::builder()
        .max_size(max_size)
        .connection_timeout(connection_timeout)
        .connection_customizer(Box::new(ConnectionCustomizer {
            busy_timeout: connection_timeout,
        }));
    if keep_alive {
        builder = builder.idle_timeout(None).max_lifetime(None);
    }

    builder
        .build(ConnectionManager::<SqliteConnection>::new(database_url))
        .map_err(|e| PersistenceError::DatabaseConnectionFailed(e.to_string()))
}

/// Verifies that foreign key enforcement is enabled.
///
/// # Errors
///
/// Returns an error if foreign key enforcement is not enabled.
pub fn verify_foreign_key_enforcement(conn: &mut SqliteConnection) -> Result<(), PersistenceError> {
    let foreign_keys_enabled: i32 = diesel::sql_query("PRAGMA foreign_keys")
        .get_result::<PragmaRow>(conn)?
        .foreign_keys;

    if foreign_keys_enabled == 0 {
        return Err(PersistenceError::ForeignKeyEnforcementNotEnabled);
    }

    info!("SQLite foreign key enforcement is enabled");
    Ok(())
}

/// Runs pending migrations on the provided connection.
///
/// # Errors
///
/// Returns an error if migration execution fails.
pub fn run_migrations(conn: &mut SqliteConnection) -> Result<(), PersistenceError> {
    info!("Running SQLite database migrations");
    conn.run_pending_migrations(MIGRATIONS)
        .map_err(|e| PersistenceError::MigrationFailed(e.to_string()))?;
    Ok(())
}

/// Enables WAL mode for file-based `SQLite` databases.
///
/// # Errors
///
/// Returns an error if the PRAGMA statement fails.
pub fn enable_wal_mode(conn: &mut SqliteConnection) -> Result<(), PersistenceError> {
    diesel::sql_query("PRAGMA journal_mode = WAL")
        .execute(conn)
        .map_err(|e| PersistenceError::QueryFailed(e.to_string()))?;
    Ok(())
}

/// Round-trips a trivial query to confirm the database answers.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn ping(conn: &mut SqliteConnection) -> Result<(), PersistenceError> {
    diesel::select(diesel::dsl::sql::<Integer>("1"))
        .get_result::<i32>(conn)
        .map(|_| ())
        .map_err(PersistenceError::from)
}
