use anyhow::Result;
use diesel::prelude::*;
use diesel::r2d2::{self, ConnectionManager};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use std::path::Path;

use crate::error::StoreError;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

pub type Pool = r2d2::Pool<ConnectionManager<SqliteConnection>>;
pub type Conn = r2d2::PooledConnection<ConnectionManager<SqliteConnection>>;

pub fn establish_pool(db_path: &Path) -> Result<Pool> {
    let database_url = format!("sqlite://{}", db_path.to_string_lossy());
    let manager = ConnectionManager::<SqliteConnection>::new(database_url);
    let pool = r2d2::Pool::builder().max_size(4).build(manager)?;
    {
        let mut conn = pool.get()?;
        run_migrations(&mut conn)?;
    }
    Ok(pool)
}

/// Acquire a connection for the duration of one store call.
///
/// An unreachable store surfaces as `StoreError::Connection`, never a panic;
/// the connection goes back to the pool when the guard drops, on every exit
/// path of the caller.
pub fn acquire(pool: &Pool) -> Result<Conn, StoreError> {
    Ok(pool.get()?)
}

fn run_migrations(conn: &mut SqliteConnection) -> Result<()> {
    conn.run_pending_migrations(MIGRATIONS)
        .map(|_| ())
        .map_err(|e| anyhow::anyhow!("migration error: {e}"))
}
