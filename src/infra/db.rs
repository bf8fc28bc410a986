//! SQLite connection and migrations.

use crate::config::DbLocation;
use crate::error::AppError;
use rusqlite::Connection;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

pub struct DbPool(pub Mutex<Connection>);

const MIGRATIONS: &[(i32, &str)] = &[(1, include_str!("../../migrations/0001_init.sql"))];

/// Initialize DB at path, run migrations, return managed pool.
pub fn init_db(db_path: &Path) -> Result<DbPool, AppError> {
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| AppError::Db(e.to_string()))?;
        }
    }
    let conn = Connection::open(db_path)?;
    log::info!("DB path: {:?}", db_path);
    init_with(conn)
}

/// Open the store named by the configuration.
pub fn connect(location: &DbLocation) -> Result<DbPool, AppError> {
    match location {
        DbLocation::Memory => init_with(Connection::open_in_memory()?),
        DbLocation::File(path) => init_db(path),
    }
}

/// In-memory store with migrations applied.
pub fn init_test_db() -> DbPool {
    let conn = Connection::open_in_memory().expect("open in-memory db");
    init_with(conn).expect("migrate in-memory db")
}

fn init_with(mut conn: Connection) -> Result<DbPool, AppError> {
    run_migrations(&mut conn)?;
    Ok(DbPool(Mutex::new(conn)))
}

fn run_migrations(conn: &mut Connection) -> Result<(), AppError> {
    let tx = conn.transaction()?;

    // Ensure schema_migrations exists (first run)
    tx.execute(
        "CREATE TABLE IF NOT EXISTS schema_migrations (version INTEGER PRIMARY KEY, applied_at TEXT NOT NULL DEFAULT (datetime('now')))",
        [],
    )?;

    let applied: Vec<i32> = tx
        .prepare("SELECT version FROM schema_migrations ORDER BY version")?
        .query_map([], |r| r.get(0))?
        .collect::<Result<Vec<_>, _>>()?;

    for (version, sql) in MIGRATIONS {
        if applied.contains(version) {
            continue;
        }
        // The script's own schema_migrations INSERT is skipped; the row is written below.
        let statements = sql
            .split(';')
            .map(str::trim)
            .filter(|s| !s.is_empty() && !s.contains("INSERT INTO schema_migrations"));
        for stmt in statements {
            tx.execute(stmt, [])?;
        }
        tx.execute(
            "INSERT INTO schema_migrations (version, applied_at) VALUES (?1, datetime('now'))",
            [version],
        )?;
        log::debug!("applied migration {}", version);
    }

    tx.commit()?;
    Ok(())
}

/// Lock the shared connection. A poisoned lock is reported, not unwrapped.
pub fn get_connection(pool: &DbPool) -> Result<MutexGuard<'_, Connection>, AppError> {
    pool.0
        .lock()
        .map_err(|e| AppError::Db(format!("db lock poisoned: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn migrations_are_idempotent() {
        let mut conn = Connection::open_in_memory().unwrap();
        run_migrations(&mut conn).unwrap();
        run_migrations(&mut conn).unwrap();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM schema_migrations", [], |r| r.get(0))
            .unwrap();
        assert_eq!(count, MIGRATIONS.len() as i64);
    }

    #[test]
    fn poisoned_lock_is_reported_as_db_error() {
        let pool = init_test_db();
        std::thread::scope(|s| {
            let handle = s.spawn(|| {
                let _guard = pool.0.lock().unwrap();
                panic!("writer died holding the connection");
            });
            assert!(handle.join().is_err());
        });
        assert!(pool.0.is_poisoned());

        let err = get_connection(&pool).unwrap_err();
        assert_eq!(err.code(), "DB_ERROR");
        let err = crate::app::find_person_by_id(&pool, "anyone").unwrap_err();
        assert_eq!(err.code(), "DB_ERROR");
    }

    #[test]
    fn persons_table_rejects_blank_name() {
        let pool = init_test_db();
        let conn = get_connection(&pool).unwrap();
        let res = conn.execute(
            "INSERT INTO persons (id, name, created_at, updated_at) VALUES ('x', '  ', 'now', 'now')",
            [],
        );
        assert!(res.is_err());
    }
}
