//! Infrastructure: SQLite connection, migrations.

pub mod db;

pub(crate) use db::get_connection;
pub use db::{connect, init_db, DbPool};
