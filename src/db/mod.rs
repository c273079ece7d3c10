pub mod demo;
pub mod migrations;
pub mod queries;

use anyhow::Context;
use chrono::NaiveDate;
use rusqlite::Connection;

pub fn init_db(path: &str) -> anyhow::Result<Connection> {
    let conn = Connection::open(path).context("failed to open database")?;

    conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON; PRAGMA busy_timeout=5000;")
        .context("failed to set database pragmas")?;

    migrations::run_migrations(&conn)?;

    Ok(conn)
}

/// In-memory store holding the default business plus synthetic bookings,
/// served when the real database cannot be opened.
pub fn init_demo_db(today: NaiveDate) -> anyhow::Result<Connection> {
    let conn = init_db(":memory:")?;
    demo::seed(&conn, today).context("failed to seed demo data")?;
    Ok(conn)
}
