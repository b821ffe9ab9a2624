//! Shared SQLite handle and schema.
//!
//! Sites, trucks and tickets live in one database file. The stores share a
//! single connection so joins and foreign keys see the same data, which also
//! holds for `:memory:` databases.

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use rusqlite::Connection;
use tracing::debug;

use crate::error::DispatchError;

const SCHEMA: &str = r#"
    PRAGMA foreign_keys = ON;

    CREATE TABLE IF NOT EXISTS sites (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        address TEXT NOT NULL,
        description TEXT
    );

    CREATE TABLE IF NOT EXISTS trucks (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        license TEXT NOT NULL,
        site_id INTEGER NOT NULL REFERENCES sites(id)
    );

    CREATE INDEX IF NOT EXISTS idx_trucks_site ON trucks(site_id);

    CREATE TABLE IF NOT EXISTS tickets (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        truck_id INTEGER NOT NULL REFERENCES trucks(id),
        site_id INTEGER NOT NULL REFERENCES sites(id),
        dispatched_time TEXT NOT NULL,
        ticket_number INTEGER NOT NULL,
        material TEXT NOT NULL DEFAULT 'Soil'
    );

    CREATE UNIQUE INDEX IF NOT EXISTS idx_tickets_site_number
        ON tickets(site_id, ticket_number);
    CREATE INDEX IF NOT EXISTS idx_tickets_truck_time
        ON tickets(truck_id, dispatched_time);
    CREATE INDEX IF NOT EXISTS idx_tickets_dispatched
        ON tickets(dispatched_time);
"#;

/// Cloneable handle to the dispatch database.
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// Open (or create) the database file and make sure the schema exists.
    pub fn open(path: &Path) -> Result<Self, DispatchError> {
        debug!("Opening database at {:?}", path);
        let conn = Connection::open(path)?;
        Self::from_connection(conn)
    }

    /// Create an in-memory database (useful for testing).
    pub fn in_memory() -> Result<Self, DispatchError> {
        let conn = Connection::open_in_memory()?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self, DispatchError> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub(crate) fn lock(&self) -> Result<MutexGuard<'_, Connection>, DispatchError> {
        self.conn
            .lock()
            .map_err(|e| DispatchError::Database(format!("connection lock poisoned: {}", e)))
    }
}
