//! Test helpers shared by unit tests and the server's integration tests.

use std::sync::Mutex;

use chrono::{DateTime, Utc};

use crate::clock::Clock;

/// Clock pinned to a settable instant.
pub struct FixedClock {
    now: Mutex<DateTime<Utc>>,
}

impl FixedClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    pub fn set(&self, now: DateTime<Utc>) {
        *self.now.lock().unwrap() = now;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

/// Test fixtures and helper functions.
pub mod fixtures {
    use std::sync::Arc;

    use crate::db::Database;
    use crate::site::{Site, SiteInput, SiteStore, SqliteSiteStore};
    use crate::ticket::{NewTicket, SqliteTicketStore, Ticket, TicketStore, DEFAULT_MATERIAL};
    use crate::timestamp::parse_timestamp;
    use crate::truck::{SqliteTruckStore, Truck, TruckInput, TruckStore};

    /// Site input with a placeholder address.
    pub fn site_input(name: &str) -> SiteInput {
        SiteInput {
            name: name.to_string(),
            address: format!("{} Road", name),
            description: None,
        }
    }

    /// The three SQLite stores over one database.
    pub struct TestStores {
        pub db: Database,
        pub sites: Arc<dyn SiteStore>,
        pub trucks: Arc<dyn TruckStore>,
        pub tickets: Arc<dyn TicketStore>,
    }

    impl TestStores {
        /// Stores over a fresh in-memory database.
        pub fn new() -> Self {
            Self::with_database(Database::in_memory().unwrap())
        }

        pub fn with_database(db: Database) -> Self {
            Self {
                sites: Arc::new(SqliteSiteStore::new(db.clone())),
                trucks: Arc::new(SqliteTruckStore::new(db.clone())),
                tickets: Arc::new(SqliteTicketStore::new(db.clone())),
                db,
            }
        }

        pub fn site(&self, name: &str) -> Site {
            self.sites.create(&site_input(name)).unwrap()
        }

        pub fn truck(&self, license: &str, site_id: i64) -> Truck {
            self.trucks
                .create(&TruckInput {
                    license: license.to_string(),
                    site_id,
                })
                .unwrap()
        }

        /// Insert a ticket directly, bypassing the workflow.
        pub fn ticket(&self, truck_id: i64, site_id: i64, time: &str, number: i64) -> Ticket {
            let mut saved = self
                .tickets
                .insert_batch(&[NewTicket {
                    truck_id,
                    site_id,
                    dispatched_time: parse_timestamp(time).unwrap(),
                    ticket_number: number,
                    material: DEFAULT_MATERIAL.to_string(),
                }])
                .unwrap();
            saved.remove(0)
        }
    }

    impl Default for TestStores {
        fn default() -> Self {
            Self::new()
        }
    }
}
