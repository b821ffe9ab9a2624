//! SQLite-backed truck store implementation.

use rusqlite::{ffi, params, OptionalExtension};
use tracing::debug;

use crate::db::Database;
use crate::error::{is_constraint, DispatchError};
use crate::ticket::{row_to_ticket, Ticket, TICKET_COLUMNS};

use super::{Truck, TruckInput, TruckStore};

pub(crate) const TRUCK_COLUMNS: &str = "id, license, site_id";

/// SQLite-backed truck store.
pub struct SqliteTruckStore {
    db: Database,
}

impl SqliteTruckStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

pub(crate) fn row_to_truck(row: &rusqlite::Row) -> rusqlite::Result<Truck> {
    Ok(Truck {
        id: row.get(0)?,
        license: row.get(1)?,
        site_id: row.get(2)?,
    })
}

fn missing_site(e: rusqlite::Error, site_id: i64) -> DispatchError {
    if is_constraint(&e, ffi::SQLITE_CONSTRAINT_FOREIGNKEY) {
        DispatchError::MissingReference {
            entity: "Site",
            id: site_id,
        }
    } else {
        e.into()
    }
}

impl TruckStore for SqliteTruckStore {
    fn create(&self, input: &TruckInput) -> Result<Truck, DispatchError> {
        let conn = self.db.lock()?;

        conn.execute(
            "INSERT INTO trucks (license, site_id) VALUES (?, ?)",
            params![input.license, input.site_id],
        )
        .map_err(|e| missing_site(e, input.site_id))?;

        Ok(Truck {
            id: conn.last_insert_rowid(),
            license: input.license.clone(),
            site_id: input.site_id,
        })
    }

    fn list(&self) -> Result<Vec<Truck>, DispatchError> {
        let conn = self.db.lock()?;

        let mut stmt =
            conn.prepare(&format!("SELECT {} FROM trucks ORDER BY id", TRUCK_COLUMNS))?;
        let trucks = stmt
            .query_map([], row_to_truck)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(trucks)
    }

    fn get(&self, id: i64) -> Result<Option<Truck>, DispatchError> {
        let conn = self.db.lock()?;

        let truck = conn
            .query_row(
                &format!("SELECT {} FROM trucks WHERE id = ?", TRUCK_COLUMNS),
                params![id],
                row_to_truck,
            )
            .optional()?;

        Ok(truck)
    }

    fn tickets(&self, truck_id: i64) -> Result<Vec<Ticket>, DispatchError> {
        let conn = self.db.lock()?;

        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM tickets WHERE truck_id = ? ORDER BY dispatched_time, id",
            TICKET_COLUMNS
        ))?;
        let tickets = stmt
            .query_map(params![truck_id], row_to_ticket)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(tickets)
    }

    fn update(&self, id: i64, input: &TruckInput) -> Result<Truck, DispatchError> {
        let conn = self.db.lock()?;

        let changed = conn
            .execute(
                "UPDATE trucks SET license = ?, site_id = ? WHERE id = ?",
                params![input.license, input.site_id, id],
            )
            .map_err(|e| missing_site(e, input.site_id))?;

        if changed == 0 {
            return Err(DispatchError::not_found("Truck", id));
        }

        Ok(Truck {
            id,
            license: input.license.clone(),
            site_id: input.site_id,
        })
    }

    fn delete(&self, id: i64) -> Result<(), DispatchError> {
        let conn = self.db.lock()?;

        let changed = conn
            .execute("DELETE FROM trucks WHERE id = ?", params![id])
            .map_err(|e| {
                if is_constraint(&e, ffi::SQLITE_CONSTRAINT_FOREIGNKEY) {
                    DispatchError::InUse { entity: "Truck", id }
                } else {
                    e.into()
                }
            })?;

        if changed == 0 {
            return Err(DispatchError::not_found("Truck", id));
        }

        debug!(truck_id = id, "Deleted truck");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::site::{SiteInput, SiteStore, SqliteSiteStore};

    fn create_test_store() -> (SqliteTruckStore, i64) {
        let db = Database::in_memory().unwrap();
        let site = SqliteSiteStore::new(db.clone())
            .create(&SiteInput {
                name: "North Pit".to_string(),
                address: "1 Quarry Road".to_string(),
                description: None,
            })
            .unwrap();
        (SqliteTruckStore::new(db), site.id)
    }

    #[test]
    fn test_create_and_get_truck() {
        let (store, site_id) = create_test_store();

        let truck = store
            .create(&TruckInput {
                license: "AB-123".to_string(),
                site_id,
            })
            .unwrap();

        assert_eq!(store.get(truck.id).unwrap(), Some(truck));
    }

    #[test]
    fn test_create_truck_for_missing_site() {
        let (store, _) = create_test_store();

        let result = store.create(&TruckInput {
            license: "AB-123".to_string(),
            site_id: 999,
        });

        assert_eq!(
            result,
            Err(DispatchError::MissingReference {
                entity: "Site",
                id: 999
            })
        );
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn test_update_truck() {
        let (store, site_id) = create_test_store();
        let truck = store
            .create(&TruckInput {
                license: "AB-123".to_string(),
                site_id,
            })
            .unwrap();

        let updated = store
            .update(
                truck.id,
                &TruckInput {
                    license: "ZZ-999".to_string(),
                    site_id,
                },
            )
            .unwrap();

        assert_eq!(updated.license, "ZZ-999");
        assert_eq!(store.get(truck.id).unwrap().unwrap().license, "ZZ-999");
    }

    #[test]
    fn test_update_truck_to_missing_site() {
        let (store, site_id) = create_test_store();
        let truck = store
            .create(&TruckInput {
                license: "AB-123".to_string(),
                site_id,
            })
            .unwrap();

        let result = store.update(
            truck.id,
            &TruckInput {
                license: "AB-123".to_string(),
                site_id: 77,
            },
        );

        assert!(matches!(
            result,
            Err(DispatchError::MissingReference { entity: "Site", id: 77 })
        ));
        assert_eq!(store.get(truck.id).unwrap().unwrap().site_id, site_id);
    }

    #[test]
    fn test_delete_missing_truck() {
        let (store, _) = create_test_store();
        assert_eq!(
            store.delete(3),
            Err(DispatchError::not_found("Truck", 3))
        );
    }

    #[test]
    fn test_tickets_empty_for_new_truck() {
        let (store, site_id) = create_test_store();
        let truck = store
            .create(&TruckInput {
                license: "AB-123".to_string(),
                site_id,
            })
            .unwrap();

        assert!(store.tickets(truck.id).unwrap().is_empty());
    }
}
