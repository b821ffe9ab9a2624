//! SQLite-backed site store implementation.

use rusqlite::{ffi, params, OptionalExtension};
use tracing::debug;

use crate::db::Database;
use crate::error::{is_constraint, DispatchError};
use crate::truck::{row_to_truck, Truck, TRUCK_COLUMNS};

use super::{Site, SiteInput, SiteStore};

const SITE_COLUMNS: &str = "id, name, address, description";

/// SQLite-backed site store.
pub struct SqliteSiteStore {
    db: Database,
}

impl SqliteSiteStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

pub(crate) fn row_to_site(row: &rusqlite::Row) -> rusqlite::Result<Site> {
    Ok(Site {
        id: row.get(0)?,
        name: row.get(1)?,
        address: row.get(2)?,
        description: row.get(3)?,
    })
}

impl SiteStore for SqliteSiteStore {
    fn create(&self, input: &SiteInput) -> Result<Site, DispatchError> {
        let conn = self.db.lock()?;

        conn.execute(
            "INSERT INTO sites (name, address, description) VALUES (?, ?, ?)",
            params![input.name, input.address, input.description],
        )?;

        Ok(Site {
            id: conn.last_insert_rowid(),
            name: input.name.clone(),
            address: input.address.clone(),
            description: input.description.clone(),
        })
    }

    fn list(&self) -> Result<Vec<Site>, DispatchError> {
        let conn = self.db.lock()?;

        let mut stmt = conn.prepare(&format!("SELECT {} FROM sites ORDER BY id", SITE_COLUMNS))?;
        let sites = stmt
            .query_map([], row_to_site)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(sites)
    }

    fn get(&self, id: i64) -> Result<Option<Site>, DispatchError> {
        let conn = self.db.lock()?;

        let site = conn
            .query_row(
                &format!("SELECT {} FROM sites WHERE id = ?", SITE_COLUMNS),
                params![id],
                row_to_site,
            )
            .optional()?;

        Ok(site)
    }

    fn trucks(&self, site_id: i64) -> Result<Vec<Truck>, DispatchError> {
        let conn = self.db.lock()?;

        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM trucks WHERE site_id = ? ORDER BY id",
            TRUCK_COLUMNS
        ))?;
        let trucks = stmt
            .query_map(params![site_id], row_to_truck)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(trucks)
    }

    fn update(&self, id: i64, input: &SiteInput) -> Result<Site, DispatchError> {
        let conn = self.db.lock()?;

        let changed = conn.execute(
            "UPDATE sites SET name = ?, address = ?, description = ? WHERE id = ?",
            params![input.name, input.address, input.description, id],
        )?;

        if changed == 0 {
            return Err(DispatchError::not_found("Site", id));
        }

        Ok(Site {
            id,
            name: input.name.clone(),
            address: input.address.clone(),
            description: input.description.clone(),
        })
    }

    fn delete(&self, id: i64) -> Result<(), DispatchError> {
        let conn = self.db.lock()?;

        let changed = conn
            .execute("DELETE FROM sites WHERE id = ?", params![id])
            .map_err(|e| {
                if is_constraint(&e, ffi::SQLITE_CONSTRAINT_FOREIGNKEY) {
                    DispatchError::InUse { entity: "Site", id }
                } else {
                    e.into()
                }
            })?;

        if changed == 0 {
            return Err(DispatchError::not_found("Site", id));
        }

        debug!(site_id = id, "Deleted site");
        Ok(())
    }
}
