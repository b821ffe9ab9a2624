//! SQLite-backed ticket store implementation.

use chrono::{DateTime, Utc};
use rusqlite::{ffi, params, types::Type, Connection, OptionalExtension};
use tracing::debug;

use crate::db::Database;
use crate::error::{is_constraint, DispatchError};
use crate::site::Site;
use crate::timestamp::{from_storage, normalize};
use crate::truck::Truck;

use super::{
    NewTicket, Ticket, TicketDetail, TicketFilter, TicketStore, TicketSummary,
    UpdateTicketRequest,
};

pub(crate) const TICKET_COLUMNS: &str =
    "id, truck_id, site_id, dispatched_time, ticket_number, material";

/// SQLite-backed ticket store.
pub struct SqliteTicketStore {
    db: Database,
}

impl SqliteTicketStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    fn build_where_clause(filter: &TicketFilter) -> (String, Vec<Box<dyn rusqlite::ToSql>>) {
        let mut conditions = Vec::new();
        let mut params: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(site_id) = filter.site_id {
            conditions.push("t.site_id = ?");
            params.push(Box::new(site_id));
        }

        // Normalized text sorts chronologically, so BETWEEN is an inclusive time range.
        if let Some((start, end)) = filter.date_range() {
            conditions.push("t.dispatched_time BETWEEN ? AND ?");
            params.push(Box::new(normalize(&start)));
            params.push(Box::new(normalize(&end)));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        (where_clause, params)
    }

    /// Work out which reference a failed insert was missing.
    fn missing_reference(conn: &Connection, truck_id: i64, site_id: i64) -> DispatchError {
        let truck_exists = conn
            .query_row(
                "SELECT 1 FROM trucks WHERE id = ?",
                params![truck_id],
                |_| Ok(()),
            )
            .optional();

        match truck_exists {
            Ok(Some(())) => DispatchError::MissingReference {
                entity: "Site",
                id: site_id,
            },
            Ok(None) => DispatchError::MissingReference {
                entity: "Truck",
                id: truck_id,
            },
            Err(e) => e.into(),
        }
    }
}

fn parse_time(value: String, column: usize) -> rusqlite::Result<DateTime<Utc>> {
    from_storage(&value)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(column, Type::Text, Box::new(e)))
}

pub(crate) fn row_to_ticket(row: &rusqlite::Row) -> rusqlite::Result<Ticket> {
    Ok(Ticket {
        id: row.get(0)?,
        truck_id: row.get(1)?,
        site_id: row.get(2)?,
        dispatched_time: parse_time(row.get(3)?, 3)?,
        ticket_number: row.get(4)?,
        material: row.get(5)?,
    })
}

fn row_to_detail(row: &rusqlite::Row) -> rusqlite::Result<TicketDetail> {
    Ok(TicketDetail {
        id: row.get(0)?,
        dispatched_time: parse_time(row.get(1)?, 1)?,
        ticket_number: row.get(2)?,
        material: row.get(3)?,
        truck: Truck {
            id: row.get(4)?,
            license: row.get(5)?,
            site_id: row.get(6)?,
        },
        site: Site {
            id: row.get(7)?,
            name: row.get(8)?,
            address: row.get(9)?,
            description: row.get(10)?,
        },
    })
}

fn row_to_summary(row: &rusqlite::Row) -> rusqlite::Result<TicketSummary> {
    Ok(TicketSummary {
        ticket_number: row.get(0)?,
        dispatched_time: parse_time(row.get(1)?, 1)?,
        material: row.get(2)?,
        site_name: row.get(3)?,
        truck_license: row.get(4)?,
    })
}

impl TicketStore for SqliteTicketStore {
    fn max_ticket_number(&self, site_id: i64) -> Result<Option<i64>, DispatchError> {
        let conn = self.db.lock()?;

        let max: Option<i64> = conn.query_row(
            "SELECT MAX(ticket_number) FROM tickets WHERE site_id = ?",
            params![site_id],
            |row| row.get(0),
        )?;

        Ok(max)
    }

    fn exists_for_truck_at(
        &self,
        truck_id: i64,
        dispatched_time: &DateTime<Utc>,
    ) -> Result<bool, DispatchError> {
        let conn = self.db.lock()?;

        let exists: bool = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM tickets WHERE truck_id = ? AND dispatched_time = ?)",
            params![truck_id, normalize(dispatched_time)],
            |row| row.get(0),
        )?;

        Ok(exists)
    }

    fn insert_batch(&self, tickets: &[NewTicket]) -> Result<Vec<Ticket>, DispatchError> {
        let mut conn = self.db.lock()?;
        let tx = conn.transaction()?;
        let mut saved = Vec::with_capacity(tickets.len());

        {
            let mut stmt = tx.prepare(
                "INSERT INTO tickets (truck_id, site_id, dispatched_time, ticket_number, material) VALUES (?, ?, ?, ?, ?)",
            )?;

            for ticket in tickets {
                let dispatched_time = normalize(&ticket.dispatched_time);
                stmt.execute(params![
                    ticket.truck_id,
                    ticket.site_id,
                    dispatched_time,
                    ticket.ticket_number,
                    ticket.material,
                ])
                .map_err(|e| {
                    if is_constraint(&e, ffi::SQLITE_CONSTRAINT_UNIQUE) {
                        DispatchError::NumberingConflict {
                            site_id: ticket.site_id,
                        }
                    } else if is_constraint(&e, ffi::SQLITE_CONSTRAINT_FOREIGNKEY) {
                        Self::missing_reference(&tx, ticket.truck_id, ticket.site_id)
                    } else {
                        e.into()
                    }
                })?;

                saved.push(Ticket {
                    id: tx.last_insert_rowid(),
                    truck_id: ticket.truck_id,
                    site_id: ticket.site_id,
                    dispatched_time: ticket.dispatched_time,
                    ticket_number: ticket.ticket_number,
                    material: ticket.material.clone(),
                });
            }
        }

        tx.commit()?;
        debug!(count = saved.len(), "Inserted ticket batch");
        Ok(saved)
    }

    fn get(&self, id: i64) -> Result<Option<TicketDetail>, DispatchError> {
        let conn = self.db.lock()?;

        let detail = conn
            .query_row(
                r#"
                SELECT t.id, t.dispatched_time, t.ticket_number, t.material,
                       tr.id, tr.license, tr.site_id,
                       s.id, s.name, s.address, s.description
                FROM tickets t
                JOIN trucks tr ON tr.id = t.truck_id
                JOIN sites s ON s.id = t.site_id
                WHERE t.id = ?
                "#,
                params![id],
                row_to_detail,
            )
            .optional()?;

        Ok(detail)
    }

    fn filter(&self, filter: &TicketFilter) -> Result<Vec<TicketSummary>, DispatchError> {
        let conn = self.db.lock()?;

        let (where_clause, params) = Self::build_where_clause(filter);

        let sql = format!(
            r#"
            SELECT t.ticket_number, t.dispatched_time, t.material, s.name, tr.license
            FROM tickets t
            JOIN trucks tr ON tr.id = t.truck_id
            JOIN sites s ON s.id = t.site_id
            {}
            ORDER BY t.dispatched_time ASC, t.id ASC
            "#,
            where_clause
        );

        let mut stmt = conn.prepare(&sql)?;
        let param_refs: Vec<&dyn rusqlite::ToSql> = params.iter().map(|p| p.as_ref()).collect();

        let summaries = stmt
            .query_map(param_refs.as_slice(), row_to_summary)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(summaries)
    }

    fn update(&self, id: i64, request: &UpdateTicketRequest) -> Result<Ticket, DispatchError> {
        let conn = self.db.lock()?;

        let changed = conn
            .execute(
                "UPDATE tickets SET truck_id = ?, dispatched_time = ? WHERE id = ?",
                params![request.truck_id, normalize(&request.dispatched_time), id],
            )
            .map_err(|e| {
                if is_constraint(&e, ffi::SQLITE_CONSTRAINT_FOREIGNKEY) {
                    DispatchError::MissingReference {
                        entity: "Truck",
                        id: request.truck_id,
                    }
                } else {
                    e.into()
                }
            })?;

        if changed == 0 {
            return Err(DispatchError::not_found("Ticket", id));
        }

        let ticket = conn.query_row(
            &format!("SELECT {} FROM tickets WHERE id = ?", TICKET_COLUMNS),
            params![id],
            row_to_ticket,
        )?;

        Ok(ticket)
    }

    fn delete(&self, id: i64) -> Result<(), DispatchError> {
        let conn = self.db.lock()?;

        let changed = conn.execute("DELETE FROM tickets WHERE id = ?", params![id])?;
        if changed == 0 {
            return Err(DispatchError::not_found("Ticket", id));
        }

        debug!(ticket_id = id, "Deleted ticket");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures::{self, TestStores};
    use crate::ticket::DEFAULT_MATERIAL;
    use crate::timestamp::parse_timestamp;

    fn new_ticket(truck_id: i64, site_id: i64, time: &str, number: i64) -> NewTicket {
        NewTicket {
            truck_id,
            site_id,
            dispatched_time: parse_timestamp(time).unwrap(),
            ticket_number: number,
            material: DEFAULT_MATERIAL.to_string(),
        }
    }

    #[test]
    fn test_max_ticket_number_empty_site() {
        let env = TestStores::new();
        let site = env.site("A");
        assert_eq!(env.tickets.max_ticket_number(site.id).unwrap(), None);
    }

    #[test]
    fn test_max_ticket_number_is_per_site() {
        let env = TestStores::new();
        let a = env.site("A");
        let b = env.site("B");
        let truck = env.truck("AB-123", a.id);
        env.ticket(truck.id, a.id, "2024-09-10 10:00:00", 1);
        env.ticket(truck.id, a.id, "2024-09-10 11:00:00", 2);
        env.ticket(truck.id, b.id, "2024-09-10 12:00:00", 7);

        assert_eq!(env.tickets.max_ticket_number(a.id).unwrap(), Some(2));
        assert_eq!(env.tickets.max_ticket_number(b.id).unwrap(), Some(7));
    }

    #[test]
    fn test_exists_for_truck_at_uses_normalized_time() {
        let env = TestStores::new();
        let site = env.site("A");
        let truck = env.truck("AB-123", site.id);
        env.ticket(truck.id, site.id, "2024-09-10 10:00:00", 1);

        let same_instant = parse_timestamp("2024-09-10T12:00:00.400+02:00").unwrap();
        let other_instant = parse_timestamp("2024-09-10T10:00:01Z").unwrap();

        assert!(env.tickets.exists_for_truck_at(truck.id, &same_instant).unwrap());
        assert!(!env.tickets.exists_for_truck_at(truck.id, &other_instant).unwrap());
        assert!(!env.tickets.exists_for_truck_at(truck.id + 1, &same_instant).unwrap());
    }

    #[test]
    fn test_insert_batch_returns_ids_in_order() {
        let env = TestStores::new();
        let site = env.site("A");
        let truck = env.truck("AB-123", site.id);

        let saved = env
            .tickets
            .insert_batch(&[
                new_ticket(truck.id, site.id, "2024-09-10T10:00:00Z", 1),
                new_ticket(truck.id, site.id, "2024-09-10T11:00:00Z", 2),
            ])
            .unwrap();

        assert_eq!(saved.len(), 2);
        assert!(saved[0].id < saved[1].id);
        assert_eq!(saved[1].ticket_number, 2);
    }

    #[test]
    fn test_insert_batch_is_all_or_nothing() {
        let env = TestStores::new();
        let site = env.site("A");
        let truck = env.truck("AB-123", site.id);

        let result = env.tickets.insert_batch(&[
            new_ticket(truck.id, site.id, "2024-09-10T10:00:00Z", 1),
            new_ticket(truck.id, site.id, "2024-09-10T11:00:00Z", 1),
        ]);

        assert_eq!(
            result,
            Err(DispatchError::NumberingConflict { site_id: site.id })
        );
        assert!(env.tickets.filter(&TicketFilter::new()).unwrap().is_empty());
    }

    #[test]
    fn test_insert_batch_missing_truck() {
        let env = TestStores::new();
        let site = env.site("A");

        let result =
            env.tickets
                .insert_batch(&[new_ticket(404, site.id, "2024-09-10T10:00:00Z", 1)]);

        assert_eq!(
            result,
            Err(DispatchError::MissingReference {
                entity: "Truck",
                id: 404
            })
        );
    }

    #[test]
    fn test_insert_batch_missing_site() {
        let env = TestStores::new();
        let site = env.site("A");
        let truck = env.truck("AB-123", site.id);

        let result =
            env.tickets
                .insert_batch(&[new_ticket(truck.id, 505, "2024-09-10T10:00:00Z", 1)]);

        assert_eq!(
            result,
            Err(DispatchError::MissingReference {
                entity: "Site",
                id: 505
            })
        );
    }

    #[test]
    fn test_get_includes_truck_and_site() {
        let env = TestStores::new();
        let site = env.site("North Pit");
        let truck = env.truck("AB-123", site.id);
        let ticket = env.ticket(truck.id, site.id, "2024-09-10 10:00:00", 1);

        let detail = env.tickets.get(ticket.id).unwrap().unwrap();
        assert_eq!(detail.truck, truck);
        assert_eq!(detail.site, site);
        assert_eq!(detail.ticket_number, 1);
        assert_eq!(detail.material, "Soil");

        assert!(env.tickets.get(ticket.id + 100).unwrap().is_none());
    }

    #[test]
    fn test_filter_by_site_and_inclusive_range() {
        let env = TestStores::new();
        let a = env.site("A");
        let b = env.site("B");
        let truck = env.truck("AB-123", a.id);
        env.ticket(truck.id, a.id, "2024-09-01 00:00:00", 1);
        env.ticket(truck.id, a.id, "2024-09-15 12:00:00", 2);
        env.ticket(truck.id, a.id, "2024-09-30 00:00:00", 3);
        env.ticket(truck.id, a.id, "2024-10-01 00:00:00", 4);
        env.ticket(truck.id, b.id, "2024-09-15 12:00:00", 1);

        let filter = TicketFilter::new()
            .with_site(a.id)
            .with_start_date(parse_timestamp("2024-09-01").unwrap())
            .with_end_date(parse_timestamp("2024-09-30").unwrap());
        let numbers: Vec<i64> = env
            .tickets
            .filter(&filter)
            .unwrap()
            .into_iter()
            .map(|t| t.ticket_number)
            .collect();

        assert_eq!(numbers, vec![1, 2, 3]);
    }

    #[test]
    fn test_filter_projection() {
        let env = TestStores::new();
        let site = env.site("North Pit");
        let truck = env.truck("AB-123", site.id);
        env.ticket(truck.id, site.id, "2024-09-10 10:00:00", 1);

        let rows = env.tickets.filter(&TicketFilter::new()).unwrap();
        assert_eq!(
            rows,
            vec![TicketSummary {
                ticket_number: 1,
                dispatched_time: parse_timestamp("2024-09-10T10:00:00Z").unwrap(),
                material: "Soil".to_string(),
                site_name: "North Pit".to_string(),
                truck_license: "AB-123".to_string(),
            }]
        );
    }

    #[test]
    fn test_update_and_delete() {
        let env = TestStores::new();
        let site = env.site("A");
        let truck = env.truck("AB-123", site.id);
        let other = env.truck("CD-456", site.id);
        let ticket = env.ticket(truck.id, site.id, "2024-09-10 10:00:00", 1);

        let updated = env
            .tickets
            .update(
                ticket.id,
                &UpdateTicketRequest {
                    truck_id: other.id,
                    dispatched_time: parse_timestamp("2024-09-11T08:00:00Z").unwrap(),
                },
            )
            .unwrap();
        assert_eq!(updated.truck_id, other.id);
        assert_eq!(updated.ticket_number, 1);
        assert_eq!(normalize(&updated.dispatched_time), "2024-09-11 08:00:00");

        env.tickets.delete(ticket.id).unwrap();
        assert_eq!(
            env.tickets.delete(ticket.id),
            Err(DispatchError::not_found("Ticket", ticket.id))
        );
    }

    #[test]
    fn test_file_based_store() {
        let temp_dir = tempfile::tempdir().unwrap();
        let db_path = temp_dir.path().join("tickets.db");

        let env = fixtures::TestStores::with_database(Database::open(&db_path).unwrap());
        let site = env.site("A");
        let truck = env.truck("AB-123", site.id);
        env.ticket(truck.id, site.id, "2024-09-10 10:00:00", 1);

        let reopened = SqliteTicketStore::new(Database::open(&db_path).unwrap());
        assert_eq!(reopened.max_ticket_number(site.id).unwrap(), Some(1));
    }
}
