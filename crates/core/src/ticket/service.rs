//! Ticket workflow: numbering and validation of new tickets.
//!
//! Tickets are numbered sequentially per site. Every creation path takes the
//! numbering lock for the whole read-max, validate, insert sequence, so two
//! requests in this process never compute the same number. The unique
//! `(site_id, ticket_number)` index catches writers outside this process.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Arc, Mutex};

use chrono::SubsecRound;
use tracing::{debug, info, warn};

use crate::clock::{Clock, SystemClock};
use crate::error::DispatchError;
use crate::metrics::{TICKETS_CREATED, TICKET_REJECTIONS};
use crate::timestamp::normalize;

use super::{
    BulkCreateTicketsRequest, CreateTicketRequest, NewTicket, Ticket, TicketDetail,
    TicketFilter, TicketStore, TicketSummary, UpdateTicketRequest, DEFAULT_MATERIAL,
};

pub struct TicketService {
    store: Arc<dyn TicketStore>,
    clock: Arc<dyn Clock>,
    numbering: Mutex<()>,
}

impl TicketService {
    pub fn new(store: Arc<dyn TicketStore>) -> Self {
        Self::with_clock(store, Arc::new(SystemClock))
    }

    pub fn with_clock(store: Arc<dyn TicketStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            clock,
            numbering: Mutex::new(()),
        }
    }

    /// Create one ticket with the same checks and numbering as a bulk request.
    pub fn create(&self, request: CreateTicketRequest) -> Result<Ticket, DispatchError> {
        let mut saved = self.create_all(vec![request], "single")?;
        saved
            .pop()
            .ok_or_else(|| DispatchError::Database("ticket insert returned no rows".to_string()))
    }

    /// Create a batch of tickets atomically.
    ///
    /// Either every ticket is written or none is. Returned tickets are grouped
    /// by site in ascending site ID, keeping request order within a site.
    pub fn create_bulk(
        &self,
        request: BulkCreateTicketsRequest,
    ) -> Result<Vec<Ticket>, DispatchError> {
        self.create_all(request.tickets, "bulk")
    }

    fn create_all(
        &self,
        requests: Vec<CreateTicketRequest>,
        path: &'static str,
    ) -> Result<Vec<Ticket>, DispatchError> {
        if requests.is_empty() {
            return Ok(Vec::new());
        }

        let _numbering = self
            .numbering
            .lock()
            .map_err(|e| DispatchError::Database(format!("numbering lock poisoned: {}", e)))?;

        let staged = match self.stage(requests) {
            Ok(staged) => staged,
            Err(e) => {
                TICKET_REJECTIONS.with_label_values(&[e.code()]).inc();
                warn!(error = %e, path, "Rejected ticket request");
                return Err(e);
            }
        };

        let saved = self.store.insert_batch(&staged)?;
        TICKETS_CREATED
            .with_label_values(&[path])
            .inc_by(saved.len() as u64);
        info!(count = saved.len(), path, "Tickets created");

        Ok(saved)
    }

    /// Validate and number every request without writing anything.
    fn stage(&self, requests: Vec<CreateTicketRequest>) -> Result<Vec<NewTicket>, DispatchError> {
        let now = self.clock.now();
        let total = requests.len();

        let mut by_site: BTreeMap<i64, Vec<CreateTicketRequest>> = BTreeMap::new();
        for request in requests {
            by_site.entry(request.site_id).or_default().push(request);
        }

        // Normalized dispatch times already staged in this call, per truck.
        let mut seen: HashMap<i64, HashSet<String>> = HashMap::new();
        let mut staged = Vec::with_capacity(total);

        for (site_id, site_requests) in by_site {
            let mut next_number = self
                .store
                .max_ticket_number(site_id)?
                .map_or(1, |max| max + 1);
            debug!(site_id, next_number, count = site_requests.len(), "Numbering site tickets");

            for request in site_requests {
                // Compare and store at the persisted precision.
                let dispatched_at = request.dispatched_time.trunc_subsecs(0);

                if dispatched_at > now {
                    return Err(DispatchError::FutureDispatch {
                        truck_id: request.truck_id,
                    });
                }

                let dispatched = normalize(&dispatched_at);

                if self
                    .store
                    .exists_for_truck_at(request.truck_id, &dispatched_at)?
                {
                    return Err(DispatchError::DuplicateDispatch {
                        truck_id: request.truck_id,
                        dispatched_time: dispatched,
                    });
                }

                if !seen
                    .entry(request.truck_id)
                    .or_default()
                    .insert(dispatched.clone())
                {
                    return Err(DispatchError::BatchDuplicate {
                        truck_id: request.truck_id,
                        dispatched_time: dispatched,
                    });
                }

                staged.push(NewTicket {
                    truck_id: request.truck_id,
                    site_id,
                    dispatched_time: dispatched_at,
                    ticket_number: next_number,
                    material: DEFAULT_MATERIAL.to_string(),
                });
                next_number += 1;
            }
        }

        Ok(staged)
    }

    /// Tickets matching the filter. An empty result is not an error.
    pub fn filter_tickets(&self, filter: &TicketFilter) -> Result<Vec<TicketSummary>, DispatchError> {
        if filter.has_partial_range() {
            debug!(
                start = ?filter.start_date,
                end = ?filter.end_date,
                "Only one date bound given, no date filter applied"
            );
        }
        self.store.filter(filter)
    }

    pub fn find_one(&self, id: i64) -> Result<TicketDetail, DispatchError> {
        self.store
            .get(id)?
            .ok_or_else(|| DispatchError::not_found("Ticket", id))
    }

    /// Overwrite truck and dispatch time. Number, site and material are kept.
    pub fn update(&self, id: i64, request: UpdateTicketRequest) -> Result<Ticket, DispatchError> {
        self.find_one(id)?;
        let ticket = self.store.update(id, &request)?;
        info!(ticket_id = id, truck_id = ticket.truck_id, "Ticket updated");
        Ok(ticket)
    }

    pub fn remove(&self, id: i64) -> Result<(), DispatchError> {
        self.find_one(id)?;
        self.store.delete(id)?;
        info!(ticket_id = id, "Ticket removed");
        Ok(())
    }
}
