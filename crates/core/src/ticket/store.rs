//! Ticket storage trait and types.

use chrono::{DateTime, Utc};

use crate::error::DispatchError;

use super::{NewTicket, Ticket, TicketDetail, TicketSummary, UpdateTicketRequest};

/// Filter for querying tickets.
///
/// The date range applies only when both bounds are set; a lone bound is ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TicketFilter {
    /// Filter by site.
    pub site_id: Option<i64>,
    /// Inclusive lower bound on dispatch time.
    pub start_date: Option<DateTime<Utc>>,
    /// Inclusive upper bound on dispatch time.
    pub end_date: Option<DateTime<Utc>>,
}

impl TicketFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_site(mut self, site_id: i64) -> Self {
        self.site_id = Some(site_id);
        self
    }

    pub fn with_start_date(mut self, start: DateTime<Utc>) -> Self {
        self.start_date = Some(start);
        self
    }

    pub fn with_end_date(mut self, end: DateTime<Utc>) -> Self {
        self.end_date = Some(end);
        self
    }

    /// The dispatch range to apply, present only when both bounds are given.
    pub fn date_range(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        match (self.start_date, self.end_date) {
            (Some(start), Some(end)) => Some((start, end)),
            _ => None,
        }
    }

    /// True when exactly one bound is given (and therefore ignored).
    pub fn has_partial_range(&self) -> bool {
        self.start_date.is_some() != self.end_date.is_some()
    }
}

/// Persistence gateway used by the ticket workflow.
pub trait TicketStore: Send + Sync {
    /// Highest ticket number issued for the site, `None` if it has no tickets.
    fn max_ticket_number(&self, site_id: i64) -> Result<Option<i64>, DispatchError>;

    /// Whether the truck already has a ticket at this (normalized) dispatch time.
    fn exists_for_truck_at(
        &self,
        truck_id: i64,
        dispatched_time: &DateTime<Utc>,
    ) -> Result<bool, DispatchError>;

    /// Write all tickets in one transaction and return them in input order.
    /// Nothing is written if any insert fails.
    fn insert_batch(&self, tickets: &[NewTicket]) -> Result<Vec<Ticket>, DispatchError>;

    /// Get a ticket with its truck and site.
    fn get(&self, id: i64) -> Result<Option<TicketDetail>, DispatchError>;

    /// Joined projection of tickets matching the filter, by dispatch time.
    fn filter(&self, filter: &TicketFilter) -> Result<Vec<TicketSummary>, DispatchError>;

    /// Overwrite truck reference and dispatch time.
    fn update(&self, id: i64, request: &UpdateTicketRequest) -> Result<Ticket, DispatchError>;

    fn delete(&self, id: i64) -> Result<(), DispatchError>;
}
