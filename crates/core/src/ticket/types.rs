use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::site::Site;
use crate::truck::Truck;

/// Material recorded on every ticket.
pub const DEFAULT_MATERIAL: &str = "Soil";

/// A persisted dispatch record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    pub id: i64,
    pub truck_id: i64,
    pub site_id: i64,
    pub dispatched_time: DateTime<Utc>,
    /// Sequential within the site, starting at 1.
    pub ticket_number: i64,
    pub material: String,
}

/// A ticket with its truck and site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketDetail {
    pub id: i64,
    pub dispatched_time: DateTime<Utc>,
    pub ticket_number: i64,
    pub material: String,
    pub truck: Truck,
    pub site: Site,
}

/// Row returned by ticket filtering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketSummary {
    pub ticket_number: i64,
    pub dispatched_time: DateTime<Utc>,
    pub material: String,
    pub site_name: String,
    pub truck_license: String,
}

/// Request to record one dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTicketRequest {
    pub truck_id: i64,
    pub site_id: i64,
    pub dispatched_time: DateTime<Utc>,
}

/// Request to record many dispatches atomically.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BulkCreateTicketsRequest {
    pub tickets: Vec<CreateTicketRequest>,
}

/// Overwrite of a ticket's truck and dispatch time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateTicketRequest {
    pub truck_id: i64,
    pub dispatched_time: DateTime<Utc>,
}

/// A validated, numbered ticket ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTicket {
    pub truck_id: i64,
    pub site_id: i64,
    pub dispatched_time: DateTime<Utc>,
    pub ticket_number: i64,
    pub material: String,
}
