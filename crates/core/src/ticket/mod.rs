//! Delivery tickets: one record per truck dispatch, numbered per site.

mod service;
mod sqlite_store;
mod store;
mod types;

pub use service::TicketService;
pub use sqlite_store::SqliteTicketStore;
pub(crate) use sqlite_store::{row_to_ticket, TICKET_COLUMNS};
pub use store::{TicketFilter, TicketStore};
pub use types::{
    BulkCreateTicketsRequest, CreateTicketRequest, NewTicket, Ticket, TicketDetail,
    TicketSummary, UpdateTicketRequest, DEFAULT_MATERIAL,
};
