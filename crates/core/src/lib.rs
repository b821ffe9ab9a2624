pub mod clock;
pub mod config;
pub mod db;
pub mod error;
pub mod metrics;
pub mod site;
pub mod testing;
pub mod ticket;
pub mod timestamp;
pub mod truck;

pub use clock::{Clock, SystemClock};
pub use config::{
    config_path, load_config, load_config_from_str, validate_config, Config, ConfigError,
    DatabaseConfig, LoggingConfig, ServerConfig,
};
pub use db::Database;
pub use error::DispatchError;
pub use site::{
    Site, SiteInput, SiteService, SiteStore, SiteWithTrucks, SqliteSiteStore,
};
pub use ticket::{
    BulkCreateTicketsRequest, CreateTicketRequest, NewTicket, SqliteTicketStore, Ticket,
    TicketDetail, TicketFilter, TicketService, TicketStore, TicketSummary, UpdateTicketRequest,
    DEFAULT_MATERIAL,
};
pub use timestamp::{normalize, parse_timestamp, TimestampError};
pub use truck::{SqliteTruckStore, Truck, TruckDetail, TruckInput, TruckService, TruckStore};
