use std::sync::Arc;

use haulage_core::{
    Clock, Config, Database, SiteService, SqliteSiteStore, SqliteTicketStore, SqliteTruckStore,
    SystemClock, TicketService, TruckService,
};

/// Shared application state
pub struct AppState {
    config: Config,
    sites: SiteService,
    trucks: TruckService,
    tickets: TicketService,
}

impl AppState {
    /// Wire the services over one database using the wall clock.
    pub fn new(config: Config, db: Database) -> Self {
        Self::with_clock(config, db, Arc::new(SystemClock))
    }

    pub fn with_clock(config: Config, db: Database, clock: Arc<dyn Clock>) -> Self {
        let site_store = Arc::new(SqliteSiteStore::new(db.clone()));
        let truck_store = Arc::new(SqliteTruckStore::new(db.clone()));
        let ticket_store = Arc::new(SqliteTicketStore::new(db));

        Self {
            config,
            sites: SiteService::new(site_store.clone()),
            trucks: TruckService::new(truck_store, site_store),
            tickets: TicketService::with_clock(ticket_store, clock),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn sites(&self) -> &SiteService {
        &self.sites
    }

    pub fn trucks(&self) -> &TruckService {
        &self.trucks
    }

    pub fn tickets(&self) -> &TicketService {
        &self.tickets
    }
}
