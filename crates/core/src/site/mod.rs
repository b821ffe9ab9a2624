//! Sites: physical locations receiving deliveries.

mod service;
mod sqlite_store;
mod store;
mod types;

pub use service::SiteService;
pub use sqlite_store::SqliteSiteStore;
pub use store::SiteStore;
pub use types::{Site, SiteInput, SiteWithTrucks};
