//! Trucks: vehicles assigned to a site.

mod service;
mod sqlite_store;
mod store;
mod types;

pub use service::TruckService;
pub use sqlite_store::SqliteTruckStore;
pub(crate) use sqlite_store::{row_to_truck, TRUCK_COLUMNS};
pub use store::TruckStore;
pub use types::{Truck, TruckDetail, TruckInput};
