use crate::error::DispatchError;
use crate::ticket::Ticket;

use super::{Truck, TruckInput};

/// Persistence for trucks.
pub trait TruckStore: Send + Sync {
    /// Insert a new truck. Fails with `MissingReference` when the site does not exist.
    fn create(&self, input: &TruckInput) -> Result<Truck, DispatchError>;

    /// All trucks, ordered by ID.
    fn list(&self) -> Result<Vec<Truck>, DispatchError>;

    fn get(&self, id: i64) -> Result<Option<Truck>, DispatchError>;

    /// Tickets generated by the truck, oldest dispatch first.
    fn tickets(&self, truck_id: i64) -> Result<Vec<Ticket>, DispatchError>;

    /// Overwrite license and site reference.
    fn update(&self, id: i64, input: &TruckInput) -> Result<Truck, DispatchError>;

    /// Delete by ID. Fails with `InUse` while tickets reference the truck.
    fn delete(&self, id: i64) -> Result<(), DispatchError>;
}
