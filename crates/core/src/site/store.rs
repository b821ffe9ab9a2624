use crate::error::DispatchError;
use crate::truck::Truck;

use super::{Site, SiteInput};

/// Persistence for sites.
pub trait SiteStore: Send + Sync {
    /// Insert a new site and return it with its assigned ID.
    fn create(&self, input: &SiteInput) -> Result<Site, DispatchError>;

    /// All sites, ordered by ID.
    fn list(&self) -> Result<Vec<Site>, DispatchError>;

    fn get(&self, id: i64) -> Result<Option<Site>, DispatchError>;

    /// Trucks assigned to the site, ordered by ID.
    fn trucks(&self, site_id: i64) -> Result<Vec<Truck>, DispatchError>;

    /// Overwrite the mutable fields. Fails with `NotFound` for unknown IDs.
    fn update(&self, id: i64, input: &SiteInput) -> Result<Site, DispatchError>;

    /// Delete by ID. Fails with `InUse` while trucks or tickets reference the site.
    fn delete(&self, id: i64) -> Result<(), DispatchError>;
}
