use std::sync::Arc;

use tracing::info;

use crate::error::DispatchError;
use crate::site::SiteStore;

use super::{Truck, TruckDetail, TruckInput, TruckStore};

/// CRUD operations on trucks.
pub struct TruckService {
    trucks: Arc<dyn TruckStore>,
    sites: Arc<dyn SiteStore>,
}

impl TruckService {
    pub fn new(trucks: Arc<dyn TruckStore>, sites: Arc<dyn SiteStore>) -> Self {
        Self { trucks, sites }
    }

    /// Register a truck at an existing site.
    pub fn create(&self, input: TruckInput) -> Result<Truck, DispatchError> {
        self.require_site(input.site_id)?;
        let truck = self.trucks.create(&input)?;
        info!(truck_id = truck.id, site_id = truck.site_id, "Truck created");
        Ok(truck)
    }

    /// All trucks. An empty table is reported as `NoneFound`.
    pub fn find_all(&self) -> Result<Vec<Truck>, DispatchError> {
        let trucks = self.trucks.list()?;
        if trucks.is_empty() {
            return Err(DispatchError::NoneFound("trucks"));
        }
        Ok(trucks)
    }

    /// A truck with its site and tickets.
    pub fn find_one(&self, id: i64) -> Result<TruckDetail, DispatchError> {
        let truck = self
            .trucks
            .get(id)?
            .ok_or_else(|| DispatchError::not_found("Truck", id))?;
        let site = self
            .sites
            .get(truck.site_id)?
            .ok_or_else(|| DispatchError::not_found("Site", truck.site_id))?;
        let tickets = self.trucks.tickets(id)?;

        Ok(TruckDetail {
            id: truck.id,
            license: truck.license,
            site,
            tickets,
        })
    }

    pub fn update(&self, id: i64, input: TruckInput) -> Result<Truck, DispatchError> {
        self.find_one(id)?;
        self.require_site(input.site_id)?;
        let truck = self.trucks.update(id, &input)?;
        info!(truck_id = id, site_id = truck.site_id, "Truck updated");
        Ok(truck)
    }

    pub fn remove(&self, id: i64) -> Result<(), DispatchError> {
        self.find_one(id)?;
        self.trucks.delete(id)?;
        info!(truck_id = id, "Truck removed");
        Ok(())
    }

    fn require_site(&self, site_id: i64) -> Result<(), DispatchError> {
        match self.sites.get(site_id)? {
            Some(_) => Ok(()),
            None => Err(DispatchError::MissingReference {
                entity: "Site",
                id: site_id,
            }),
        }
    }
}
