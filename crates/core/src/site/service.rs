use std::sync::Arc;

use tracing::info;

use crate::error::DispatchError;

use super::{Site, SiteInput, SiteStore, SiteWithTrucks};

/// CRUD operations on sites.
pub struct SiteService {
    store: Arc<dyn SiteStore>,
}

impl SiteService {
    pub fn new(store: Arc<dyn SiteStore>) -> Self {
        Self { store }
    }

    pub fn create(&self, input: SiteInput) -> Result<Site, DispatchError> {
        let site = self.store.create(&input)?;
        info!(site_id = site.id, name = %site.name, "Site created");
        Ok(site)
    }

    /// All sites. An empty table is reported as `NoneFound`.
    pub fn find_all(&self) -> Result<Vec<Site>, DispatchError> {
        let sites = self.store.list()?;
        if sites.is_empty() {
            return Err(DispatchError::NoneFound("sites"));
        }
        Ok(sites)
    }

    /// A site with its trucks.
    pub fn find_one(&self, id: i64) -> Result<SiteWithTrucks, DispatchError> {
        let site = self
            .store
            .get(id)?
            .ok_or_else(|| DispatchError::not_found("Site", id))?;
        let trucks = self.store.trucks(id)?;
        Ok(SiteWithTrucks { site, trucks })
    }

    pub fn update(&self, id: i64, input: SiteInput) -> Result<Site, DispatchError> {
        self.find_one(id)?;
        let site = self.store.update(id, &input)?;
        info!(site_id = id, "Site updated");
        Ok(site)
    }

    pub fn remove(&self, id: i64) -> Result<(), DispatchError> {
        self.find_one(id)?;
        self.store.delete(id)?;
        info!(site_id = id, "Site removed");
        Ok(())
    }
}
