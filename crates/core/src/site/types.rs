use serde::{Deserialize, Serialize};

use crate::truck::Truck;

/// A delivery location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Site {
    pub id: i64,
    pub name: String,
    pub address: String,
    pub description: Option<String>,
}

/// Mutable fields of a site, used for both create and full overwrite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteInput {
    pub name: String,
    pub address: String,
    pub description: Option<String>,
}

/// A site with the trucks assigned to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteWithTrucks {
    #[serde(flatten)]
    pub site: Site,
    pub trucks: Vec<Truck>,
}
