use serde::{Deserialize, Serialize};

use crate::site::Site;
use crate::ticket::Ticket;

/// A vehicle belonging to exactly one site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Truck {
    pub id: i64,
    pub license: String,
    pub site_id: i64,
}

/// Mutable fields of a truck, used for both create and full overwrite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TruckInput {
    pub license: String,
    pub site_id: i64,
}

/// A truck with its site and the tickets it has generated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TruckDetail {
    pub id: i64,
    pub license: String,
    pub site: Site,
    pub tickets: Vec<Ticket>,
}
