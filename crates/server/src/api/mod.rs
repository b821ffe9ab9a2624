pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod sites;
pub mod tickets;
pub mod trucks;
pub mod validate;

pub use error::ApiError;
pub use routes::create_router;
