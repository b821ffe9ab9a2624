use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::{handlers, middleware::metrics_middleware, sites, tickets, trucks};
use crate::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    // API routes
    let api_routes = Router::new()
        .route("/health", get(handlers::health))
        // Sites
        .route("/sites", post(sites::create_site).get(sites::list_sites))
        .route(
            "/sites/{id}",
            get(sites::get_site)
                .put(sites::update_site)
                .delete(sites::delete_site),
        )
        // Trucks
        .route("/trucks", post(trucks::create_truck).get(trucks::list_trucks))
        .route(
            "/trucks/{id}",
            get(trucks::get_truck)
                .put(trucks::update_truck)
                .delete(trucks::delete_truck),
        )
        // Tickets
        .route(
            "/tickets",
            post(tickets::create_ticket).get(tickets::filter_tickets),
        )
        .route("/tickets/bulk-create", post(tickets::bulk_create_tickets))
        .route(
            "/tickets/{id}",
            get(tickets::get_ticket)
                .put(tickets::update_ticket)
                .delete(tickets::delete_ticket),
        )
        .with_state(state);

    Router::new()
        .nest("/api/v1", api_routes)
        .route("/metrics", get(handlers::metrics))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
