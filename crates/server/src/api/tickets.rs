//! Ticket API handlers.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use haulage_core::{Ticket, TicketDetail, TicketSummary};
use serde::Deserialize;
use std::sync::Arc;

use super::{validate, ApiError};
use crate::state::AppState;

// ============================================================================
// Request Types
// ============================================================================

/// Request body for a single ticket, also used for each bulk entry
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTicketBody {
    pub truck_id: i64,
    pub site_id: i64,
    /// ISO-8601 timestamp
    pub dispatched_time: String,
}

/// Request body for bulk creation
#[derive(Debug, Deserialize)]
pub struct BulkCreateTicketsBody {
    pub tickets: Vec<CreateTicketBody>,
}

/// Request body for replacing a ticket's truck and dispatch time
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTicketBody {
    pub truck_id: i64,
    pub dispatched_time: String,
}

/// Query parameters for filtering tickets
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterTicketsParams {
    pub site_id: Option<i64>,
    /// Date range applies only when both bounds are given
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /api/v1/tickets
pub async fn create_ticket(
    State(state): State<Arc<AppState>>,
    body: Result<Json<CreateTicketBody>, JsonRejection>,
) -> Result<(StatusCode, Json<Ticket>), ApiError> {
    let Json(body) = body?;
    let ticket = state.tickets().create(validate::create_ticket(body)?)?;
    Ok((StatusCode::CREATED, Json(ticket)))
}

/// POST /api/v1/tickets/bulk-create
///
/// All-or-nothing: the first rejected entry fails the whole request and no
/// tickets are stored.
pub async fn bulk_create_tickets(
    State(state): State<Arc<AppState>>,
    body: Result<Json<BulkCreateTicketsBody>, JsonRejection>,
) -> Result<(StatusCode, Json<Vec<Ticket>>), ApiError> {
    let Json(body) = body?;
    let request = validate::bulk_create(body)?;
    let created = state.tickets().create_bulk(request)?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// GET /api/v1/tickets
pub async fn filter_tickets(
    State(state): State<Arc<AppState>>,
    params: Result<Query<FilterTicketsParams>, QueryRejection>,
) -> Result<Json<Vec<TicketSummary>>, ApiError> {
    let Query(params) = params?;
    let filter = validate::ticket_filter(params)?;
    Ok(Json(state.tickets().filter_tickets(&filter)?))
}

/// GET /api/v1/tickets/{id}
pub async fn get_ticket(
    State(state): State<Arc<AppState>>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<TicketDetail>, ApiError> {
    let Path(id) = id?;
    Ok(Json(state.tickets().find_one(validate::id(id, "id")?)?))
}

/// PUT /api/v1/tickets/{id}
pub async fn update_ticket(
    State(state): State<Arc<AppState>>,
    id: Result<Path<i64>, PathRejection>,
    body: Result<Json<UpdateTicketBody>, JsonRejection>,
) -> Result<Json<Ticket>, ApiError> {
    let Path(id) = id?;
    let Json(body) = body?;
    let id = validate::id(id, "id")?;
    Ok(Json(state.tickets().update(id, validate::update_ticket(body)?)?))
}

/// DELETE /api/v1/tickets/{id}
pub async fn delete_ticket(
    State(state): State<Arc<AppState>>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let Path(id) = id?;
    state.tickets().remove(validate::id(id, "id")?)?;
    Ok(StatusCode::NO_CONTENT)
}
