//! Truck API handlers.

use axum::{
    extract::{rejection::JsonRejection, rejection::PathRejection, Path, State},
    http::StatusCode,
    Json,
};
use haulage_core::{Truck, TruckDetail};
use serde::Deserialize;
use std::sync::Arc;

use super::{validate, ApiError};
use crate::state::AppState;

/// Request body for creating or replacing a truck
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TruckBody {
    pub license: String,
    /// Home site
    pub site_id: i64,
}

pub async fn create_truck(
    State(state): State<Arc<AppState>>,
    body: Result<Json<TruckBody>, JsonRejection>,
) -> Result<(StatusCode, Json<Truck>), ApiError> {
    let Json(body) = body?;
    let truck = state.trucks().create(validate::truck_input(body)?)?;
    Ok((StatusCode::CREATED, Json(truck)))
}

pub async fn list_trucks(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Truck>>, ApiError> {
    Ok(Json(state.trucks().find_all()?))
}

/// Truck with its site and dispatch history.
pub async fn get_truck(
    State(state): State<Arc<AppState>>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<TruckDetail>, ApiError> {
    let Path(id) = id?;
    Ok(Json(state.trucks().find_one(validate::id(id, "id")?)?))
}

pub async fn update_truck(
    State(state): State<Arc<AppState>>,
    id: Result<Path<i64>, PathRejection>,
    body: Result<Json<TruckBody>, JsonRejection>,
) -> Result<Json<Truck>, ApiError> {
    let Path(id) = id?;
    let Json(body) = body?;
    let id = validate::id(id, "id")?;
    Ok(Json(state.trucks().update(id, validate::truck_input(body)?)?))
}

pub async fn delete_truck(
    State(state): State<Arc<AppState>>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let Path(id) = id?;
    state.trucks().remove(validate::id(id, "id")?)?;
    Ok(StatusCode::NO_CONTENT)
}
