//! Site API handlers.

use axum::{
    extract::{rejection::JsonRejection, rejection::PathRejection, Path, State},
    http::StatusCode,
    Json,
};
use haulage_core::{Site, SiteWithTrucks};
use serde::Deserialize;
use std::sync::Arc;

use super::{validate, ApiError};
use crate::state::AppState;

/// Request body for creating or replacing a site
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteBody {
    pub name: String,
    pub address: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// POST /api/v1/sites
pub async fn create_site(
    State(state): State<Arc<AppState>>,
    body: Result<Json<SiteBody>, JsonRejection>,
) -> Result<(StatusCode, Json<Site>), ApiError> {
    let Json(body) = body?;
    let site = state.sites().create(validate::site_input(body)?)?;
    Ok((StatusCode::CREATED, Json(site)))
}

/// GET /api/v1/sites
pub async fn list_sites(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Site>>, ApiError> {
    Ok(Json(state.sites().find_all()?))
}

/// GET /api/v1/sites/{id}
pub async fn get_site(
    State(state): State<Arc<AppState>>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<SiteWithTrucks>, ApiError> {
    let Path(id) = id?;
    Ok(Json(state.sites().find_one(validate::id(id, "id")?)?))
}

/// PUT /api/v1/sites/{id}
pub async fn update_site(
    State(state): State<Arc<AppState>>,
    id: Result<Path<i64>, PathRejection>,
    body: Result<Json<SiteBody>, JsonRejection>,
) -> Result<Json<Site>, ApiError> {
    let Path(id) = id?;
    let Json(body) = body?;
    let id = validate::id(id, "id")?;
    Ok(Json(state.sites().update(id, validate::site_input(body)?)?))
}

/// DELETE /api/v1/sites/{id}
pub async fn delete_site(
    State(state): State<Arc<AppState>>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let Path(id) = id?;
    state.sites().remove(validate::id(id, "id")?)?;
    Ok(StatusCode::NO_CONTENT)
}
