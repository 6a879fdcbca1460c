//! Hotel search endpoints.

use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query};
use domain::DomainError;
use domain::hotel::{self, Hotel, SearchQuery, SearchResults};
use serde::Deserialize;

use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct HotelLookup {
    pub city: Option<String>,
}

/// POST /api/search: generate the hotels of a city.
#[tracing::instrument(skip_all)]
pub async fn search(
    payload: Result<Json<SearchQuery>, JsonRejection>,
) -> Result<Json<SearchResults>, ApiError> {
    let Json(query) = payload?;
    Ok(Json(hotel::search(query)?))
}

/// GET /api/hotels/{id}?city=: one hotel of a city.
#[tracing::instrument(skip_all)]
pub async fn get(
    id: Result<Path<i32>, PathRejection>,
    lookup: Result<Query<HotelLookup>, QueryRejection>,
) -> Result<Json<Hotel>, ApiError> {
    let Path(id) = id?;
    let Query(lookup) = lookup?;
    let city = lookup
        .city
        .filter(|c| !c.trim().is_empty())
        .ok_or(DomainError::MissingField("city"))?;

    hotel::find_hotel(&city, id)
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Hotel not found: {id}")))
}
