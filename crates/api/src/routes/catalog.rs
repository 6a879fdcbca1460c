//! Reference data, pricing and availability endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use domain::{
    DomainError, ExtraService, PriceQuote, RoomType, RoomTypeInfo, ServiceCode, TariffRule,
    TariffType,
};
use saga::NotificationSink;
use serde::{Deserialize, Serialize};
use store::{AvailabilityCheck, RoomAvailability, Storage};

use super::AppState;
use crate::error::ApiError;

// -- Request types --

#[derive(Debug, Deserialize)]
pub struct PriceRequest {
    pub room_type: Option<String>,
    pub days: Option<u32>,
    pub tariff: Option<String>,
    #[serde(default)]
    pub extras: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct AvailabilityQuery {
    pub room_type: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CheckRequest {
    pub room_type: Option<String>,
    pub quantity: Option<u32>,
}

// -- Response types --

#[derive(Serialize)]
pub struct RoomTypesResponse {
    pub room_types: Vec<RoomTypeInfo>,
}

#[derive(Serialize)]
pub struct TariffsResponse {
    pub tariffs: Vec<TariffRule>,
}

#[derive(Serialize)]
pub struct ExtraServicesResponse {
    pub extra_services: Vec<ExtraService>,
}

#[derive(Serialize)]
pub struct AvailabilityResponse {
    pub rooms: Vec<RoomAvailability>,
}

fn room_type_field(value: Option<String>) -> Result<RoomType, DomainError> {
    value
        .filter(|v| !v.trim().is_empty())
        .map(RoomType::from)
        .ok_or(DomainError::MissingField("room_type"))
}

// -- Handlers --

/// GET /api/rooms/types: all room types, cheapest first.
pub async fn room_types<S: Storage, N: NotificationSink + 'static>(
    State(state): State<Arc<AppState<S, N>>>,
) -> Result<Json<RoomTypesResponse>, ApiError> {
    let room_types = state.coordinator.room_types().await?;
    Ok(Json(RoomTypesResponse { room_types }))
}

/// GET /api/rooms/types/{room_type}
pub async fn room_type<S: Storage, N: NotificationSink + 'static>(
    State(state): State<Arc<AppState<S, N>>>,
    Path(room_type): Path<String>,
) -> Result<Json<RoomTypeInfo>, ApiError> {
    let room_type = RoomType::from(room_type);
    Ok(Json(state.coordinator.room_type(&room_type).await?))
}

/// GET /api/pricing/tariffs
pub async fn tariffs<S: Storage, N: NotificationSink + 'static>(
    State(state): State<Arc<AppState<S, N>>>,
) -> Result<Json<TariffsResponse>, ApiError> {
    let tariffs = state.coordinator.tariffs().await?;
    Ok(Json(TariffsResponse { tariffs }))
}

/// GET /api/services/extra
pub async fn extra_services<S: Storage, N: NotificationSink + 'static>(
    State(state): State<Arc<AppState<S, N>>>,
) -> Result<Json<ExtraServicesResponse>, ApiError> {
    let extra_services = state.coordinator.extra_services().await?;
    Ok(Json(ExtraServicesResponse { extra_services }))
}

/// POST /api/pricing/calculate: itemized quote for one room.
#[tracing::instrument(skip_all)]
pub async fn calculate<S: Storage, N: NotificationSink + 'static>(
    State(state): State<Arc<AppState<S, N>>>,
    payload: Result<Json<PriceRequest>, JsonRejection>,
) -> Result<Json<PriceQuote>, ApiError> {
    let Json(req) = payload?;
    let room_type = room_type_field(req.room_type)?;
    let tariff = req
        .tariff
        .filter(|t| !t.trim().is_empty())
        .map(TariffType::from)
        .unwrap_or_default();
    let extras: Vec<ServiceCode> = req.extras.into_iter().map(ServiceCode::from).collect();

    let quote = state
        .coordinator
        .pricing()
        .calculate(&room_type, req.days.unwrap_or(1), &tariff, &extras)
        .await?;
    Ok(Json(quote))
}

/// GET /api/rooms/availability: current stock, optionally for one room type.
pub async fn availability<S: Storage, N: NotificationSink + 'static>(
    State(state): State<Arc<AppState<S, N>>>,
    query: Result<Query<AvailabilityQuery>, QueryRejection>,
) -> Result<Json<AvailabilityResponse>, ApiError> {
    let Query(query) = query?;
    let room_type = query
        .room_type
        .filter(|r| !r.trim().is_empty())
        .map(RoomType::from);
    let rooms = state.coordinator.availability(room_type.as_ref()).await?;
    Ok(Json(AvailabilityResponse { rooms }))
}

/// POST /api/rooms/check: could this many rooms be reserved right now?
#[tracing::instrument(skip_all)]
pub async fn check<S: Storage, N: NotificationSink + 'static>(
    State(state): State<Arc<AppState<S, N>>>,
    payload: Result<Json<CheckRequest>, JsonRejection>,
) -> Result<Json<AvailabilityCheck>, ApiError> {
    let Json(req) = payload?;
    let room_type = room_type_field(req.room_type)?;
    let check = state
        .coordinator
        .check_availability(&room_type, req.quantity.unwrap_or(1))
        .await?;
    Ok(Json(check))
}
