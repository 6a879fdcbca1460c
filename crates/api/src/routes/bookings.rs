//! Booking saga trigger and booking lookup endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use common::BookingId;
use domain::{Booking, BookingRequest, BookingStatus, Money, PriceQuote};
use saga::{NotificationOutcome, NotificationSink};
use serde::Serialize;
use store::{NotificationRecord, Storage};

use super::AppState;
use crate::error::ApiError;

// -- Response types --

#[derive(Serialize)]
pub struct BookingCreatedResponse {
    pub success: bool,
    pub booking_ids: Vec<BookingId>,
    pub status: BookingStatus,
    pub message: String,
    /// Quote for a single room.
    pub price: PriceQuote,
    /// Charge for all rooms.
    pub total_price: Money,
    pub notifications: Vec<NotificationOutcome>,
}

#[derive(Serialize)]
pub struct BookingConfirmedResponse {
    pub booking_id: BookingId,
    pub status: BookingStatus,
    pub message: String,
    pub booking: Booking,
}

#[derive(Serialize)]
pub struct NotificationsResponse {
    pub booking_id: BookingId,
    pub notifications: Vec<NotificationRecord>,
}

fn parse_booking_id(id: &str) -> Result<BookingId, ApiError> {
    BookingId::parse(id).map_err(|_| ApiError::BadRequest(format!("Invalid booking id: {id}")))
}

// -- Handlers --

/// POST /api/bookings: run the reservation saga.
#[tracing::instrument(skip_all, fields(room_type, quantity))]
pub async fn create<S: Storage, N: NotificationSink + 'static>(
    State(state): State<Arc<AppState<S, N>>>,
    payload: Result<Json<BookingRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<BookingCreatedResponse>), ApiError> {
    let Json(req) = payload?;
    let span = tracing::Span::current();
    span.record("room_type", tracing::field::debug(&req.room_type));
    span.record("quantity", tracing::field::debug(&req.quantity));

    let outcome = state.coordinator.book(req).await?;

    let booking = outcome.booking;
    let response = BookingCreatedResponse {
        success: true,
        booking_ids: booking.booking_ids,
        status: booking.status,
        message: "Bookings created successfully".to_string(),
        price: booking.quote,
        total_price: booking.total_price,
        notifications: outcome.notifications,
    };

    Ok((StatusCode::CREATED, Json(response)))
}

/// GET /api/bookings/{id}
#[tracing::instrument(skip(state))]
pub async fn get<S: Storage, N: NotificationSink + 'static>(
    State(state): State<Arc<AppState<S, N>>>,
    Path(id): Path<String>,
) -> Result<Json<Booking>, ApiError> {
    let booking_id = parse_booking_id(&id)?;
    Ok(Json(state.coordinator.booking(booking_id).await?))
}

/// PUT /api/bookings/{id}/confirm: move a booking to `confirmed`.
#[tracing::instrument(skip(state))]
pub async fn confirm<S: Storage, N: NotificationSink + 'static>(
    State(state): State<Arc<AppState<S, N>>>,
    Path(id): Path<String>,
) -> Result<Json<BookingConfirmedResponse>, ApiError> {
    let booking_id = parse_booking_id(&id)?;
    let booking = state.coordinator.confirm(booking_id).await?;

    Ok(Json(BookingConfirmedResponse {
        booking_id,
        status: booking.status,
        message: "Booking confirmed successfully".to_string(),
        booking,
    }))
}

/// GET /api/bookings/{id}/notifications: recorded notification attempts.
#[tracing::instrument(skip(state))]
pub async fn notifications<S: Storage, N: NotificationSink + 'static>(
    State(state): State<Arc<AppState<S, N>>>,
    Path(id): Path<String>,
) -> Result<Json<NotificationsResponse>, ApiError> {
    let booking_id = parse_booking_id(&id)?;
    let notifications = state.coordinator.notifications(booking_id).await?;
    Ok(Json(NotificationsResponse {
        booking_id,
        notifications,
    }))
}
