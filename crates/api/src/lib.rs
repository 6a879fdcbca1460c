//! HTTP gateway with observability for the hotel booking system.
//!
//! Fronts hotel search, the room catalog, pricing and the booking
//! reservation saga, with structured logging (tracing) and Prometheus
//! metrics.

pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post, put};
use metrics_exporter_prometheus::PrometheusHandle;
use saga::{NotificationSink, ReservationCoordinator};
use store::Storage;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use routes::AppState;

/// Creates the Axum application router with all routes and shared state.
pub fn create_app<S, N>(state: Arc<AppState<S, N>>, metrics_handle: PrometheusHandle) -> Router
where
    S: Storage,
    N: NotificationSink + 'static,
{
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check))
        .route("/api/search", post(routes::hotels::search))
        .route("/api/hotels/{id}", get(routes::hotels::get))
        .route("/api/rooms/types", get(routes::catalog::room_types::<S, N>))
        .route(
            "/api/rooms/types/{room_type}",
            get(routes::catalog::room_type::<S, N>),
        )
        .route("/api/pricing/tariffs", get(routes::catalog::tariffs::<S, N>))
        .route(
            "/api/services/extra",
            get(routes::catalog::extra_services::<S, N>),
        )
        .route(
            "/api/pricing/calculate",
            post(routes::catalog::calculate::<S, N>),
        )
        .route(
            "/api/rooms/availability",
            get(routes::catalog::availability::<S, N>),
        )
        .route("/api/rooms/check", post(routes::catalog::check::<S, N>))
        .route("/api/bookings", post(routes::bookings::create::<S, N>))
        .route("/api/bookings/{id}", get(routes::bookings::get::<S, N>))
        .route(
            "/api/bookings/{id}/confirm",
            put(routes::bookings::confirm::<S, N>),
        )
        .route(
            "/api/bookings/{id}/notifications",
            get(routes::bookings::notifications::<S, N>),
        )
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Creates the application state over `store`, notifying through `notifier`.
pub fn create_default_state<S, N>(store: S, notifier: N) -> Arc<AppState<S, N>>
where
    S: Storage,
    N: NotificationSink,
{
    Arc::new(AppState {
        coordinator: ReservationCoordinator::new(store, notifier),
    })
}
