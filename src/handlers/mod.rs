pub mod admin;
pub mod bookings;
pub mod calendar;
pub mod contact;
pub mod health;

use std::sync::Arc;

use axum::http::{header, Method};
use axum::routing::{delete, get, patch, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    Router::new()
        .route("/health", get(health::health))
        .route("/api/bookings", post(bookings::create_booking))
        .route("/api/bookings/availability", get(bookings::get_availability))
        .route("/api/bookings/slots", get(bookings::get_slots))
        .route("/api/bookings/calendar", get(bookings::get_calendar))
        .route("/api/bookings/:id", patch(bookings::update_booking_status))
        .route("/api/admin/bookings", get(admin::list_bookings))
        .route(
            "/api/admin/schedules",
            get(admin::get_schedules).put(admin::replace_schedules),
        )
        .route(
            "/api/admin/overrides",
            get(admin::get_overrides).post(admin::upsert_override),
        )
        .route("/api/admin/overrides/:date", delete(admin::delete_override))
        .route(
            "/api/admin/settings",
            get(admin::get_settings).put(admin::update_settings),
        )
        .route("/api/contact", post(contact::submit_contact))
        .route("/calendar/:booking_id", get(calendar::download_ics))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
