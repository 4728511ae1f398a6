// --- File: crates/dentify_booking/src/routes.rs ---

use crate::handlers::{
    book_slot_handler, cancel_appointment_handler, get_availability_handler,
    get_bookings_handler, BookingState,
};
use axum::{
    routing::{get, patch, post},
    Router,
};
use std::sync::Arc;

/// Creates a router containing all routes for the booking feature.
///
/// The caller assembles the [`BookingState`] (schedule, repository and the
/// optional sync channel) so handlers never touch ambient configuration.
pub fn routes(state: Arc<BookingState>) -> Router {
    Router::new()
        .route("/availability", get(get_availability_handler))
        .route("/book", post(book_slot_handler))
        .route("/bookings", get(get_bookings_handler))
        .route(
            "/admin/cancel/{appointment_id}",
            patch(cancel_appointment_handler),
        )
        .with_state(state)
}
