// --- File: crates/dentify_booking/src/handlers.rs ---
use crate::logic::{
    available_slots, book_slot, day_bounds, AvailabilityQuery, AvailableSlotsResponse,
    BookSlotRequest, BookedAppointmentsQuery, BookedAppointmentsResponse, BookingError,
    BookingResponse, CancellationResponse,
};
use crate::schedule::ClinicSchedule;
use axum::{
    extract::{Path, Query, State},
    response::Json,
};
use chrono::{Duration, NaiveDate, Utc};
use dentify_common::models::AppointmentStatus;
use dentify_common::services::CalendarEvent;
use dentify_common::{conflict, internal_error, not_found, validation_error, DentifyError};
use dentify_db::AppointmentRepository;
use std::sync::Arc;
use tracing::{error, info, warn};

// Shared state for the booking handlers
#[derive(Clone)]
pub struct BookingState {
    pub schedule: Arc<ClinicSchedule>,
    pub repository: Arc<dyn AppointmentRepository>,
    /// Channel into the calendar sync worker. `None` disables sync.
    pub sync_tx: Option<tokio::sync::mpsc::Sender<CalendarEvent>>,
}

/// Handler to get available time slots for one day.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/availability",
    params(AvailabilityQuery),
    responses(
        (status = 200, description = "Open time slots for the requested day", body = AvailableSlotsResponse),
        (status = 400, description = "Bad request (e.g., invalid date format)"),
        (status = 500, description = "Internal error")
    ),
    tag = "Booking"
))]
pub async fn get_availability_handler(
    State(state): State<Arc<BookingState>>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<AvailableSlotsResponse>, DentifyError> {
    let date = NaiveDate::parse_from_str(&query.date, "%Y-%m-%d")
        .map_err(|_| validation_error("Invalid date format (YYYY-MM-DD)"))?;

    let (day_start, day_end) = day_bounds(date, &state.schedule);

    // Busy periods come from active appointments only; reads take no locks.
    let busy: Vec<_> = match &query.practitioner {
        Some(practitioner) => state
            .repository
            .find_active_for_practitioner(practitioner, day_start, day_end)
            .await,
        None => state.repository.find_in_range(day_start, day_end, false).await,
    }
    .map_err(|e| {
        error!("Error loading appointments for availability: {}", e);
        internal_error("Failed to query availability")
    })?
    .iter()
    .map(|a| (a.start_time, a.end_time()))
    .collect();

    let slots = available_slots(date, &busy, &state.schedule).collect();

    Ok(Json(AvailableSlotsResponse { slots }))
}

/// Handler to book a time slot.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/book",
    request_body = BookSlotRequest,
    responses(
        (status = 200, description = "Appointment booked", body = BookingResponse),
        (status = 400, description = "Malformed or out-of-hours request"),
        (status = 409, description = "Slot already booked"),
        (status = 500, description = "Persistence failure")
    ),
    tag = "Booking"
))]
pub async fn book_slot_handler(
    State(state): State<Arc<BookingState>>,
    Json(payload): Json<BookSlotRequest>,
) -> Result<Json<BookingResponse>, DentifyError> {
    match book_slot(
        state.repository.as_ref(),
        &state.schedule,
        payload,
        Utc::now(),
    )
    .await
    {
        Ok(appointment) => {
            info!("Successfully booked appointment {}", appointment.id);

            // Best-effort: hand the event to the sync worker and move on.
            // A full queue or a closed channel never fails the booking.
            if let Some(sync_tx) = &state.sync_tx {
                let event = CalendarEvent {
                    start_time: appointment.start_time.to_rfc3339(),
                    end_time: appointment.end_time().to_rfc3339(),
                    summary: format!(
                        "Dental Appointment: {}",
                        appointment.service.label()
                    ),
                    description: appointment.notes.clone(),
                    attendees: vec![
                        appointment.patient_email.clone(),
                        appointment.practitioner_email.clone(),
                    ],
                };
                if let Err(e) = sync_tx.try_send(event) {
                    warn!("Calendar sync queue unavailable, event dropped: {}", e);
                }
            }

            Ok(Json(BookingResponse {
                success: true,
                appointment_id: Some(appointment.id),
                status: Some(appointment.status),
                message: "Appointment booked successfully.".to_string(),
            }))
        }
        Err(BookingError::Conflict) => {
            Err(conflict("Requested time slot is no longer available."))
        }
        Err(BookingError::Validation(message)) => Err(validation_error(message)),
        Err(BookingError::Persistence(e)) => {
            error!("Error booking slot: {}", e);
            Err(internal_error("Failed to book appointment."))
        }
    }
}

/// Handler to list booked appointments in a date range.
#[axum::debug_handler]
pub async fn get_bookings_handler(
    State(state): State<Arc<BookingState>>,
    Query(query): Query<BookedAppointmentsQuery>,
) -> Result<Json<BookedAppointmentsResponse>, DentifyError> {
    let start_date = NaiveDate::parse_from_str(&query.start_date, "%Y-%m-%d")
        .map_err(|_| validation_error("Invalid start_date format (YYYY-MM-DD)"))?;
    let end_date = NaiveDate::parse_from_str(&query.end_date, "%Y-%m-%d")
        .map_err(|_| validation_error("Invalid end_date format (YYYY-MM-DD)"))?;

    if end_date < start_date {
        return Err(validation_error("end_date must be after start_date"));
    }

    let (range_start, _) = day_bounds(start_date, &state.schedule);
    // Include the full end day
    let (_, range_end) = day_bounds(end_date, &state.schedule);
    let range_end = range_end.max(range_start + Duration::days(1));

    let include_cancelled = query.include_cancelled.unwrap_or(false);

    match state
        .repository
        .find_in_range(range_start, range_end, include_cancelled)
        .await
    {
        Ok(appointments) => Ok(Json(BookedAppointmentsResponse { appointments })),
        Err(e) => {
            error!("Error fetching booked appointments: {}", e);
            Err(internal_error("Failed to fetch booked appointments"))
        }
    }
}

/// Handler to mark an appointment as cancelled without deleting it.
#[axum::debug_handler]
pub async fn cancel_appointment_handler(
    State(state): State<Arc<BookingState>>,
    Path(appointment_id): Path<String>,
) -> Result<Json<CancellationResponse>, DentifyError> {
    match state
        .repository
        .update_status(&appointment_id, AppointmentStatus::Cancelled)
        .await
    {
        Ok(true) => Ok(Json(CancellationResponse {
            success: true,
            message: "Appointment marked as cancelled successfully.".to_string(),
        })),
        Ok(false) => Err(not_found("Appointment not found.")),
        Err(e) => {
            error!("Error cancelling appointment {}: {}", appointment_id, e);
            Err(internal_error("Failed to cancel appointment."))
        }
    }
}
